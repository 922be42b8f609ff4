// src/utils/trace.rs
use crate::extractors::section::{LineFate, SectionFilter, Segmenter};

/// Renders every linearized line with what the segmenter did with it, followed by
/// a summary of the resolved sections. Written next to the JSON output in debug mode.
pub fn render_trace<'a, I>(lines: I, filter: Option<&SectionFilter>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segmenter = Segmenter::new(filter);
    let mut trace = String::new();

    for (n, line) in lines.into_iter().enumerate() {
        let marker = match segmenter.feed(line) {
            LineFate::Opened => "OPEN",
            LineFate::Skipped => "SKIP",
            LineFate::Appended => "BODY",
            LineFate::Discarded => "DROP",
        };
        trace.push_str(&format!("{:>6} {} {}\n", n + 1, marker, line));
    }

    let sections = segmenter.finish();
    trace.push_str(&format!("# {} resolved section(s)\n", sections.len()));
    for (heading, body) in sections.iter() {
        trace.push_str(&format!("#   {} ({} chars)\n", heading, body.chars().count()));
    }
    trace
}
