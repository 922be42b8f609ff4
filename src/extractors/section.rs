// src/extractors/section.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;

// --- Regex Patterns (Lazy Static) ---
// "Item 1.", "Item 7A.", "ITEM 15." at the very start of a line. The matched text is the base key.
// Used both when opening a section and when grouping duplicates, so the two can never disagree.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Item\s\d{1,2}[A-Z]?\.").expect("Failed to compile HEADING_RE")
});

/// Returns the base key ("Item 7A.") of a heading line, or None if the line is not a heading.
pub fn base_key(line: &str) -> Option<&str> {
    HEADING_RE.find(line).map(|m| m.as_str())
}

/// Replaces non-breaking spaces with ordinary spaces.
pub fn normalize_line(line: &str) -> Cow<'_, str> {
    if line.contains('\u{a0}') {
        Cow::Owned(line.replace('\u{a0}', " "))
    } else {
        Cow::Borrowed(line)
    }
}

// --- Data Structures ---

/// Which headings to keep, as case-insensitive substrings of the heading line
/// (e.g. `"Item 1."`, `"Item 7A."`). An empty filter keeps every heading.
#[derive(Debug, Clone, Default)]
pub struct SectionFilter {
    terms: Vec<String>,
}

impl SectionFilter {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    /// True if any term occurs anywhere in `line`, ignoring case.
    pub fn accepts(&self, line: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let line = line.to_lowercase();
        self.terms.iter().any(|term| line.contains(term.as_str()))
    }
}

/// How a single (already normalized) line reads on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    AcceptedHeading,
    RejectedHeading,
    Body,
}

pub fn classify(line: &str, filter: Option<&SectionFilter>) -> LineKind {
    if base_key(line).is_none() {
        return LineKind::Body;
    }
    match filter {
        Some(filter) if !filter.accepts(line) => LineKind::RejectedHeading,
        _ => LineKind::AcceptedHeading,
    }
}

/// What the segmenter did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFate {
    /// Accepted heading; a fresh, empty section was opened under it.
    Opened,
    /// Heading outside the filter; the open section (if any) was closed.
    Skipped,
    /// Appended to the open section's body.
    Appended,
    /// No section open; the line was dropped.
    Discarded,
}

/// Heading lines and their bodies, in the order each heading text was first opened.
#[derive(Debug, Default)]
pub struct SectionRecords {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SectionRecords {
    /// Opens an empty record under `heading`. Re-opening an existing heading text
    /// empties its body but keeps its original position.
    fn open(&mut self, heading: &str) -> usize {
        if let Some(&idx) = self.index.get(heading) {
            self.entries[idx].1.clear();
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push((heading.to_string(), String::new()));
        self.index.insert(heading.to_string(), idx);
        idx
    }

    fn append(&mut self, idx: usize, text: &str) {
        self.entries[idx].1.push_str(text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One heading per distinct base key, each with the longest body seen for that key.
///
/// Serializes as a flat map from heading text to body text, in the order the
/// base keys were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSections {
    entries: Vec<(String, String)>,
}

impl ResolvedSections {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, heading: &str) -> Option<&str> {
        self.entries.iter().find(|(h, _)| h == heading).map(|(_, b)| b.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, b)| (h.as_str(), b.as_str()))
    }

    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }
}

impl Serialize for ResolvedSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (heading, body) in &self.entries {
            map.serialize_entry(heading, body)?;
        }
        map.end()
    }
}

// --- Segmenter ---

/// Line-at-a-time section splitter. Feed lines in document order, then `finish`.
pub struct Segmenter<'f> {
    filter: Option<&'f SectionFilter>,
    records: SectionRecords,
    current: Option<usize>,
}

impl<'f> Segmenter<'f> {
    pub fn new(filter: Option<&'f SectionFilter>) -> Self {
        Self { filter, records: SectionRecords::default(), current: None }
    }

    pub fn feed(&mut self, line: &str) -> LineFate {
        let line = normalize_line(line);
        // Headings are classified before anything is appended, so a heading line
        // never lands in the body of the section it closes.
        match classify(&line, self.filter) {
            LineKind::AcceptedHeading => {
                tracing::trace!("Opening section: '{}'", line);
                self.current = Some(self.records.open(&line));
                LineFate::Opened
            }
            LineKind::RejectedHeading => {
                tracing::trace!("Skipping heading outside filter: '{}'", line);
                self.current = None;
                LineFate::Skipped
            }
            LineKind::Body => match self.current {
                Some(idx) => {
                    self.records.append(idx, &line);
                    LineFate::Appended
                }
                None => LineFate::Discarded,
            },
        }
    }

    pub fn records(&self) -> &SectionRecords {
        &self.records
    }

    pub fn finish(self) -> ResolvedSections {
        resolve(self.records)
    }
}

/// Splits `lines` into sections and collapses duplicate headings.
pub fn segment<I, S>(lines: I, filter: Option<&SectionFilter>) -> ResolvedSections
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = Segmenter::new(filter);
    for line in lines {
        segmenter.feed(line.as_ref());
    }
    tracing::debug!("Collected {} section record(s)", segmenter.records().len());
    segmenter.finish()
}

/// Keeps one record per case-insensitive base key: the one with the most characters
/// of body text, or the earliest on a tie. The retained heading keeps its original case.
pub fn resolve(records: SectionRecords) -> ResolvedSections {
    let mut entries: Vec<(String, String)> = Vec::with_capacity(records.entries.len());
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (heading, body) in records.entries {
        let Some(key) = base_key(&heading).map(str::to_lowercase) else {
            tracing::warn!("Dropping record without a heading base key: '{}'", heading);
            continue;
        };
        match by_key.get(&key) {
            Some(&idx) => {
                let kept = &entries[idx];
                if body.chars().count() > kept.1.chars().count() {
                    tracing::debug!("'{}' supersedes '{}' for {}", heading, kept.0, key);
                    entries[idx] = (heading, body);
                }
            }
            None => {
                by_key.insert(key, entries.len());
                entries.push((heading, body));
            }
        }
    }

    ResolvedSections { entries }
}
