// src/extractors/mod.rs
pub mod linearize;
pub mod section;

pub use linearize::LinearDocument;
pub use section::{ResolvedSections, SectionFilter};

use crate::utils::error::ExtractError;

/// Linearizes a raw filing and splits it into resolved sections.
/// `None` (or an empty filter) keeps every `Item N.` heading.
pub fn segment_document(raw: &[u8], filter: Option<&SectionFilter>) -> Result<ResolvedSections, ExtractError> {
    let document = LinearDocument::parse(raw)?;
    Ok(section::segment(document.lines(), filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILING: &str = r##"
        <html><body>
        <p>UNITED STATES SECURITIES AND EXCHANGE COMMISSION</p>
        <table>
          <tr><td><a href="#i1">Item&#160;1.</a></td><td>Business</td><td>3</td></tr>
          <tr><td><a href="#i1a">Item&#160;1A.</a></td><td>Risk Factors</td><td>9</td></tr>
        </table>
        <div id="i1"><p><b>Item&#160;1.&#160;Business</b></p></div>
        <p>Acme designs and sells widgets.</p>
        <p>It has 1,200 employees.</p>
        <div id="i1a"><p><b>Item&#160;1A.&#160;Risk Factors</b></p></div>
        <p>Widgets may break.</p>
        <p><b>ITEM 2. PROPERTIES</b></p>
        <p>Acme owns a factory.</p>
        </body></html>
    "##;

    #[test]
    fn test_segment_document_with_filter() {
        let filter = SectionFilter::new(["Item 1.", "Item 1A."]);
        let sections = segment_document(FILING.as_bytes(), Some(&filter)).unwrap();

        assert_eq!(sections.len(), 2, "got {:?}", sections);
        assert_eq!(
            sections.get("Item 1. Business"),
            Some("Acme designs and sells widgets.It has 1,200 employees.")
        );
        assert_eq!(sections.get("Item 1A. Risk Factors"), Some("Widgets may break."));
        assert!(sections.iter().all(|(_, body)| !body.contains("factory")));
        assert!(sections.iter().all(|(_, body)| !body.contains("SECURITIES")));
    }

    #[test]
    fn test_segment_document_without_filter() {
        let sections = segment_document(FILING.as_bytes(), None).unwrap();
        let headings: Vec<&str> = sections.headings().collect();
        assert_eq!(headings, vec!["Item 1. Business", "Item 1A. Risk Factors", "ITEM 2. PROPERTIES"]);
        assert_eq!(sections.get("ITEM 2. PROPERTIES"), Some("Acme owns a factory."));
    }

    #[test]
    fn test_wrapped_paragraph_keeps_word_spacing() {
        let html = "<p>Item 1. Business</p><p>We make\n   widgets and\n   gadgets.</p>";
        let sections = segment_document(html.as_bytes(), None).unwrap();
        assert_eq!(sections.get("Item 1. Business"), Some("We make   widgets and   gadgets."));
    }

    #[test]
    fn test_indented_item_reference_is_not_a_heading() {
        let html = "<p>Item 1. Business</p><p>see the discussion\n   Item 7. below</p><p>More text.</p>";
        let sections = segment_document(html.as_bytes(), None).unwrap();
        assert_eq!(sections.len(), 1, "got {:?}", sections);
        assert_eq!(sections.get("Item 1. Business"), Some("see the discussion   Item 7. belowMore text."));
    }

    #[test]
    fn test_segment_document_rejects_non_utf8() {
        let err = segment_document(&[0xc3, 0x28], None).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedDocument(_)));
    }
}
