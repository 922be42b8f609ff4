// src/edgar/parse.rs
use crate::edgar::models::{Cik, FilingRef, TickerEntry};
use crate::utils::error::EdgarError;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;

// Row label of the full submission document on a filing index page.
const SUBMISSION_TEXT_LABEL: &str = "Complete submission text";

// --- CSS Selectors (Lazy Static) ---
static FILE_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.tableFile").expect("Failed to compile FILE_TABLE_SELECTOR")
});
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR"));

/// Finds the CIK for `ticker` (case-insensitive) in the body of company_tickers.json.
pub fn find_cik(tickers_json: &str, ticker: &str) -> Result<Cik, EdgarError> {
    let table: HashMap<String, TickerEntry> = serde_json::from_str(tickers_json)
        .map_err(|e| EdgarError::Parse(format!("Invalid company tickers JSON: {}", e)))?;

    let wanted = ticker.trim().to_uppercase();
    table
        .values()
        .find(|entry| entry.ticker.to_uppercase() == wanted)
        .map(|entry| {
            tracing::debug!("Ticker {} belongs to '{}' (CIK {})", wanted, entry.title, entry.cik_str);
            Cik::from_number(entry.cik_str)
        })
        .ok_or_else(|| EdgarError::NotFound(format!("CIK for ticker {}", wanted)))
}

/// Reads the company browse Atom feed into filings, newest first, keeping at most `limit`.
/// Entries without an alternate link or an `updated` timestamp are skipped.
pub fn parse_filing_feed(atom: &str, limit: usize) -> Result<Vec<FilingRef>, EdgarError> {
    let doc = roxmltree::Document::parse(atom)
        .map_err(|e| EdgarError::Parse(format!("Invalid filing feed XML: {}", e)))?;

    let mut filings = Vec::new();
    for entry in doc.descendants().filter(|n| n.has_tag_name("entry")) {
        let href = entry
            .children()
            .find(|n| n.has_tag_name("link") && n.attribute("rel") == Some("alternate"))
            .and_then(|n| n.attribute("href"));
        let updated = entry
            .children()
            .find(|n| n.has_tag_name("updated"))
            .and_then(|n| n.text())
            .map(str::trim);

        match (href, updated) {
            (Some(href), Some(updated)) => filings.push(FilingRef {
                locator: href.to_string(),
                filed_at: parse_timestamp(updated)?,
            }),
            _ => tracing::debug!("Skipping feed entry without link or timestamp"),
        }
    }

    filings.sort_by(|a, b| b.filed_at.cmp(&a.filed_at));
    filings.truncate(limit);
    Ok(filings)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, EdgarError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|e| EdgarError::Parse(format!("Invalid filing timestamp '{}': {}", raw, e)))
}

/// Finds the link to the complete submission text on a filing index page.
pub fn find_submission_href(index_html: &str) -> Option<String> {
    let document = Html::parse_document(index_html);
    let table = document.select(&FILE_TABLE_SELECTOR).next()?;

    table.select(&ROW_SELECTOR).find_map(|row| {
        let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
        if cells.len() > 3 && cells[1].text().collect::<String>().contains(SUBMISSION_TEXT_LABEL) {
            cells[2]
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
        } else {
            None
        }
    })
}

/// Resolves a root-relative archive link against `base`. Absolute links pass through.
pub fn archive_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKERS: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
    }"#;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>APPLE INC.  (0000320193)</title>
  <updated>2024-05-01T12:00:00-04:00</updated>
  <entry>
    <category label="form type" scheme="https://www.sec.gov/" term="10-K"/>
    <link href="https://www.sec.gov/Archives/edgar/data/320193/000032019322000108/0000320193-22-000108-index.htm" rel="alternate" type="text/html"/>
    <title>10-K  - Annual report</title>
    <updated>2022-10-27T18:01:14-04:00</updated>
  </entry>
  <entry>
    <link href="https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106-index.htm" rel="alternate" type="text/html"/>
    <updated>2023-11-02T18:08:27-04:00</updated>
  </entry>
  <entry>
    <title>entry without a link</title>
    <updated>2024-01-01T00:00:00-05:00</updated>
  </entry>
  <entry>
    <link href="https://www.sec.gov/Archives/edgar/data/320193/000032019321000105/0000320193-21-000105-index.htm" rel="alternate" type="text/html"/>
    <updated>2021-10-28T18:04:28-04:00</updated>
  </entry>
</feed>"#;

    const INDEX_PAGE: &str = r#"<html><body>
      <table class="tableFile" summary="Document Format Files">
        <tr><th>Seq</th><th>Description</th><th>Document</th><th>Type</th><th>Size</th></tr>
        <tr><td>1</td><td>10-K</td><td><a href="/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm">aapl-20230930.htm</a></td><td>10-K</td><td>9000</td></tr>
        <tr><td>&nbsp;</td><td>Complete submission text file</td><td><a href="/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt">0000320193-23-000106.txt</a></td><td>&nbsp;</td><td>12000</td></tr>
      </table>
    </body></html>"#;

    #[test]
    fn test_find_cik_is_case_insensitive_and_padded() {
        assert_eq!(find_cik(TICKERS, "aapl").unwrap().as_str(), "0000320193");
        assert_eq!(find_cik(TICKERS, "MSFT").unwrap().as_str(), "0000789019");
    }

    #[test]
    fn test_find_cik_unknown_ticker_is_not_found() {
        assert!(find_cik(TICKERS, "ZZZZ").unwrap_err().is_not_found());
        assert!(matches!(find_cik("[1, 2]", "AAPL"), Err(EdgarError::Parse(_))));
    }

    #[test]
    fn test_feed_is_sorted_newest_first_and_truncated() {
        let filings = parse_filing_feed(FEED, 2).unwrap();
        assert_eq!(filings.len(), 2);
        assert!(filings[0].locator.ends_with("0000320193-23-000106-index.htm"));
        assert!(filings[1].locator.ends_with("0000320193-22-000108-index.htm"));
        assert_eq!(filings[0].file_stem(), "filing_2023-11-02");

        let all = parse_filing_feed(FEED, 100).unwrap();
        assert_eq!(all.len(), 3, "entry without a link is skipped");
    }

    #[test]
    fn test_empty_feed_and_bad_timestamps() {
        let empty = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        assert!(parse_filing_feed(empty, 5).unwrap().is_empty());

        let bad = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <link rel="alternate" href="https://x/y-index.htm"/><updated>last tuesday</updated></entry></feed>"#;
        assert!(matches!(parse_filing_feed(bad, 5), Err(EdgarError::Parse(_))));
        assert!(matches!(parse_filing_feed("<feed>", 5), Err(EdgarError::Parse(_))));
    }

    #[test]
    fn test_find_submission_href() {
        assert_eq!(
            find_submission_href(INDEX_PAGE).as_deref(),
            Some("/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt")
        );
        assert_eq!(find_submission_href("<html><body><p>no table</p></body></html>"), None);
    }

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url("https://www.sec.gov/", "/Archives/edgar/data/1/a.txt"),
            "https://www.sec.gov/Archives/edgar/data/1/a.txt"
        );
        assert_eq!(archive_url("https://www.sec.gov", "https://other/a.txt"), "https://other/a.txt");
    }
}
