// src/edgar/models.rs
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;

/// Central Index Key, always rendered zero-padded to 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cik(String);

impl Cik {
    pub fn from_number(n: u64) -> Self {
        Cik(format!("{:010}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of https://www.sec.gov/files/company_tickers.json
/// Example: "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}
#[derive(Debug, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

/// A dated filing found in the company's filing feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRef {
    /// URL of the filing index page.
    pub locator: String,
    pub filed_at: DateTime<FixedOffset>,
}

impl FilingRef {
    /// File stem used for everything stored about this filing, e.g. `filing_2023-11-03`.
    pub fn file_stem(&self) -> String {
        format!("filing_{}", self.filed_at.format("%Y-%m-%d"))
    }
}
