// src/edgar/source.rs
//! The three capabilities the pipeline needs from EDGAR. `EdgarClient` provides all
//! of them over HTTP; tests provide in-memory versions.
use crate::edgar::models::{Cik, FilingRef};
use crate::utils::error::EdgarError;

/// Maps a ticker symbol to its registry identifier.
pub trait CompanyLookup {
    async fn lookup_cik(&self, ticker: &str) -> Result<Cik, EdgarError>;
}

/// Lists a company's filings of one form type, most recent first, at most `limit` of them.
pub trait FilingListing {
    async fn list_filings(&self, cik: &Cik, form_type: &str, limit: usize) -> Result<Vec<FilingRef>, EdgarError>;
}

/// Fetches the raw document behind a filing locator.
pub trait DocumentSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, EdgarError>;
}
