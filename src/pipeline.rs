// src/pipeline.rs
use std::path::{Path, PathBuf};

use crate::edgar::{CompanyLookup, DocumentSource, FilingListing};
use crate::extractors::{self, LinearDocument, SectionFilter};
use crate::storage::StorageManager;
use crate::utils::error::{AppError, DocumentError, StorageError};
use crate::utils::trace;

/// Outcome of a batch: what got written, and which documents failed and why.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<DocumentError>,
}

impl BatchReport {
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Resolves the ticker, lists its most recent `count` filings of `form_type`, and
/// stores each document. Lookup and listing failures abort; a failed document does not.
pub async fn download_filings<L, F, D>(
    lookup: &L,
    listing: &F,
    source: &D,
    storage: &StorageManager,
    ticker: &str,
    form_type: &str,
    count: usize,
) -> Result<BatchReport, AppError>
where
    L: CompanyLookup,
    F: FilingListing,
    D: DocumentSource,
{
    let cik = lookup.lookup_cik(ticker).await?;
    tracing::info!("CIK for {}: {}", ticker, cik);

    let filings = listing.list_filings(&cik, form_type, count).await?;
    tracing::info!("Found {} {} filing(s) for CIK {}", filings.len(), form_type, cik);
    if filings.is_empty() {
        tracing::warn!("No {} filings found for CIK: {}", form_type, cik);
    }

    let mut report = BatchReport::default();
    for filing in filings {
        tracing::info!(
            "Downloading {} from: {} (Date: {})",
            form_type,
            filing.locator,
            filing.filed_at.format("%Y-%m-%d")
        );

        let stored = match source.fetch(&filing.locator).await {
            Ok(content) => storage
                .save_raw_filing(ticker, &filing, &content)
                .map_err(|e| DocumentError::new(&filing.locator, e)),
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!("Filing document missing at {}", filing.locator);
                }
                Err(DocumentError::new(&filing.locator, e))
            }
        };

        match stored {
            Ok(path) => report.succeeded.push(path),
            Err(e) => {
                tracing::error!("Failed to download filing: {}", e);
                report.failed.push(e);
            }
        }
    }

    Ok(report)
}

/// Segments every stored filing of `ticker` and writes one JSON section map per filing.
/// With `debug`, a per-line trace is written alongside each map.
pub fn extract_filings(
    storage: &StorageManager,
    ticker: &str,
    filter: Option<&SectionFilter>,
    debug: bool,
) -> Result<BatchReport, AppError> {
    let mut report = BatchReport::default();

    for path in storage.list_raw_filings(ticker)? {
        tracing::info!("Extracting Items from {}", path.display());
        match extract_one(storage, ticker, &path, filter, debug) {
            Ok(json_path) => report.succeeded.push(json_path),
            Err(e) => {
                tracing::error!("Failed to extract sections: {}", e);
                report.failed.push(e);
            }
        }
    }

    Ok(report)
}

fn extract_one(
    storage: &StorageManager,
    ticker: &str,
    path: &Path,
    filter: Option<&SectionFilter>,
    debug: bool,
) -> Result<PathBuf, DocumentError> {
    let locator = path.display().to_string();
    let stem = stem_of(path).map_err(|e| DocumentError::new(&locator, e))?;

    let raw = std::fs::read(path).map_err(|e| DocumentError::new(&locator, StorageError::from(e)))?;
    let sections = extractors::segment_document(&raw, filter).map_err(|e| DocumentError::new(&locator, e))?;

    if sections.is_empty() {
        tracing::warn!("No matching sections in {}", locator);
    } else {
        tracing::info!("Extracted {} section(s) from {}", sections.len(), locator);
        tracing::debug!("Headings kept: {:?}", sections.headings().collect::<Vec<_>>());
    }

    if debug {
        // Parse again so the trace reflects exactly what the segmenter saw.
        let document = LinearDocument::parse(&raw).map_err(|e| DocumentError::new(&locator, e))?;
        let rendered = trace::render_trace(document.lines(), filter);
        storage
            .save_trace(ticker, &stem, &rendered)
            .map_err(|e| DocumentError::new(&locator, e))?;
    }

    storage
        .save_sections(ticker, &stem, &sections)
        .map_err(|e| DocumentError::new(&locator, e))
}

fn stem_of(path: &Path) -> Result<String, StorageError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("file name of {} is not UTF-8", path.display()),
            ))
        })
}
