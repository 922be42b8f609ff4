// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // Any non-success status not covered below

    #[error("Request refused by EDGAR (403), check the contact User-Agent")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

impl EdgarError {
    /// True for the `NotFound` kind; everything else is a transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EdgarError::NotFound(_))
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// What went wrong with one document of a batch.
#[derive(Error, Debug)]
pub enum DocumentErrorKind {
    #[error("fetch failed: {0}")]
    Fetch(#[from] EdgarError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("storage failed: {0}")]
    Store(#[from] StorageError),
}

/// A failure scoped to a single document; the batch keeps going.
#[derive(Error, Debug)]
#[error("{locator}: {kind}")]
pub struct DocumentError {
    pub locator: String,
    pub kind: DocumentErrorKind,
}

impl DocumentError {
    pub fn new(locator: impl Into<String>, kind: impl Into<DocumentErrorKind>) -> Self {
        Self { locator: locator.into(), kind: kind.into() }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
