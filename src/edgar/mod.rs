// src/edgar/mod.rs
pub mod client;
pub mod models;
pub mod parse;
pub mod source;

pub use client::EdgarClient;
pub use models::FilingRef;
pub use source::{CompanyLookup, DocumentSource, FilingListing};
