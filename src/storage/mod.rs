// src/storage/mod.rs
use crate::edgar::FilingRef;
use crate::extractors::ResolvedSections;
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const JSON_DIR: &str = "json";

/// Keeps raw filings and their section maps under `<base_dir>/<TICKER>/`.
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_dir: base_path })
    }

    fn ticker_dir(&self, ticker: &str) -> PathBuf {
        self.base_dir.join(ticker.to_uppercase())
    }

    fn json_dir(&self, ticker: &str) -> Result<PathBuf, StorageError> {
        let dir = self.ticker_dir(ticker).join(JSON_DIR);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Writes a downloaded document as `<TICKER>/filing_<date>.html`.
    pub fn save_raw_filing(&self, ticker: &str, filing: &FilingRef, content: &[u8]) -> Result<PathBuf, StorageError> {
        let target_dir = self.ticker_dir(ticker);
        fs::create_dir_all(&target_dir)?;

        let file_path = target_dir.join(format!("{}.html", filing.file_stem()));
        fs::write(&file_path, content)?;

        tracing::info!("Downloaded: {}", file_path.display());
        Ok(file_path)
    }

    /// Regular files directly inside the ticker directory, sorted by name.
    /// A ticker with nothing downloaded yet has no files.
    pub fn list_raw_filings(&self, ticker: &str) -> Result<Vec<PathBuf>, StorageError> {
        let dir = self.ticker_dir(ticker);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Writes the section map as `<TICKER>/json/<stem>.json`, indented by four spaces.
    pub fn save_sections(&self, ticker: &str, stem: &str, sections: &ResolvedSections) -> Result<PathBuf, StorageError> {
        let file_path = self.json_dir(ticker)?.join(format!("{}.json", stem));

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        sections
            .serialize(&mut serializer)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&file_path, buf)?;

        tracing::info!("Items saved in {}", file_path.display());
        Ok(file_path)
    }

    /// Writes a segmentation trace as `<TICKER>/json/<stem>.lines.txt`.
    pub fn save_trace(&self, ticker: &str, stem: &str, trace: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.json_dir(ticker)?.join(format!("{}.lines.txt", stem));
        fs::write(&file_path, trace)?;
        tracing::info!("Saved segmentation trace to {}", file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::section::segment;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn filing(date: &str) -> FilingRef {
        FilingRef {
            locator: format!("https://www.sec.gov/Archives/{}-index.htm", date),
            filed_at: DateTime::parse_from_rfc3339(&format!("{}T18:00:00-04:00", date)).unwrap(),
        }
    }

    #[test]
    fn test_raw_filings_round_trip_through_listing() {
        let tmp = TempDir::new().unwrap();
        let storage = StorageManager::new(tmp.path().join("downloads")).unwrap();

        assert!(storage.list_raw_filings("acme").unwrap().is_empty(), "unknown ticker has no files");

        let newer = storage.save_raw_filing("acme", &filing("2023-11-02"), b"<p>new</p>").unwrap();
        let older = storage.save_raw_filing("acme", &filing("2022-10-27"), b"<p>old</p>").unwrap();
        storage.save_sections("acme", "filing_2022-10-27", &ResolvedSections::default()).unwrap();

        assert_eq!(newer, tmp.path().join("downloads/ACME/filing_2023-11-02.html"));
        assert_eq!(fs::read(&older).unwrap(), b"<p>old</p>");
        // The json/ subdirectory is not a raw filing.
        assert_eq!(storage.list_raw_filings("ACME").unwrap(), vec![older, newer]);
    }

    #[test]
    fn test_sections_json_is_indented_ordered_and_unescaped() {
        let tmp = TempDir::new().unwrap();
        let storage = StorageManager::new(tmp.path()).unwrap();
        let sections = segment(["Item 7. Management’s Discussion", "Net sales rose 8 %", "Item 1. Business", "Widgets"], None);

        let path = storage.save_sections("acme", "filing_2023-11-02", &sections).unwrap();
        assert_eq!(path, tmp.path().join("ACME/json/filing_2023-11-02.json"));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n    \"Item 7. Management’s Discussion\": \"Net sales rose 8 %\",\n    \"Item 1. Business\": \"Widgets\"\n}"
        );
    }

    #[test]
    fn test_trace_is_saved_next_to_json() {
        let tmp = TempDir::new().unwrap();
        let storage = StorageManager::new(tmp.path()).unwrap();
        let path = storage.save_trace("acme", "filing_2023-11-02", "     1 DROP Cover\n").unwrap();
        assert_eq!(path, tmp.path().join("ACME/json/filing_2023-11-02.lines.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "     1 DROP Cover\n");
    }
}
