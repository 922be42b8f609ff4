// src/edgar/client.rs
use crate::edgar::models::{Cik, FilingRef};
use crate::edgar::parse;
use crate::edgar::source::{CompanyLookup, DocumentSource, FilingListing};
use crate::utils::config::EdgarConfig;
use crate::utils::error::EdgarError;
use reqwest::header;

// The browse feed is always asked for this many entries; the caller's limit is applied afterwards.
const FEED_PAGE_SIZE: usize = 100;

/// Talks to EDGAR over HTTP with the configured contact User-Agent.
pub struct EdgarClient {
    http: reqwest::Client,
    config: EdgarConfig,
}

impl EdgarClient {
    pub fn new(config: EdgarConfig) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str()) // Set the required User-Agent
            .build()?;
        Ok(Self { http, config })
    }

    /// GETs `url` after the configured pause and maps failure statuses to `EdgarError`.
    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        tracing::debug!("GET {} (User-Agent: {})", url, self.config.user_agent);
        tokio::time::sleep(self.config.request_delay).await;

        let response = self
            .http
            .get(url)
            // SEC uses various content types, but often text/html for filings
            .header(header::ACCEPT, "application/xml,application/atom+xml,text/html,text/plain,application/json,*/*")
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        match status {
            reqwest::StatusCode::FORBIDDEN => {
                tracing::warn!("Received 403 Forbidden - check the User-Agent contact string.");
                Err(EdgarError::Forbidden)
            }
            reqwest::StatusCode::NOT_FOUND => Err(EdgarError::NotFound(url.to_string())),
            _ => Err(EdgarError::Http(status)),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, EdgarError> {
        let body = self.get(url).await?.text().await?;
        tracing::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

impl CompanyLookup for EdgarClient {
    async fn lookup_cik(&self, ticker: &str) -> Result<Cik, EdgarError> {
        let body = self.get_text(&self.config.tickers_url).await?;
        parse::find_cik(&body, ticker)
    }
}

impl FilingListing for EdgarClient {
    async fn list_filings(&self, cik: &Cik, form_type: &str, limit: usize) -> Result<Vec<FilingRef>, EdgarError> {
        let url = format!(
            "{}?action=getcompany&CIK={}&type={}&count={}&output=atom",
            self.config.browse_url,
            cik.as_str(),
            form_type,
            FEED_PAGE_SIZE
        );
        let body = self.get_text(&url).await?;
        parse::parse_filing_feed(&body, limit)
    }
}

impl DocumentSource for EdgarClient {
    /// `locator` is a filing index page; the complete submission text it links to is downloaded.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, EdgarError> {
        let index_page = self.get_text(locator).await?;
        let href = parse::find_submission_href(&index_page)
            .ok_or_else(|| EdgarError::NotFound(format!("complete submission text on {}", locator)))?;

        let url = parse::archive_url(&self.config.archive_base_url, &href);
        tracing::info!("Downloading document from: {}", url);
        let bytes = self.get(&url).await?.bytes().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
