// src/main.rs
mod edgar;
mod extractors;
mod pipeline;
mod storage;
mod utils;

use clap::Parser;
use edgar::EdgarClient;
use extractors::SectionFilter;
use storage::StorageManager;
use utils::config::EdgarConfig;
use utils::AppError;

/// Sections extracted when no --item is given.
const DEFAULT_ITEMS: [&str; 6] = ["Item 1.", "Item 1A.", "Item 3.", "Item 7.", "Item 7A.", "Item 8."];

/// Download annual report filings from SEC EDGAR and split them into "Item N." sections
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company
    #[arg(short, long)]
    ticker: String,

    /// Number of most recent filings to download
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Form type to list
    #[arg(long, default_value = "10-K")]
    form_type: String,

    /// Directory for downloaded filings and extracted JSON
    #[arg(short, long, default_value = "downloads")]
    output_dir: String,

    /// Section to keep, e.g. "Item 7A." (repeatable; defaults to Items 1, 1A, 3, 7, 7A and 8)
    #[arg(short, long = "item", value_name = "ITEM")]
    items: Vec<String>,

    /// Keep every "Item N." section
    #[arg(long, conflicts_with = "items")]
    all_items: bool,

    /// Only re-extract filings already in the output directory
    #[arg(long)]
    skip_download: bool,

    /// Contact User-Agent sent to EDGAR, e.g. "Jane Doe jane@example.com" (or set SEC_USER_AGENT)
    #[arg(long)]
    user_agent: Option<String>,

    /// Pause before each EDGAR request, in milliseconds (or set SEC_REQUEST_DELAY_MS)
    #[arg(long)]
    request_delay_ms: Option<u64>,

    /// Debug mode - save a per-line segmentation trace next to each JSON file
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn section_filter(&self) -> Option<SectionFilter> {
        if self.all_items {
            None
        } else if self.items.is_empty() {
            Some(SectionFilter::new(DEFAULT_ITEMS))
        } else {
            Some(SectionFilter::new(&self.items))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging("info");

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Download the latest filings unless we are only re-extracting
    if args.skip_download {
        tracing::info!("Skipping download, using filings already in {}", args.output_dir);
    } else {
        let config = EdgarConfig::resolve(args.user_agent.clone(), args.request_delay_ms)?;
        let client = EdgarClient::new(config)?;
        let downloads = pipeline::download_filings(
            &client,
            &client,
            &client,
            &storage,
            &args.ticker,
            &args.form_type,
            args.count,
        )
        .await?;
        tracing::info!(
            "Download finished. Success: {}, Failures: {}",
            downloads.succeeded.len(),
            downloads.failed.len()
        );
    }

    // 5. Extract Items from each stored filing
    let filter = args.section_filter();
    let report = pipeline::extract_filings(&storage, &args.ticker, filter.as_ref(), args.debug)?;

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        report.succeeded.len(),
        report.failed.len()
    );

    if report.succeeded.is_empty() && report.failed.is_empty() {
        return Err(AppError::Config(format!(
            "No {} filings found for ticker {} in {}",
            args.form_type, args.ticker, args.output_dir
        )));
    }

    if report.is_total_failure() {
        return Err(AppError::Processing(format!(
            "Failed to extract sections from all {} filings",
            report.failed.len()
        )));
    }

    Ok(())
}
