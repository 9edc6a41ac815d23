use anyhow::Context;
use booli_vault::fetch::{Fetcher, HttpFetcher};
use booli_vault::models::Apartment;
use booli_vault::storage::{FsStorage, SqlStorage, Storage};
use booli_vault::{parsers, scrapers};
use std::env;
use std::sync::Arc;
use tracing::{error, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let urls_file = env::var("URLS_FILE").unwrap_or_else(|_| "urls.txt".to_string());
    let urls = std::fs::read_to_string(&urls_file)
        .with_context(|| format!("open URL list {urls_file}"))?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new().context("build HTTP client")?);
    let storage = build_storage(Arc::clone(&fetcher)).await?;

    // One listing at a time: fetched, parsed and stored before the next
    // URL begins.
    for url in urls.lines().map(str::trim).filter(|l| !l.is_empty()) {
        // A non-numeric trailing segment means the input list itself is
        // broken; abort the run rather than skipping the record.
        let id = parsers::parse_id(url).with_context(|| format!("listing id from {url}"))?;

        let mut apt = Apartment::new(id);
        let collector = scrapers::listing_collector(Arc::clone(&fetcher))?;
        if collector.visit(url, &mut apt).await.is_err() {
            // Transport failure was already reported by the error hook;
            // abandon this record and move on.
            continue;
        }

        if let Err(e) = storage.put(&apt).await {
            error!("store {url}: {e}");
        }
    }

    Ok(())
}

/// Builds the storage backend selected by `STORAGE_BACKEND` (`fs` or
/// `sqlite`). Construction failure is fatal for the run.
async fn build_storage(fetcher: Arc<dyn Fetcher>) -> anyhow::Result<Box<dyn Storage>> {
    let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "fs".to_string());
    let root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "apartments".to_string());

    match backend.as_str() {
        "fs" => Ok(Box::new(FsStorage::new(root, fetcher))),
        "sqlite" => {
            let db_file = env::var("DB_FILE").unwrap_or_else(|_| "booli.db".to_string());
            let storage = SqlStorage::connect(&db_file, root, fetcher)
                .await
                .with_context(|| format!("open sqlite storage {db_file}"))?;
            Ok(Box::new(storage))
        }
        other => anyhow::bail!("unknown STORAGE_BACKEND {other:?} (expected \"fs\" or \"sqlite\")"),
    }
}
