//! Durable storage for assembled listings.
//!
//! Two independent backends share one contract: `put` upserts the scalar
//! snapshot under the listing id and makes sure every referenced image
//! exists on disk, skipping ones a previous run already fetched. Image
//! handling is a shared free function so the backends cannot drift apart.

pub mod fs;
pub mod sql;

pub use fs::FsStorage;
pub use sql::SqlStorage;

use crate::fetch::{FetchError, Fetcher};
use crate::models::Apartment;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("image URL {0:?} has no file name")]
    BadImageUrl(String),
}

/// Storage adapter contract. An error aborts the whole `put` for that
/// record; the caller decides whether to continue with the next one.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn put(&self, apt: &Apartment) -> Result<(), StorageError>;
}

/// Ensures a local file exists in `dir` for every URL, in order. Shared by
/// both backends; a failure aborts the record's `put` (all-or-nothing per
/// record, not per image).
pub(crate) async fn download_images(
    fetcher: &dyn Fetcher,
    urls: &[String],
    dir: &Path,
) -> Result<(), StorageError> {
    let total = urls.len();
    for (i, url) in urls.iter().enumerate() {
        if fetch_or_skip(fetcher, url, dir).await? {
            info!("Downloaded {url} ({}/{total})", i + 1);
        } else {
            info!("Skipped {url} ({}/{total})", i + 1);
        }
    }
    Ok(())
}

/// Downloads `url` into `dir` under its trailing path segment, unless that
/// file already exists. Returns whether a download happened.
///
/// Bytes go to a `.part` path first and are renamed into place after a
/// complete write, so a run killed mid-download never leaves a final file
/// that a later run would wrongly skip.
async fn fetch_or_skip(
    fetcher: &dyn Fetcher,
    url: &str,
    dir: &Path,
) -> Result<bool, StorageError> {
    let name = url.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return Err(StorageError::BadImageUrl(url.to_string()));
    }

    let target = dir.join(name);
    if tokio::fs::try_exists(&target).await? {
        return Ok(false);
    }

    let bytes = fetcher.get_bytes(url).await?;
    let partial = dir.join(format!("{name}.part"));
    tokio::fs::write(&partial, &bytes).await?;
    tokio::fs::rename(&partial, &target).await?;
    Ok(true)
}
