//! File-backed storage: one directory per listing holding a JSON snapshot
//! and an `images/` subdirectory.

use crate::fetch::Fetcher;
use crate::models::Apartment;
use crate::storage::{download_images, Storage, StorageError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

const DATA_FILE_NAME: &str = "data.json";
const IMAGES_DIR_NAME: &str = "images";

pub struct FsStorage {
    root: PathBuf,
    fetcher: Arc<dyn Fetcher>,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            root: root.into(),
            fetcher,
        }
    }

    /// Directory for one listing: lowercased address with spaces replaced
    /// by underscores, suffixed with the id.
    fn listing_dir(&self, apt: &Apartment) -> PathBuf {
        let address = apt.address.to_lowercase().replace(' ', "_");
        self.root.join(format!("{address}_{}", apt.id))
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn put(&self, apt: &Apartment) -> Result<(), StorageError> {
        let dir = self.listing_dir(apt);
        tokio::fs::create_dir_all(&dir).await?;

        // Full overwrite: no fields from a prior snapshot survive.
        let data = serde_json::to_vec_pretty(apt)?;
        tokio::fs::write(dir.join(DATA_FILE_NAME), data).await?;

        let images = dir.join(IMAGES_DIR_NAME);
        tokio::fs::create_dir_all(&images).await?;
        download_images(self.fetcher.as_ref(), &apt.image_urls, &images).await
    }
}
