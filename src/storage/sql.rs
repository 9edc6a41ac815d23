//! SQLite-backed storage: one row per listing, images in one shared flat
//! directory (the row already carries the key, so no per-listing dirs).

use crate::fetch::Fetcher;
use crate::models::Apartment;
use crate::storage::{download_images, Storage, StorageError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS apartments
    (
        id INTEGER PRIMARY KEY
        ,address TEXT
        ,floor REAL
        ,area INTEGER
        ,rooms REAL
        ,price INTEGER
        ,estimatedValue INTEGER
        ,fee INTEGER
    )
";

const UPSERT: &str = "
    INSERT OR REPLACE INTO apartments
        (id, address, floor, area, rooms, price, estimatedValue, fee)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

pub struct SqlStorage {
    pool: SqlitePool,
    files_root: PathBuf,
    fetcher: Arc<dyn Fetcher>,
}

impl SqlStorage {
    /// Opens (creating if missing) the database file and ensures the
    /// `apartments` table exists.
    pub async fn connect(
        db_file: impl AsRef<Path>,
        files_root: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(db_file)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        Ok(Self {
            pool,
            files_root: files_root.into(),
            fetcher,
        })
    }

    /// Reads back the scalar snapshot for `id`, if stored. The returned
    /// record carries no image URLs; those only exist on disk.
    pub async fn get(&self, id: i64) -> Result<Option<Apartment>, StorageError> {
        let row = sqlx::query(
            "SELECT address, floor, area, rooms, price, estimatedValue, fee
             FROM apartments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Apartment {
            id,
            address: row.get("address"),
            floor: row.get("floor"),
            area: row.get("area"),
            rooms: row.get("rooms"),
            price: row.get("price"),
            estimated_value: row.get("estimatedValue"),
            fee: row.get("fee"),
            image_urls: Vec::new(),
        }))
    }
}

#[async_trait]
impl Storage for SqlStorage {
    async fn put(&self, apt: &Apartment) -> Result<(), StorageError> {
        sqlx::query(UPSERT)
            .bind(apt.id)
            .bind(&apt.address)
            .bind(apt.floor)
            .bind(apt.area)
            .bind(apt.rooms)
            .bind(apt.price)
            .bind(apt.estimated_value)
            .bind(apt.fee)
            .execute(&self.pool)
            .await?;

        tokio::fs::create_dir_all(&self.files_root).await?;
        download_images(self.fetcher.as_ref(), &apt.image_urls, &self.files_root).await
    }
}
