//! On-disk holiday cache: one JSON file per (country, year) pair.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::error::{CalendarError, Result};
use crate::holiday::{Holiday, HolidayCacheRecord};

/// File-backed holiday cache.
///
/// Files are named `{country}_{year}.json`; the prefix is what
/// [`delete_all`](HolidayCache::delete_all) scans on. Records are valid
/// forever until explicitly deleted.
#[derive(Debug, Clone)]
pub struct HolidayCache {
    dir: PathBuf,
}

impl HolidayCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Application-scoped holidays directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minical")
            .join("holidays")
    }

    fn file_path(&self, country_code: &str, year: i32) -> Result<PathBuf> {
        validate_country_code(country_code)?;
        Ok(self.dir.join(format!("{country_code}_{year}.json")))
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|error| CalendarError::io("failed to create cache directory", &self.dir, error))
    }

    /// Whether a record exists for the key.
    pub async fn exists(&self, country_code: &str, year: i32) -> bool {
        match self.file_path(country_code, year) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Persist a record, creating the directory first and overwriting any
    /// previous file for the key.
    pub async fn save(&self, holidays: &[Holiday], country_code: &str, year: i32) -> Result<()> {
        let path = self.file_path(country_code, year)?;
        self.ensure_dir().await?;

        let record = HolidayCacheRecord {
            country_code: country_code.to_string(),
            year,
            fetched_at: Utc::now(),
            holidays: holidays.to_vec(),
        };
        let data = serde_json::to_vec_pretty(&record)?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|error| CalendarError::io("failed to write cache file", path, error))
    }

    /// Load the holidays for a key, or `None` when no record exists.
    pub async fn load(&self, country_code: &str, year: i32) -> Result<Option<Vec<Holiday>>> {
        let path = self.file_path(country_code, year)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(CalendarError::io("failed to read cache file", path, error)),
        };
        let record: HolidayCacheRecord = serde_json::from_slice(&bytes)?;
        Ok(Some(record.holidays))
    }

    /// Delete the record for a key. Absent records are a successful no-op.
    pub async fn delete(&self, country_code: &str, year: i32) -> Result<()> {
        let path = self.file_path(country_code, year)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CalendarError::io("failed to delete cache file", path, error)),
        }
    }

    /// Delete every record whose filename is prefixed by the country code.
    pub async fn delete_all(&self, country_code: &str) -> Result<()> {
        validate_country_code(country_code)?;
        let prefix = format!("{country_code}_");
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => {
                return Err(CalendarError::io("failed to scan cache directory", &self.dir, error))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|error| CalendarError::io("failed to scan cache directory", &self.dir, error))?
        {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&prefix) {
                let path = entry.path();
                remove_entry(&path).await?;
            }
        }
        Ok(())
    }
}

/// Country codes become filename prefixes, so anything that could escape
/// the cache directory is rejected before touching the filesystem.
fn validate_country_code(country_code: &str) -> Result<()> {
    if country_code.is_empty()
        || country_code.contains('/')
        || country_code.contains('\\')
        || country_code.contains('.')
    {
        return Err(CalendarError::InvalidInput(format!(
            "invalid country code {country_code:?}"
        )));
    }
    Ok(())
}

async fn remove_entry(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path)
        .await
        .map_err(|error| CalendarError::io("failed to delete cache file", path, error))
}
