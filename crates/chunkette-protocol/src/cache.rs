//! On-disk chunk cache
//!
//! Files are named after the chunk (`{rolling_hash}_{guid}.chunk`) and hold
//! the decompressed payload. The cache never evicts. Writes go to a unique
//! temporary file first and are renamed into place, so a reader never sees a
//! partially written entry even when two writers race on the same chunk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use crate::error::Result;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Flat directory of cached chunk payloads
#[derive(Debug, Clone)]
pub struct ChunkCache {
    dir: PathBuf,
}

impl ChunkCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Read a cached entry, `None` when it does not exist
    pub async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(file_name)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write an entry atomically
    pub async fn write(&self, file_name: &str, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let temp_path = self.dir.join(format!(
            "{file_name}.{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, self.path_for(file_name)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}
