//! Public-disk file storage for category images.

use std::path::{Component, Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Storage for publicly served files, addressed by paths relative to the
/// public root (for example `categories/abc.jpg`).
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` as `directory/filename` and returns that relative path.
    async fn write(&self, directory: &str, filename: &str, bytes: &[u8]) -> AppResult<String>;

    /// Removes the file at `path`. A missing file is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    async fn exists(&self, path: &str) -> bool;
}

/// [`FileStore`] backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a relative path onto the root. Only plain path segments are
    /// accepted, so the result can never escape the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let mut has_segment = false;

        for component in relative.components() {
            match component {
                Component::Normal(_) => has_segment = true,
                Component::CurDir => {}
                _ => {
                    return Err(AppError::storage(
                        "resolve path",
                        anyhow!("path '{}' is outside the public root", path),
                    ));
                }
            }
        }

        if !has_segment {
            return Err(AppError::storage("resolve path", anyhow!("empty path")));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, directory: &str, filename: &str, bytes: &[u8]) -> AppResult<String> {
        let relative = format!("{}/{}", directory.trim_end_matches('/'), filename);
        let full_path = self.resolve(&relative)?;
        debug!(path = %relative, size = bytes.len(), "Writing public file");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "Failed to create directory");
                AppError::storage("create directory", e)
            })?;
        }

        // Write beside the target and rename so readers never see a partial file.
        let temp_path = full_path.with_file_name(format!(".{}.tmp", Uuid::new_v4()));
        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &full_path).await
        }
        .await;

        if let Err(e) = result {
            warn!(path = %relative, error = %e, "Failed to write public file");
            let _ = fs::remove_file(&temp_path).await;
            return Err(AppError::storage("write file", e));
        }

        Ok(relative)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path = %path, "Deleted public file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to delete public file");
                Err(AppError::storage("delete file", e))
            }
        }
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full_path) => fs::try_exists(full_path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
