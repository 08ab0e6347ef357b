use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::asset_ref::AssetRef;
use super::error::StorageError;
use super::path::validate_asset_path;
use super::traits::{AssetStore, BoxReader};

/// Filesystem-backed asset store.
///
/// Assets live at `{base_path}/{asset path}`; writes go through
/// `{base_path}/.tmp` and are renamed into place once complete.
pub struct FilesystemAssetStore {
    base_path: PathBuf,
    max_size: u64,
    public_base_url: String,
}

impl FilesystemAssetStore {
    /// Create a new filesystem asset store.
    pub async fn new(
        base_path: PathBuf,
        max_size: u64,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
            public_base_url: public_base_url.into(),
        })
    }

    fn asset_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let path = validate_asset_path(path).map_err(|e| StorageError::InvalidPath(e.into()))?;
        Ok(self.base_path.join(path))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    async fn put_stream(&self, path: &str, mut reader: BoxReader) -> Result<AssetRef, StorageError> {
        let target = self.asset_path(path)?;
        if fs::try_exists(&target).await? {
            return Err(StorageError::InvalidPath(format!("{path} already exists")));
        }

        let temp_path = self.temp_path();

        let written = async {
            let mut hasher = Sha256::new();
            let mut total_bytes: u64 = 0;

            let mut buf = vec![0u8; 64 * 1024];
            let mut temp_file = fs::File::create(&temp_path).await?;

            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }

                total_bytes += n as u64;
                if total_bytes > self.max_size {
                    return Err(StorageError::SizeLimitExceeded {
                        actual: total_bytes,
                        limit: self.max_size,
                    });
                }

                hasher.update(&buf[..n]);
                temp_file.write_all(&buf[..n]).await?;
            }

            temp_file.flush().await?;
            temp_file.sync_all().await?;
            drop(temp_file);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::rename(&temp_path, &target).await?;

            Ok::<_, StorageError>(hasher.finalize())
        }
        .await;

        match written {
            Ok(digest) => Ok(AssetRef::new(path, digest.into())),
            Err(e) => {
                // The temp file is closed once the block above returns.
                let _ = fs::remove_file(&temp_path).await;
                Err(e)
            }
        }
    }

    async fn open(&self, path: &str) -> Result<BoxReader, StorageError> {
        let target = self.asset_path(path)?;
        match fs::File::open(&target).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.asset_path(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn download_url(&self, asset: &AssetRef) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            asset.path()
        )
    }
}
