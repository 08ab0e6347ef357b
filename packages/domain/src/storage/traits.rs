use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::asset_ref::AssetRef;
use super::error::StorageError;
use super::image::LocalImage;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Path-addressed binary object storage for catalog images.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload a local image to `path`. The returned reference is only
    /// produced once the bytes are durably stored.
    async fn upload(&self, path: &str, image: &LocalImage) -> Result<AssetRef, StorageError> {
        let reader = image.open().await?;
        self.put_stream(path, reader).await
    }

    /// Store data from an async reader at `path`, replacing nothing: the path
    /// must be fresh.
    async fn put_stream(&self, path: &str, reader: BoxReader) -> Result<AssetRef, StorageError>;

    /// Open the asset at `path` for reading.
    async fn open(&self, path: &str) -> Result<BoxReader, StorageError>;

    /// Delete the asset at `path`. Returns `false` when nothing was stored there.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Public URL the asset can be fetched from.
    fn download_url(&self, asset: &AssetRef) -> String;
}
