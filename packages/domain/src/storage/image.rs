use std::io::Cursor;
use std::path::PathBuf;

use super::error::StorageError;
use super::traits::BoxReader;

/// An image selected on the device, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalImage {
    /// A file on local disk, e.g. a picker result or a spooled upload.
    File(PathBuf),
    /// Image bytes already held in memory.
    Bytes(Vec<u8>),
}

impl LocalImage {
    /// Open the image for streaming into an asset store.
    pub async fn open(&self) -> Result<BoxReader, StorageError> {
        match self {
            Self::File(path) => match tokio::fs::File::open(path).await {
                Ok(file) => Ok(Box::new(file)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StorageError::NotFound(path.display().to_string()))
                }
                Err(e) => Err(e.into()),
            },
            Self::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
        }
    }
}

/// Result of asking the media picker for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedImage {
    Selected(LocalImage),
    Cancelled,
}
