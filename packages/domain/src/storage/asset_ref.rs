use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Durable handle to a stored asset: where it lives and the SHA-256 of the
/// bytes the store confirmed writing.
///
/// Serialized as `"{path}#{sha256 hex}"`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AssetRef {
    path: String,
    sha256: [u8; 32],
}

impl AssetRef {
    pub fn new(path: impl Into<String>, sha256: [u8; 32]) -> Self {
        Self {
            path: path.into(),
            sha256,
        }
    }

    /// Object-store path the asset was written to.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn sha256(&self) -> &[u8; 32] {
        &self.sha256
    }

    pub fn sha256_hex(&self) -> String {
        hex::encode(self.sha256)
    }
}

impl FromStr for AssetRef {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, digest) = s
            .rsplit_once('#')
            .ok_or_else(|| StorageError::InvalidReference(format!("missing digest in '{s}'")))?;

        if path.is_empty() {
            return Err(StorageError::InvalidReference("empty path".into()));
        }
        if digest.len() != 64 {
            return Err(StorageError::InvalidReference(format!(
                "expected 64 hex characters, got {}",
                digest.len()
            )));
        }

        let bytes = hex::decode(digest)
            .map_err(|e| StorageError::InvalidReference(format!("invalid hex: {e}")))?;
        let sha256: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidReference("decoded to wrong length".into()))?;

        Ok(Self::new(path, sha256))
    }
}

impl fmt::Debug for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetRef({self})")
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.sha256_hex())
    }
}

impl Serialize for AssetRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
