mod asset_ref;
mod error;
mod image;
mod traits;

pub mod filesystem;
pub mod path;

pub use asset_ref::AssetRef;
pub use error::StorageError;
pub use image::{LocalImage, PickedImage};
pub use traits::{AssetStore, BoxReader};
