use serde::Deserialize;

/// Catalog rules that vary per deployment.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Object-store directory for product images. Default: "pizzas".
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
    /// Extension given to uploaded images. Default: "png".
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
    /// Maximum description length in characters. Default: 60.
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
    /// Maximum accepted image size in bytes. Default: 10 MiB.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

fn default_asset_prefix() -> String {
    "pizzas".into()
}
fn default_image_extension() -> String {
    "png".into()
}
fn default_description_max_chars() -> usize {
    60
}
fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            asset_prefix: default_asset_prefix(),
            image_extension: default_image_extension(),
            description_max_chars: default_description_max_chars(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}
