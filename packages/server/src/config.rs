use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use domain::CatalogConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Where product images live and how clients reach them.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the filesystem asset store. Default: "./data/assets".
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    /// Base URL prepended to asset paths in download links.
    /// Default: "/api/v1/assets".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("./data/assets")
}
fn default_public_base_url() -> String {
    "/api/v1/assets".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrderConfig {
    /// Number of order compositions remembered for single-flight submission.
    /// Default: 1024.
    #[serde(default = "default_composition_cache_size")]
    pub composition_cache_size: usize,
}

fn default_composition_cache_size() -> usize {
    1024
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            composition_cache_size: default_composition_cache_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub orders: OrderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PIZZERIA__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("PIZZERIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
