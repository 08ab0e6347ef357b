use uuid::Uuid;

use crate::config::CatalogConfig;

/// A fresh object-store path for an image upload:
/// `{asset_prefix}/{uuidv7}.{image_extension}`.
pub fn unique_asset_path(config: &CatalogConfig) -> String {
    format!(
        "{}/{}.{}",
        config.asset_prefix.trim_matches('/'),
        Uuid::now_v7(),
        config.image_extension.trim_start_matches('.')
    )
}

/// Validates a relative asset path before it touches a store.
pub fn validate_asset_path(path: &str) -> Result<&str, &'static str> {
    if path.is_empty() {
        return Err("path cannot be empty");
    }

    if path.len() > 512 {
        return Err("path exceeds maximum length of 512 characters");
    }

    if path.starts_with('/') || path.ends_with('/') {
        return Err("path must be relative and must not end with '/'");
    }

    for segment in path.split('/') {
        if segment.is_empty() {
            return Err("path must not contain empty segments");
        }
        if segment.starts_with('.') {
            return Err("path segments must not start with '.'");
        }
    }

    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return Err("path contains invalid characters (allowed: a-zA-Z0-9, /, -, _, .)");
    }

    Ok(path)
}
