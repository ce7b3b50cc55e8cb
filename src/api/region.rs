use super::ClientError;

pub const US_API_BASE: &str = "https://api.squaredup.com";
pub const EU_API_BASE: &str = "https://eu.api.squaredup.com";

pub const DEFAULT_REGION: &str = "us";

/// Maps a region token (`us`, `eu`) or an explicit `https://` URL to the API base URL.
pub fn resolve_base_url(region: &str) -> Result<String, ClientError> {
    match region {
        "us" => Ok(US_API_BASE.to_string()),
        "eu" => Ok(EU_API_BASE.to_string()),
        url if url.starts_with("https://") => {
            Ok(url.strip_suffix('/').unwrap_or(url).to_string())
        }
        other => Err(ClientError::InvalidRegion {
            region: other.to_string(),
        }),
    }
}
