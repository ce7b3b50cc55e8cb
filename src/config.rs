use crate::api::{ClientError, DEFAULT_REGION, RetryPolicy, resolve_base_url};

/// Connection settings for one client lifetime.
///
/// Built once from explicit values; nothing below this reads the environment.
#[derive(Clone)]
pub struct ProviderConfig {
    pub region: String,
    pub api_key: String,
    pub retry: RetryPolicy,
}

impl ProviderConfig {
    /// Applies the region default and rejects a missing key or an unsupported region.
    pub fn resolve(region: Option<String>, api_key: Option<String>) -> Result<Self, ClientError> {
        let region = match region.filter(|r| !r.is_empty()) {
            Some(region) => region,
            None => {
                tracing::warn!(
                    "region not set in configuration or SQUAREDUP_REGION, defaulting to {DEFAULT_REGION}"
                );
                DEFAULT_REGION.to_string()
            }
        };

        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or(ClientError::MissingApiKey)?;

        resolve_base_url(&region)?;

        Ok(Self {
            region,
            api_key,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("region", &self.region)
            .field("api_key", &"[REDACTED]")
            .field("retry", &self.retry)
            .finish()
    }
}
