use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ClientError;
use super::region::resolve_base_url;
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::config::ProviderConfig;

pub const USER_AGENT_VALUE: &str = concat!("squaredup-rs/", env!("CARGO_PKG_VERSION"));

const API_KEY_PARAM: &str = "apiKey";
pub(crate) const PLUGINS_LATEST_PATH: &str = "/api/plugins/latest";

/// One call against the API: method, path relative to the base URL, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post_json<B: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ClientError> {
        Self::new(Method::POST, path).with_json(body)
    }

    pub fn put_json<B: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ClientError> {
        Self::new(Method::PUT, path).with_json(body)
    }

    fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

#[derive(Clone)]
pub struct SquaredUpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl SquaredUpClient {
    /// Resolves `region` to a base URL. Performs no network I/O.
    pub fn new(region: &str, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = resolve_base_url(region)?;
        Self::with_base_url(base_url, api_key)
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ClientError> {
        Ok(Self::new(&config.region, config.api_key.clone())?.with_retry_policy(config.retry))
    }

    /// Like [`SquaredUpClient::from_config`], then probes the API with the key before returning.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, ClientError> {
        let client = Self::from_config(config)?;
        client.verify_credentials().await?;
        Ok(client)
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Network)?;

        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// GETs the latest plugin list as a liveness and credential check.
    ///
    /// A rejected key and a wrong region both fail this call; the message says
    /// which one is more likely from the failure kind but cannot be certain.
    pub async fn verify_credentials(&self) -> Result<(), ClientError> {
        match self.do_request(ApiRequest::get(PLUGINS_LATEST_PATH)).await {
            Ok(_) => {
                tracing::info!(base_url = %self.base_url, "SquaredUp credentials verified");
                Ok(())
            }
            Err(err) => Err(ClientError::Auth {
                message: probe_failure_message(&self.base_url, &err),
            }),
        }
    }

    /// Sends one request and returns the raw body of a 200/201/204 response.
    ///
    /// The API key always travels as the `apiKey` query parameter. No retries.
    pub async fn do_request(&self, request: ApiRequest) -> Result<Vec<u8>, ClientError> {
        let ApiRequest { method, path, body } = request;
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .http
            .request(method.clone(), url.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE);

        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let mut http_request = builder.build().map_err(network_error)?;
        http_request
            .url_mut()
            .query_pairs_mut()
            .append_pair(API_KEY_PARAM, &self.api_key);

        let response = self.http.execute(http_request).await.map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(network_error)?;

        tracing::debug!(%method, %path, status, "SquaredUp API request");

        match status {
            200 | 201 | 204 => Ok(body.to_vec()),
            status => Err(ClientError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let body = self.do_request(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub(crate) async fn send(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.do_request(request).await.map(|_| ())
    }

    // NOTE: Create endpoints for workspaces and scopes answer with the bare id, sometimes quoted
    pub(crate) async fn send_for_id(&self, request: ApiRequest) -> Result<String, ClientError> {
        let body = self.do_request(request).await?;
        Ok(String::from_utf8_lossy(&body)
            .trim()
            .trim_matches('"')
            .to_string())
    }
}

// The request URL carries the API key, so it is dropped from transport errors.
fn network_error(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.without_url())
}

fn probe_failure_message(base_url: &str, err: &ClientError) -> String {
    match err {
        ClientError::Status {
            status: status @ (401 | 403),
            ..
        } => format!(
            "{base_url} rejected the API key (status {status}); check the API key matches this region"
        ),
        ClientError::Network(_) => format!(
            "could not reach {base_url} ({err}); check the region or URL"
        ),
        other => format!(
            "credential check against {base_url} failed ({other}); check the region and API key"
        ),
    }
}

impl std::fmt::Debug for SquaredUpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquaredUpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SquaredUpClient::new("us", "test_key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_invalid_region() {
        let err = SquaredUpClient::new("mars", "test_key").unwrap_err();
        assert!(matches!(err, ClientError::InvalidRegion { .. }));
    }

    #[test]
    fn test_base_url_from_region() {
        let client = SquaredUpClient::new("eu", "test_key").unwrap();
        assert_eq!(client.base_url(), "https://eu.api.squaredup.com");
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let client = SquaredUpClient::with_base_url("http://127.0.0.1:8080/", "k").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_debug_does_not_expose_api_key() {
        let client = SquaredUpClient::new("us", "super_secret_key_12345").unwrap();
        let debug_output = format!("{:?}", client);

        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_key_12345"),
            "Debug output must NOT contain the actual API key"
        );
    }

    #[test]
    fn test_client_is_clone() {
        let client = SquaredUpClient::new("us", "test_key").unwrap();
        let cloned = client.clone();
        assert_eq!(cloned.base_url(), client.base_url());
    }

    #[test]
    fn test_from_config_carries_retry_policy() {
        let config = ProviderConfig::resolve(Some("eu".to_string()), Some("k".to_string()))
            .unwrap()
            .with_retry(RetryPolicy::new(3, std::time::Duration::from_secs(5)));
        let client = SquaredUpClient::from_config(&config).unwrap();
        assert_eq!(client.retry_policy().max_attempts, 3);
        assert_eq!(client.base_url(), "https://eu.api.squaredup.com");
    }

    #[test]
    fn test_get_request_has_no_body() {
        let request = ApiRequest::get("/api/workspaces/space-1");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/api/workspaces/space-1");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_json_serializes_body() {
        let request =
            ApiRequest::post_json("/api/query", &serde_json::json!({"gremlinQuery": "g.V()"}))
                .unwrap();
        assert_eq!(request.method, Method::POST);
        let body: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(body["gremlinQuery"], "g.V()");
    }

    #[test]
    fn test_probe_message_for_rejected_key() {
        let err = ClientError::Status {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        let message = probe_failure_message("https://api.squaredup.com", &err);
        assert!(message.contains("rejected the API key"));
        assert!(message.contains("401"));
    }

    #[test]
    fn test_probe_message_for_other_status() {
        let err = ClientError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        let message = probe_failure_message("https://api.squaredup.com", &err);
        assert!(message.contains("region and API key"));
    }

    #[test]
    fn test_user_agent_names_crate_version() {
        assert!(USER_AGENT_VALUE.starts_with("squaredup-rs/"));
        assert!(USER_AGENT_VALUE.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
