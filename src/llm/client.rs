//! Generic HTTP client shared by completion providers.

use reqwest::Client as HttpClient;

/// Seconds before an in-flight completion request is abandoned.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A client for an AI provider: the shared HTTP client, the API base URL,
/// and a provider value supplying whatever the endpoint needs on each
/// request (typically authentication headers).
#[derive(Clone, Debug)]
pub struct Client<P> {
    pub base_url: String,
    pub http_client: HttpClient,
    pub provider: P,
}

impl<P> Client<P> {
    /// Creates a client for `base_url`, configured with a request timeout
    /// and system proxy support from the environment.
    pub fn new(base_url: &str, provider: P) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("failed to build HTTP client with timeout: {e}; using defaults");
                HttpClient::new()
            });

        Self {
            base_url: base_url.to_string(),
            http_client,
            provider,
        }
    }
}

impl<P: Provider> Client<P> {
    /// Builds a POST to `path` under the base URL with the provider's
    /// headers already applied.
    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        self.provider.on_request(self.http_client.post(url))
    }
}

/// Provider-specific behavior hooked into every outgoing request.
pub trait Provider: Send + Sync {
    /// Customize the pending request, e.g. attach authentication headers.
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }
}
