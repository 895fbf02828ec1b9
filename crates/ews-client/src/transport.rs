//! The HTTP boundary.

use std::time::Duration;

use ews_core::config::Settings;

use crate::error::ClientResult;

/// Posts request envelopes and returns response bodies.
///
/// The wire core never touches this boundary; it is the only place bytes
/// leave or enter the process.
pub trait Transport {
    /// Posts one request envelope and returns the raw response body.
    fn post_envelope(
        &self,
        envelope: String,
    ) -> impl Future<Output = ClientResult<String>> + Send;
}

/// `reqwest`-backed transport with basic authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Builds a transport from the endpoint settings.
    ///
    /// ## Errors
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(settings: &Settings) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.endpoint.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: settings.endpoint.url.clone(),
            username: settings.credentials.username.clone(),
            password: settings.credentials.password.clone(),
        })
    }
}

impl Transport for HttpTransport {
    async fn post_envelope(&self, envelope: String) -> ClientResult<String> {
        tracing::debug!(url = %self.url, len = envelope.len(), "posting request envelope");
        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(envelope)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
