//! HTTP client for the content relationship API.

use crate::error::SdkError;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Thin JSON-over-HTTP adapter shared by every operation
///
/// Paths are given as segments so that ids are percent-encoded.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, SdkError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SdkError::ConfigError(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::ConfigError(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL from path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::ConfigError(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode a JSON body
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, SdkError> {
        let request = self.request(Method::GET, segments)?;
        decode(self.send(request).await?).await
    }

    /// GET with query parameters and decode a JSON body
    pub async fn get_with_query<T, Q>(&self, segments: &[&str], query: &Q) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, segments)?.query(query);
        decode(self.send(request).await?).await
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, SdkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        decode(self.send(request).await?).await
    }

    /// POST a JSON body, ignoring any response body
    pub async fn post_no_content<B>(&self, segments: &[&str], body: &B) -> Result<(), SdkError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        self.send(request).await?;
        Ok(())
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, SdkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, segments)?.json(body);
        decode(self.send(request).await?).await
    }

    /// DELETE with a JSON body
    pub async fn delete<B>(&self, segments: &[&str], body: &B) -> Result<(), SdkError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::DELETE, segments)?.json(body);
        self.send(request).await?;
        Ok(())
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, SdkError> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url.path());

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SdkError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        warn!("API responded {}: {}", status, message.as_deref().unwrap_or("<no message>"));

        Err(SdkError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SdkError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Extract a message from an error body: `error` or `message` fields,
/// or the raw text when it is not JSON
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "message"]
            .iter()
            .find_map(|field| value.get(field).and_then(|v| v.as_str()))
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}
