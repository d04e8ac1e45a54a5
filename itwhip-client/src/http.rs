//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Fallback when a failed response carries no usable message
const GENERIC_FAILURE: &str = "Request failed";

/// HTTP client for making requests to the admin API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Error body shapes the API returns
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            tracing::debug!(status = status.as_u16(), %message, "Request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::Validation(message),
                _ => ClientError::Server {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("{} ({} bytes)", e, bytes.len()))
        })
    }
}

/// Pull `error`/`message` out of a JSON error body, else use the raw text
fn error_message(text: &str) -> String {
    let from_json = serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty());
    match from_json {
        Some(m) => m,
        None if !text.trim().is_empty() && !text.trim_start().starts_with('{') => {
            text.trim().to_string()
        }
        None => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error":"Booking not found"}"#), "Booking not found");
        assert_eq!(error_message(r#"{"message":"Admin only"}"#), "Admin only");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), GENERIC_FAILURE);
        assert_eq!(error_message(r#"{"error":""}"#), GENERIC_FAILURE);
    }

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.url("/api/x"), "http://localhost:3000/api/x");
        assert_eq!(client.url("api/x"), "http://localhost:3000/api/x");
    }
}
