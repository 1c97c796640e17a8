//! HTTP client for the Fuel Track API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, Result};
use crate::token::{MemoryTokenStore, TokenStore};
use crate::types::{
    AuthResponse, CreateTripRequest, HealthStatus, PaginatedResponse, RegisterRequest, Trip,
    TripListParams, UpdateTripRequest,
};

/// Client for a Fuel Track server.
///
/// Every request carries the stored bearer token. A 401 response clears it.
///
/// ```ignore
/// let client = FuelTrackClient::new("http://localhost:3000")?;
/// client.login("admin@trucking.com", "admin123").await?;
/// let page = client.list_trips(&TripListParams::default()).await?;
/// ```
pub struct FuelTrackClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl FuelTrackClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_token_store(base_url, Arc::new(MemoryTokenStore::new()))
    }

    pub fn with_token_store(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let base_url = Url::parse(trimmed.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(20))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("fuel-track-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.tokens.set(token.into());
    }

    pub fn logout(&self) {
        self.tokens.clear();
        info!("Logged out");
    }

    // ── Auth ────────────────────────────────────────────────────

    /// Authenticate and keep the returned token for later requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send_json(
                self.request(Method::POST, &["api", "auth", "login"])?
                    .json(&LoginBody { email, password }),
            )
            .await?;
        self.tokens.set(response.token.clone());
        info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send_json(self.request(Method::POST, &["api", "auth", "register"])?.json(body))
            .await?;
        self.tokens.set(response.token.clone());
        Ok(response)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.send_json(self.request(Method::GET, &["health"])?).await
    }

    // ── Trips ───────────────────────────────────────────────────

    pub async fn list_trips(&self, params: &TripListParams) -> Result<PaginatedResponse<Trip>> {
        let request = self
            .request(Method::GET, &["api", "trips"])?
            .query(&params.to_query_pairs());
        self.send_json(request).await
    }

    pub async fn get_trip(&self, id: &str) -> Result<Trip> {
        self.send_json(self.request(Method::GET, &["api", "trips", id])?)
            .await
    }

    pub async fn create_trip(&self, body: &CreateTripRequest) -> Result<Trip> {
        self.send_json(self.request(Method::POST, &["api", "trips"])?.json(body))
            .await
    }

    /// Partial update through `PATCH`.
    pub async fn update_trip(&self, id: &str, body: &UpdateTripRequest) -> Result<Trip> {
        self.send_json(
            self.request(Method::PATCH, &["api", "trips", id])?
                .json(body),
        )
        .await
    }

    /// Cancels the trip; the server keeps the record.
    pub async fn delete_trip(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &["api", "trips", id])?)
            .await
            .map(|_| ())
    }

    // ── Plumbing ────────────────────────────────────────────────

    /// Base URL with `segments` appended; any path prefix on the base is
    /// kept and each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl("URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.tokens.get() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        let message = error_message(response).await;
        if status == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized response, clearing stored token");
            self.tokens.clear();
            return Err(ClientError::Unauthorized(message));
        }

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Server message from `{"error": ..}` or `{"message": ..}`, else the raw body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<serde_json::Value>(&text).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error").or_else(|| v.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected error")
                    .to_string()
            } else {
                text
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(
            FuelTrackClient::new(""),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            FuelTrackClient::new("localhost:3000"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(FuelTrackClient::new("http://localhost:3000/").is_ok());
    }

    #[test]
    fn endpoints_keep_base_path_and_encode_ids() {
        let client = FuelTrackClient::new("http://localhost:3000/fuel/").unwrap();
        let url = client.endpoint(&["api", "trips", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/fuel/api/trips/a%2Fb%3Fc%23d");

        let bare = FuelTrackClient::new("http://localhost:3000").unwrap();
        assert_eq!(bare.endpoint(&["health"]).unwrap().as_str(), "http://localhost:3000/health");
    }

    #[test]
    fn token_round_trip() {
        let client = FuelTrackClient::new("http://localhost:3000").unwrap();
        assert!(!client.is_authenticated());
        client.set_token("abc");
        assert!(client.is_authenticated());
        client.logout();
        assert!(!client.is_authenticated());
    }
}
