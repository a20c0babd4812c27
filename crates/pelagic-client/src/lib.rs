//! Typed HTTP client for the Pelagic habitat API.
//!
//! This is the dashboard's fetch layer expressed in Rust: every endpoint
//! gets one attempt per call, responses are decoded into the shared
//! [`pelagic_types`] shapes exactly once at this boundary, and a failed
//! call is logged once here and surfaces as a single [`ClientError`] for
//! the caller to display as "no data". No retries, no backoff, no
//! partial-result merging.

pub mod error;

use pelagic_types::{
    AdvancedPrediction, BasicPrediction, DatasetInfo, EducationalContent, HealthStatus,
    TagSimulation, TagSimulationRequest, TrophicTimeSeries,
};
use serde::de::DeserializeOwned;
use tracing::warn;

pub use error::ClientError;

/// Default per-request timeout. Predictions walk the whole grid server
/// side, so this is generous.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Client for the habitat API.
///
/// Cheap to clone; the underlying `reqwest` client is reference counted.
#[derive(Debug, Clone)]
pub struct HabitatClient {
    client: reqwest::Client,
    base_url: String,
}

impl HabitatClient {
    /// Create a client for a habitat API at `base_url`
    /// (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Build { source })?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health` -- service liveness and identity.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get("/api/health").await
    }

    /// `GET /api/dataset/info` -- metadata for the loaded dataset.
    pub async fn dataset_info(&self) -> Result<DatasetInfo, ClientError> {
        self.get("/api/dataset/info").await
    }

    /// `GET /api/trophic/timeseries` -- per-level cascade series for the
    /// educational chart.
    pub async fn trophic_timeseries(&self) -> Result<TrophicTimeSeries, ClientError> {
        self.get("/api/trophic/timeseries").await
    }

    /// `POST /api/prediction/basic` -- chlorophyll-only habitat index.
    pub async fn basic_prediction(&self) -> Result<BasicPrediction, ClientError> {
        self.post("/api/prediction/basic", &serde_json::json!({})).await
    }

    /// `POST /api/prediction/advanced` -- full component map.
    pub async fn advanced_prediction(&self) -> Result<AdvancedPrediction, ClientError> {
        self.post("/api/prediction/advanced", &serde_json::json!({})).await
    }

    /// `POST /api/tag/simulation` -- simulated shark tag deployment.
    pub async fn simulate_tag(&self, duration_hours: f64) -> Result<TagSimulation, ClientError> {
        let request = TagSimulationRequest { duration_hours };
        self.post("/api/tag/simulation", &request).await
    }

    /// `GET /api/educational/content` -- the educational walkthrough.
    pub async fn educational_content(&self) -> Result<EducationalContent, ClientError> {
        self.get("/api/educational/content").await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ClientError> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| {
                warn!(endpoint, error = %source, "request failed");
                ClientError::Request { endpoint, source }
            })?;
        Self::decode(endpoint, response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| {
                warn!(endpoint, error = %source, "request failed");
                ClientError::Request { endpoint, source }
            })?;
        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            warn!(endpoint, status = status.as_u16(), "server returned error");
            return Err(ClientError::Status {
                endpoint,
                status,
                body,
            });
        }

        response.json::<T>().await.map_err(|source| {
            warn!(endpoint, error = %source, "response decode failed");
            ClientError::Decode { endpoint, source }
        })
    }
}
