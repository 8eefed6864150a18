//! Replicate predictions API client.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::IDM_VTON_VERSION;
use crate::error::{InferenceError, Result};

/// Default Replicate API base URL.
pub const DEFAULT_REPLICATE_URL: &str = "https://api.replicate.com/v1";

/// Settings for the Replicate client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicateConfig {
    /// API token sent as a bearer token.
    #[serde(skip_serializing)]
    pub api_token: String,

    /// Model version to run.
    pub version: String,

    /// API base URL.
    pub base_url: String,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Per-request timeout in seconds. Must exceed the server-side
    /// `Prefer: wait` window of 60 seconds.
    pub request_timeout_secs: u64,

    /// Delay between status polls in seconds.
    pub poll_interval_secs: u64,

    /// Give up polling after this many seconds.
    pub max_wait_secs: u64,
}

impl ReplicateConfig {
    /// Whether a token and a model version are present.
    pub fn is_complete(&self) -> bool {
        !self.api_token.is_empty() && !self.version.is_empty()
    }
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            version: IDM_VTON_VERSION.to_string(),
            base_url: DEFAULT_REPLICATE_URL.to_string(),
            connect_timeout_secs: 30,
            request_timeout_secs: 90,
            poll_interval_secs: 2,
            max_wait_secs: 300,
        }
    }
}

/// Body of a create-prediction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Model version.
    pub version: String,

    /// Model inputs.
    pub input: serde_json::Map<String, serde_json::Value>,
}

impl PredictionRequest {
    /// Create a request for a model version with no inputs.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            input: serde_json::Map::new(),
        }
    }

    /// Add or replace a model input.
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }
}

/// Lifecycle state of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    /// Whether the prediction has stopped running.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// A prediction as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

/// Links the API returns alongside a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionUrls {
    pub get: Option<String>,
    pub cancel: Option<String>,
    pub web: Option<String>,
}

impl Prediction {
    /// URL of the produced image.
    ///
    /// Models return either a single URL or a list of URLs; for a list the
    /// first one is used.
    pub fn output_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url),
            serde_json::Value::Array(items) => items.iter().find_map(serde_json::Value::as_str),
            _ => None,
        }
    }

    fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => "no error reported".to_string(),
        }
    }
}

/// Client for the Replicate predictions API.
pub struct ReplicateClient {
    config: ReplicateConfig,
    client: reqwest::Client,
}

impl ReplicateClient {
    /// Create a client from its configuration.
    pub fn new(config: ReplicateConfig) -> Result<Self> {
        if config.api_token.is_empty() {
            return Err(InferenceError::MissingToken);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// A request for the configured model version.
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest::new(&self.config.version)
    }

    /// Run a prediction to completion and return its output URL.
    pub async fn run(&self, request: &PredictionRequest) -> Result<String> {
        let started = Instant::now();
        let mut prediction = self.create_prediction(request).await?;
        if let Some(web) = prediction.urls.as_ref().and_then(|urls| urls.web.as_deref()) {
            info!("Prediction {} created: {web}", prediction.id);
        }

        while !prediction.status.is_terminal() {
            let waited = started.elapsed();
            if waited >= Duration::from_secs(self.config.max_wait_secs) {
                return Err(InferenceError::Timeout {
                    id: prediction.id,
                    status: prediction.status.as_str().to_string(),
                    waited_secs: waited.as_secs(),
                });
            }

            debug!(
                "Prediction {} is {}, polling again",
                prediction.id,
                prediction.status.as_str()
            );
            tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
            prediction = self.get_prediction(&prediction.id).await?;
        }

        match prediction.status {
            PredictionStatus::Succeeded => {
                let url = prediction
                    .output_url()
                    .ok_or_else(|| InferenceError::MissingOutput(prediction.id.clone()))?
                    .to_string();
                info!(
                    "Prediction {} succeeded in {}ms",
                    prediction.id,
                    started.elapsed().as_millis()
                );
                Ok(url)
            }
            status => {
                warn!("Prediction {} ended {}", prediction.id, status.as_str());
                Err(InferenceError::PredictionFailed {
                    message: prediction.error_message(),
                    status: status.as_str().to_string(),
                    id: prediction.id,
                })
            }
        }
    }

    /// Start a prediction, waiting synchronously for it where the API allows.
    pub async fn create_prediction(&self, request: &PredictionRequest) -> Result<Prediction> {
        let url = format!("{}/predictions", self.config.base_url.trim_end_matches('/'));
        debug!(
            "Creating prediction for version {} with inputs {:?}",
            request.version,
            request.input.keys().collect::<Vec<_>>()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .header("Prefer", "wait")
            .json(request)
            .send()
            .await
            .map_err(|source| connect_error(&url, source))?;

        Self::decode(response).await
    }

    /// Fetch the current state of a prediction.
    pub async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        let url = format!(
            "{}/predictions/{id}",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|source| connect_error(&url, source))?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Prediction> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| InferenceError::InvalidResponse(body))
    }
}

fn connect_error(url: &str, source: reqwest::Error) -> InferenceError {
    if source.is_connect() {
        InferenceError::Connect {
            url: url.to_string(),
            source,
        }
    } else {
        InferenceError::Http(source)
    }
}
