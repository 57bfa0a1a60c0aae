//! `EyePop` hosted inference client.
//!
//! A prediction takes three requests: the secret key is exchanged for an
//! access token, the pop's worker configuration is fetched (starting the
//! worker if needed), and the image URL is submitted to the worker's
//! pipeline in synchronous mode. The worker's JSON response is returned
//! unchanged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::VisionError;

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.eyepop.ai";

/// Credentials and endpoint for the recognition API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// Pop (pipeline) identifier.
    pub pop_id: Option<String>,
    /// API secret key.
    pub secret_key: Option<String>,
    /// API base URL.
    pub api_url: String,
}

impl RecognitionConfig {
    /// Reads `EYEPOP_POP_ID`, `EYE_POP_AI_API_KEY` and `EYEPOP_URL`.
    ///
    /// Missing credentials are not an error here; they surface as
    /// [`VisionError::Config`] when a prediction is attempted.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self {
            pop_id: non_empty_var("EYEPOP_POP_ID"),
            secret_key: non_empty_var("EYE_POP_AI_API_KEY"),
            api_url: std::env::var("EYEPOP_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        if config.pop_id.is_none() || config.secret_key.is_none() {
            log::warn!("EYEPOP_POP_ID or EYE_POP_AI_API_KEY not set; /predict will fail");
        }
        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Runs image recognition against a URL.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Runs the configured pipeline on the image at `url` and returns the
    /// raw result.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] if the request fails or the API reports an
    /// error.
    async fn predict_url(&self, url: &str) -> Result<serde_json::Value, VisionError>;
}

/// [`Recognizer`] backed by the `EyePop` REST API.
pub struct EyePopClient {
    config: RecognitionConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    secret_key: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct WorkerConfig {
    base_url: String,
    pipeline_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceRequest<'a> {
    source_type: &'a str,
    url: &'a str,
}

impl EyePopClient {
    /// Creates a client for `config`.
    #[must_use]
    pub fn new(config: RecognitionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), VisionError> {
        let pop_id = self
            .config
            .pop_id
            .as_deref()
            .ok_or_else(|| VisionError::Config {
                message: "EYEPOP_POP_ID environment variable not set".to_string(),
            })?;
        let secret_key =
            self.config
                .secret_key
                .as_deref()
                .ok_or_else(|| VisionError::Config {
                    message: "EYE_POP_AI_API_KEY environment variable not set".to_string(),
                })?;
        Ok((pop_id, secret_key))
    }

    async fn access_token(&self, secret_key: &str) -> Result<String, VisionError> {
        let resp = self
            .client
            .post(endpoint(&self.config.api_url, "authentication/token"))
            .json(&TokenRequest { secret_key })
            .send()
            .await?;
        let token: TokenResponse = read_json(resp).await?;
        Ok(token.access_token)
    }

    async fn worker_config(&self, token: &str, pop_id: &str) -> Result<WorkerConfig, VisionError> {
        let resp = self
            .client
            .get(endpoint(
                &self.config.api_url,
                &format!("pops/{pop_id}/config?auto_start=true"),
            ))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(resp).await
    }
}

#[async_trait::async_trait]
impl Recognizer for EyePopClient {
    async fn predict_url(&self, url: &str) -> Result<serde_json::Value, VisionError> {
        let (pop_id, secret_key) = self.credentials()?;

        let token = self.access_token(secret_key).await?;
        let worker = self.worker_config(&token, pop_id).await?;
        log::debug!(
            "Submitting {url} to pipeline {} at {}",
            worker.pipeline_id,
            worker.base_url
        );

        let resp = self
            .client
            .post(endpoint(
                &worker.base_url,
                &format!(
                    "pipelines/{}/source?mode=preempt&processing=sync",
                    worker.pipeline_id
                ),
            ))
            .bearer_auth(&token)
            .json(&SourceRequest {
                source_type: "URL",
                url,
            })
            .send()
            .await?;
        read_json(resp).await
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, VisionError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(VisionError::Provider {
            message: format!("HTTP {status}: {body}"),
        });
    }

    Ok(serde_json::from_str(&body)?)
}
