//! RAG Service Client
//!
//! Talks JSON over HTTP to the retrieval-augmented-generation service.
//!
//! # Endpoints
//!
//! - `POST {base}/retrieve` - raw chunk retrieval
//! - `POST {base}/answer` - retrieval + answer synthesis
//! - `POST {base}/feedback` - thumbs up/down on an answer
//! - `GET {root}/health` - liveness, served at the root rather than under `/api`
//!
//! Each call is a single attempt. There are no retries; the only timeouts are
//! the per-request ones configured on [`ClientConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;
use super::types::{
    AnswerRequest, AnswerResponse, ErrorBody, FeedbackPayload, FeedbackResponse, HealthResponse,
    RetrieveFilter, RetrieveRequest, Source,
};

/// Default API base used when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

const CTX_RETRIEVE: &str = "Failed to retrieve chunks";
const CTX_ANSWER: &str = "Failed to get answer";
const CTX_FEEDBACK: &str = "Failed to submit feedback";
const CTX_HEALTH: &str = "Health check failed";

/// Connection settings for [`RagClient`]
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. `http://localhost:8000/api`)
    pub base_url: String,
    /// Timeout for `/retrieve`, `/answer` and `/feedback`
    pub request_timeout: Duration,
    /// Timeout for `/health`
    pub health_timeout: Duration,
    /// Log request and response bodies at debug level
    pub dev_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            dev_mode: false,
        }
    }
}

/// The operations the conversation store needs from the RAG service
///
/// [`RagClient`] is the HTTP implementation; tests drive the store with
/// in-memory implementations.
#[async_trait]
pub trait RagApi: Send + Sync {
    /// Retrieve the `top_k` most relevant chunks for `query`
    async fn retrieve_chunks(
        &self,
        query: &str,
        top_k: u32,
        filter: Option<&RetrieveFilter>,
    ) -> Result<Vec<Source>, ApiError>;

    /// Answer a question, optionally scoped to a module or a selection
    async fn answer_question(&self, request: &AnswerRequest) -> Result<AnswerResponse, ApiError>;

    /// Record feedback on an answer
    async fn submit_feedback(
        &self,
        feedback: &FeedbackPayload,
    ) -> Result<FeedbackResponse, ApiError>;

    /// Check whether the service is up
    async fn check_health(&self) -> Result<HealthResponse, ApiError>;
}

/// HTTP client for the RAG service
#[derive(Clone)]
pub struct RagClient {
    /// API base without trailing slash
    api_base: String,
    /// Service root (API base minus a trailing `/api`)
    root: String,
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl RagClient {
    /// Create a client, validating the base URL
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let api_base = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&api_base).map_err(|e| ApiError::Setup {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Setup {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Setup {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            root: service_root(&api_base),
            api_base,
            config,
            http_client,
        })
    }

    /// Base URL for API endpoints
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Root URL where `/health` lives
    pub fn root(&self) -> &str {
        &self.root
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, context: &'static str) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        if self.config.dev_mode {
            debug!(
                body = %serde_json::to_string(body).unwrap_or_default(),
                "[api request] POST {url}"
            );
        }

        let result = self
            .http_client
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(body)
            .send()
            .await;

        self.finish(&url, context, result).await
    }

    /// Turn a transport result into a decoded body or a normalized error
    async fn finish<R>(
        &self,
        url: &str,
        context: &'static str,
        result: Result<Response, reqwest::Error>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let outcome = match result {
            Err(e) => Err(ApiError::NoResponse {
                context,
                timed_out: e.is_timeout(),
                reason: e.to_string(),
            }),
            Ok(response) => self.decode(url, context, response).await,
        };

        if let Err(ref e) = outcome {
            e.log();
        }
        outcome
    }

    async fn decode<R>(&self, url: &str, context: &'static str, response: Response) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ApiError::NoResponse {
            context,
            timed_out: e.is_timeout(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            if self.config.dev_mode {
                debug!(
                    status = status.as_u16(),
                    body = %String::from_utf8_lossy(&bytes),
                    "[api response error] {url}"
                );
            }
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.detail_text())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(ApiError::Status {
                context,
                status: status.as_u16(),
                detail,
            });
        }

        if self.config.dev_mode {
            debug!(body = %String::from_utf8_lossy(&bytes), "[api response] {url}");
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            context,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RagApi for RagClient {
    async fn retrieve_chunks(
        &self,
        query: &str,
        top_k: u32,
        filter: Option<&RetrieveFilter>,
    ) -> Result<Vec<Source>, ApiError> {
        let request = RetrieveRequest {
            query: query.to_string(),
            top_k,
            filter: filter.cloned(),
        };
        self.post_json("retrieve", &request, CTX_RETRIEVE).await
    }

    async fn answer_question(&self, request: &AnswerRequest) -> Result<AnswerResponse, ApiError> {
        self.post_json("answer", &request.for_wire(), CTX_ANSWER)
            .await
    }

    async fn submit_feedback(
        &self,
        feedback: &FeedbackPayload,
    ) -> Result<FeedbackResponse, ApiError> {
        self.post_json("feedback", feedback, CTX_FEEDBACK).await
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let url = format!("{}/health", self.root);
        if self.config.dev_mode {
            debug!("[api request] GET {url}");
        }
        let result = self
            .http_client
            .get(&url)
            .timeout(self.config.health_timeout)
            .send()
            .await;
        self.finish(&url, CTX_HEALTH, result).await
    }
}

/// Strip a trailing `/api` segment to find where `/health` is served
fn service_root(api_base: &str) -> String {
    api_base
        .strip_suffix("/api")
        .unwrap_or(api_base)
        .to_string()
}
