/// Judge Client - the network seam of the orchestrator
///
/// The orchestrator only knows [`JudgeClient`]. Production wires in
/// [`Judge0Client`]; tests script responses through their own impls.

use crate::error::JudgeError;
use async_trait::async_trait;
use codepad_common::config::JudgeConfig;
use codepad_common::types::{Submission, SubmissionDetails};
use serde::Serialize;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Body of `POST /submissions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRequest {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
    /// Seconds
    pub cpu_time_limit: f64,
    /// KB
    pub memory_limit: u64,
}

#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Create a submission and return its token
    async fn submit(&self, request: &SubmissionRequest) -> Result<Submission, JudgeError>;

    /// Fetch the current state of a submission
    async fn fetch(&self, token: &str) -> Result<SubmissionDetails, JudgeError>;
}

/// HTTP client for a Judge0-compatible backend
pub struct Judge0Client {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    api_host: String,
}

impl Judge0Client {
    pub fn new(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(API_HOST_HEADER, &self.api_host);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }
}

/// Turn a non-2xx response into `JudgeError::Rejected`, keeping the body for diagnostics
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, JudgeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "Judge rejected request");
    Err(JudgeError::Rejected {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        body,
    })
}

#[async_trait]
impl JudgeClient for Judge0Client {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Submission, JudgeError> {
        let url = format!("{}/submissions", self.base_url);
        debug!(url = %url, language_id = request.language_id, "Creating submission");

        let response = self
            .with_headers(self.http.post(&url))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json::<Submission>().await?)
    }

    async fn fetch(&self, token: &str) -> Result<SubmissionDetails, JudgeError> {
        let url = format!("{}/submissions/{}", self.base_url, token);

        let response = self.with_headers(self.http.get(&url)).send().await?;
        let response = check_status(response).await?;

        Ok(response.json::<SubmissionDetails>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    /// Start a fake judge on an ephemeral port and return its base URL
    async fn spawn_fake_judge(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config_for(url: &str, key: Option<&str>) -> JudgeConfig {
        JudgeConfig {
            api_url: url.to_string(),
            api_key: key.map(str::to_string),
            ..JudgeConfig::default()
        }
    }

    fn sample_request() -> SubmissionRequest {
        SubmissionRequest {
            source_code: "print(1)".to_string(),
            language_id: 71,
            stdin: "".to_string(),
            cpu_time_limit: 5.0,
            memory_limit: 128_000,
        }
    }

    #[tokio::test]
    async fn test_submit_sends_body_and_headers() {
        let app = Router::new().route(
            "/submissions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-rapidapi-key"], "k3y");
                assert_eq!(headers["x-rapidapi-host"], "judge0-ce.p.rapidapi.com");
                assert_eq!(body["source_code"], "print(1)");
                assert_eq!(body["language_id"], 71);
                assert_eq!(body["cpu_time_limit"], 5.0);
                assert_eq!(body["memory_limit"], 128_000);
                (StatusCode::CREATED, Json(json!({ "token": "tok-1" })))
            }),
        );
        let url = spawn_fake_judge(app).await;

        let client = Judge0Client::new(&config_for(&url, Some("k3y"))).unwrap();
        let submission = client.submit(&sample_request()).await.unwrap();
        assert_eq!(submission.token, "tok-1");
    }

    #[tokio::test]
    async fn test_fetch_decodes_details() {
        let app = Router::new().route(
            "/submissions/:token",
            get(|Path(token): Path<String>| async move {
                assert_eq!(token, "tok-2");
                Json(json!({
                    "status": { "id": 3, "description": "Accepted" },
                    "stdout": "1\n",
                    "stderr": null,
                    "compile_output": null,
                    "time": "0.02",
                    "memory": 3200
                }))
            }),
        );
        let url = spawn_fake_judge(app).await;

        let client = Judge0Client::new(&config_for(&url, Some("k"))).unwrap();
        let details = client.fetch("tok-2").await.unwrap();
        assert!(details.status.is_accepted());
        assert_eq!(details.stdout.as_deref(), Some("1\n"));
        assert_eq!(details.memory, Some(3200));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let app = Router::new().route(
            "/submissions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
        );
        let url = spawn_fake_judge(app).await;

        let client = Judge0Client::new(&config_for(&url, Some("bad"))).unwrap();
        match client.submit(&sample_request()).await {
            Err(JudgeError::Rejected { status, reason, body }) => {
                assert_eq!(status, 401);
                assert_eq!(reason, "Unauthorized");
                assert_eq!(body, "invalid key");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        let client = Judge0Client::new(&config_for("http://localhost:2358/", None)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:2358");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Judge0Client::new(&config_for(&format!("http://{}", addr), Some("k"))).unwrap();
        let err = client.fetch("tok").await.unwrap_err();
        assert!(matches!(err, JudgeError::Transport(_)), "got {:?}", err);
    }
}
