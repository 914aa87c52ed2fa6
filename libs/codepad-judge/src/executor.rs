/// Execution Orchestrator
///
/// **Responsibility:**
/// Turn one [`ExecutionRequest`] into exactly one [`ExecutionResult`].
///
/// **Flow:**
/// 1. Resolve the language id locally (unknown ids never reach the network)
/// 2. Check a judge credential is configured
/// 3. Submit the job once
/// 4. Poll the token until it leaves the in-flight states or attempts run out
/// 5. Normalize the terminal payload
///
/// Every failure is folded into an error result. Nothing is retried except
/// the status poll itself.

use crate::client::{Judge0Client, JudgeClient, SubmissionRequest};
use crate::error::JudgeError;
use crate::normalize::normalize;
use crate::poll::{Cancellation, PollPolicy};
use codepad_common::config::JudgeConfig;
use codepad_common::types::{ErrorKind, ExecutionRequest, ExecutionResult, Language};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn JudgeClient>,
    credential_configured: bool,
    default_time_limit_secs: f64,
    default_memory_limit_kb: u64,
    poll: PollPolicy,
}

impl Orchestrator {
    /// Production orchestrator talking HTTP to the configured judge
    pub fn from_config(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let client = Judge0Client::new(config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(client: Arc<dyn JudgeClient>, config: &JudgeConfig) -> Self {
        Self {
            client,
            credential_configured: config.has_credential(),
            default_time_limit_secs: config.default_time_limit_secs,
            default_memory_limit_kb: config.default_memory_limit_kb,
            poll: PollPolicy::from_config(config),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        self.execute_with_cancel(request, Cancellation::never()).await
    }

    /// Like [`Orchestrator::execute`], stopping early with a `Cancelled`
    /// result if `cancel` fires between or during poll attempts.
    #[instrument(skip_all, fields(language = %request.language, source_size = request.code.len()))]
    pub async fn execute_with_cancel(
        &self,
        request: &ExecutionRequest,
        mut cancel: Cancellation,
    ) -> ExecutionResult {
        let language = match Language::from_str(&request.language) {
            Some(language) => language,
            None => {
                warn!("Rejected unsupported language");
                return ExecutionResult::failure(
                    ErrorKind::UnsupportedLanguage,
                    format!("Language {} is not supported", request.language),
                );
            }
        };

        if !self.credential_configured {
            warn!("Judge API key is not configured");
            return ExecutionResult::failure(
                ErrorKind::MissingCredential,
                "Judge0 API key is not configured. Set JUDGE0_API_KEY",
            );
        }

        if request.options.start_at_line.is_some() || request.options.stop_at_line.is_some() {
            debug!(
                start_at_line = ?request.options.start_at_line,
                stop_at_line = ?request.options.stop_at_line,
                "Line hints accepted; the judge runs the full program"
            );
        }

        let submission_request = SubmissionRequest {
            source_code: request.code.clone(),
            language_id: language.judge_id(),
            stdin: request.stdin.clone(),
            cpu_time_limit: request.options.time_limit_or(self.default_time_limit_secs),
            memory_limit: request.options.memory_limit_or(self.default_memory_limit_kb),
        };

        let submission = match self.client.submit(&submission_request).await {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Submission failed");
                return ExecutionResult::failure(
                    ErrorKind::SubmitFailed,
                    format!("Failed to create submission: {}", e),
                );
            }
        };

        info!(
            token = %submission.token,
            language_id = submission_request.language_id,
            time_limit = submission_request.cpu_time_limit,
            memory_limit = submission_request.memory_limit,
            "Submission created"
        );

        let attempts = self.poll.attempts();
        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return cancelled_result(&submission.token, attempt - 1);
            }

            let details = match self.client.fetch(&submission.token).await {
                Ok(details) => details,
                Err(e) => {
                    warn!(token = %submission.token, attempt, error = %e, "Status fetch failed");
                    return ExecutionResult::failure(
                        ErrorKind::PollFailed,
                        format!("Failed to get submission: {}", e),
                    );
                }
            };

            debug!(
                token = %submission.token,
                attempt,
                status_id = details.status.id,
                status = %details.status.description,
                "Polled submission"
            );

            if !details.status.is_in_flight() {
                let result = normalize(&details);
                info!(
                    token = %submission.token,
                    attempts = attempt,
                    status = ?result.status,
                    judge_status = %details.status.description,
                    "Execution finished"
                );
                return result;
            }

            if attempt < attempts {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll.delay_for(attempt)) => {}
                    _ = cancel.cancelled() => {
                        return cancelled_result(&submission.token, attempt);
                    }
                }
            }
        }

        warn!(token = %submission.token, attempts, "Submission still in flight, giving up");
        ExecutionResult::failure(
            ErrorKind::ExecutionTimedOut,
            format!("Execution timed out after {} status checks", attempts),
        )
    }
}

fn cancelled_result(token: &str, attempts: u32) -> ExecutionResult {
    info!(token = %token, attempts, "Execution cancelled");
    ExecutionResult::failure(ErrorKind::Cancelled, "Execution cancelled")
}
