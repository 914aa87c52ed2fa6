use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default CPU time limit forwarded to the judge, in seconds
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 5.0;
/// Default memory ceiling forwarded to the judge, in KB
pub const DEFAULT_MEMORY_LIMIT_KB: u64 = 128_000;

/// Judge status ids that mean the job is still queued or running
pub const STATUS_IN_QUEUE: u32 = 1;
pub const STATUS_PROCESSING: u32 = 2;
/// Judge status id for a completed, accepted run
pub const STATUS_ACCEPTED: u32 = 3;

/// Languages the editor can submit. The set is closed: anything else is
/// rejected before a submission is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Java,
    Cpp,
    C,
    Go,
    Rust,
    Php,
    Ruby,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
    ];

    /// Numeric language id understood by the judging backend
    pub fn judge_id(&self) -> u32 {
        match self {
            Language::Javascript => 63,
            Language::Typescript => 74,
            Language::Python => 71,
            Language::Java => 62,
            Language::Cpp => 54,
            Language::C => 50,
            Language::Go => 60,
            Language::Rust => 73,
            Language::Php => 68,
            Language::Ruby => 72,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Language::ALL.iter().copied().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    /// CPU time limit in seconds; the configured default applies when unset
    #[serde(default, rename = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit_secs: Option<f64>,
    /// Memory limit in KB; the configured default applies when unset
    #[serde(default, rename = "memoryLimit", skip_serializing_if = "Option::is_none")]
    pub memory_limit_kb: Option<u64>,
    /// Step-debugger hints. Accepted but not forwarded: the judge always runs the whole program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_at_line: Option<u32>,
}

impl ExecutionOptions {
    pub fn time_limit_or(&self, default: f64) -> f64 {
        self.time_limit_secs.filter(|t| *t > 0.0).unwrap_or(default)
    }

    pub fn memory_limit_or(&self, default: u64) -> u64 {
        self.memory_limit_kb.filter(|m| *m > 0).unwrap_or(default)
    }
}

/// One code-run request. `language` is kept as the caller's raw id so an
/// unknown language surfaces as an execution result, not a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub stdin: String,
    #[serde(default)]
    pub options: ExecutionOptions,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>, stdin: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            stdin: stdin.into(),
            options: ExecutionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }
}

/// A job accepted by the judge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

impl SubmissionStatus {
    pub fn is_in_flight(&self) -> bool {
        self.id == STATUS_IN_QUEUE || self.id == STATUS_PROCESSING
    }

    pub fn is_accepted(&self) -> bool {
        self.id == STATUS_ACCEPTED
    }
}

/// Status payload returned by the judge for a submission token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetails {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Wall time in seconds, as the judge formats it ("0.012")
    #[serde(default)]
    pub time: Option<String>,
    /// Peak memory in KB
    #[serde(default)]
    pub memory: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedLanguage,
    MissingCredential,
    SubmitFailed,
    PollFailed,
    ExecutionTimedOut,
    RemoteExecutionError,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedLanguage => "unsupported_language",
            ErrorKind::MissingCredential => "missing_credential",
            ErrorKind::SubmitFailed => "submit_failed",
            ErrorKind::PollFailed => "poll_failed",
            ErrorKind::ExecutionTimedOut => "execution_timed_out",
            ErrorKind::RemoteExecutionError => "remote_execution_error",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure carried next to the human-readable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Normalized outcome of one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub output: String,
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_output: Option<String>,
    /// Judge's description of the terminal status ("Accepted", "Compilation Error", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_status: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    /// KB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionFailure>,
}

impl ExecutionResult {
    /// Result for a failure that happened before or around the judge run
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            output: format!("Error: {}", message),
            status: ExecutionStatus::Error,
            stdout: None,
            stderr: None,
            compile_output: None,
            judge_status: None,
            execution_time: None,
            memory_used: None,
            error: Some(ExecutionFailure { kind, message }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

/// A shared code snippet, addressed by a short id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub code: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}
