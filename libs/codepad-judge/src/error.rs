/// Failures talking to the judging backend. The orchestrator turns these
/// into error results; they never reach API callers as `Err`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JudgeError {
    /// Backend answered with a non-success HTTP status
    #[error("{status} {reason} - {body}")]
    Rejected {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response from judge: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for JudgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            JudgeError::Decode(e.to_string())
        } else {
            JudgeError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_status_and_body() {
        let err = JudgeError::Rejected {
            status: 401,
            reason: "Unauthorized".to_string(),
            body: "{\"message\":\"bad key\"}".to_string(),
        };
        assert_eq!(err.to_string(), "401 Unauthorized - {\"message\":\"bad key\"}");
    }
}
