/// Result Normalization
///
/// Folds a terminal judge payload into the single [`ExecutionResult`] shape
/// callers render. Pure: the same payload always yields the same result.

use codepad_common::types::{
    ErrorKind, ExecutionFailure, ExecutionResult, ExecutionStatus, SubmissionDetails,
};

const STDERR_LABEL: &str = "\nError: ";
const COMPILE_LABEL: &str = "\nCompilation: ";

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Merge stdout, stderr and compiler diagnostics into one output string.
/// Labeled blocks are appended only when the field has content.
pub fn merge_output(details: &SubmissionDetails) -> String {
    let mut output = details.stdout.clone().unwrap_or_default();

    if let Some(stderr) = non_empty(&details.stderr) {
        output.push_str(STDERR_LABEL);
        output.push_str(stderr);
    }

    if let Some(compile_output) = non_empty(&details.compile_output) {
        output.push_str(COMPILE_LABEL);
        output.push_str(compile_output);
    }

    output
}

fn status_label(details: &SubmissionDetails) -> String {
    if details.status.description.is_empty() {
        format!("judge status {}", details.status.id)
    } else {
        details.status.description.clone()
    }
}

pub fn normalize(details: &SubmissionDetails) -> ExecutionResult {
    let mut output = merge_output(details);
    let accepted = details.status.is_accepted();

    let error = if accepted {
        None
    } else {
        let label = status_label(details);
        // A failed run with nothing printed still needs something to show
        if output.is_empty() {
            let reason = non_empty(&details.message).unwrap_or(&label);
            output = format!("Error: {}", reason);
        }
        Some(ExecutionFailure {
            kind: ErrorKind::RemoteExecutionError,
            message: label,
        })
    };

    ExecutionResult {
        output,
        status: if accepted {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Error
        },
        stdout: details.stdout.clone(),
        stderr: non_empty(&details.stderr).map(str::to_string),
        compile_output: non_empty(&details.compile_output).map(str::to_string),
        judge_status: Some(status_label(details)),
        execution_time: details.time.as_deref().and_then(|t| t.trim().parse().ok()),
        memory_used: details.memory,
        error,
    }
}
