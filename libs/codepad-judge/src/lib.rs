//! Remote execution against a Judge0-compatible backend.
//!
//! [`Orchestrator`] is the entry point: submit, poll, normalize. The HTTP
//! details live behind [`JudgeClient`] so callers and tests can swap them.

pub mod client;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod poll;
pub mod stepper;


pub use client::{Judge0Client, JudgeClient, SubmissionRequest};
pub use error::JudgeError;
pub use executor::Orchestrator;
pub use normalize::normalize;
pub use poll::{cancellation, Backoff, CancelHandle, Cancellation, PollPolicy};
pub use stepper::{DebugCursor, StepPlan};
