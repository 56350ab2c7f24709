//! README generation through a hosted chat-completion API.
//!
//! # Architecture
//!
//! - **provider**: `LlmProvider` trait with an OpenAI-compatible implementation
//! - **client**: `CompletionClient`, one request per README, no retries
//! - **pipeline**: credentials → scan → prompt → completion → write
//! - **progress**: terminal spinner via `indicatif`

pub mod client;
pub mod pipeline;
pub mod progress;
pub mod provider;

pub use client::CompletionClient;
pub use pipeline::{GenerateReport, GenerateRequest, PipelineError, prepare_prompt, run_pipeline};
pub use provider::{CompletionError, LlmProvider, LlmResponse, create_provider};
