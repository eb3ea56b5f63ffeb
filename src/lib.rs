//! # gemini-json-probe
//!
//! Ask a hosted Gemini model for a JSON literal and find out whether the text
//! it sends back actually parses.
//!
//! ```rust,no_run
//! use gemini_json_probe::{GeminiClient, ProbeConfig, run_probe};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProbeConfig::from_env()?;
//!     let client = GeminiClient::from_config(&config)?;
//!     let outcome = run_probe(&client, &config.prompt).await?;
//!     print!("{}", outcome.to_report());
//!     Ok(())
//! }
//! ```
//!
//! Replies are decoded strictly: a model that wraps its JSON in prose or a code
//! fence produces a [`ProbeOutcome::DecodeFailed`] report, not a parsed result.

pub mod core;
pub mod probe;
pub mod provider;

pub use core::{
    ApiKey, GenerationConfig, HttpClientConfig, LanguageModelUsage, LlmError, ProbeConfig,
    ResponseMetadata, TextGenerator, TextResponse,
};
pub use probe::{ProbeOutcome, ScoreCard, decode_response, run_probe};
pub use provider::{GeminiClient, Provider};
