pub mod builder;
pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use builder::{ApiKey, ProbeConfig};
pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig};
pub use traits::TextGenerator;
pub use types::{GenerationConfig, LanguageModelUsage, ResponseMetadata, TextRequest, TextResponse};
