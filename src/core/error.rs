use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing credential: set {env_var} or pass an explicit API key")]
    MissingCredential { env_var: String },

    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The model's text is not valid JSON. `raw` holds the text verbatim.
    #[error("{source}")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing field '{0}' in decoded response")]
    MissingField(&'static str),

    #[error("Field '{field}' has the wrong type: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}
