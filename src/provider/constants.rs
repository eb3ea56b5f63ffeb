pub const DEFAULT_PROMPT: &str =
    r#"Return ONLY this JSON with no extra text: {"name": "John", "score": 85}"#;
pub const PROMPT_ENV_VAR: &str = "PROBE_PROMPT";

pub mod gemini {
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com";
    pub const API_VERSION: &str = "v1beta";
    pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
    pub const MODEL_ENV_VAR: &str = "GEMINI_MODEL";
    pub const BASE_URL_ENV_VAR: &str = "GEMINI_BASE_URL";
    pub const TIMEOUT_ENV_VAR: &str = "GEMINI_TIMEOUT_SECS";
}
