use std::time::Duration;

use crate::provider::{Provider, constants};

use super::{error::LlmError, http::HttpClientConfig, types::GenerationConfig};

/// Where the API key comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiKey {
    /// Read the provider's default environment variable (`GOOGLE_API_KEY`)
    Default,
    Custom(String),
}

impl ApiKey {
    pub fn resolve(&self, provider: Provider) -> Result<String, LlmError> {
        self.resolve_with(provider, |name| std::env::var(name).ok())
    }

    /// Resolve the key using `lookup` in place of the process environment.
    pub fn resolve_with<F>(&self, provider: Provider, lookup: F) -> Result<String, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_var = provider.default_api_key_env_var();
        let key = match self {
            ApiKey::Default => lookup(env_var),
            ApiKey::Custom(key) => Some(key.clone()),
        };

        key.filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential {
                env_var: env_var.to_string(),
            })
    }
}

/// Everything needed to run one probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub prompt: String,
    pub base_url: String,
    pub http: HttpClientConfig,
    pub generation: GenerationConfig,
}

impl ProbeConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: constants::gemini::DEFAULT_MODEL.to_string(),
            prompt: constants::DEFAULT_PROMPT.to_string(),
            base_url: constants::gemini::API_BASE.to_string(),
            http: HttpClientConfig::default(),
            generation: GenerationConfig::default(),
        }
    }

    /// Build a config from the process environment.
    ///
    /// The credential is resolved here, so a missing key fails before any
    /// client exists.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = ApiKey::Default.resolve_with(Provider::Gemini, &lookup)?;
        let mut config = Self::new(ApiKey::Custom(key));

        if let Some(model) = lookup(constants::gemini::MODEL_ENV_VAR) {
            config = config.model(model);
        }
        if let Some(base_url) = lookup(constants::gemini::BASE_URL_ENV_VAR) {
            config = config.base_url(base_url);
        }
        if let Some(prompt) = lookup(constants::PROMPT_ENV_VAR) {
            config = config.prompt(prompt);
        }
        if let Some(raw) = lookup(constants::gemini::TIMEOUT_ENV_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                LlmError::ProviderConfiguration(format!(
                    "{} must be a whole number of seconds, got '{raw}': {e}",
                    constants::gemini::TIMEOUT_ENV_VAR
                ))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn http_client_config(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    pub fn generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::ProviderConfiguration(
                "Missing model. Make sure to specify a model.".to_string(),
            ));
        }
        if self.prompt.is_empty() {
            return Err(LlmError::ProviderConfiguration(
                "Missing prompt.".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LlmError::ProviderConfiguration(format!(
                "Base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.http.timeout.is_some_and(|t| t.is_zero()) {
            return Err(LlmError::ProviderConfiguration(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(temperature) = self.generation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(LlmError::ProviderConfiguration(format!(
                    "Temperature must be between 0.0 and 2.0, got {temperature}"
                )));
            }
        }
        Ok(())
    }
}
