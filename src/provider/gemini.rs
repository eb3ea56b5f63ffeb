use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{
    GenerationConfig, HttpClient, LanguageModelUsage, LlmError, ProbeConfig, ResponseMetadata,
    TextGenerator, TextRequest, TextResponse,
};
use crate::provider::{Provider, constants};

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    generation: GenerationConfig,
    http: HttpClient,
}

impl GeminiClient {
    /// Build a client from a probe configuration.
    ///
    /// Fails with `MissingCredential` when no key can be resolved.
    pub fn from_config(config: &ProbeConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let api_key = config.api_key.resolve(Provider::Gemini)?;
        let http = HttpClient::new(&config.http)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            generation: config.generation.clone(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url,
            constants::gemini::API_VERSION,
            model
        )
    }

    fn auth_header(&self) -> (String, String) {
        (
            constants::gemini::API_KEY_HEADER.to_string(),
            self.api_key.clone(),
        )
    }

    fn text_request(&self, prompt: &str) -> TextRequest {
        TextRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            generation_config: Some(self.generation.clone()).filter(|g| !g.is_empty()),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(name = "gemini_generate", skip(self, prompt), fields(model = %self.model), err(level = "debug"))]
    async fn generate_text(&self, prompt: &str) -> Result<TextResponse, LlmError> {
        let text_request = self.text_request(prompt);
        let response: GenerateContentResponse = self
            .http
            .post_json(
                &self.endpoint(&text_request.model),
                &[self.auth_header()],
                &build_request(&text_request),
            )
            .await?;

        let text_response = parse_response(response, &text_request.model)?;
        if let Some(usage) = &text_response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage"
            );
        }
        Ok(text_response)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

fn build_request(request: &TextRequest) -> GenerateContentRequest {
    let generation_config = request
        .generation_config
        .as_ref()
        .map(|g| GeminiGenerationConfig {
            temperature: g.temperature,
            max_output_tokens: g.max_output_tokens,
            response_mime_type: g.json_mode.then(|| "application/json".to_string()),
        });

    GenerateContentRequest {
        contents: vec![Content {
            role: Some(Role::User),
            parts: vec![Part {
                text: Some(request.prompt.clone()),
                thought: None,
            }],
        }],
        generation_config,
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_response(
    response: GenerateContentResponse,
    requested_model: &str,
) -> Result<TextResponse, LlmError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(LlmError::EmptyResponse(format!(
            "Prompt was blocked: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("No candidates in response".to_string()))?;

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| p.thought != Some(true))
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "Candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(TextResponse {
        text: texts.concat(),
        usage: response.usage_metadata.map(|u| LanguageModelUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        }),
        metadata: ResponseMetadata {
            provider: Provider::Gemini,
            model: response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            finish_reason: candidate.finish_reason,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_from(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_without_generation_config() {
        let request = TextRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: "hi".to_string(),
            generation_config: None,
        };
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn json_mode_sets_response_mime_type() {
        let request = TextRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: "hi".to_string(),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: None,
                json_mode: true,
            }),
        };
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({"temperature": 0.0, "responseMimeType": "application/json"})
        );
    }

    #[test]
    fn joins_text_parts_and_skips_thoughts() {
        let response = response_from(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"name\": "},
                    {"text": "\"John\"}"}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20},
            "modelVersion": "gemini-2.5-flash-001"
        }));

        let parsed = parse_response(response, "gemini-2.5-flash").unwrap();
        assert_eq!(parsed.text, "{\"name\": \"John\"}");
        assert_eq!(parsed.metadata.model, "gemini-2.5-flash-001");
        assert_eq!(parsed.metadata.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(parsed.usage.unwrap().total_tokens, 20);
    }

    #[test]
    fn blocked_prompt_is_an_empty_response() {
        let response = response_from(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = parse_response(response, "m").unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn candidate_without_text_reports_finish_reason() {
        let response = response_from(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }));
        let err = parse_response(response, "m").unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(msg) if msg.contains("MAX_TOKENS")));
    }
}
