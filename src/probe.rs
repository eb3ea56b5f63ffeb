//! The probe itself: one prompt, one reply, one strict JSON decode.
//!
//! A reply that is not JSON is an expected result and comes back as
//! [`ProbeOutcome::DecodeFailed`]. Everything else that goes wrong is an
//! [`LlmError`].

use std::io::{self, Write};

use serde_json::{Map, Number, Value};
use tracing::info;

use crate::core::{LlmError, TextGenerator};

/// The two fields the prompt asks the model to return.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub name: String,
    /// Integers keep every digit the model wrote. Decimals print in shortest
    /// round-trip form, so `85.50` becomes `85.5`.
    pub score: Number,
}

impl ScoreCard {
    /// Validate a decoded document. Missing keys are never defaulted.
    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        let object = value.as_object().ok_or(LlmError::InvalidField {
            field: "<root>",
            expected: "object",
        })?;

        let name = match required(object, "name")? {
            Value::String(s) => s.clone(),
            _ => {
                return Err(LlmError::InvalidField {
                    field: "name",
                    expected: "string",
                });
            }
        };

        let score = match required(object, "score")? {
            Value::Number(n) => normalize_score(n),
            _ => {
                return Err(LlmError::InvalidField {
                    field: "score",
                    expected: "number",
                });
            }
        };

        Ok(Self { name, score })
    }
}

fn normalize_score(n: &Number) -> Number {
    let text = n.to_string();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return n.clone();
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .unwrap_or_else(|| n.clone())
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, LlmError> {
    object.get(field).ok_or(LlmError::MissingField(field))
}

/// Decode the text exactly as received. No fence or prose stripping.
pub fn decode_response(text: &str) -> Result<Value, LlmError> {
    serde_json::from_str(text).map_err(|source| LlmError::Decode {
        raw: text.to_string(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Parsed(ScoreCard),
    DecodeFailed { error: String, raw: String },
}

impl ProbeOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ProbeOutcome::Parsed(_))
    }

    /// Write the console report.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            ProbeOutcome::Parsed(card) => {
                writeln!(out, "JSON parsing successful!")?;
                writeln!(out, "Name: {}, Score: {}", card.name, card.score)
            }
            ProbeOutcome::DecodeFailed { error, raw } => {
                writeln!(out, "Error: {error}")?;
                writeln!(out, "Raw response: {raw}")
            }
        }
    }

    pub fn to_report(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Send `prompt` once and classify the reply.
#[tracing::instrument(name = "run_probe", skip_all, err(level = "debug"))]
pub async fn run_probe<G>(generator: &G, prompt: &str) -> Result<ProbeOutcome, LlmError>
where
    G: TextGenerator + ?Sized,
{
    let response = generator.generate_text(prompt).await?;
    info!(
        provider = %response.metadata.provider,
        model = %response.metadata.model,
        finish_reason = response.metadata.finish_reason.as_deref().unwrap_or("unknown"),
        "Received model response"
    );

    let value = match decode_response(&response.text) {
        Ok(value) => value,
        Err(LlmError::Decode { raw, source }) => {
            info!(error = %source, "Response is not valid JSON");
            return Ok(ProbeOutcome::DecodeFailed {
                error: source.to_string(),
                raw,
            });
        }
        Err(other) => return Err(other),
    };

    let card = ScoreCard::from_value(&value)?;
    info!(name = %card.name, score = %card.score, "Response parsed");
    Ok(ProbeOutcome::Parsed(card))
}
