use anyhow::anyhow;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::env;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Credential handed out for builds that were never configured; treated the
// same as no credential at all.
const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

// User-facing message for a missing credential. This is a configuration
// error, not a crash.
pub const MISSING_KEY_MSG: &str =
    "API 키가 설정되지 않았습니다. 환경 변수 GEMINI_API_KEY에 유효한 키를 입력해주세요.";

// Shown when the service answered but produced no text.
pub const EMPTY_RESULT_MSG: &str = "분석 결과를 가져올 수 없습니다.";

const FAILURE_PREFIX: &str = "⚠️ 분석 실패: ";

// The credential is read from the process environment: API_KEY takes
// precedence, GEMINI_API_KEY is the fallback.
pub fn api_key_from_env() -> anyhow::Result<String> {
    validate_key(env::var("API_KEY").or_else(|_| env::var("GEMINI_API_KEY")).ok())
}

fn validate_key(key: Option<String>) -> anyhow::Result<String> {
    match key {
        Some(k) if !k.is_empty() && k != PLACEHOLDER_API_KEY => Ok(k),
        _ => Err(anyhow!(MISSING_KEY_MSG)),
    }
}

// Formats a failed analysis for display. Remote failures are shown to the
// user with their underlying message, never rethrown.
pub fn failure_text(err: &anyhow::Error) -> String {
    format!("{FAILURE_PREFIX}{err}")
}

#[derive(Serialize, Debug)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

fn extract_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

// Thin wrapper over the generative-text REST API. One request per analysis,
// no retries; timeouts are whatever reqwest enforces.
pub struct AdvisoryClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
}

impl AdvisoryClient {
    pub fn new(model: &str, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            model: model.to_string(),
            api_key,
        }
    }

    // Sends the interpolated prompt and returns the generated text, or the
    // fixed fallback string when the response carries no text.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let uri = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let resp = self.http.post(uri).json(&request).send().await?;
        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("advisory service returned {status}: {body}"));
        }

        let body: GenerateResponse = resp.json().await?;
        Ok(extract_text(body).unwrap_or_else(|| EMPTY_RESULT_MSG.to_string()))
    }
}

#[cfg(test)]
mod credentials {
    use super::*;

    #[test]
    fn missing_key_is_config_error() {
        let err = validate_key(None).unwrap_err();
        assert_eq!(err.to_string(), MISSING_KEY_MSG);
    }

    #[test]
    fn placeholder_key_is_config_error() {
        assert!(validate_key(Some(PLACEHOLDER_API_KEY.to_string())).is_err());
        assert!(validate_key(Some(String::new())).is_err());
    }

    #[test]
    fn real_key_passes() {
        assert_eq!(
            validate_key(Some("abc123".to_string())).unwrap(),
            "abc123"
        );
    }
}
