use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failure of a single generation request.
#[derive(Debug)]
pub enum ServiceError {
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// The service answered with a non-success status.
    Status { code: u16, body: String },
    /// The response body was not the expected JSON.
    Decode(String),
    /// The response parsed but carried no text.
    EmptyResponse,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "transport error: {msg}"),
            ServiceError::Status { code, body } => {
                write!(f, "service returned HTTP {code}")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            ServiceError::Decode(msg) => write!(f, "malformed response: {msg}"),
            ServiceError::EmptyResponse => write!(f, "response contained no text"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// A synchronous text generator.
///
/// Implementations may block for as long as they like; callers bound the
/// wait themselves.
pub trait TextService: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Upper bound on a single request, so an abandoned worker thread ends.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body kept in [`ServiceError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Blocking client for the Gemini `generateContent` REST call.
pub struct GeminiService {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiService {
    pub fn new(api_key: impl Into<String>, model: &str) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{GEMINI_ENDPOINT}/{model}:generateContent"),
            api_key: api_key.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextService for GeminiService {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                code: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        extract_text(&text)
    }
}

/// Pulls the generated text out of a `generateContent` response body.
///
/// The parts of the first candidate are concatenated.
pub fn extract_text(body: &str) -> Result<String, ServiceError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    let parts = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_part_is_returned() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Keep going."}],"role":"model"}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Keep going.");
    }

    #[test]
    fn parts_of_first_candidate_are_concatenated() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"Make "},{"text":"it happen."}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(extract_text(body).unwrap(), "Make it happen.");
    }

    #[test]
    fn missing_text_is_empty_response() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
        ] {
            assert!(matches!(extract_text(body), Err(ServiceError::EmptyResponse)), "{body}");
        }
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(extract_text("<html>busy</html>"), Err(ServiceError::Decode(_))));
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: "hi" }] }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"contents":[{"parts":[{"text":"hi"}]}]}));
    }

    #[test]
    fn url_includes_model() {
        let svc = GeminiService::new("key", "gemini-2.5-flash").unwrap();
        assert_eq!(
            svc.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn status_error_display() {
        let e = ServiceError::Status { code: 403, body: "denied".into() };
        assert_eq!(e.to_string(), "service returned HTTP 403: denied");
        assert_eq!(ServiceError::EmptyResponse.to_string(), "response contained no text");
    }
}
