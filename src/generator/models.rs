use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Single-turn `generateContent` request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Result<&str> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| Error::UnexpectedResponse("No candidates returned".to_string()))?;

        candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::UnexpectedResponse("Candidate has no text".to_string()))
    }
}

/// Body returned by the server-side instruction proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub text: String,
}
