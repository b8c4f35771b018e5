//! Generation request/response types
//!
//! These model the Anthropic Messages API but are provider-agnostic enough
//! to support other providers in the future.

/// A generation request - everything needed for one provider call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System prompt
    pub system_prompt: String,

    /// User prompt text
    pub prompt: String,

    /// Optional document passed by URL (the paper PDF)
    pub document_url: Option<String>,

    /// Max tokens for the response (from config)
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    /// Request for a quiz generated from a paper PDF
    pub fn for_document(system_prompt: impl Into<String>, prompt: impl Into<String>, pdf_url: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            document_url: Some(pdf_url.into()),
            max_tokens: 4_000,
            temperature: 0.2,
        }
    }
}

/// A chunk delivered on the streaming channel
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// A fragment of response text, in arrival order
    TextDelta(String),

    /// The stream completed normally; no further fragments follow
    Done,

    /// The stream failed; the caller must discard accumulated text
    Error(String),
}
