//! Quiz and collection identity types
//!
//! All IDs use URL-safe kebab-case: `{collection}-{arxiv-id-with-dashes}`
//! Example: `dec-2025-2301-00001`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`QuizId`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("quiz id is empty")]
    Empty,

    #[error("quiz id '{id}' contains invalid character '{ch}' (allowed: a-z, 0-9, -)")]
    InvalidCharacter { id: String, ch: char },

    #[error("quiz id '{0}' must start with a letter or digit")]
    InvalidStart(String),
}

/// A validated quiz identifier
///
/// Unique within a registry, immutable after creation. The constrained
/// alphabet (lowercase kebab-case) is what makes [`QuizId::binding_name`]
/// a pure total function: stripping separators always yields a token that
/// is valid as an identifier in the registry document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizId(String);

impl QuizId {
    /// Parse and validate an identifier
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        let first = id.chars().next().unwrap();
        if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
            return Err(IdError::InvalidStart(id));
        }
        if let Some(ch) = id
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(IdError::InvalidCharacter { id, ch });
        }
        Ok(Self(id))
    }

    /// Derive the binding name used inside registry documents
    ///
    /// The identity with its `-` separators stripped, e.g.
    /// `dec-2025-1234-5678` -> `dec202512345678`. Deterministic, so repeated
    /// runs always agree. Two distinct identities can collide after
    /// stripping (`ab-c` vs `a-bc`); this is not detected, matching the
    /// upstream format. A collision shows up as an idempotent no-op insert,
    /// never a corrupt document.
    pub fn binding_name(&self) -> String {
        self.0.chars().filter(|c| *c != '-').collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for QuizId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for QuizId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for QuizId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for QuizId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// A quiz identity plus its human-readable title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRef {
    pub id: QuizId,
    pub title: String,
}

/// A paper discovered in a source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRef {
    /// arXiv identifier, e.g. `2301.00001`
    pub arxiv_id: String,
    /// Canonical PDF URL for the paper
    pub pdf_url: String,
    /// URL-friendly slug derived from the link text
    pub slug: String,
    /// Link text, used as a fallback title
    pub title: String,
}

impl PaperRef {
    /// Derive the quiz id for this paper within a collection
    ///
    /// `{collection-id}-{arxiv-id with '.' -> '-'}`, e.g.
    /// `dec-2025` + `2301.00001` -> `dec-2025-2301-00001`.
    pub fn quiz_id(&self, collection_id: &QuizId) -> Result<QuizId, IdError> {
        QuizId::new(format!("{}-{}", collection_id, self.arxiv_id.replace('.', "-")))
    }
}

/// Provenance metadata for a generated collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub source_url: String,
    pub quiz_ids: Vec<QuizId>,
}

/// Convert free text to a URL-friendly slug
///
/// Lowercases, strips everything but alphanumerics/spaces/hyphens, collapses
/// separator runs, and caps the result at 50 characters.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true; // suppress leading hyphens
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_hyphen = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(50);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
