//! Registry synchronization error types

use thiserror::Error;

/// Errors that can occur while synchronizing a registry document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required section anchor is missing from the document
    ///
    /// Carries the exact literal that was expected so a human can fix the
    /// document by hand. Never auto-repaired: a hand-edited document that
    /// lost its anchors fails closed rather than being guessed at.
    #[error("registry document is missing required anchor: {anchor:?}")]
    MalformedDocument { anchor: String },

    /// Sections were found but in an unexpected order
    #[error("registry document sections are out of order (found {anchor:?} before {expected_after:?})")]
    SectionOrder {
        anchor: String,
        expected_after: String,
    },
}

impl RegistryError {
    pub(crate) fn missing(anchor: &str) -> Self {
        Self::MalformedDocument {
            anchor: anchor.to_string(),
        }
    }

    /// The anchor literal involved, for reporting
    pub fn anchor(&self) -> &str {
        match self {
            Self::MalformedDocument { anchor } => anchor,
            Self::SectionOrder { anchor, .. } => anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_the_missing_anchor() {
        let err = RegistryError::missing("export const quizRegistry = [");
        assert!(err.to_string().contains("export const quizRegistry = ["));
        assert_eq!(err.anchor(), "export const quizRegistry = [");
    }
}
