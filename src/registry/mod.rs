//! Registry synchronization
//!
//! The registry document is a single text file with three mutually dependent
//! sections: an import list, a collection array, and a dispatch switch for
//! on-demand loading. [`synchronize`] registers an identity in all three, or
//! leaves the document byte-for-byte unchanged when it is already fully
//! registered. Pure text-to-text; persistence belongs to the caller.

use tracing::debug;

mod anchors;
mod document;
mod error;

pub use anchors::{COLLECTION_REGISTRY, QUIZ_REGISTRY, RegistryAnchors};
pub use document::RegistryDocument;
pub use error::RegistryError;

use crate::domain::QuizId;

/// Register `id` in every section of the registry document
///
/// Idempotent: re-running on the output for the same identity produces
/// byte-identical text. Either the returned text satisfies the three-way
/// invariant for `id`, or an error is returned and the caller still holds
/// the unmodified original.
pub fn synchronize(text: &str, id: &QuizId, anchors: &RegistryAnchors) -> Result<String, RegistryError> {
    let mut doc = RegistryDocument::parse(text, anchors)?;
    let changed = doc.upsert(id)?;
    debug!(%id, changed, "synchronize: done");
    Ok(doc.render())
}
