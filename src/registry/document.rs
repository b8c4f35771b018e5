//! Registry document parsing and upserting
//!
//! The registry is a hand-readable text file that is also a parseable
//! program structure: an import list, a collection array, and a dispatch
//! switch with a terminal fallback branch. All three sections must agree on
//! which entries exist. The fragile anchor matching lives entirely in
//! [`locate`]; the update logic works on located spans.

use tracing::debug;

use super::anchors::RegistryAnchors;
use super::error::RegistryError;
use crate::domain::QuizId;

/// A parsed registry document
///
/// Parsing validates that every anchor is present and in order, so an
/// upsert on a parsed document cannot leave it half-edited: either all
/// three sections receive the entry, or [`parse`](Self::parse) already
/// failed and the caller still holds the original text.
#[derive(Debug, Clone)]
pub struct RegistryDocument<'a> {
    text: String,
    anchors: &'a RegistryAnchors,
}

/// Byte offsets of the three sections within the document text
struct Sections {
    /// Start of the import header literal
    import_start: usize,
    /// End of the import section (start of the array section)
    import_end: usize,
    /// Start of the array body (just past the opening literal)
    array_body_start: usize,
    /// Start of the closing-bracket literal
    array_close: usize,
    /// Start of the line holding the closing bracket
    array_close_line: usize,
    /// Start of the fallback branch literal
    fallback: usize,
}

fn locate(text: &str, anchors: &RegistryAnchors) -> Result<Sections, RegistryError> {
    let import_start = text
        .find(anchors.import_header)
        .ok_or_else(|| RegistryError::missing(anchors.import_header))?;

    let array_open = text
        .find(anchors.array_open)
        .ok_or_else(|| RegistryError::missing(anchors.array_open))?;
    if array_open < import_start {
        return Err(RegistryError::SectionOrder {
            anchor: anchors.array_open.to_string(),
            expected_after: anchors.import_header.to_string(),
        });
    }

    let array_body_start = array_open + anchors.array_open.len();
    let array_close = text[array_body_start..]
        .find(anchors.array_close)
        .map(|i| array_body_start + i)
        .ok_or_else(|| RegistryError::missing(anchors.array_close))?;
    let array_close_line = text[..array_close].rfind('\n').map(|i| i + 1).unwrap_or(0);

    let fallback = text[array_close..]
        .find(anchors.fallback_branch)
        .map(|i| array_close + i)
        .ok_or_else(|| RegistryError::missing(anchors.fallback_branch))?;

    Ok(Sections {
        import_start,
        import_end: array_open,
        array_body_start,
        array_close,
        array_close_line,
        fallback,
    })
}

impl<'a> RegistryDocument<'a> {
    /// Parse a registry document, validating all three section anchors
    pub fn parse(text: impl Into<String>, anchors: &'a RegistryAnchors) -> Result<Self, RegistryError> {
        let text = text.into();
        locate(&text, anchors)?;
        Ok(Self { text, anchors })
    }

    /// Register an entry in every section it is missing from
    ///
    /// Each section is checked and patched independently: a document that was
    /// hand-edited into a partial state (entry present in one section only)
    /// is completed rather than skipped. Returns whether anything changed.
    pub fn upsert(&mut self, id: &QuizId) -> Result<bool, RegistryError> {
        let sections = locate(&self.text, self.anchors)?;
        let binding = id.binding_name();

        debug!(%id, %binding, "RegistryDocument::upsert: called");

        // Collect missing insertions first, then apply back-to-front so the
        // located offsets stay valid.
        let mut insertions: Vec<(usize, String)> = Vec::new();

        if !self.has_import(&sections, &binding) {
            insertions.push((
                self.import_insert_at(&sections),
                format!(
                    "import {{ {} as {} }} from '{}/{}';\n",
                    self.anchors.import_symbol, binding, self.anchors.module_dir, id
                ),
            ));
        }

        if !self.has_array_entry(&sections, &binding) {
            insertions.push((sections.array_close_line, format!("  {},\n", binding)));
        }

        if !self.has_case(&sections, id) {
            insertions.push((
                sections.fallback,
                format!(
                    "case '{}':\n        return import('{}/{}');\n      ",
                    id, self.anchors.module_dir, id
                ),
            ));
        }

        let changed = !insertions.is_empty();
        insertions.sort_by(|a, b| b.0.cmp(&a.0));
        for (pos, insertion) in insertions {
            self.text.insert_str(pos, &insertion);
        }

        debug!(%id, changed, "RegistryDocument::upsert: done");
        Ok(changed)
    }

    /// Check whether an entry is fully registered in all three sections
    pub fn contains(&self, id: &QuizId) -> Result<bool, RegistryError> {
        let sections = locate(&self.text, self.anchors)?;
        let binding = id.binding_name();
        Ok(self.has_import(&sections, &binding)
            && self.has_array_entry(&sections, &binding)
            && self.has_case(&sections, id))
    }

    /// Consume the document, yielding the (possibly updated) text
    pub fn render(self) -> String {
        self.text
    }

    fn has_import(&self, sections: &Sections, binding: &str) -> bool {
        let section = &self.text[sections.import_start..sections.import_end];
        section.contains(&format!("import {{ {} as {} }}", self.anchors.import_symbol, binding))
    }

    fn has_array_entry(&self, sections: &Sections, binding: &str) -> bool {
        let body = &self.text[sections.array_body_start..sections.array_close];
        body.lines().any(|line| line.trim().trim_end_matches(',') == binding)
    }

    fn has_case(&self, sections: &Sections, id: &QuizId) -> bool {
        let dispatch = &self.text[sections.array_close..];
        dispatch.contains(&format!("case '{}':", id))
    }

    /// Offset at which a new import line is inserted: after the last existing
    /// import line, or directly after the header line when none exist yet
    fn import_insert_at(&self, sections: &Sections) -> usize {
        let section = &self.text[sections.import_start..sections.import_end];
        let mut pos = sections.import_start;
        let mut insert_at = None;
        for line in section.split_inclusive('\n') {
            pos += line.len();
            if line.starts_with("import ") {
                insert_at = Some(pos);
            }
        }
        insert_at.unwrap_or_else(|| {
            // End of the header line itself
            let header_end = self.text[sections.import_start..sections.import_end]
                .find('\n')
                .map(|i| sections.import_start + i + 1)
                .unwrap_or(sections.import_end);
            header_end
        })
    }
}
