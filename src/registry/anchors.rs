//! Anchor literals for the supported registry flavors
//!
//! A registry document is located by literal string search over these
//! anchors. Any tool that produces a registry file must preserve them
//! verbatim for the synchronizer to remain compatible.

/// The literal strings that delimit the three sections of one registry flavor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAnchors {
    /// Comment that opens the import section
    pub import_header: &'static str,
    /// Symbol re-exported from each module and aliased per entry
    pub import_symbol: &'static str,
    /// Opening of the collection array
    pub array_open: &'static str,
    /// Closing bracket of the collection array
    pub array_close: &'static str,
    /// Terminal fallback branch of the dispatch switch; new branches are
    /// inserted immediately before it
    pub fallback_branch: &'static str,
    /// Directory the per-entry modules live in, relative to the registry
    pub module_dir: &'static str,
}

/// Anchors for the quiz registry (`quizRegistry.js`)
pub const QUIZ_REGISTRY: RegistryAnchors = RegistryAnchors {
    import_header: "// Import quiz metadata",
    import_symbol: "quizMetadata",
    array_open: "export const quizRegistry = [",
    array_close: "];",
    fallback_branch: "default:",
    module_dir: "./quizzes",
};

/// Anchors for the collection registry (`collectionRegistry.js`)
pub const COLLECTION_REGISTRY: RegistryAnchors = RegistryAnchors {
    import_header: "// Import collection metadata",
    import_symbol: "collectionMetadata",
    array_open: "export const collectionRegistry = [",
    array_close: "];",
    fallback_branch: "default:",
    module_dir: "./collections",
};
