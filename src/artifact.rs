//! Generated quiz module handling and the on-disk data store
//!
//! The provider returns a JavaScript module inside a fenced code block; this
//! module pulls the source out, probes it for a title, and owns all file I/O
//! under the app data tree (quizzes/, collections/, and the two registries).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use eyre::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::domain::{CollectionMeta, QuizId};
use crate::registry::{self, RegistryAnchors, COLLECTION_REGISTRY, QUIZ_REGISTRY};

static JS_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```javascript\s*(.*?)\s*```").expect("fence pattern is valid"));

static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").expect("fence pattern is valid"));

static QUIZ_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"title:\s*["']([^"']+)["']"#).expect("title pattern is valid"));

/// Extract the JavaScript module source from a provider response
///
/// Looks for a ```javascript fence first, then any fence, then falls back
/// to the whole response.
pub fn extract_module_source(response: &str) -> String {
    if let Some(cap) = JS_FENCE.captures(response) {
        debug!("extract_module_source: javascript fence");
        return cap[1].trim().to_string();
    }
    if let Some(cap) = ANY_FENCE.captures(response) {
        debug!("extract_module_source: unlabeled fence");
        return cap[1].trim().to_string();
    }
    debug!("extract_module_source: no fence, using whole response");
    response.trim().to_string()
}

/// Probe a quiz module's metadata for its title
pub fn extract_quiz_title(source: &str) -> Option<String> {
    QUIZ_TITLE.captures(source).map(|cap| cap[1].to_string())
}

/// The app data tree: quiz modules, collection modules, and registries
///
/// All pipeline disk I/O happens here. Registry updates are read-modify-write
/// on a single file, applied one at a time; the registry file is only written
/// after [`registry::synchronize`] succeeds, so a malformed document is left
/// exactly as it was found.
pub struct QuizStore {
    data_dir: PathBuf,
}

impl QuizStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn quiz_path(&self, id: &QuizId) -> PathBuf {
        self.data_dir.join("quizzes").join(format!("{}.js", id))
    }

    pub fn collection_path(&self, id: &QuizId) -> PathBuf {
        self.data_dir.join("collections").join(format!("{}.js", id))
    }

    pub fn quiz_registry_path(&self) -> PathBuf {
        self.data_dir.join("quizRegistry.js")
    }

    pub fn collection_registry_path(&self) -> PathBuf {
        self.data_dir.join("collectionRegistry.js")
    }

    /// Write a generated quiz module
    pub fn write_quiz(&self, id: &QuizId, source: &str) -> Result<PathBuf> {
        let path = self.quiz_path(id);
        self.write_module(&path, source)?;
        info!(%id, path = %path.display(), "write_quiz: saved");
        Ok(path)
    }

    /// Render and write a collection module
    pub fn write_collection(&self, meta: &CollectionMeta) -> Result<PathBuf> {
        let path = self.collection_path(&meta.id);
        self.write_module(&path, &render_collection_module(meta))?;
        info!(id = %meta.id, path = %path.display(), "write_collection: saved");
        Ok(path)
    }

    /// Read the title back out of a previously written quiz module
    pub fn quiz_title(&self, id: &QuizId) -> Option<String> {
        let source = fs::read_to_string(self.quiz_path(id)).ok()?;
        extract_quiz_title(&source)
    }

    /// Register a quiz in the quiz registry
    pub fn register_quiz(&self, id: &QuizId) -> Result<()> {
        self.register(&self.quiz_registry_path(), id, &QUIZ_REGISTRY)
    }

    /// Register a collection in the collection registry
    pub fn register_collection(&self, id: &QuizId) -> Result<()> {
        self.register(&self.collection_registry_path(), id, &COLLECTION_REGISTRY)
    }

    fn register(&self, path: &Path, id: &QuizId, anchors: &RegistryAnchors) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file {}", path.display()))?;

        let updated = registry::synchronize(&text, id, anchors)
            .with_context(|| format!("Failed to synchronize registry {}", path.display()))?;

        if updated == text {
            debug!(%id, path = %path.display(), "register: already registered");
            return Ok(());
        }

        fs::write(path, updated).with_context(|| format!("Failed to write registry file {}", path.display()))?;
        info!(%id, path = %path.display(), "register: registry updated");
        Ok(())
    }

    fn write_module(&self, path: &Path, source: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut contents = source.to_string();
        if !contents.ends_with('\n') {
            contents.push('\n');
        }
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Render a collection module in the registry's source conventions
fn render_collection_module(meta: &CollectionMeta) -> String {
    let quiz_ids = meta
        .quiz_ids
        .iter()
        .map(|id| format!("\"{}\"", id))
        .collect::<Vec<_>>()
        .join(",\n    ");

    format!(
        "// Collection: {title}\n\
         // Auto-generated by quizgen\n\
         \n\
         export const collectionMetadata = {{\n\
         \x20 id: \"{id}\",\n\
         \x20 title: \"{title}\",\n\
         \x20 description: \"{description}\",\n\
         \x20 sourceUrl: \"{source_url}\",\n\
         \x20 quizIds: [\n\
         \x20   {quiz_ids}\n\
         \x20 ]\n\
         }};\n",
        id = meta.id,
        title = meta.title,
        description = meta.description,
        source_url = meta.source_url,
        quiz_ids = quiz_ids,
    )
}
