//! Integration tests for the streaming generation pipeline
//!
//! Drives the full generate flow end to end with a scripted client: stream
//! consumption, question tracking, module extraction, file writes, and
//! registry updates.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc;

use quizgen::artifact::QuizStore;
use quizgen::config::Config;
use quizgen::domain::QuizId;
use quizgen::llm::{GenerationRequest, LlmClient, LlmError, StreamChunk};
use quizgen::pipeline;
use quizgen::progress::QuestionTracker;

/// Replays scripted fragments as a stream, optionally failing at the end
struct ScriptedClient {
    fragments: Vec<&'static str>,
    abort_with: Option<&'static str>,
}

impl ScriptedClient {
    fn new(fragments: Vec<&'static str>) -> Self {
        Self {
            fragments,
            abort_with: None,
        }
    }

    fn aborting(fragments: Vec<&'static str>, reason: &'static str) -> Self {
        Self {
            fragments,
            abort_with: Some(reason),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _request: GenerationRequest) -> Result<String, LlmError> {
        if let Some(reason) = self.abort_with {
            return Err(LlmError::StreamAborted(reason.to_string()));
        }
        Ok(self.fragments.concat())
    }

    async fn stream(&self, _request: GenerationRequest, chunk_tx: mpsc::Sender<StreamChunk>) -> Result<(), LlmError> {
        for fragment in &self.fragments {
            let _ = chunk_tx.send(StreamChunk::TextDelta(fragment.to_string())).await;
        }
        if let Some(reason) = self.abort_with {
            let _ = chunk_tx.send(StreamChunk::Error(reason.to_string())).await;
            return Err(LlmError::StreamAborted(reason.to_string()));
        }
        let _ = chunk_tx.send(StreamChunk::Done).await;
        Ok(())
    }
}

const QUIZ_REGISTRY_DOC: &str = "\
// Import quiz metadata from each quiz file

export const quizRegistry = [
];

export const loadQuizData = async (quizId) => {
  switch (quizId) {
    default:
      throw new Error(`Unknown quiz: ${quizId}`);
  }
};
";

fn store_with_registry(dir: &TempDir) -> QuizStore {
    let store = QuizStore::new(dir.path());
    fs::write(store.quiz_registry_path(), QUIZ_REGISTRY_DOC).unwrap();
    store
}

// The module arrives split mid-marker and with a repeated question id; the
// written file must be the exact concatenation minus the fence.
const FRAGMENTS: &[&str] = &[
    "```javascript\nexport const quizMetadata = {\n  id: \"split-stream\",\n  title: \"Split Stream\",\n};\n",
    "export const questions = [\n  { i",
    "d: 1, question: \"Q1?\" },\n  { id: 2",
    ", question: \"Q2?\" },\n  { id: 1, question: \"dup\" },\n];\n```",
];

#[tokio::test]
async fn generate_writes_module_and_registers_it() {
    let dir = TempDir::new().unwrap();
    let store = store_with_registry(&dir);
    let config = Config::default();

    let llm: Arc<dyn LlmClient> = Arc::new(ScriptedClient::new(FRAGMENTS.to_vec()));
    let quiz_id = QuizId::new("split-stream").unwrap();

    let outcome = pipeline::generate_quiz(&config, &llm, &store, "https://arxiv.org/pdf/2301.00001.pdf", &quiz_id, true)
        .await
        .unwrap();
    assert_eq!(outcome.title, "Split Stream");

    let written = fs::read_to_string(store.quiz_path(&quiz_id)).unwrap();
    assert!(written.starts_with("export const quizMetadata"));
    assert!(written.contains("{ id: 1, question: \"dup\" },"));
    assert!(!written.contains("```"));

    let registry = fs::read_to_string(store.quiz_registry_path()).unwrap();
    assert!(registry.contains("import { quizMetadata as splitstream } from './quizzes/split-stream';"));
    assert!(registry.contains("  splitstream,"));
    assert!(registry.contains("case 'split-stream':"));
}

#[tokio::test]
async fn aborted_stream_discards_everything() {
    let dir = TempDir::new().unwrap();
    let store = store_with_registry(&dir);
    let config = Config::default();

    let llm: Arc<dyn LlmClient> = Arc::new(ScriptedClient::aborting(
        vec!["export const quizMetadata = {\n  id: \"half\",\n"],
        "overloaded_error",
    ));
    let quiz_id = QuizId::new("half").unwrap();

    let err = pipeline::generate_quiz(&config, &llm, &store, "https://arxiv.org/pdf/2301.00001.pdf", &quiz_id, true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("stream"), "unexpected error: {err}");

    assert!(!store.quiz_path(&quiz_id).exists());
    assert_eq!(fs::read_to_string(store.quiz_registry_path()).unwrap(), QUIZ_REGISTRY_DOC);
}

#[test]
fn tracker_counts_distinct_questions_across_fragments() {
    let mut tracker = QuestionTracker::new();
    let mut events = Vec::new();
    for fragment in FRAGMENTS {
        events.extend(tracker.push(fragment));
    }

    // One event per first sighting, cumulative counts
    assert_eq!(events, vec![1, 2]);
    assert_eq!(tracker.distinct_count(), 2);
    assert_eq!(tracker.seen_in_order(), &[1, 2]);
    assert_eq!(tracker.into_text(), FRAGMENTS.concat());
}
