//! Quiz and collection generation pipelines
//!
//! Wires the provider stream through the question tracker, persists the
//! generated modules, and keeps the registries in sync. Registry updates are
//! applied one artifact at a time, each reading the text the previous update
//! wrote, so the three-way registry invariant survives batch runs.

use std::sync::Arc;

use colored::Colorize;
use eyre::{bail, eyre, Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::artifact::{extract_module_source, extract_quiz_title, QuizStore};
use crate::config::Config;
use crate::domain::{CollectionMeta, PaperRef, QuizId, QuizRef};
use crate::llm::{GenerationRequest, LlmClient, LlmError, StreamChunk};
use crate::progress::QuestionTracker;
use crate::prompts;
use crate::scrape::{self, Fetcher};

/// Result of generating one quiz
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub id: QuizId,
    pub title: String,
}

/// Result of generating a collection
#[derive(Debug)]
pub struct CollectionSummary {
    pub title: String,
    pub papers_found: usize,
    pub generated: Vec<QuizRef>,
    pub failed: Vec<String>,
}

/// Generate one quiz from a paper PDF and register it
///
/// With `streaming`, fragments are consumed as they arrive and a running
/// distinct-question count is printed as each new question appears. A stream
/// that fails mid-flight discards all accumulated text; nothing is written.
pub async fn generate_quiz(
    config: &Config,
    llm: &Arc<dyn LlmClient>,
    store: &QuizStore,
    pdf_url: &str,
    quiz_id: &QuizId,
    streaming: bool,
) -> Result<QuizOutcome> {
    info!(%quiz_id, %pdf_url, streaming, "generate_quiz: called");
    println!("Sending PDF to {}: {}", config.llm.provider, pdf_url);

    let mut request = GenerationRequest::for_document(prompts::QUIZ_SYSTEM, prompts::quiz_prompt(quiz_id)?, pdf_url);
    request.max_tokens = config.llm.max_tokens;
    request.temperature = config.llm.temperature;

    let response = if streaming {
        stream_response(llm, request).await?
    } else {
        llm.complete(request).await.context("Quiz generation failed")?
    };

    let source = extract_module_source(&response);
    let path = store.write_quiz(quiz_id, &source)?;
    println!("{} Quiz file saved to: {}", "✅".green(), path.display());

    store.register_quiz(quiz_id)?;
    println!("{} Quiz registry updated to include '{}'", "✅".green(), quiz_id);

    let title = extract_quiz_title(&source).unwrap_or_else(|| format!("Quiz for {}", quiz_id));
    Ok(QuizOutcome {
        id: quiz_id.clone(),
        title,
    })
}

/// Drive a streaming generation, reporting question progress as it arrives
async fn stream_response(llm: &Arc<dyn LlmClient>, request: GenerationRequest) -> Result<String> {
    let (chunk_tx, mut chunk_rx) = mpsc::channel(64);

    let client = Arc::clone(llm);
    let worker = tokio::spawn(async move { client.stream(request, chunk_tx).await });

    let mut tracker = QuestionTracker::new();
    let mut completed = false;

    while let Some(chunk) = chunk_rx.recv().await {
        match chunk {
            StreamChunk::TextDelta(fragment) => {
                for count in tracker.push(&fragment) {
                    println!("  {}", format!("Questions so far: {}", count).cyan());
                }
            }
            StreamChunk::Done => {
                completed = true;
            }
            StreamChunk::Error(_) => {
                // The worker returns the error below; partial text is dropped
            }
        }
    }

    worker
        .await
        .map_err(|e| eyre!("Stream task panicked: {}", e))?
        .context("Quiz generation stream failed")?;

    if !completed {
        // The channel closed without a Done; treat as an aborted stream
        return Err(LlmError::StreamAborted("stream ended before completion signal".to_string()).into());
    }

    info!(questions = tracker.distinct_count(), "stream_response: complete");
    Ok(tracker.into_text())
}

/// Fetch the source page and extract its papers and title
pub async fn plan_collection(fetcher: &Fetcher, source_url: &str) -> Result<(String, Vec<PaperRef>)> {
    let html = fetcher
        .fetch_html(source_url)
        .await
        .context("Failed to fetch source page")?;

    let title = scrape::extract_page_title(&html).unwrap_or_else(|| "Untitled Collection".to_string());
    let papers = scrape::extract_arxiv_papers(&html);
    Ok((title, papers))
}

/// Generate a collection of quizzes from a source page
///
/// One quiz per extracted paper, generated sequentially. A failed paper is
/// reported and skipped; the collection is written for whatever succeeded.
#[allow(clippy::too_many_arguments)]
pub async fn generate_collection(
    config: &Config,
    llm: &Arc<dyn LlmClient>,
    store: &QuizStore,
    fetcher: &Fetcher,
    source_url: &str,
    collection_id: &QuizId,
    collection_title: Option<String>,
    dry_run: bool,
) -> Result<CollectionSummary> {
    println!("Fetching source page: {}", source_url);
    let (page_title, papers) = plan_collection(fetcher, source_url).await?;
    let title = collection_title.unwrap_or(page_title);

    if papers.is_empty() {
        bail!("No arxiv papers found in the post");
    }

    println!("\nFound {} arxiv papers:", papers.len());
    for (i, paper) in papers.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, paper.title, paper.arxiv_id);
    }

    if dry_run {
        println!("\n{}", "Dry run complete. No quizzes generated.".yellow());
        return Ok(CollectionSummary {
            title,
            papers_found: papers.len(),
            generated: Vec::new(),
            failed: Vec::new(),
        });
    }

    let mut generated = Vec::new();
    let mut failed = Vec::new();

    for paper in &papers {
        let quiz_id = paper.quiz_id(collection_id)?;
        println!("\n{}", "=".repeat(60));
        println!("Generating quiz for: {}", paper.title.bold());
        println!("Quiz ID: {}", quiz_id);
        println!("{}", "=".repeat(60));

        match generate_quiz(config, llm, store, &paper.pdf_url, &quiz_id, true).await {
            Ok(outcome) => {
                // Prefer the title the model put in the module
                let title = store.quiz_title(&outcome.id).unwrap_or_else(|| paper.title.clone());
                generated.push(QuizRef { id: outcome.id, title });
            }
            Err(e) => {
                warn!(%quiz_id, error = %e, "generate_collection: paper failed");
                println!("{} Failed to generate quiz for {}: {}", "⚠️".yellow(), paper.title, e);
                failed.push(paper.title.clone());
            }
        }
    }

    print_summary(&generated, &failed, papers.len());

    if generated.is_empty() {
        bail!("No quizzes were generated. Collection not created.");
    }

    let meta = CollectionMeta {
        id: collection_id.clone(),
        title: title.clone(),
        description: format!("Quizzes from: {}", title),
        source_url: source_url.to_string(),
        quiz_ids: generated.iter().map(|q| q.id.clone()).collect(),
    };
    let path = store.write_collection(&meta)?;
    println!("\nCollection file saved to: {}", path.display());

    store.register_collection(collection_id)?;
    println!("{} Collection registry updated to include '{}'", "✅".green(), collection_id);

    Ok(CollectionSummary {
        title,
        papers_found: papers.len(),
        generated,
        failed,
    })
}

fn print_summary(generated: &[QuizRef], failed: &[String], total: usize) {
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Successfully generated: {}/{} quizzes", generated.len(), total);

    if !generated.is_empty() {
        println!("\nGenerated quizzes:");
        for quiz in generated {
            println!("  - {} ({})", quiz.title, quiz.id);
        }
    }

    if !failed.is_empty() {
        println!("\n{}", "Failed papers:".red());
        for title in failed {
            println!("  - {}", title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use std::fs;
    use tempfile::TempDir;

    const REGISTRY: &str = "\
// Import quiz metadata from each quiz file

export const quizRegistry = [
];

export const loadQuizData = async (quizId) => {
  switch (quizId) {
    default:
      throw new Error('not found');
  }
};
";

    fn store_with_registry(dir: &TempDir) -> QuizStore {
        let store = QuizStore::new(dir.path());
        fs::write(store.quiz_registry_path(), REGISTRY).unwrap();
        store
    }

    #[tokio::test]
    async fn test_generate_quiz_streaming() {
        let dir = TempDir::new().unwrap();
        let store = store_with_registry(&dir);
        let config = Config::default();

        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![
            "```javascript\nexport const quizMetadata = {\n  id: \"test-quiz\",\n  title: \"Test ",
            "Quiz\",\n};\nexport const questions = [\n  { id: 1 },\n  { id: 2 },\n];\n```",
        ]));

        let quiz_id = QuizId::new("test-quiz").unwrap();
        let outcome = generate_quiz(&config, &llm, &store, "https://arxiv.org/pdf/1.1.pdf", &quiz_id, true)
            .await
            .unwrap();

        assert_eq!(outcome.title, "Test Quiz");
        let written = fs::read_to_string(store.quiz_path(&quiz_id)).unwrap();
        assert!(written.starts_with("export const quizMetadata"));
        assert!(!written.contains("```"));

        let registry = fs::read_to_string(store.quiz_registry_path()).unwrap();
        assert!(registry.contains("import { quizMetadata as testquiz } from './quizzes/test-quiz';"));
        assert!(registry.contains("case 'test-quiz':"));
    }

    #[tokio::test]
    async fn test_generate_quiz_aborted_stream_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_with_registry(&dir);
        let config = Config::default();

        let llm: Arc<dyn LlmClient> =
            Arc::new(MockLlmClient::aborting(vec!["partial { id: 1"], "connection reset"));

        let quiz_id = QuizId::new("doomed-quiz").unwrap();
        let result = generate_quiz(&config, &llm, &store, "https://arxiv.org/pdf/1.1.pdf", &quiz_id, true).await;

        assert!(result.is_err());
        assert!(!store.quiz_path(&quiz_id).exists());
        // Registry untouched
        assert_eq!(fs::read_to_string(store.quiz_registry_path()).unwrap(), REGISTRY);
    }

    #[tokio::test]
    async fn test_generate_quiz_non_streaming() {
        let dir = TempDir::new().unwrap();
        let store = store_with_registry(&dir);
        let config = Config::default();

        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![
            "export const quizMetadata = {\n  id: \"plain-quiz\",\n  title: \"Plain\",\n};",
        ]));

        let quiz_id = QuizId::new("plain-quiz").unwrap();
        let outcome = generate_quiz(&config, &llm, &store, "https://arxiv.org/pdf/1.1.pdf", &quiz_id, false)
            .await
            .unwrap();

        assert_eq!(outcome.title, "Plain");
        assert!(store.quiz_path(&quiz_id).exists());
    }
}
