//! quizgen - Prediction quiz generation from research papers
//!
//! quizgen turns research papers into "predict first" quizzes: multiple-choice
//! questions about a paper's findings, answered before reading the paper. It
//! sends a paper PDF to an LLM provider, tracks question progress as the
//! response streams in, and wires the generated JavaScript module into the
//! web app's registries.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`progress`] - Streaming question tracking
//! - [`registry`] - Idempotent registry file synchronization
//! - [`pipeline`] - Quiz and collection generation flows
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod artifact;
pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod registry;
pub mod scrape;
