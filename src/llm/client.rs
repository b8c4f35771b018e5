//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{GenerationRequest, LlmError, StreamChunk};

/// Stateless generation provider client - each call is independent
///
/// This is the core abstraction for the generation provider. It is treated
/// as an opaque, unreliable, possibly slow or truncating black box: the
/// caller owns retry policy and decides what to do with partial output.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single generation request, blocking until the full response
    async fn complete(&self, request: GenerationRequest) -> Result<String, LlmError>;

    /// Streaming generation for live progress reporting
    ///
    /// Sends [`StreamChunk::TextDelta`] fragments to the channel as they
    /// arrive and [`StreamChunk::Done`] on normal completion. On failure a
    /// [`StreamChunk::Error`] is sent, no `Done` follows, and the error is
    /// returned; accumulated text must then be discarded by the caller.
    async fn stream(&self, request: GenerationRequest, chunk_tx: mpsc::Sender<StreamChunk>) -> Result<(), LlmError>;
}
