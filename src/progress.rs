//! Streaming question progress extraction
//!
//! Consumes provider text fragments as they arrive and reports how many
//! distinct questions have been observed so far, without waiting for the
//! stream to finish and without re-scanning the full accumulated text on
//! every fragment. Only a bounded trailing window of recent text is scanned;
//! the full text is accumulated separately for use after completion.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

/// Scan window is trimmed once it grows past this many characters
const WINDOW_MAX_CHARS: usize = 2_000;

/// Characters retained at the right edge after a trim
///
/// Must exceed [`MARKER_MAX_CHARS`]: the retained tail always holds any
/// marker still being assembled across fragments, so no marker can span past
/// what the window keeps. Values re-seen across trims are absorbed by the
/// session-global dedup set.
const WINDOW_KEEP_CHARS: usize = 1_000;

/// Upper bound on marker length in characters
///
/// Optional quote (1) + `id` (2) + optional quote (1) + colon (1) +
/// whitespace run (capped at 8 by the pattern) + u64 digits (at most 19).
/// A longer whitespace run is not a marker.
const MARKER_MAX_CHARS: usize = 32;

const _: () = assert!(MARKER_MAX_CHARS < WINDOW_KEEP_CHARS);

/// Incremental tracker for `id: N` question markers in streamed text
///
/// Feed fragments with [`push`](Self::push); each call returns one cumulative
/// distinct-question count per previously unseen marker value, in
/// first-occurrence order. After the stream ends, [`into_text`](Self::into_text)
/// yields the exact concatenation of everything pushed.
#[derive(Debug)]
pub struct QuestionTracker {
    /// Trailing window of recent text, bounded by `WINDOW_MAX_CHARS`
    window: String,
    /// Full accumulated response text
    text: String,
    /// Marker values seen over the lifetime of this tracker
    seen: HashSet<u64>,
    /// First-occurrence order of marker values
    order: Vec<u64>,
    marker: Regex,
}

impl QuestionTracker {
    pub fn new() -> Self {
        debug!("QuestionTracker::new: called");
        Self {
            window: String::new(),
            text: String::new(),
            seen: HashSet::new(),
            order: Vec::new(),
            // Optionally quoted literal `id`, colon, bounded whitespace run,
            // digits. Case-sensitive; leading zeros parse as decimal. The
            // whitespace quantifier is capped so the whole marker stays within
            // `MARKER_MAX_CHARS` and cannot straddle past a window trim.
            marker: Regex::new(r#"["']?id["']?:\s{0,8}(\d+)"#).expect("marker pattern is valid"),
        }
    }

    /// Consume one fragment, returning the cumulative distinct count for each
    /// newly observed marker value
    ///
    /// A value that already appeared earlier in the session (for example in a
    /// code sample and again in the payload) yields no further events. A
    /// marker split across two fragments is found once its tail arrives,
    /// because the window still holds the head.
    pub fn push(&mut self, fragment: &str) -> Vec<usize> {
        debug!(fragment_len = fragment.len(), "QuestionTracker::push: called");
        self.text.push_str(fragment);
        self.window.push_str(fragment);

        let mut events = Vec::new();
        for cap in self.marker.captures_iter(&self.window) {
            let Ok(value) = cap[1].parse::<u64>() else {
                continue;
            };
            if self.seen.insert(value) {
                self.order.push(value);
                events.push(self.seen.len());
            }
        }
        if !events.is_empty() {
            debug!(
                new_markers = events.len(),
                distinct = self.seen.len(),
                "QuestionTracker::push: new markers observed"
            );
        }

        self.trim_window();
        events
    }

    /// Number of distinct marker values observed so far
    pub fn distinct_count(&self) -> usize {
        self.seen.len()
    }

    /// Marker values in the order they were first observed
    pub fn seen_in_order(&self) -> &[u64] {
        &self.order
    }

    /// The full accumulated text, consumed on stream completion
    pub fn into_text(self) -> String {
        debug!(text_len = self.text.len(), "QuestionTracker::into_text: called");
        self.text
    }

    /// Trim the window to its trailing `WINDOW_KEEP_CHARS` characters once it
    /// exceeds `WINDOW_MAX_CHARS`, preserving the right edge
    fn trim_window(&mut self) {
        let len = self.window.chars().count();
        if len <= WINDOW_MAX_CHARS {
            return;
        }
        let cut: usize = self
            .window
            .char_indices()
            .nth(len - WINDOW_KEEP_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(0);
        debug!(
            window_chars = len,
            keep = WINDOW_KEEP_CHARS,
            "QuestionTracker::trim_window: trimming"
        );
        self.window.drain(..cut);
    }
}

impl Default for QuestionTracker {
    fn default() -> Self {
        Self::new()
    }
}
