//! Fixed-size sliding-window chunking.
//!
//! Windows may cross sentence and word boundaries; no semantic splitting is
//! performed. That keeps chunk boundaries deterministic and the chunker
//! allocation-light, at the cost of occasionally splitting mid-sentence.

use crate::error::{RagError, Result};

/// A text window produced by [`chunk`], with its character offsets in the
/// source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    /// The window text.
    pub text: String,
    /// Start offset in characters (inclusive).
    pub start: usize,
    /// End offset in characters (exclusive).
    pub end: usize,
}

/// Split `text` into overlapping windows of `size` characters.
///
/// The window advances by `size - overlap` characters each step. The final
/// window is truncated to the remainder of the text; once a window's end
/// reaches the end of the text no further windows are emitted, so for a
/// text of `L > overlap` characters the chunk count is
/// `ceil((L - overlap) / (size - overlap))`.
///
/// Offsets are measured in characters, and windows are cut on character
/// boundaries, so multi-byte input is safe.
///
/// # Errors
///
/// Returns [`RagError::InvalidChunkParameters`] unless `size > 0` and
/// `overlap < size`.
///
/// # Edge cases
///
/// Empty text yields an empty `Vec`, not an error. Text shorter than
/// `size` yields exactly one chunk covering the whole text.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<ChunkSpan>> {
    if size == 0 || overlap >= size {
        return Err(RagError::InvalidChunkParameters { size, overlap });
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every character boundary, plus the end of the text,
    // so char-offset windows can slice without re-scanning.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let total_chars = bounds.len() - 1;

    let step = size - overlap;
    let mut spans = Vec::with_capacity(total_chars.div_ceil(step));
    let mut start = 0;
    loop {
        let end = (start + size).min(total_chars);
        spans.push(ChunkSpan {
            text: text[bounds[start]..bounds[end]].to_string(),
            start,
            end,
        });
        if end == total_chars {
            break;
        }
        start += step;
    }

    Ok(spans)
}
