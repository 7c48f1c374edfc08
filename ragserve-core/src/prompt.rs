//! Grounded-generation prompt assembly.
//!
//! The prompt is a fixed system instruction, an enumerated context block
//! (one entry per retrieved chunk, descending score, tagged with its
//! source), and the user question. When the assembled context would exceed
//! the prompt budget, the lowest-scoring chunks are dropped first — the
//! included set is always a prefix of the score-ordered retrieval.

use crate::document::RetrievedChunk;

/// The fixed system instruction prefacing every generation prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Answer the user's question \
    using ONLY the provided context. If the answer is not in the context, say so.";

/// Context block used when no retrieved chunk is available (empty
/// collection, unavailable index, or a budget too small for any chunk).
pub const NO_CONTEXT_NOTICE: &str = "No supporting context is available. Tell the user that the \
    indexed documents contain nothing relevant to this question.";

const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// An assembled prompt plus the chunks whose text it actually contains.
///
/// `sources` are exactly the chunks rendered into `prompt` — the query
/// pipeline returns them verbatim so the caller never sees a source that
/// was not shown to the model.
#[derive(Debug, Clone)]
pub struct PromptBundle {
    /// The full prompt string for the generator.
    pub prompt: String,
    /// The included chunks, in descending score order.
    pub sources: Vec<RetrievedChunk>,
}

/// Assemble the generation prompt from a retrieval result.
///
/// `retrieved` is re-sorted by descending score defensively; chunks are
/// included greedily from the top until adding one would push the prompt
/// past `max_prompt_chars` (measured in characters), at which point that
/// chunk and every lower-scoring one are dropped.
pub fn build_prompt(
    query: &str,
    mut retrieved: Vec<RetrievedChunk>,
    max_prompt_chars: usize,
) -> PromptBundle {
    retrieved
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let frame_chars = SYSTEM_INSTRUCTION.chars().count()
        + "\n\nContext:\n".chars().count()
        + "\n\nQuestion: ".chars().count()
        + query.chars().count();

    let mut entries: Vec<String> = Vec::new();
    let mut sources: Vec<RetrievedChunk> = Vec::new();
    let mut used = frame_chars;

    for chunk in retrieved {
        let entry = format!(
            "[{}] ({}, chunk {}, score {:.4})\n{}",
            entries.len() + 1,
            chunk.source,
            chunk.chunk_index,
            chunk.score,
            chunk.text
        );
        let cost = entry.chars().count() + ENTRY_SEPARATOR.chars().count();
        if used + cost > max_prompt_chars {
            break;
        }
        used += cost;
        entries.push(entry);
        sources.push(chunk);
    }

    let context =
        if entries.is_empty() { NO_CONTEXT_NOTICE.to_string() } else { entries.join(ENTRY_SEPARATOR) };

    let prompt = format!("{SYSTEM_INSTRUCTION}\n\nContext:\n{context}\n\nQuestion: {query}");
    PromptBundle { prompt, sources }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(score: f32, text: &str, index: usize) -> RetrievedChunk {
        RetrievedChunk {
            score,
            text: text.to_string(),
            source: "manual.txt".to_string(),
            chunk_index: index,
            document_id: "doc-1".to_string(),
        }
    }

    #[test]
    fn includes_all_chunks_within_budget() {
        let retrieved = vec![chunk(0.9, "alpha", 0), chunk(0.8, "beta", 1)];
        let bundle = build_prompt("what is alpha?", retrieved, 10_000);
        assert_eq!(bundle.sources.len(), 2);
        assert!(bundle.prompt.contains("alpha"));
        assert!(bundle.prompt.contains("beta"));
        assert!(bundle.prompt.contains("what is alpha?"));
        assert!(bundle.prompt.starts_with(SYSTEM_INSTRUCTION));
    }

    #[test]
    fn sorts_context_by_descending_score() {
        let retrieved = vec![chunk(0.2, "low", 2), chunk(0.9, "high", 0), chunk(0.5, "mid", 1)];
        let bundle = build_prompt("q", retrieved, 10_000);
        let scores: Vec<f32> = bundle.sources.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.2]);
        let high_pos = bundle.prompt.find("high").unwrap();
        let low_pos = bundle.prompt.find("low").unwrap();
        assert!(high_pos < low_pos);
    }

    #[test]
    fn truncation_drops_lowest_scoring_first() {
        let retrieved = vec![
            chunk(0.9, &"a".repeat(100), 0),
            chunk(0.8, &"b".repeat(100), 1),
            chunk(0.7, &"c".repeat(100), 2),
        ];
        // Budget fits the frame plus roughly two entries.
        let bundle = build_prompt("q", retrieved, 500);
        assert_eq!(bundle.sources.len(), 2);
        assert!(bundle.prompt.contains(&"a".repeat(100)));
        assert!(bundle.prompt.contains(&"b".repeat(100)));
        assert!(!bundle.prompt.contains(&"c".repeat(100)));
    }

    #[test]
    fn sources_are_exactly_the_rendered_chunks() {
        let retrieved =
            vec![chunk(0.9, "kept", 0), chunk(0.1, &"dropped".repeat(200), 1)];
        let bundle = build_prompt("q", retrieved, 300);
        assert_eq!(bundle.sources.len(), 1);
        assert_eq!(bundle.sources[0].text, "kept");
        assert!(!bundle.prompt.contains("dropped"));
    }

    #[test]
    fn empty_retrieval_states_missing_grounding() {
        let bundle = build_prompt("anything indexed?", Vec::new(), 10_000);
        assert!(bundle.sources.is_empty());
        assert!(bundle.prompt.contains(NO_CONTEXT_NOTICE));
        assert!(bundle.prompt.contains("anything indexed?"));
    }

    #[test]
    fn budget_too_small_for_any_chunk_falls_back_to_notice() {
        let retrieved = vec![chunk(0.9, &"x".repeat(500), 0)];
        let bundle = build_prompt("q", retrieved, 250);
        assert!(bundle.sources.is_empty());
        assert!(bundle.prompt.contains(NO_CONTEXT_NOTICE));
    }
}
