//! Assembles ranked chunks into a bounded context block for downstream
//! prompt construction. Budgets are enforced in characters and all
//! truncation is UTF-8 safe.

use crate::{config::Config, retrieval::ScoredChunk};
use std::sync::Arc;

/// Longest content slice taken from a single chunk.
const MAX_CHUNK_CHARS: usize = 2_000;
/// A partial final block is only worth emitting above this size.
const MIN_PARTIAL_CHARS: usize = 200;

pub struct ContextAssembler {
    config: Arc<Config>,
}

impl ContextAssembler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Builds `[chunkId=<id> fused=<score>]` blocks joined by blank lines,
    /// bounded by `max_context_chunks` and `max_context_chars`. Chunks with
    /// blank content are skipped. The final block may be truncated to fit
    /// the budget; a remainder under 200 chars is dropped instead.
    pub fn assemble(&self, chunks: &[ScoredChunk]) -> String {
        let max_chunks = self.config.max_context_chunks;
        let max_chars = self.config.max_context_chars;

        let mut parts: Vec<String> = Vec::new();
        let mut used = 0usize;

        for chunk in chunks {
            if parts.len() >= max_chunks {
                break;
            }

            let content = chunk.content.trim();
            if content.is_empty() {
                continue;
            }
            let trimmed = truncate_chars(content, MAX_CHUNK_CHARS);

            let block = format!(
                "[chunkId={} fused={:.4}]\n{}",
                chunk.id, chunk.fused_score, trimmed
            );
            let block_chars = block.chars().count();

            if used + block_chars + 2 > max_chars {
                let remaining = max_chars.saturating_sub(used + 2);
                if remaining > MIN_PARTIAL_CHARS {
                    parts.push(truncate_chars(&block, remaining).to_string());
                }
                break;
            }

            used += block_chars + 2;
            parts.push(block);
        }

        parts.join("\n\n")
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
