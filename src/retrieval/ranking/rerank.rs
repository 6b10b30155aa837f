//! Lexical-overlap rerank: a small, bounded bonus for literal query-term
//! presence, applied after diversification so it can only reorder the
//! diversified set, never change its membership.

use crate::retrieval::ScoredChunk;
use std::collections::HashSet;

const TERM_MIN_LEN: usize = 3;
const BONUS_PER_HIT: f32 = 0.02;
const BONUS_CAP: f32 = 0.10;

/// Adds `min(0.10, hits * 0.02)` to each chunk's fused score, where `hits`
/// counts distinct lowercased query terms of length >= 3 appearing as
/// substrings of the lowercased content, then stable-sorts descending.
pub fn lexical_rerank(chunks: Vec<ScoredChunk>, query: &str) -> Vec<ScoredChunk> {
    if chunks.is_empty() {
        return chunks;
    }

    let q = query.to_lowercase();
    let terms: HashSet<&str> = q
        .split_whitespace()
        .filter(|t| t.chars().count() >= TERM_MIN_LEN)
        .collect();

    let mut out: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|c| {
            let bonus = if terms.is_empty() {
                0.0
            } else {
                let content = c.content.to_lowercase();
                let hits = terms.iter().filter(|t| content.contains(**t)).count();
                (hits as f32 * BONUS_PER_HIT).min(BONUS_CAP)
            };
            ScoredChunk {
                fused_score: c.fused_score + bonus,
                ..c
            }
        })
        .collect();

    out.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
    out
}
