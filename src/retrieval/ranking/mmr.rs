//! Maximal Marginal Relevance diversification.
//!
//! Operates on a capped window of the fused ranking so the O(window^2)
//! greedy loop stays tractable however many candidates fusion produced.
//! Embeddings are fetched once, batched, for exactly the window's ids.
//! Chunks with no stored embedding are ineligible and cannot be selected.

use crate::embeddings::EmbeddingLookup;
use crate::retrieval::ScoredChunk;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

/// Bounds the candidate window considered for diversification.
pub fn candidate_cap(ranked_len: usize, k: usize) -> usize {
    ranked_len.min((4 * k).max(20))
}

/// Cosine similarity; 0.0 on dimension mismatch or zero magnitude.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

/// Selects a diverse subset of the fused ranking, fetching embeddings on
/// demand for the capped window only. Output length is
/// `min(k, eligible candidates)`, possibly zero when nothing in the window
/// has a stored embedding.
pub async fn mmr_diversify(
    store: &dyn EmbeddingLookup,
    ranked: Vec<ScoredChunk>,
    k: usize,
    lambda: f32,
) -> Result<Vec<ScoredChunk>> {
    if ranked.is_empty() {
        return Ok(ranked);
    }

    let cap = candidate_cap(ranked.len(), k);
    let candidates = &ranked[..cap];
    let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
    let embeddings = store.fetch(&ids).await?;

    Ok(select_diverse(candidates, &embeddings, k, lambda))
}

/// Greedy MMR over a pre-sorted (fused-descending) candidate window.
///
/// `mmr = lambda * fused - (1 - lambda) * max_sim_to_selected`; the strict
/// maximum wins each round, so ties fall to the earlier (higher fused)
/// candidate. Selection order only builds the set; the returned subset is
/// re-sorted by fused score for presentation.
pub(crate) fn select_diverse(
    candidates: &[ScoredChunk],
    embeddings: &HashMap<String, Vec<f32>>,
    k: usize,
    lambda: f32,
) -> Vec<ScoredChunk> {
    let mut selected: Vec<&ScoredChunk> = Vec::with_capacity(k);
    let mut selected_ids: HashSet<&str> = HashSet::new();

    // Seed with the best-fused candidate that has an embedding.
    for c in candidates {
        if embeddings.contains_key(&c.id) {
            selected.push(c);
            selected_ids.insert(c.id.as_str());
            break;
        }
    }
    if selected.is_empty() {
        return Vec::new();
    }

    let eligible = candidates
        .iter()
        .filter(|c| embeddings.contains_key(&c.id))
        .count();
    let target = k.min(eligible);

    while selected.len() < target {
        let mut best: Option<&ScoredChunk> = None;
        let mut best_score = f32::NEG_INFINITY;

        for c in candidates {
            if selected_ids.contains(c.id.as_str()) {
                continue;
            }
            let Some(ce) = embeddings.get(&c.id) else {
                continue;
            };

            let mut max_sim_to_selected = 0.0f32;
            for s in &selected {
                if let Some(se) = embeddings.get(&s.id) {
                    max_sim_to_selected = max_sim_to_selected.max(cosine(ce, se));
                }
            }

            let mmr = lambda * c.fused_score - (1.0 - lambda) * max_sim_to_selected;
            if mmr > best_score {
                best_score = mmr;
                best = Some(c);
            }
        }

        let Some(best) = best else {
            break;
        };
        selected_ids.insert(best.id.as_str());
        selected.push(best);
    }

    let mut out: Vec<ScoredChunk> = selected.into_iter().cloned().collect();
    out.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
    out
}
