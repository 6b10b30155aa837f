//! Weighted score fusion over the identity-merged candidate set.
//!
//! Both score axes are min-max normalized per query before blending, so the
//! raw ranges of the two collaborators never have to agree. With `alpha` in
//! [0,1] the fused score is bounded to [0,1].

use crate::retrieval::ScoredChunk;

/// Min-max normalization with the degenerate-input fallbacks.
///
/// NaN and infinite inputs normalize to 0.0. When all observed values are
/// equal (`max <= min`), a positive value normalizes to 1.0 and anything
/// else to 0.0.
pub fn normalize(v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    if max <= min {
        return if v > 0.0 { 1.0 } else { 0.0 };
    }
    (v - min) / (max - min)
}

/// Recomputes `fused_score` for every chunk and sorts descending by it.
/// Ties keep encounter order. Degenerate inputs (empty set, all-equal
/// scores) are handled numerically, never as errors.
pub fn fuse_scores(chunks: Vec<ScoredChunk>, alpha: f32) -> Vec<ScoredChunk> {
    let mut v_min = f32::MAX;
    let mut v_max = f32::MIN;
    let mut b_min = f32::MAX;
    let mut b_max = f32::MIN;
    for c in &chunks {
        v_min = v_min.min(c.vector_score);
        v_max = v_max.max(c.vector_score);
        b_min = b_min.min(c.bm25_score);
        b_max = b_max.max(c.bm25_score);
    }

    let mut out: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|c| {
            let v_norm = normalize(c.vector_score, v_min, v_max);
            let b_norm = normalize(c.bm25_score, b_min, b_max);
            let fused = alpha * v_norm + (1.0 - alpha) * b_norm;
            ScoredChunk {
                fused_score: fused,
                ..c
            }
        })
        .collect();

    out.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
    out
}
