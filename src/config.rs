use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Process-wide ranking tunables. Constructed once at startup and threaded
/// explicitly into the retriever; never re-read per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Candidates requested from each of the two search collaborators.
    pub top_k: usize,
    /// Fusion weight: share of the normalized vector score in the blend.
    pub alpha: f32,
    /// Diversified output size.
    pub mmr_k: usize,
    /// MMR relevance/diversity trade-off. 1.0 degenerates to pure relevance.
    pub mmr_lambda: f32,
    /// Character budget for assembled context.
    pub max_context_chars: usize,
    /// Maximum chunks included in assembled context.
    pub max_context_chunks: usize,
    /// Worker threads for the fan-out runtime.
    pub search_workers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let top_k = optional_env("TOP_K")
            .as_deref()
            .map(parse_usize)
            .transpose()?
            .unwrap_or(20);

        let alpha = optional_env("HYBRID_ALPHA")
            .as_deref()
            .map(parse_f32)
            .transpose()?
            .unwrap_or(0.7);

        let mmr_k = optional_env("MMR_K")
            .as_deref()
            .map(parse_usize)
            .transpose()?
            .unwrap_or(10);

        let mmr_lambda = optional_env("MMR_LAMBDA")
            .as_deref()
            .map(parse_f32)
            .transpose()?
            .unwrap_or(0.7);

        let max_context_chars = optional_env("MAX_CONTEXT_CHARS")
            .as_deref()
            .map(parse_usize)
            .transpose()?
            .unwrap_or(8_000);

        let max_context_chunks = optional_env("MAX_CONTEXT_CHUNKS")
            .as_deref()
            .map(parse_usize)
            .transpose()?
            .unwrap_or(6);

        let search_workers = optional_env("SEARCH_WORKERS")
            .as_deref()
            .map(parse_usize)
            .transpose()?
            .unwrap_or_else(|| num_cpus::get().max(4));

        Ok(Self::clamped(
            top_k,
            alpha,
            mmr_k,
            mmr_lambda,
            max_context_chars,
            max_context_chunks,
            search_workers,
        ))
    }

    /// Applies the construction-time clamps: weights land in [0,1] (NaN and
    /// infinities fall to 0.0), counts get their floors. Out-of-range values
    /// are corrected, not rejected.
    pub fn clamped(
        top_k: usize,
        alpha: f32,
        mmr_k: usize,
        mmr_lambda: f32,
        max_context_chars: usize,
        max_context_chunks: usize,
        search_workers: usize,
    ) -> Self {
        Self {
            top_k: top_k.max(1),
            alpha: clamp01(alpha),
            mmr_k: mmr_k.max(1),
            mmr_lambda: clamp01(mmr_lambda),
            max_context_chars: max_context_chars.max(500),
            max_context_chunks: max_context_chunks.max(1),
            search_workers: search_workers.max(4),
        }
    }
}

pub(crate) fn clamp01(v: f32) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| {
        let v = v.trim().to_string();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    })
}

fn parse_usize(value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|err| anyhow!("Invalid integer '{value}': {err}"))
}

fn parse_f32(value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|err| anyhow!("Invalid float '{value}': {err}"))
}
