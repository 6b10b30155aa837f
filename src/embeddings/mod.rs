//! Embedding lookup contract and payload parsing.
//!
//! Embeddings are owned by an external store and fetched lazily, only for the
//! chunks under MMR consideration. The core never persists them.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Batched embedding fetch keyed by chunk id.
///
/// The returned map may omit ids that have no stored embedding; that is not
/// an error. Implementations should only fail on total failure of the lookup
/// mechanism.
#[async_trait]
pub trait EmbeddingLookup: Send + Sync {
    async fn fetch(&self, ids: &[String]) -> Result<HashMap<String, Vec<f32>>>;
}

/// Parses a bracketed vector payload, e.g. `[0.1,0.2,0.3]`.
///
/// Returns `None` on any malformed input so store adapters can drop that
/// single record instead of failing the whole lookup; the owning chunk is
/// then treated as having no embedding.
pub fn parse_embedding_text(text: &str) -> Option<Vec<f32>> {
    let mut s = text.trim();
    s = s.strip_prefix('[').unwrap_or(s);
    s = s.strip_suffix(']').unwrap_or(s);
    let s = s.trim();

    if s.is_empty() {
        return None;
    }

    let mut out = Vec::new();
    for part in s.split(',') {
        match part.trim().parse::<f32>() {
            Ok(v) => out.push(v),
            Err(_) => return None,
        }
    }
    Some(out)
}
