pub mod assembler;
pub mod ranking;

use crate::{
    config::Config,
    embeddings::EmbeddingLookup,
    search::{LexicalHit, LexicalSearch, Metadata, VectorHit, VectorSearch},
};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc, time::Instant};

/// One retrieved chunk within a single ranking pass.
///
/// `fused_score` is derived and transient: 0.0 until fusion recomputes it,
/// updated functionally by each later stage, never an input. Metadata is an
/// opaque pass-through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub id: String,
    pub scope_id: String,
    pub content: String,
    pub metadata: Metadata,
    pub vector_score: f32,
    pub bm25_score: f32,
    pub fused_score: f32,
}

/// Fuses dense-embedding and lexical candidate rankings for one document
/// into a single ordered list: concurrent fan-out, identity merge, weighted
/// score fusion, MMR diversification, lexical-overlap rerank.
#[derive(Clone)]
pub struct HybridRetriever {
    config: Arc<Config>,
    vector: Arc<dyn VectorSearch>,
    lexical: Arc<dyn LexicalSearch>,
    embeddings: Arc<dyn EmbeddingLookup>,
}

impl HybridRetriever {
    pub fn new(
        config: Arc<Config>,
        vector: Arc<dyn VectorSearch>,
        lexical: Arc<dyn LexicalSearch>,
        embeddings: Arc<dyn EmbeddingLookup>,
    ) -> Self {
        Self {
            config,
            vector,
            lexical,
            embeddings,
        }
    }

    /// Runs the full ranking pass for one query scoped to one document.
    ///
    /// Both underlying searches run concurrently with the same `top_k` and
    /// both must succeed; there is no partial-result mode. An empty query is
    /// passed through to the collaborators unchanged. No timeout is enforced
    /// at this layer.
    pub async fn search(&self, scope_id: &str, query: &str) -> Result<Vec<ScoredChunk>> {
        if scope_id.trim().is_empty() {
            return Err(anyhow!("scope_id must be non-empty"));
        }

        let started = Instant::now();
        let top_k = self.config.top_k;

        let vec_task = {
            let vector = Arc::clone(&self.vector);
            let scope = scope_id.to_string();
            let q = query.to_string();
            tokio::spawn(async move { vector.search(&scope, &q, top_k).await })
        };
        let lex_task = {
            let lexical = Arc::clone(&self.lexical);
            let scope = scope_id.to_string();
            let q = query.to_string();
            tokio::spawn(async move { lexical.search(&scope, &q, top_k).await })
        };

        let (vec_res, lex_res) = tokio::join!(vec_task, lex_task);
        let vector_hits = vec_res.context("vector search task failed")??;
        let lexical_hits = lex_res.context("lexical search task failed")??;
        let fanout_ms = started.elapsed().as_millis() as u64;

        let vec_n = vector_hits.len();
        let lex_n = lexical_hits.len();

        let rank_t = Instant::now();
        let merged = merge_hits(vector_hits, lexical_hits);
        let merged_n = merged.len();

        let fused = ranking::fuse_scores(merged, self.config.alpha);
        let diversified = ranking::mmr_diversify(
            self.embeddings.as_ref(),
            fused,
            self.config.mmr_k,
            self.config.mmr_lambda,
        )
        .await?;
        let reranked = ranking::lexical_rerank(diversified, query);
        let rank_ms = rank_t.elapsed().as_millis() as u64;

        tracing::info!(
            scope_id,
            top_k,
            vec_n,
            lex_n,
            merged_n,
            out_n = reranked.len(),
            fanout_ms,
            rank_ms,
            total_ms = started.elapsed().as_millis() as u64,
            "hybrid search done"
        );

        Ok(reranked)
    }
}

/// Identity merge of the two candidate lists.
///
/// Keyed by chunk id; a chunk present in both sources keeps the union of its
/// score fields, a chunk found by only one source gets 0.0 on the other
/// axis. Output order is deterministic: vector hits in their own order, then
/// lexical-only hits in theirs. The merged set does not depend on which
/// source list is processed first.
pub fn merge_hits(vector_hits: Vec<VectorHit>, lexical_hits: Vec<LexicalHit>) -> Vec<ScoredChunk> {
    let mut merged: Vec<ScoredChunk> = Vec::with_capacity(vector_hits.len() + lexical_hits.len());
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for h in vector_hits {
        match by_id.get(&h.id) {
            Some(&i) => merged[i].vector_score = h.score,
            None => {
                by_id.insert(h.id.clone(), merged.len());
                merged.push(ScoredChunk {
                    id: h.id,
                    scope_id: h.scope_id,
                    content: h.content,
                    metadata: h.metadata,
                    vector_score: h.score,
                    bm25_score: 0.0,
                    fused_score: 0.0,
                });
            }
        }
    }

    for h in lexical_hits {
        match by_id.get(&h.id) {
            Some(&i) => merged[i].bm25_score = h.score,
            None => {
                by_id.insert(h.id.clone(), merged.len());
                merged.push(ScoredChunk {
                    id: h.id,
                    scope_id: h.scope_id,
                    content: h.content,
                    metadata: h.metadata,
                    vector_score: 0.0,
                    bm25_score: h.score,
                    fused_score: 0.0,
                });
            }
        }
    }

    merged
}

/// Multi-thread runtime for the fan-out, sized per `Config::search_workers`
/// (at least `max(4, available parallelism)` after clamping).
pub fn build_search_runtime(config: &Config) -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.search_workers)
        .enable_all()
        .build()
        .context("Failed to build search runtime")
}
