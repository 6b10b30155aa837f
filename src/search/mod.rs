//! Contracts for the two search collaborators this core fans out to.
//!
//! Both are scoped to a single document and bounded by `top_k`. Scores are
//! raw: vector similarity may be any real value, BM25 relevance is an
//! unbounded non-negative value. Fusion normalizes both per query.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub id: String,
    pub scope_id: String,
    pub content: String,
    pub metadata: Metadata,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexicalHit {
    pub id: String,
    pub scope_id: String,
    pub content: String,
    pub metadata: Metadata,
    pub score: f32,
}

/// Dense-embedding similarity search over one document's chunks.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn search(&self, scope_id: &str, query: &str, top_k: usize) -> Result<Vec<VectorHit>>;
}

/// Lexical (BM25-style) relevance search over one document's chunks.
#[async_trait]
pub trait LexicalSearch: Send + Sync {
    async fn search(&self, scope_id: &str, query: &str, top_k: usize) -> Result<Vec<LexicalHit>>;
}
