use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hybrid_rank::embeddings::parse_embedding_text;
use hybrid_rank::{EmbeddingLookup, LexicalHit, LexicalSearch, VectorHit, VectorSearch};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn vhit(id: &str, scope_id: &str, content: &str, score: f32) -> VectorHit {
    VectorHit {
        id: id.to_string(),
        scope_id: scope_id.to_string(),
        content: content.to_string(),
        metadata: serde_json::Map::new(),
        score,
    }
}

pub fn lhit(id: &str, scope_id: &str, content: &str, score: f32) -> LexicalHit {
    LexicalHit {
        id: id.to_string(),
        scope_id: scope_id.to_string(),
        content: content.to_string(),
        metadata: serde_json::Map::new(),
        score,
    }
}

pub struct FakeVectorSearch {
    hits: Vec<VectorHit>,
    fail: bool,
}

impl FakeVectorSearch {
    pub fn with_hits(hits: Vec<VectorHit>) -> Self {
        Self { hits, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl VectorSearch for FakeVectorSearch {
    async fn search(&self, scope_id: &str, _query: &str, top_k: usize) -> Result<Vec<VectorHit>> {
        if self.fail {
            return Err(anyhow!("vector backend unavailable"));
        }
        Ok(self
            .hits
            .iter()
            .filter(|h| h.scope_id == scope_id)
            .take(top_k)
            .cloned()
            .collect())
    }
}

pub struct FakeLexicalSearch {
    hits: Vec<LexicalHit>,
    fail: bool,
}

impl FakeLexicalSearch {
    pub fn with_hits(hits: Vec<LexicalHit>) -> Self {
        Self { hits, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl LexicalSearch for FakeLexicalSearch {
    async fn search(&self, scope_id: &str, _query: &str, top_k: usize) -> Result<Vec<LexicalHit>> {
        if self.fail {
            return Err(anyhow!("lexical backend unavailable"));
        }
        Ok(self
            .hits
            .iter()
            .filter(|h| h.scope_id == scope_id)
            .take(top_k)
            .cloned()
            .collect())
    }
}

pub struct FakeEmbeddingStore {
    map: HashMap<String, Vec<f32>>,
    pub fetch_calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl FakeEmbeddingStore {
    pub fn with_vectors(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            map: entries
                .iter()
                .map(|(id, v)| (id.to_string(), v.clone()))
                .collect(),
            fetch_calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Builds the store from raw text payloads the way a real adapter
    /// would: malformed records are dropped, not fatal.
    pub fn from_text_payloads(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .filter_map(|(id, text)| parse_embedding_text(text).map(|v| (id.to_string(), v)))
            .collect();
        Self {
            map,
            fetch_calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            map: HashMap::new(),
            fetch_calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingLookup for FakeEmbeddingStore {
    async fn fetch(&self, ids: &[String]) -> Result<HashMap<String, Vec<f32>>> {
        if self.fail {
            return Err(anyhow!("embedding store unavailable"));
        }
        self.fetch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.map.get(id).map(|v| (id.clone(), v.clone())))
            .collect())
    }
}
