pub mod config;
pub mod embeddings;
pub mod retrieval;
pub mod search;

pub use config::Config;
pub use embeddings::EmbeddingLookup;
pub use retrieval::{build_search_runtime, HybridRetriever, ScoredChunk};
pub use search::{LexicalHit, LexicalSearch, VectorHit, VectorSearch};
