pub mod fuse;
pub mod mmr;
pub mod rerank;

pub use fuse::fuse_scores;
pub use mmr::mmr_diversify;
pub use rerank::lexical_rerank;
