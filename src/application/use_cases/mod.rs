mod rerank_candidates;

pub use rerank_candidates::*;
