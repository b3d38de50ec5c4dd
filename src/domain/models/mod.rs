mod candidate;
mod corpus;
mod embedding;
mod ranked_result;
mod rerank_config;

pub use candidate::*;
pub use corpus::*;
pub use embedding::*;
pub use ranked_result::*;
pub use rerank_config::*;
