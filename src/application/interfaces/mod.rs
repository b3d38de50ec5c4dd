mod candidate_loader;
mod corpus_repository;
mod embedding_service;
mod result_writer;

pub use candidate_loader::*;
pub use corpus_repository::*;
pub use embedding_service::*;
pub use result_writer::*;
