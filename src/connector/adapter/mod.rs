mod csv_result_writer;
mod jsonl_corpus_store;
mod mock_embedding;
mod ort_embedding;
mod tsv_candidate_loader;

pub use csv_result_writer::*;
pub use jsonl_corpus_store::*;
pub use mock_embedding::*;
pub use ort_embedding::*;
pub use tsv_candidate_loader::*;
