pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    CandidateLoader, CorpusRepository, EmbeddingService, RerankCandidatesUseCase, RerankSummary,
    ResultWriter,
};

pub use connector::{
    CsvResultWriter, JsonlCorpusStore, MockEmbedding, OrtEmbedding, TsvCandidateLoader,
};

pub use domain::{
    CandidateEntry, CandidateGroup, CandidateSet, Document, DomainError, EmbeddingConfig,
    Query, QueryOrder, RankedResult, RerankConfig, ScoredCandidate,
};
