use std::path::Path;

use crate::domain::{CandidateSet, DomainError};

/// Reads an initial ranking into per-query candidate lists.
pub trait CandidateLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<CandidateSet, DomainError>;
}
