use std::path::Path;

use crate::domain::{DomainError, RankedResult};

/// Persists a re-ranked run. Any existing file at `path` is replaced.
pub trait ResultWriter: Send + Sync {
    fn write(&self, path: &Path, results: &[RankedResult]) -> Result<(), DomainError>;
}
