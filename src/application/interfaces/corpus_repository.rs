/// Read-only id to text lookups for queries and documents.
pub trait CorpusRepository: Send + Sync {
    fn lookup_query(&self, id: &str) -> Option<&str>;

    fn lookup_document(&self, id: &str) -> Option<&str>;
}
