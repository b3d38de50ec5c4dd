use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::application::CorpusRepository;
use crate::domain::{Document, DomainError, Query};

/// `_id` may be written as a JSON string or a JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(s) => f.write_str(s),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryRecord {
    #[serde(rename = "_id")]
    id: RecordId,
    /// The key is required; a `null` value loads as empty text and the query is skipped.
    #[serde(deserialize_with = "nullable_text")]
    text: Option<String>,
}

// `deserialize_with` keeps a missing key an error instead of defaulting to `None`.
fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer)
}

#[derive(Debug, Deserialize)]
struct DocumentRecord {
    #[serde(rename = "_id")]
    id: RecordId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// In-memory query and document lookups loaded from line-delimited JSON.
///
/// A repeated id overwrites the earlier record.
#[derive(Debug, Default)]
pub struct JsonlCorpusStore {
    queries: HashMap<String, String>,
    documents: HashMap<String, String>,
}

impl JsonlCorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(query_path: &Path, corpus_path: &Path) -> Result<Self, DomainError> {
        let mut store = Self::new();
        store.load_queries(query_path)?;
        store.load_documents(corpus_path)?;
        Ok(store)
    }

    pub fn load_queries(&mut self, path: &Path) -> Result<usize, DomainError> {
        let records: Vec<QueryRecord> = read_records(path)?;
        let count = records.len();
        for record in records {
            self.insert_query(Query::new(
                record.id.to_string(),
                record.text.unwrap_or_default(),
            ));
        }
        info!("Loaded {} queries from {}", count, path.display());
        Ok(count)
    }

    pub fn load_documents(&mut self, path: &Path) -> Result<usize, DomainError> {
        let records: Vec<DocumentRecord> = read_records(path)?;
        let count = records.len();
        for record in records {
            self.insert_document(Document::from_parts(
                record.id.to_string(),
                record.title.as_deref().unwrap_or(""),
                record.text.as_deref().unwrap_or(""),
            ));
        }
        info!("Loaded {} documents from {}", count, path.display());
        Ok(count)
    }

    pub fn insert_query(&mut self, query: Query) {
        self.queries
            .insert(query.id().to_string(), query.text().to_string());
    }

    pub fn insert_document(&mut self, document: Document) {
        self.documents
            .insert(document.id().to_string(), document.text().to_string());
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl CorpusRepository for JsonlCorpusStore {
    fn lookup_query(&self, id: &str) -> Option<&str> {
        self.queries.get(id).map(String::as_str)
    }

    fn lookup_document(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DomainError> {
    let file = File::open(path)?;
    parse_records(BufReader::new(file), path)
}

fn parse_records<T: DeserializeOwned, R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<T>, DomainError> {
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|e| {
            DomainError::parse(format!("{}:{}: {}", path.display(), line_no + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: DeserializeOwned>(input: &str) -> Result<Vec<T>, DomainError> {
        parse_records(input.as_bytes(), Path::new("test.jsonl"))
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let records: Vec<QueryRecord> =
            parse("{\"_id\": 42, \"text\": \"a\"}\n{\"_id\": \"7\", \"text\": \"b\"}\n").unwrap();

        let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["42", "7"]);
    }

    #[test]
    fn test_document_title_is_optional() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("corpus.jsonl");
        std::fs::write(
            &path,
            "{\"_id\": \"d1\", \"text\": \"body only\"}\n\n{\"_id\": \"d2\", \"title\": \"T\"}\n",
        )
        .unwrap();

        let mut store = JsonlCorpusStore::new();
        let count = store.load_documents(&path).unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.lookup_document("d1"), Some(". body only"));
        assert_eq!(store.lookup_document("d2"), Some("T. "));
        assert_eq!(store.lookup_document("d3"), None);
    }

    #[test]
    fn test_null_query_text_loads_as_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("queries.jsonl");
        std::fs::write(
            &path,
            "{\"_id\": \"1\", \"text\": \"cats\"}\n{\"_id\": 2, \"text\": null}\n",
        )
        .unwrap();

        let mut store = JsonlCorpusStore::new();
        let count = store.load_queries(&path).unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.lookup_query("1"), Some("cats"));
        assert_eq!(store.lookup_query("2"), Some(""));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let mut store = JsonlCorpusStore::new();
        store.insert_query(Query::new("1", "first"));
        store.insert_query(Query::new("1", "second"));

        assert_eq!(store.lookup_query("1"), Some("second"));
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let err = parse::<QueryRecord>("{\"_id\": \"1\", \"text\": \"ok\"}\nnot json\n").unwrap_err();

        assert!(err.is_parse_error());
        assert!(err.to_string().contains("test.jsonl:2"));
    }

    #[test]
    fn test_query_without_text_is_rejected() {
        let err = parse::<QueryRecord>("{\"_id\": \"1\"}\n").unwrap_err();
        assert!(err.is_parse_error());
    }
}
