use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::application::CandidateLoader;
use crate::domain::{CandidateEntry, CandidateSet, DomainError};

/// Columns: query_id, Q0, doc_id, rank, score, tag.
const MIN_FIELDS: usize = 6;

/// Loads a tab-separated initial ranking.
///
/// The first well-formed row is a header and is discarded. Rows with fewer than
/// six fields are dropped without error. Lines may end in `\n`, `\r\n` or a bare `\r`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TsvCandidateLoader;

impl TsvCandidateLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<R: BufRead>(&self, mut reader: R) -> Result<CandidateSet, DomainError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut set = CandidateSet::new();
        let mut header_seen = false;
        let mut dropped = 0usize;

        for line in universal_lines(&content) {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();

            if fields.len() < MIN_FIELDS {
                dropped += 1;
                continue;
            }

            if !header_seen {
                header_seen = true;
                continue;
            }

            let query_id = unquote(fields[0]);
            let doc_id = unquote(fields[2]).replace('"', "");
            set.push(CandidateEntry::new(
                query_id,
                doc_id,
                unquote(fields[3]),
                unquote(fields[4]),
            ));
        }

        if dropped > 0 {
            debug!("Dropped {} malformed candidate rows", dropped);
        }

        Ok(set)
    }
}

impl CandidateLoader for TsvCandidateLoader {
    fn load(&self, path: &Path) -> Result<CandidateSet, DomainError> {
        let file = File::open(path)?;
        let set = self.parse(BufReader::new(file))?;
        info!(
            "Loaded {} candidates for {} queries from {}",
            set.candidate_count(),
            set.query_count(),
            path.display()
        );
        Ok(set)
    }
}

/// Splits on `\n`, `\r\n` and bare `\r`.
fn universal_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').flat_map(|line| {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.split('\r')
    })
}

/// Strips CSV-style quoting from a field that is wrapped in double quotes.
fn unquote(field: &str) -> String {
    match field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "query_id\tQ0\tdoc_id\trank\tscore\ttag\n";

    fn load(input: &str) -> CandidateSet {
        TsvCandidateLoader::new().parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(load(HEADER).is_empty());
    }

    #[test]
    fn test_groups_rows_in_file_order() {
        let input = format!(
            "{}1\tQ0\td3\t1\t9.1\tbm25\n2\tQ0\td1\t1\t8.0\tbm25\n1\tQ0\td2\t2\t7.5\tbm25\n",
            HEADER
        );
        let set = load(&input);

        assert_eq!(set.query_count(), 2);
        assert_eq!(set.get("1").unwrap().doc_ids(), ["d3", "d2"]);
        assert_eq!(set.get("2").unwrap().doc_ids(), ["d1"]);
    }

    #[test]
    fn test_short_rows_are_dropped() {
        let input = format!(
            "{}1\tQ0\td1\t1\t9.1\n\n1\tQ0\td2\t2\t7.5\tbm25\textra\n",
            HEADER
        );
        let set = load(&input);

        assert_eq!(set.get("1").unwrap().doc_ids(), ["d2"]);
    }

    #[test]
    fn test_first_well_formed_row_is_header() {
        let set = load("garbage\n1\tQ0\td1\t1\t9.1\tbm25\n1\tQ0\td2\t2\t7.5\tbm25\n");
        assert_eq!(set.get("1").unwrap().doc_ids(), ["d2"]);
    }

    #[test]
    fn test_quotes_stripped_from_doc_ids() {
        let input = format!(
            "{}1\tQ0\t\"d1\"\t1\t9.1\tbm25\r\n1\tQ0\td\"2\t2\t7.5\tbm25\r\n",
            HEADER
        );
        let set = load(&input);

        assert_eq!(set.get("1").unwrap().doc_ids(), ["d1", "d2"]);
    }

    #[test]
    fn test_bare_carriage_returns_split_rows() {
        let input = HEADER.replace('\n', "\r")
            + "1\tQ0\td1\t1\t9.1\tbm25\r1\tQ0\td2\t2\t7.5\tbm25\r";
        let set = load(&input);

        assert_eq!(set.get("1").unwrap().doc_ids(), ["d1", "d2"]);
    }

    #[test]
    fn test_mixed_line_endings() {
        let input = format!("{}1\tQ0\td1\t1\t9.1\tbm25\r\n1\tQ0\td2\t2\t7.5\tbm25\r", HEADER);
        let set = load(&input);

        assert_eq!(set.get("1").unwrap().doc_ids(), ["d1", "d2"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TsvCandidateLoader::new()
            .load(Path::new("/nonexistent/candidates.tsv"))
            .unwrap_err();
        assert!(err.is_io_error());
    }
}
