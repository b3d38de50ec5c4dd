use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of the initial ranking file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    query_id: String,
    doc_id: String,
    /// Rank and score from the upstream run. Carried for completeness, never used for ordering.
    original_rank: String,
    original_score: String,
}

impl CandidateEntry {
    pub fn new(
        query_id: impl Into<String>,
        doc_id: impl Into<String>,
        original_rank: impl Into<String>,
        original_score: impl Into<String>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            doc_id: doc_id.into(),
            original_rank: original_rank.into(),
            original_score: original_score.into(),
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn original_rank(&self) -> &str {
        &self.original_rank
    }

    pub fn original_score(&self) -> &str {
        &self.original_score
    }
}

/// The candidate documents of one query, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGroup {
    query_id: String,
    doc_ids: Vec<String>,
}

impl CandidateGroup {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            doc_ids: Vec::new(),
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }
}

/// Candidate lists grouped by query id.
///
/// Groups are kept in the order their query id was first seen and documents
/// within a group in file order. Duplicate document ids are kept.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    groups: Vec<CandidateGroup>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CandidateEntry) {
        let CandidateEntry {
            query_id, doc_id, ..
        } = entry;

        let slot = match self.index.get(&query_id) {
            Some(&slot) => slot,
            None => {
                self.groups.push(CandidateGroup::new(query_id.clone()));
                self.index.insert(query_id, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        self.groups[slot].doc_ids.push(doc_id);
    }

    pub fn get(&self, query_id: &str) -> Option<&CandidateGroup> {
        self.index.get(query_id).map(|&slot| &self.groups[slot])
    }

    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    /// Groups ordered by query id, the way a sorted group-by would yield them.
    pub fn groups_sorted(&self) -> Vec<&CandidateGroup> {
        let mut groups: Vec<&CandidateGroup> = self.groups.iter().collect();
        groups.sort_by(|a, b| a.query_id.cmp(&b.query_id));
        groups
    }

    pub fn query_count(&self) -> usize {
        self.groups.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(CandidateGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<CandidateEntry> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = CandidateEntry>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.push(entry);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(query_id: &str, doc_id: &str) -> CandidateEntry {
        CandidateEntry::new(query_id, doc_id, "1", "0.5")
    }

    #[test]
    fn test_groups_preserve_discovery_order() {
        let set: CandidateSet = vec![
            entry("2", "x"),
            entry("1", "a"),
            entry("2", "y"),
            entry("1", "b"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = set.groups().iter().map(|g| g.query_id()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(set.get("2").unwrap().doc_ids(), ["x", "y"]);
        assert_eq!(set.get("1").unwrap().doc_ids(), ["a", "b"]);
        assert_eq!(set.candidate_count(), 4);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let set: CandidateSet = vec![entry("1", "a"), entry("1", "a")].into_iter().collect();
        assert_eq!(set.get("1").unwrap().len(), 2);
    }

    #[test]
    fn test_groups_sorted_by_query_id() {
        let set: CandidateSet = vec![entry("b", "1"), entry("10", "1"), entry("2", "1")]
            .into_iter()
            .collect();

        let ids: Vec<&str> = set.groups_sorted().iter().map(|g| g.query_id()).collect();
        assert_eq!(ids, vec!["10", "2", "b"]);
    }
}
