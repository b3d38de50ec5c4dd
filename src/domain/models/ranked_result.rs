use serde::{Deserialize, Serialize};

/// Literal second column of a run file.
pub const ITERATION_MARKER: &str = "Q0";

/// Column header of the output file.
pub const RESULT_HEADER: [&str; 6] = ["query_id", "Q0", "doc_id", "rank", "score", "run_name"];

/// A candidate document paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    doc_id: String,
    score: f32,
}

impl ScoredCandidate {
    pub fn new(doc_id: impl Into<String>, score: f32) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn into_ranked(self, query_id: &str, rank: usize, run_name: &str) -> RankedResult {
        RankedResult::new(query_id, self.doc_id, rank, self.score, run_name)
    }
}

/// One row of the re-ranked run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    query_id: String,
    doc_id: String,
    rank: usize,
    score: f32,
    run_name: String,
}

impl RankedResult {
    pub fn new(
        query_id: impl Into<String>,
        doc_id: impl Into<String>,
        rank: usize,
        score: f32,
        run_name: impl Into<String>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            doc_id: doc_id.into(),
            rank,
            score,
            run_name: run_name.into(),
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Score as fixed-point text with four decimals.
    pub fn formatted_score(&self) -> String {
        format!("{:.4}", self.score)
    }

    pub fn fields(&self) -> [String; 6] {
        [
            self.query_id.clone(),
            ITERATION_MARKER.to_string(),
            self.doc_id.clone(),
            self.rank.to_string(),
            self.formatted_score(),
            self.run_name.clone(),
        ]
    }
}
