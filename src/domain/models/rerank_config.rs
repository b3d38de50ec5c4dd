use serde::{Deserialize, Serialize};

pub const DEFAULT_RUN_NAME: &str = "bert-v1";

/// Order in which query groups are re-ranked and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrder {
    /// Order in which query ids first appear in the candidate file.
    #[default]
    Discovery,
    /// Query ids sorted as strings.
    Lexicographic,
}

/// Settings for one re-ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    run_name: String,
    query_order: QueryOrder,
    show_progress: bool,
}

impl RerankConfig {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            query_order: QueryOrder::default(),
            show_progress: false,
        }
    }

    pub fn with_query_order(mut self, order: QueryOrder) -> Self {
        self.query_order = order;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn query_order(&self) -> QueryOrder {
        self.query_order
    }

    pub fn show_progress(&self) -> bool {
        self.show_progress
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_NAME)
    }
}
