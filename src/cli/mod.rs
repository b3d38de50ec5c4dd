use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::connector::DEFAULT_MODEL_ID;
use crate::domain::{QueryOrder, RerankConfig, DEFAULT_RUN_NAME};

#[derive(Parser)]
#[command(name = "denserank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use the deterministic offline embedding instead of downloading a model
    #[arg(long, global = true)]
    pub mock_embeddings: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-rank a candidate run by embedding similarity
    Rerank {
        /// Line-delimited JSON queries with `_id` and `text`
        #[arg(short, long, default_value = "data/queries.jsonl.json")]
        queries: PathBuf,

        /// Line-delimited JSON corpus with `_id`, `title` and `text`
        #[arg(short, long, default_value = "data/corpus.jsonl.json")]
        corpus: PathBuf,

        /// Tab-separated initial run: query_id, Q0, doc_id, rank, score, tag
        #[arg(long, default_value = "data/a1.csv")]
        candidates: PathBuf,

        #[arg(short, long, default_value = "data/results.csv")]
        output: PathBuf,

        #[arg(long, default_value = DEFAULT_RUN_NAME)]
        run_name: String,

        /// Hugging Face model id of an ONNX sentence-transformers export
        #[arg(short, long, default_value = DEFAULT_MODEL_ID)]
        model: String,

        /// Emit queries sorted by id instead of in candidate-file order
        #[arg(long)]
        sort_queries: bool,

        #[arg(long)]
        progress: bool,
    },
}

impl Commands {
    pub fn rerank_config(&self) -> RerankConfig {
        match self {
            Commands::Rerank {
                run_name,
                sort_queries,
                progress,
                ..
            } => {
                let order = if *sort_queries {
                    QueryOrder::Lexicographic
                } else {
                    QueryOrder::Discovery
                };
                RerankConfig::new(run_name.clone())
                    .with_query_order(order)
                    .with_progress(*progress)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_defaults() {
        let cli = Cli::try_parse_from(["denserank", "rerank"]).unwrap();
        let config = cli.command.rerank_config();

        assert_eq!(config.run_name(), "bert-v1");
        assert_eq!(config.query_order(), QueryOrder::Discovery);
        assert!(!config.show_progress());

        let Commands::Rerank {
            candidates, model, ..
        } = cli.command;
        assert_eq!(candidates, PathBuf::from("data/a1.csv"));
        assert_eq!(model, "sentence-transformers/all-MiniLM-L6-v2");
    }

    #[test]
    fn test_rerank_options() {
        let cli = Cli::try_parse_from([
            "denserank",
            "--mock-embeddings",
            "rerank",
            "--run-name",
            "mini-v2",
            "--sort-queries",
            "-o",
            "out.csv",
        ])
        .unwrap();

        assert!(cli.mock_embeddings);
        let config = cli.command.rerank_config();
        assert_eq!(config.run_name(), "mini-v2");
        assert_eq!(config.query_order(), QueryOrder::Lexicographic);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let res = Cli::try_parse_from(["denserank", "rerank", "--top-k", "5"]);
        assert!(res.is_err());
    }
}
