use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use denserank::cli::{Cli, Commands};
use denserank::{
    CandidateLoader, CsvResultWriter, EmbeddingService, JsonlCorpusStore, MockEmbedding,
    OrtEmbedding, RerankCandidatesUseCase, TsvCandidateLoader,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.command.rerank_config();

    match cli.command {
        Commands::Rerank {
            queries,
            corpus,
            candidates,
            output,
            model,
            ..
        } => {
            let store = Arc::new(JsonlCorpusStore::from_files(&queries, &corpus)?);
            let candidate_set = TsvCandidateLoader::new().load(&candidates)?;

            let embedding_service: Arc<dyn EmbeddingService> = if cli.mock_embeddings {
                info!("Using mock embedding service");
                Arc::new(MockEmbedding::lexical())
            } else {
                info!("Initializing ONNX embedding service...");
                Arc::new(OrtEmbedding::new(Some(&model))?)
            };

            let use_case = RerankCandidatesUseCase::new(store, embedding_service, config);
            let summary = use_case
                .execute(&candidate_set, &CsvResultWriter::new(), &output)
                .await?;

            info!(
                "Re-ranked {} queries, skipped {}",
                summary.queries_ranked, summary.queries_skipped
            );
            println!("Results saved to: {}", output.display());
        }
    }

    Ok(())
}
