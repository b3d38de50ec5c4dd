use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::application::{CorpusRepository, EmbeddingService, ResultWriter};
use crate::domain::{
    rank_by_score, CandidateGroup, CandidateSet, DomainError, QueryOrder, RankedResult,
    RerankConfig,
};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RerankSummary {
    pub queries_ranked: usize,
    pub queries_skipped: usize,
    pub rows: usize,
}

pub struct RerankCandidatesUseCase {
    corpus: Arc<dyn CorpusRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
    config: RerankConfig,
}

impl RerankCandidatesUseCase {
    pub fn new(
        corpus: Arc<dyn CorpusRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
        config: RerankConfig,
    ) -> Self {
        Self {
            corpus,
            embedding_service,
            config,
        }
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Re-rank every group and write the run once all groups have succeeded.
    ///
    /// Nothing is written if any embedding call fails.
    pub async fn execute(
        &self,
        candidates: &CandidateSet,
        writer: &dyn ResultWriter,
        output: &Path,
    ) -> Result<RerankSummary, DomainError> {
        let (results, summary) = self.rerank_all(candidates).await?;
        writer.write(output, &results)?;
        info!("Wrote {} rows to {}", results.len(), output.display());
        Ok(summary)
    }

    /// Re-rank every group with a resolvable query text, in the configured query order.
    pub async fn rerank_all(
        &self,
        candidates: &CandidateSet,
    ) -> Result<(Vec<RankedResult>, RerankSummary), DomainError> {
        let start_time = Instant::now();

        let groups: Vec<&CandidateGroup> = match self.config.query_order() {
            QueryOrder::Discovery => candidates.groups().iter().collect(),
            QueryOrder::Lexicographic => candidates.groups_sorted(),
        };

        info!(
            "Re-ranking {} candidates across {} queries with {}",
            candidates.candidate_count(),
            groups.len(),
            self.embedding_service.config().model_name()
        );

        let progress_bar = if self.config.show_progress() {
            let bar = ProgressBar::new(groups.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .expect("Invalid progress bar template")
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut results = Vec::with_capacity(candidates.candidate_count());
        let mut summary = RerankSummary::default();

        for group in groups {
            progress_bar.set_message(group.query_id().to_string());

            let query_text = match self.corpus.lookup_query(group.query_id()) {
                Some(text) if !text.is_empty() => text,
                _ => {
                    debug!("Skipping query {}: no query text", group.query_id());
                    summary.queries_skipped += 1;
                    progress_bar.inc(1);
                    continue;
                }
            };

            let ranked = self.rerank_group(query_text, group).await?;
            summary.queries_ranked += 1;
            summary.rows += ranked.len();
            results.extend(ranked);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        info!(
            "Ranked {} queries ({} skipped, {} rows) in {:.2}s",
            summary.queries_ranked,
            summary.queries_skipped,
            summary.rows,
            start_time.elapsed().as_secs_f64()
        );

        Ok((results, summary))
    }

    /// Score one query's candidates and assign ranks 1..n by descending similarity.
    pub async fn rerank_group(
        &self,
        query_text: &str,
        group: &CandidateGroup,
    ) -> Result<Vec<RankedResult>, DomainError> {
        if group.is_empty() {
            return Ok(vec![]);
        }

        let doc_texts: Vec<String> = group
            .doc_ids()
            .iter()
            .map(|doc_id| {
                self.corpus.lookup_document(doc_id).unwrap_or_else(|| {
                    debug!("Document {} not in corpus, embedding empty text", doc_id);
                    ""
                })
            })
            .map(str::to_string)
            .collect();

        let query_embedding = self.embedding_service.embed(query_text).await?;
        let doc_embeddings = self.embedding_service.embed_batch(&doc_texts).await?;

        if doc_embeddings.len() != doc_texts.len() {
            return Err(DomainError::embedding(format!(
                "Expected {} document embeddings for query {}, got {}",
                doc_texts.len(),
                group.query_id(),
                doc_embeddings.len()
            )));
        }

        if let Some(bad) = doc_embeddings
            .iter()
            .find(|v| v.len() != query_embedding.len())
        {
            return Err(DomainError::embedding(format!(
                "Dimension mismatch for query {}: query has {}, document has {}",
                group.query_id(),
                query_embedding.len(),
                bad.len()
            )));
        }

        let scores = self
            .embedding_service
            .similarity(&query_embedding, &doc_embeddings);

        let run_name = self.config.run_name();
        Ok(rank_by_score(group.doc_ids(), &scores)
            .into_iter()
            .enumerate()
            .map(|(i, scored)| scored.into_ranked(group.query_id(), i + 1, run_name))
            .collect())
    }
}
