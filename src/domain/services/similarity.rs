use std::cmp::Ordering;

use crate::domain::ScoredCandidate;

/// Cosine similarity of two vectors.
///
/// Returns 0.0 when the lengths differ or either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Similarity of `query` against each candidate, in candidate order.
pub fn cosine_similarities(query: &[f32], candidates: &[Vec<f32>]) -> Vec<f32> {
    candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate))
        .collect()
}

/// Pairs documents with scores and orders them by descending score.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_by_score(doc_ids: &[String], scores: &[f32]) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = doc_ids
        .iter()
        .zip(scores.iter())
        .map(|(doc_id, &score)| ScoredCandidate::new(doc_id.clone(), score))
        .collect();

    scored.sort_by(|a, b| descending(a.score(), b.score()));
    scored
}

fn descending(a: f32, b: f32) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

// NaN sinks to the bottom and -0.0 ties with 0.0.
fn sort_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarities_keep_order() {
        let scores = cosine_similarities(&[1.0, 0.0], &[vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(scores.len(), 2);
        assert!(scores[0].abs() < 1e-6);
        assert!((scores[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_by_score_descending() {
        let ranked = rank_by_score(&ids(&["a", "b", "c"]), &[0.1, 0.9, 0.5]);
        let order: Vec<&str> = ranked.iter().map(|s| s.doc_id()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_by_score_ties_keep_input_order() {
        let ranked = rank_by_score(&ids(&["x", "y", "z", "w"]), &[0.5, 0.7, 0.5, 0.0]);
        let order: Vec<&str> = ranked.iter().map(|s| s.doc_id()).collect();
        assert_eq!(order, vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn test_rank_by_score_signed_zero_and_nan() {
        let ranked = rank_by_score(&ids(&["nan", "neg", "pos"]), &[f32::NAN, -0.0, 0.0]);
        let order: Vec<&str> = ranked.iter().map(|s| s.doc_id()).collect();
        assert_eq!(order, vec!["neg", "pos", "nan"]);
    }
}
