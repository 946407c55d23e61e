use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::MovieId;

/// Offline ranking quality measures for held-out evaluation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationMetrics {
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub f1_score: f64,
    pub ndcg_at_k: f64,
}

#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    k: usize,
}

impl MetricsCalculator {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn calculate_precision_at_k(&self, recommended: &[MovieId], relevant: &[MovieId]) -> f64 {
        if recommended.is_empty() {
            return 0.0;
        }

        let relevant_set: HashSet<_> = relevant.iter().collect();
        let relevant_recommended = recommended
            .iter()
            .take(self.k)
            .filter(|id| relevant_set.contains(id))
            .count();

        relevant_recommended as f64 / self.k.min(recommended.len()) as f64
    }

    pub fn calculate_recall_at_k(&self, recommended: &[MovieId], relevant: &[MovieId]) -> f64 {
        if relevant.is_empty() {
            return 0.0;
        }

        let relevant_set: HashSet<_> = relevant.iter().collect();
        let relevant_recommended = recommended
            .iter()
            .take(self.k)
            .filter(|id| relevant_set.contains(id))
            .count();

        relevant_recommended as f64 / relevant.len() as f64
    }

    pub fn calculate_f1_score(&self, precision: f64, recall: f64) -> f64 {
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }

    pub fn calculate_ndcg_at_k(
        &self,
        recommended: &[MovieId],
        relevant_scores: &HashMap<MovieId, f64>,
    ) -> f64 {
        let dcg = self.calculate_dcg(recommended, relevant_scores);
        let idcg = self.calculate_ideal_dcg(relevant_scores);

        if idcg == 0.0 {
            0.0
        } else {
            dcg / idcg
        }
    }

    fn calculate_dcg(
        &self,
        recommended: &[MovieId],
        relevant_scores: &HashMap<MovieId, f64>,
    ) -> f64 {
        recommended
            .iter()
            .take(self.k)
            .enumerate()
            .map(|(i, id)| {
                let relevance = relevant_scores.get(id).unwrap_or(&0.0);
                relevance / ((i + 2) as f64).log2()
            })
            .sum()
    }

    fn calculate_ideal_dcg(&self, relevant_scores: &HashMap<MovieId, f64>) -> f64 {
        let mut scores: Vec<f64> = relevant_scores.values().cloned().collect();
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        scores
            .iter()
            .take(self.k)
            .enumerate()
            .map(|(i, &score)| score / ((i + 2) as f64).log2())
            .sum()
    }

    pub fn calculate_all_metrics(
        &self,
        recommended: &[MovieId],
        relevant: &[MovieId],
        relevant_scores: &HashMap<MovieId, f64>,
    ) -> RecommendationMetrics {
        let precision = self.calculate_precision_at_k(recommended, relevant);
        let recall = self.calculate_recall_at_k(recommended, relevant);

        RecommendationMetrics {
            precision_at_k: precision,
            recall_at_k: recall,
            f1_score: self.calculate_f1_score(precision, recall),
            ndcg_at_k: self.calculate_ndcg_at_k(recommended, relevant_scores),
        }
    }
}
