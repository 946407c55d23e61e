use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nalgebra::DVector;
use rayon::prelude::*;

use super::{cosine, FeatureTable};
use crate::models::MovieId;
use crate::utils;

/// Top-k nearest-neighbor query over the feature table.
///
/// Results come back highest score first with ties broken by catalog
/// insertion order; movies in `exclude` and movies with no similarity to
/// the query (including every match of a zero-vector query) are omitted.
pub trait SimilarityIndex: Send + Sync {
    fn nearest(
        &self,
        query: &DVector<f32>,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)>;
}

/// Exhaustive scan over every catalog vector. O(catalog size) per query,
/// which is fine for catalogs in the tens of thousands.
pub struct LinearScan {
    features: Arc<FeatureTable>,
}

impl LinearScan {
    pub fn new(features: Arc<FeatureTable>) -> Self {
        Self { features }
    }
}

impl SimilarityIndex for LinearScan {
    fn nearest(
        &self,
        query: &DVector<f32>,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)> {
        let candidates: Vec<(MovieId, f32, usize)> = (0..self.features.len())
            .into_par_iter()
            .filter_map(|pos| {
                let id = self.features.id_at(pos);
                if exclude.contains(&id) {
                    return None;
                }
                let score = cosine(query, self.features.vector(pos));
                if score > 0.0 {
                    Some((id, score, pos))
                } else {
                    None
                }
            })
            .collect();

        utils::top_k_by_score(candidates, k)
    }
}

/// Postings over non-zero vector terms. For the non-negative TF-IDF
/// vectors used here it returns exactly what the scan returns, touching
/// only movies that share at least one term with the query.
pub struct InvertedIndex {
    features: Arc<FeatureTable>,
    postings: Vec<Vec<(usize, f32)>>,
}

impl InvertedIndex {
    pub fn build(features: Arc<FeatureTable>) -> Self {
        let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); features.dimension()];

        for pos in 0..features.len() {
            let vector = features.vector(pos);
            for (term, &weight) in vector.iter().enumerate() {
                if weight != 0.0 {
                    postings[term].push((pos, weight));
                }
            }
        }

        Self { features, postings }
    }
}

impl SimilarityIndex for InvertedIndex {
    fn nearest(
        &self,
        query: &DVector<f32>,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)> {
        let norm = query.norm();
        if norm == 0.0 {
            return Vec::new();
        }

        // Vectors are unit length, so accumulated dot products are cosines
        // once the query side is normalized.
        let mut accumulated: HashMap<usize, f32> = HashMap::new();
        for (term, &weight) in query.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            for &(pos, posting_weight) in &self.postings[term] {
                *accumulated.entry(pos).or_insert(0.0) += (weight / norm) * posting_weight;
            }
        }

        let candidates: Vec<(MovieId, f32, usize)> = accumulated
            .into_iter()
            .filter_map(|(pos, score)| {
                let id = self.features.id_at(pos);
                if exclude.contains(&id) || score <= 0.0 {
                    None
                } else {
                    Some((id, score, pos))
                }
            })
            .collect();

        utils::top_k_by_score(candidates, k)
    }
}
