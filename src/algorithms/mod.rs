use std::collections::HashSet;
use std::sync::Arc;

use nalgebra::DVector;

use crate::catalog::Catalog;
use crate::config::{CollaborativeConfig, CollaborativeStrategy};
use crate::error::Result;
use crate::models::MovieId;
use crate::ratings::RatingStore;

pub mod collaborative;
pub mod factorization;
pub mod similarity;
pub mod vectorizer;

pub use collaborative::ItemItemModel;
pub use factorization::LatentFactorModel;
pub use similarity::{InvertedIndex, LinearScan, SimilarityIndex};
pub use vectorizer::FeatureTable;

/// Candidate generation from rating behavior. Implementations are built
/// once from the read-only store and answer per-seed queries.
pub trait CollaborativeModel: Send + Sync {
    /// Up to `k` movies most similar to `seed` in user behavior, highest
    /// score first, ties broken by catalog insertion order. Movies in
    /// `exclude` never appear.
    fn candidates(
        &self,
        seed: MovieId,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)>;

    /// Whether the model has any usable signal for `seed`.
    fn has_signal(&self, seed: MovieId) -> bool;
}

pub fn build_collaborative_model(
    store: &RatingStore,
    catalog: &Catalog,
    config: &CollaborativeConfig,
) -> Result<Arc<dyn CollaborativeModel>> {
    match config.strategy {
        CollaborativeStrategy::ItemItem => {
            Ok(Arc::new(ItemItemModel::build(store, catalog, config)))
        }
        CollaborativeStrategy::LatentFactor => {
            Ok(Arc::new(LatentFactorModel::train(store, catalog, config)?))
        }
    }
}

pub(crate) fn cosine(a: &DVector<f32>, b: &DVector<f32>) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        a.dot(b) / (norm_a * norm_b)
    }
}
