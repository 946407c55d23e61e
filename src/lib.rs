pub mod algorithms;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod ratings;
pub mod recommender;
pub mod utils;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{RecError, Result};
pub use models::*;
pub use ratings::RatingStore;
pub use recommender::Recommender;

use std::sync::Arc;

use tracing::info;

use algorithms::{CollaborativeModel, FeatureTable, InvertedIndex, LinearScan, SimilarityIndex};
use config::IndexKind;

/// Shared read-only state behind every recommendation request: the
/// catalog and rating store plus the tables derived from them once at
/// startup. Cloning is cheap and clones share the same state.
#[derive(Clone)]
pub struct RecommenderState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub ratings: Arc<RatingStore>,
    pub features: Arc<FeatureTable>,
    pub index: Arc<dyn SimilarityIndex>,
    pub collaborative: Arc<dyn CollaborativeModel>,
}

impl RecommenderState {
    pub fn build(catalog: Catalog, ratings: RatingStore, config: Config) -> Result<Self> {
        if catalog.is_empty() {
            return Err(RecError::InsufficientData("catalog is empty".to_string()));
        }

        let config = Arc::new(config);
        let catalog = Arc::new(catalog);
        let ratings = Arc::new(ratings);

        let features = Arc::new(FeatureTable::build(&catalog));
        info!(
            movies = catalog.len(),
            terms = features.dimension(),
            "feature table built"
        );

        let index: Arc<dyn SimilarityIndex> = match config.content.index {
            IndexKind::LinearScan => Arc::new(LinearScan::new(features.clone())),
            IndexKind::Inverted => Arc::new(InvertedIndex::build(features.clone())),
        };

        let collaborative =
            algorithms::build_collaborative_model(&ratings, &catalog, &config.collaborative)?;
        info!(
            ratings = ratings.len(),
            users = ratings.user_count(),
            "collaborative model built"
        );

        Ok(Self {
            config,
            catalog,
            ratings,
            features,
            index,
            collaborative,
        })
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
