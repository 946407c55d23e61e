use serde::{Deserialize, Serialize};

use crate::models::RatingScale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub content: ContentConfig,
    pub collaborative: CollaborativeConfig,
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub index: IndexKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    LinearScan,
    Inverted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborativeConfig {
    pub strategy: CollaborativeStrategy,
    /// Ratings at or above this value count as a "like".
    pub like_threshold: f32,
    /// Shrinkage toward zero for sparsely co-rated movies.
    pub shrinkage: f32,
    pub embedding_dim: usize,
    pub learning_rate: f64,
    pub regularization: f64,
    pub epochs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborativeStrategy {
    ItemItem,
    LatentFactor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub max_top_n: usize,
    pub seed_count: usize,
    pub rating_scale: RatingScale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig {
                index: IndexKind::LinearScan,
            },
            collaborative: CollaborativeConfig {
                strategy: CollaborativeStrategy::ItemItem,
                like_threshold: 3.5,
                shrinkage: 5.0,
                embedding_dim: 32,
                learning_rate: 0.01,
                regularization: 0.02,
                epochs: 10,
            },
            recommendation: RecommendationConfig {
                max_top_n: 100,
                seed_count: 3,
                rating_scale: RatingScale::default(),
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CINEREC"))
            .build()
            .map_err(|e| crate::error::RecError::InvalidRequest(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| crate::error::RecError::InvalidRequest(e.to_string()))
    }
}
