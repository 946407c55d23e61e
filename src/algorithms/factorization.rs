use std::collections::{HashMap, HashSet};

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{cosine, CollaborativeModel};
use crate::catalog::Catalog;
use crate::config::CollaborativeConfig;
use crate::error::{RecError, Result};
use crate::models::{MovieId, UserId};
use crate::ratings::RatingStore;
use crate::utils;

const USER_SEED_SALT: u64 = 0x75;
const ITEM_SEED_SALT: u64 = 0x69;

/// Latent factor model: user and item embeddings fit by SGD on
/// mean-centered ratings; candidates are ranked by cosine between item
/// embeddings, damped by rating count so cold items don't spike.
///
/// Embeddings are initialized from the id itself, so training the same
/// store twice produces the same model.
pub struct LatentFactorModel {
    item_embeddings: HashMap<MovieId, DVector<f32>>,
    rating_counts: HashMap<MovieId, usize>,
    positions: HashMap<MovieId, usize>,
    shrinkage: f32,
}

impl LatentFactorModel {
    pub fn train(
        store: &RatingStore,
        catalog: &Catalog,
        config: &CollaborativeConfig,
    ) -> Result<Self> {
        let dim = config.embedding_dim;
        if dim == 0 {
            return Err(RecError::Computation(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        let learning_rate = config.learning_rate as f32;
        let regularization = config.regularization as f32;
        let global_mean = store.global_mean();

        let mut user_embeddings: HashMap<UserId, DVector<f32>> = HashMap::new();
        let mut item_embeddings: HashMap<MovieId, DVector<f32>> = HashMap::new();

        for _ in 0..config.epochs {
            for rating in store.ratings() {
                let user = user_embeddings
                    .entry(rating.user_id)
                    .or_insert_with(|| seeded_embedding(USER_SEED_SALT, rating.user_id, dim))
                    .clone();
                let item = item_embeddings
                    .entry(rating.movie_id)
                    .or_insert_with(|| seeded_embedding(ITEM_SEED_SALT, rating.movie_id, dim))
                    .clone();

                let target = rating.value - global_mean;
                let error = target - user.dot(&item);

                let user_gradient = &item * error - &user * regularization;
                let item_gradient = &user * error - &item * regularization;

                user_embeddings
                    .insert(rating.user_id, &user + user_gradient * learning_rate);
                item_embeddings
                    .insert(rating.movie_id, &item + item_gradient * learning_rate);
            }
        }

        for embedding in item_embeddings.values() {
            if embedding.iter().any(|v| !v.is_finite()) {
                return Err(RecError::Computation(
                    "training diverged: non-finite item embedding".to_string(),
                ));
            }
        }

        let rating_counts = item_embeddings
            .keys()
            .map(|&id| (id, store.rating_count(id)))
            .collect();
        let positions = catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();

        Ok(Self {
            item_embeddings,
            rating_counts,
            positions,
            shrinkage: config.shrinkage,
        })
    }

    pub fn embedding(&self, movie_id: MovieId) -> Option<&DVector<f32>> {
        self.item_embeddings.get(&movie_id)
    }
}

impl CollaborativeModel for LatentFactorModel {
    fn candidates(
        &self,
        seed: MovieId,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)> {
        let seed_embedding = match self.item_embeddings.get(&seed) {
            Some(embedding) => embedding,
            None => return Vec::new(),
        };

        let candidates: Vec<(MovieId, f32, usize)> = self
            .item_embeddings
            .iter()
            .filter_map(|(&movie_id, embedding)| {
                if movie_id == seed || exclude.contains(&movie_id) {
                    return None;
                }
                let position = *self.positions.get(&movie_id)?;

                let count = self.rating_counts.get(&movie_id).copied().unwrap_or(0) as f32;
                let score = cosine(seed_embedding, embedding) * (count / (count + self.shrinkage));
                if score > 0.0 {
                    Some((movie_id, score, position))
                } else {
                    None
                }
            })
            .collect();

        utils::top_k_by_score(candidates, k)
    }

    fn has_signal(&self, seed: MovieId) -> bool {
        self.item_embeddings.contains_key(&seed)
    }
}

// Xavier-uniform draw from an rng seeded by the id, for reproducibility.
fn seeded_embedding(salt: u64, id: u32, dim: usize) -> DVector<f32> {
    let seed = salt.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (id as u64);
    let mut rng = StdRng::seed_from_u64(seed);
    let limit = (6.0 / dim as f32).sqrt();
    DVector::from_iterator(dim, (0..dim).map(|_| rng.gen_range(-limit..limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollaborativeStrategy;
    use crate::models::{Movie, Rating, RatingScale};

    fn catalog() -> Catalog {
        let movies = (1..=4)
            .map(|id| {
                Movie::new(
                    id,
                    format!("Movie {id} (2000)"),
                    vec!["Drama".to_string()],
                )
            })
            .collect();
        Catalog::from_movies(movies).unwrap()
    }

    fn config() -> CollaborativeConfig {
        CollaborativeConfig {
            strategy: CollaborativeStrategy::LatentFactor,
            like_threshold: 3.5,
            shrinkage: 1.0,
            embedding_dim: 8,
            learning_rate: 0.01,
            regularization: 0.02,
            epochs: 20,
        }
    }

    fn store() -> RatingStore {
        // Users 1 and 2 agree on movies 1-3; movie 4 is rated by user 3 only.
        RatingStore::from_ratings(
            vec![
                Rating::new(1, 1, 5.0),
                Rating::new(1, 2, 4.5),
                Rating::new(1, 3, 1.0),
                Rating::new(2, 1, 4.5),
                Rating::new(2, 2, 5.0),
                Rating::new(2, 3, 0.5),
                Rating::new(3, 4, 3.0),
            ],
            &RatingScale::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_training_is_reproducible() {
        let store = store();
        let catalog = catalog();
        let a = LatentFactorModel::train(&store, &catalog, &config()).unwrap();
        let b = LatentFactorModel::train(&store, &catalog, &config()).unwrap();
        assert_eq!(a.embedding(1).unwrap(), b.embedding(1).unwrap());
    }

    #[test]
    fn test_rated_movies_have_embeddings() {
        let model = LatentFactorModel::train(&store(), &catalog(), &config()).unwrap();
        for id in 1..=4 {
            assert!(model.has_signal(id));
            assert_eq!(model.embedding(id).unwrap().len(), 8);
        }
        assert!(!model.has_signal(99));
    }

    #[test]
    fn test_candidates_exclude_seed_and_requested() {
        let model = LatentFactorModel::train(&store(), &catalog(), &config()).unwrap();
        let results = model.candidates(1, 10, &HashSet::from([1, 2]));
        assert!(!results.iter().any(|(id, _)| *id == 1 || *id == 2));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let mut config = config();
        config.embedding_dim = 0;
        assert!(LatentFactorModel::train(&store(), &catalog(), &config).is_err());
    }

    #[test]
    fn test_unrated_seed_yields_no_candidates() {
        let model = LatentFactorModel::train(&store(), &catalog(), &config()).unwrap();
        assert!(model.candidates(99, 5, &HashSet::new()).is_empty());
    }
}
