use std::collections::{HashMap, HashSet};

use super::CollaborativeModel;
use crate::catalog::Catalog;
use crate::config::CollaborativeConfig;
use crate::models::{MovieId, UserId};
use crate::ratings::RatingStore;
use crate::utils;

/// Item-item co-rating similarity.
///
/// Two movies are similar when the users who liked one tend to have liked
/// the other. Scores are co-like overlap normalized by the geometric mean
/// of both movies' liker counts, so globally popular movies don't win by
/// volume alone, and shrunk by `overlap / (overlap + shrinkage)` so a
/// handful of shared likes can't dominate.
pub struct ItemItemModel {
    likers: HashMap<MovieId, Vec<UserId>>,
    likes_by_user: HashMap<UserId, Vec<MovieId>>,
    positions: HashMap<MovieId, usize>,
    shrinkage: f32,
}

impl ItemItemModel {
    pub fn build(store: &RatingStore, catalog: &Catalog, config: &CollaborativeConfig) -> Self {
        let mut likers: HashMap<MovieId, Vec<UserId>> = HashMap::new();
        let mut likes_by_user: HashMap<UserId, Vec<MovieId>> = HashMap::new();

        for rating in store.ratings() {
            if rating.value >= config.like_threshold {
                likers.entry(rating.movie_id).or_default().push(rating.user_id);
                likes_by_user
                    .entry(rating.user_id)
                    .or_default()
                    .push(rating.movie_id);
            }
        }

        let positions = catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();

        Self {
            likers,
            likes_by_user,
            positions,
            shrinkage: config.shrinkage,
        }
    }

    pub fn liker_count(&self, movie_id: MovieId) -> usize {
        self.likers.get(&movie_id).map(Vec::len).unwrap_or(0)
    }
}

impl CollaborativeModel for ItemItemModel {
    fn candidates(
        &self,
        seed: MovieId,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)> {
        let seed_likers = match self.likers.get(&seed) {
            Some(users) if !users.is_empty() => users,
            _ => return Vec::new(),
        };

        let mut overlap: HashMap<MovieId, u32> = HashMap::new();
        for user in seed_likers {
            if let Some(liked) = self.likes_by_user.get(user) {
                for &movie_id in liked {
                    if movie_id != seed {
                        *overlap.entry(movie_id).or_insert(0) += 1;
                    }
                }
            }
        }

        let seed_count = seed_likers.len() as f32;
        let candidates: Vec<(MovieId, f32, usize)> = overlap
            .into_iter()
            .filter_map(|(movie_id, count)| {
                if exclude.contains(&movie_id) {
                    return None;
                }
                let position = *self.positions.get(&movie_id)?;
                let other_count = self.liker_count(movie_id) as f32;
                let count = count as f32;

                let similarity = count / (seed_count * other_count).sqrt();
                let score = similarity * (count / (count + self.shrinkage));
                Some((movie_id, score, position))
            })
            .collect();

        utils::top_k_by_score(candidates, k)
    }

    fn has_signal(&self, seed: MovieId) -> bool {
        self.liker_count(seed) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movie, Rating, RatingScale};

    fn catalog() -> Catalog {
        let movies = (1..=5)
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
            strategy: crate::config::CollaborativeStrategy::ItemItem,
            like_threshold: 3.5,
            shrinkage: 1.0,
            embedding_dim: 8,
            learning_rate: 0.01,
            regularization: 0.02,
            epochs: 5,
        }
    }

    fn store(rows: Vec<Rating>) -> RatingStore {
        RatingStore::from_ratings(rows, &RatingScale::default()).unwrap()
    }

    #[test]
    fn test_co_liked_movies_score_highest() {
        // Users 1..=3 like movies 1 and 2 together; only user 3 also likes 3.
        let store = store(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 4.5),
            Rating::new(2, 1, 4.0),
            Rating::new(2, 2, 4.0),
            Rating::new(3, 1, 5.0),
            Rating::new(3, 2, 5.0),
            Rating::new(3, 3, 4.0),
        ]);
        let model = ItemItemModel::build(&store, &catalog(), &config());

        let results = model.candidates(1, 5, &HashSet::from([1]));
        assert_eq!(results[0].0, 2);
        assert!(results[0].1 > results[1].1);
        assert_eq!(results[1].0, 3);
    }

    #[test]
    fn test_low_ratings_are_not_likes() {
        let store = store(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 1.0),
            Rating::new(2, 1, 4.0),
            Rating::new(2, 2, 2.0),
        ]);
        let model = ItemItemModel::build(&store, &catalog(), &config());

        assert!(model.candidates(1, 5, &HashSet::from([1])).is_empty());
        assert!(!model.has_signal(2));
    }

    #[test]
    fn test_unrated_seed_has_no_signal() {
        let store = store(vec![Rating::new(1, 1, 5.0)]);
        let model = ItemItemModel::build(&store, &catalog(), &config());
        assert!(!model.has_signal(4));
        assert!(model.candidates(4, 5, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_shrinkage_dampens_single_shared_like() {
        // Movie 3 shares one liker with the seed; movie 2 shares three.
        let mut rows = vec![Rating::new(9, 3, 5.0), Rating::new(9, 1, 5.0)];
        for user in 1..=3 {
            rows.push(Rating::new(user, 1, 4.5));
            rows.push(Rating::new(user, 2, 4.5));
        }
        let model = ItemItemModel::build(&store(rows), &catalog(), &config());

        let results = model.candidates(1, 5, &HashSet::from([1]));
        assert_eq!(results[0].0, 2);
    }

    #[test]
    fn test_candidates_exclude_requested_ids() {
        let store = store(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 5.0),
            Rating::new(1, 3, 5.0),
        ]);
        let model = ItemItemModel::build(&store, &catalog(), &config());

        let results = model.candidates(1, 5, &HashSet::from([1, 2]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 3);
    }
}
