use std::collections::HashMap;

use crate::error::Result;
use crate::models::{MovieId, Rating, RatingScale, UserId};
use crate::utils::validation;

/// Sparse, append-only table of rating observations plus the indexes the
/// collaborative engine queries. Built once at startup, read-only after.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    by_movie: HashMap<MovieId, Vec<(UserId, f32)>>,
    by_user: HashMap<UserId, Vec<(MovieId, f32)>>,
    global_mean: f32,
}

impl RatingStore {
    /// Consumes rows the loader has already parsed; the timestamp column is
    /// expected to have been dropped upstream. Rejects malformed rows.
    pub fn from_ratings(rows: Vec<Rating>, scale: &RatingScale) -> Result<Self> {
        let mut by_movie: HashMap<MovieId, Vec<(UserId, f32)>> = HashMap::new();
        let mut by_user: HashMap<UserId, Vec<(MovieId, f32)>> = HashMap::new();
        let mut sum = 0.0f64;

        for rating in &rows {
            validation::validate_rating(rating, scale)?;
            by_movie
                .entry(rating.movie_id)
                .or_default()
                .push((rating.user_id, rating.value));
            by_user
                .entry(rating.user_id)
                .or_default()
                .push((rating.movie_id, rating.value));
            sum += rating.value as f64;
        }

        let global_mean = if rows.is_empty() {
            0.0
        } else {
            (sum / rows.len() as f64) as f32
        };

        Ok(Self {
            ratings: rows,
            by_movie,
            by_user,
            global_mean,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// All observations, in load order.
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn ratings_for(&self, movie_id: MovieId) -> &[(UserId, f32)] {
        self.by_movie
            .get(&movie_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn user_ratings(&self, user_id: UserId) -> &[(MovieId, f32)] {
        self.by_user
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rating_count(&self, movie_id: MovieId) -> usize {
        self.ratings_for(movie_id).len()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_by_movie_and_user() {
        let store = RatingStore::from_ratings(
            vec![
                Rating::new(1, 10, 4.0),
                Rating::new(1, 20, 2.5),
                Rating::new(2, 10, 5.0),
            ],
            &RatingScale::default(),
        )
        .unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.rating_count(10), 2);
        assert_eq!(store.rating_count(99), 0);
        assert_eq!(store.user_ratings(1).len(), 2);
        assert!((store.global_mean() - (4.0 + 2.5 + 5.0) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_out_of_scale_values() {
        let result = RatingStore::from_ratings(
            vec![Rating::new(1, 10, 6.0)],
            &RatingScale::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let result = RatingStore::from_ratings(
            vec![Rating::new(1, 10, f32::NAN)],
            &RatingScale::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_store() {
        let store = RatingStore::empty();
        assert!(store.is_empty());
        assert_eq!(store.global_mean(), 0.0);
    }
}
