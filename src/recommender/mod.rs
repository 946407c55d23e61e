use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{RecError, Result};
use crate::models::{Method, MovieId, Recommendation, RecommendationRequest};
use crate::utils::validation;
use crate::RecommenderState;

/// Per-request pipeline: validate, resolve seeds, query the selected
/// engine per seed, merge, rank, truncate. Holds only shared read-only
/// state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct Recommender {
    state: RecommenderState,
}

impl Recommender {
    pub fn new(state: RecommenderState) -> Self {
        Self { state }
    }

    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<Recommendation>> {
        validation::validate_request(request, &self.state.config.recommendation)?;

        let seeds = self.resolve_seeds(&request.seed_titles)?;
        let exclude: HashSet<MovieId> = seeds.iter().copied().collect();

        // Fixed per-seed fan-out: aggregate scores must not depend on the
        // requested top_n, or growing top_n could reorder the prefix.
        let fanout = self.state.config.recommendation.max_top_n;
        let per_seed = match request.method {
            Method::Content => self.content_candidates(&seeds, fanout, &exclude),
            Method::Collaborative => self.collaborative_candidates(&seeds, fanout, &exclude)?,
        };

        self.merge_and_rank(per_seed, request.top_n)
    }

    fn resolve_seeds(&self, seed_titles: &[String]) -> Result<Vec<MovieId>> {
        seed_titles
            .iter()
            .map(|title| {
                self.state
                    .catalog
                    .resolve_title(title)
                    .ok_or_else(|| RecError::SeedNotFound {
                        title: title.clone(),
                    })
            })
            .collect()
    }

    fn content_candidates(
        &self,
        seeds: &[MovieId],
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<Vec<(MovieId, f32)>> {
        seeds
            .iter()
            .map(|&seed| self.content_candidates_for(seed, k, exclude))
            .collect()
    }

    fn content_candidates_for(
        &self,
        seed: MovieId,
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Vec<(MovieId, f32)> {
        match self.state.features.vector_for(seed) {
            Some(query) => self.state.index.nearest(query, k, exclude),
            None => Vec::new(),
        }
    }

    fn collaborative_candidates(
        &self,
        seeds: &[MovieId],
        k: usize,
        exclude: &HashSet<MovieId>,
    ) -> Result<Vec<Vec<(MovieId, f32)>>> {
        if self.state.ratings.is_empty() {
            return Err(RecError::InsufficientData(
                "rating store is empty".to_string(),
            ));
        }

        let per_seed = seeds
            .iter()
            .map(|&seed| {
                if self.state.collaborative.has_signal(seed) {
                    self.state.collaborative.candidates(seed, k, exclude)
                } else {
                    warn!(
                        seed,
                        "seed has no rating signal, falling back to content similarity"
                    );
                    self.content_candidates_for(seed, k, exclude)
                }
            })
            .collect();

        Ok(per_seed)
    }

    fn merge_and_rank(
        &self,
        per_seed: Vec<Vec<(MovieId, f32)>>,
        top_n: usize,
    ) -> Result<Vec<Recommendation>> {
        // A candidate surfacing under several seeds accumulates its scores.
        let mut merged: HashMap<MovieId, f32> = HashMap::new();
        for candidates in per_seed {
            for (movie_id, score) in candidates {
                *merged.entry(movie_id).or_insert(0.0) += score;
            }
        }

        let mut ranked: Vec<(MovieId, f32, usize)> = Vec::with_capacity(merged.len());
        for (movie_id, score) in merged {
            if !score.is_finite() {
                return Err(RecError::Computation(format!(
                    "non-finite aggregate score for movie {movie_id}"
                )));
            }
            let position = self
                .state
                .catalog
                .position_of(movie_id)
                .ok_or_else(|| {
                    RecError::Computation(format!("candidate movie {movie_id} not in catalog"))
                })?;
            ranked.push((movie_id, score, position));
        }

        let top = crate::utils::top_k_by_score(ranked, top_n);
        debug!(returned = top.len(), requested = top_n, "ranked candidates");

        top.into_iter()
            .map(|(movie_id, score)| {
                let title = self.state.catalog.title_of(movie_id).ok_or_else(|| {
                    RecError::Computation(format!("candidate movie {movie_id} not in catalog"))
                })?;
                Ok(Recommendation {
                    title: title.to_string(),
                    score,
                })
            })
            .collect()
    }
}
