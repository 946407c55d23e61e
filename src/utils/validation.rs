use std::collections::HashSet;

use crate::config::RecommendationConfig;
use crate::error::{RecError, Result};
use crate::models::{Rating, RatingScale, RecommendationRequest};

pub fn validate_request(
    request: &RecommendationRequest,
    config: &RecommendationConfig,
) -> Result<()> {
    if request.top_n == 0 {
        return Err(RecError::InvalidRequest(
            "top_n must be greater than 0".to_string(),
        ));
    }

    if request.top_n > config.max_top_n {
        return Err(RecError::InvalidRequest(format!(
            "top_n too large: {} (max {})",
            request.top_n, config.max_top_n
        )));
    }

    if request.seed_titles.len() != config.seed_count {
        return Err(RecError::InvalidRequest(format!(
            "expected {} seed titles, got {}",
            config.seed_count,
            request.seed_titles.len()
        )));
    }

    let distinct: HashSet<&str> = request.seed_titles.iter().map(String::as_str).collect();
    if distinct.len() != request.seed_titles.len() {
        return Err(RecError::InvalidRequest(
            "seed titles must be distinct".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_rating(rating: &Rating, scale: &RatingScale) -> Result<()> {
    if !rating.value.is_finite() {
        return Err(RecError::Computation(format!(
            "rating for movie {} by user {} is not finite",
            rating.movie_id, rating.user_id
        )));
    }

    if !scale.contains(rating.value) {
        return Err(RecError::Computation(format!(
            "rating {} outside scale [{}, {}]",
            rating.value, scale.min, scale.max
        )));
    }

    Ok(())
}
