use serde::{Deserialize, Serialize};

pub type MovieId = u32;
pub type UserId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub value: f32,
}

/// Bounds of the rating scale the store accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Content,
    Collaborative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub seed_titles: Vec<String>,
    pub top_n: usize,
    pub method: Method,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub score: f32,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genres: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, value: f32) -> Self {
        Self {
            user_id,
            movie_id,
            value,
        }
    }
}

impl RatingScale {
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 0.5, max: 5.0 }
    }
}

impl RecommendationRequest {
    pub fn new(seed_titles: Vec<String>, top_n: usize, method: Method) -> Self {
        Self {
            seed_titles,
            top_n,
            method,
        }
    }
}
