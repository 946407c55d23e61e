/// Errors surfaced by the recommendation core.
#[derive(thiserror::Error, Debug)]
pub enum RecError {
    #[error("seed title not found in catalog: {title}")]
    SeedNotFound { title: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("computation failed: {0}")]
    Computation(String),
}

pub type Result<T> = std::result::Result<T, RecError>;
