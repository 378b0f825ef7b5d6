#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
