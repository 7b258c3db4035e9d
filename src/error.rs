use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    /// Any storage fault or data-integrity fault hit while reading the store.
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    /// Numeric severity class handed to the request layer.
    pub fn status_code(&self) -> u16 {
        match self {
            RosterError::BadRequest(_) => 400,
            RosterError::NotFound(_) => 404,
            _ => 500,
        }
    }

    pub fn is_data_access(&self) -> bool {
        matches!(self, RosterError::DataAccess(_))
    }
}

impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        RosterError::DataAccess(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
