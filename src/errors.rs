//! Centralised error type for the survey API.

use async_graphql::ErrorExtensions;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("{entity} matching query does not exist.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SurveyError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        SurveyError::NotFound { entity, id }
    }

    /// Machine-readable code placed in the GraphQL error `extensions`.
    pub fn code(&self) -> &'static str {
        match self {
            SurveyError::NotFound { .. } => "NOT_FOUND",
            SurveyError::InvalidId(_) => "BAD_USER_INPUT",
            _ => "INTERNAL",
        }
    }
}

/// Maps domain errors onto the GraphQL `errors` array. Data-store failures are
/// logged in full and reported to the client with a generic message.
impl ErrorExtensions for SurveyError {
    fn extend(&self) -> async_graphql::Error {
        let message = match self {
            SurveyError::NotFound { .. } | SurveyError::InvalidId(_) => self.to_string(),
            other => {
                error!(error = %other, "Request failed");
                "Internal server error".to_string()
            }
        };

        async_graphql::Error::new(message).extend_with(|_, ext| {
            ext.set("code", self.code());
            if let SurveyError::NotFound { id, .. } = self {
                ext.set("id", *id);
            }
        })
    }
}

pub type SurveyResult<T> = Result<T, SurveyError>;
