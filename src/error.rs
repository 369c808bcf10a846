use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::error;

use crate::pipeline::sheet::SheetError;

/// Application error taxonomy, mapped onto HTTP at the handler boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed spreadsheet structure. Nothing is ingested.
    #[error("error parsing attendance file: {0}")]
    Sheet(#[from] SheetError),

    /// Attendance already loaded for the same week window. Existing data
    /// is never overwritten by an upload.
    #[error(
        "attendance data already exists for this week ({week_start} to {week_end}), please upload data for a different week"
    )]
    DuplicateWindow {
        week_start: NaiveDate,
        week_end: NaiveDate,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failure inside a compliance derivation. When raised by the pass
    /// that follows an upload it is folded into the upload response
    /// instead of failing the request.
    #[error("compliance calculation failed: {0}")]
    Computation(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Sheet(_) | AppError::DuplicateWindow { .. } | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Computation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                "Internal Server Error".to_string()
            }
            AppError::Computation(_) => {
                error!(error = %self, "computation failure");
                self.to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message
        }))
    }
}
