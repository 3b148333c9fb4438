use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::{auth::AuthError, validation::ValidationErrors};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error")]
    DbErr(#[from] DbErr),

    #[error("Not found!")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unprocessable(String),

    #[error("{}", .0.message())]
    Validation(#[from] ValidationErrors),
    #[error("Could not authenticate: {0}")]
    Auth(#[from] AuthError),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Unprocessable(_) | Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Auth(AuthError::Sign(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct SerializableError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::Auth(e @ AuthError::Sign(_)) => {
                tracing::error!(%e, "Could not issue bearer token");
                "Could not sign token".to_string()
            }
            Error::Auth(e) => {
                tracing::debug!(%e, "Rejected request credentials");
                "Unauthenticated.".to_string()
            }
            Error::DbErr(e) => {
                tracing::error!(%e, "Database error while handling request");
                self.to_string()
            }
            _ => self.to_string(),
        };
        let errors = match self {
            Error::Validation(v) => Some(v.into_fields()),
            _ => None,
        };
        (status, Json(SerializableError { message, errors })).into_response()
    }
}
