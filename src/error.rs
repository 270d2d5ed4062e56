// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required configuration is absent or malformed.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The token exchange was rejected or returned no access token.
    #[error("Strava authentication failed: {body}")]
    Authentication { body: String },

    /// The activities endpoint returned an error or an undecodable page.
    #[error("Strava activity fetch failed: {body}")]
    Fetch { body: String },

    /// The fetched dataset lacks fields needed to chart it.
    #[error("Activity data is missing required fields: {0}")]
    DataShape(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn authentication(body: impl Into<String>) -> Self {
        AppError::Authentication { body: body.into() }
    }

    pub(crate) fn fetch(body: impl Into<String>) -> Self {
        AppError::Fetch { body: body.into() }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Configuration(err) => {
                tracing::error!(error = %err, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", None)
            }
            AppError::Authentication { body } => {
                (StatusCode::BAD_GATEWAY, "strava_auth_error", Some(body.clone()))
            }
            AppError::Fetch { body } => {
                (StatusCode::BAD_GATEWAY, "strava_fetch_error", Some(body.clone()))
            }
            AppError::DataShape(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "data_shape_error",
                Some(msg.clone()),
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
