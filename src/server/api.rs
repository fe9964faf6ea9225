use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Settings;
use crate::damage::{DamageCalculationRequest, ValidationIssue};

pub const SERVICE_NAME: &str = "dokkan-damage-calculator-api";

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: &'static str,
    pub docs_url: &'static str,
    pub redoc_url: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("character '{0}' not found")]
    CharacterNotFound(String),

    #[error("damage calculation failed: {0}")]
    Calculation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse {
                    status: "error",
                    message: "Validation failed",
                    errors,
                }),
            )
                .into_response(),
            Self::CharacterNotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    code: "CHARACTER_NOT_FOUND",
                    message: format!("Character ID '{id}' was not found"),
                    details: Some("Specify a valid character ID".to_string()),
                }),
            )
                .into_response(),
            Self::Calculation(details) => {
                tracing::error!(%details, "damage calculation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        code: "CALCULATION_ERROR",
                        message: "An error occurred while calculating damage".to_string(),
                        details: Some(details),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Parse and range-check a calculation body. Malformed JSON is reported against the
/// `body` field; missing, mistyped and out-of-range values against the offending field.
pub fn parse_calculation_request(body: &[u8]) -> Result<DamageCalculationRequest, ApiError> {
    let raw: Value = serde_json::from_slice(body).map_err(|err| {
        ApiError::Validation(vec![ValidationIssue::new("body", format!("Invalid JSON: {err}"))])
    })?;
    let request = DamageCalculationRequest::from_json(&raw).map_err(ApiError::Validation)?;
    request.validate().map_err(ApiError::Validation)?;
    Ok(request)
}

pub fn health_payload() -> HealthResponse {
    HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    }
}

pub fn root_payload(settings: &Settings) -> RootResponse {
    RootResponse {
        message: format!("Welcome to the {}", settings.app_name),
        version: settings.app_version.clone(),
        status: "running",
        docs_url: "/docs",
        redoc_url: "/redoc",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteNotFound {
    pub status: &'static str,
    pub message: &'static str,
}

pub fn route_not_found_payload() -> RouteNotFound {
    RouteNotFound {
        status: "error",
        message: "Route not found",
    }
}
