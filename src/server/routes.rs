use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::damage::{calculate, DamageCalculationResult};
use crate::data::{Character, CharacterRepository};
use crate::server::api::{self, ApiError, HealthResponse, RootResponse};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<CharacterRepository>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(repository: Arc<CharacterRepository>, settings: Settings) -> Self {
        Self {
            repository,
            settings: Arc::new(settings),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/calculate-damage", post(calculate_damage))
        .route("/api/characters", get(list_characters))
        .route("/api/characters/:character_id", get(get_character))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Credentials are allowed, so a `*` entry mirrors the caller's origin instead of
/// sending a literal wildcard.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(api::root_payload(&state.settings))
}

async fn health() -> Json<HealthResponse> {
    Json(api::health_payload())
}

async fn calculate_damage(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DamageCalculationResult>, ApiError> {
    let request = api::parse_calculation_request(&body)?;

    let character = state
        .repository
        .get_character(&request.character_id)
        .await
        .ok_or_else(|| ApiError::CharacterNotFound(request.character_id.clone()))?;

    let result = calculate(&request, &character);
    if !result.is_finite() {
        return Err(ApiError::Calculation(format!(
            "non-finite result for character '{}' (attack_count={})",
            character.id,
            request.attack_count()
        )));
    }

    Ok(Json(result))
}

async fn list_characters(State(state): State<AppState>) -> Json<Vec<Character>> {
    Json(state.repository.get_characters().await)
}

async fn get_character(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> Result<Json<Character>, ApiError> {
    match state.repository.get_character(&character_id).await {
        Some(character) => Ok(Json(character)),
        None => Err(ApiError::CharacterNotFound(character_id)),
    }
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(api::route_not_found_payload()))
}
