use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use giftflake::{GiftClass, GiftId, GiftIdGenerator, SystemClock, TimeSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state: the process-wide generator behind the routes.
///
/// Generic over the clock so tests can pin or regress time; production
/// uses [`SystemClock`].
pub struct AppState<T = SystemClock> {
    pub generator: Arc<GiftIdGenerator<T>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Routing tag for the new identifier; defaults to `toy`.
    #[serde(default)]
    pub gift_class: Option<GiftClass>,
}

/// Decoded view of an identifier, shared by the generate and decode
/// responses. The identifier itself travels as a decimal string.
#[derive(Debug, Serialize)]
pub struct GiftIdResponse {
    pub id: GiftId,
    pub workshop_id: u64,
    pub timestamp_ms: i64,
    pub sequence: u64,
    pub gift_class: GiftClass,
}

impl From<GiftId> for GiftIdResponse {
    fn from(id: GiftId) -> Self {
        Self {
            id,
            workshop_id: id.workshop_id(),
            timestamp_ms: id.unix_millis(),
            sequence: id.sequence(),
            gift_class: id.gift_class(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub workshop_id: u16,
}

pub fn router<T>(state: AppState<T>) -> Router
where
    T: TimeSource + Send + Sync + 'static,
{
    Router::new()
        .route("/api/v1/gift-id/generate", post(generate::<T>))
        .route("/api/v1/gift-id/{id}/decode", get(decode))
        .route("/health", get(health::<T>))
        .with_state(state)
}

async fn generate<T>(
    State(state): State<AppState<T>>,
    payload: Option<Json<GenerateRequest>>,
) -> Result<Json<GiftIdResponse>, ApiError>
where
    T: TimeSource + Send + Sync + 'static,
{
    let gift_class = payload
        .and_then(|Json(request)| request.gift_class)
        .unwrap_or(GiftClass::Toy);

    let id = state.generator.generate(gift_class)?;
    Ok(Json(GiftIdResponse::from(id)))
}

async fn decode(Path(id): Path<String>) -> Result<Json<GiftIdResponse>, ApiError> {
    let id: GiftId = id.parse()?;
    Ok(Json(GiftIdResponse::from(id)))
}

async fn health<T>(State(state): State<AppState<T>>) -> Json<HealthResponse>
where
    T: TimeSource + Send + Sync + 'static,
{
    Json(HealthResponse {
        status: "ok",
        workshop_id: state.generator.workshop_id(),
    })
}
