use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::build_info;
use crate::error::StoreError;
use crate::profile::{Profile, ProfileDraft, ProfilePatch};
use crate::report::{CurrentView, ProfileListing, StatusReport};
use crate::store::ProfileStore;

use super::error::ApiError;
use super::API_PREFIX;

pub type SharedStore = Arc<ProfileStore>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub message: String,
    pub applied_profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: StatusReport,
}

/// Run a store call on the blocking pool; the store lock and disk I/O are sync.
async fn with_store<T, F>(store: &SharedStore, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&ProfileStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    Ok(tokio::task::spawn_blocking(move || op(store.as_ref())).await??)
}

// ---------------------------------------------------------------------------
// Service endpoints
// ---------------------------------------------------------------------------

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "ccman",
        "version": build_info::service_version(),
        "description": "Claude Code API profile manager",
        "status": "running",
        "endpoints": {
            "api_config": API_PREFIX,
            "health": "/health"
        }
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Profile endpoints
// ---------------------------------------------------------------------------

pub async fn list_profiles(
    State(store): State<SharedStore>,
) -> Result<Json<ProfileListing>, ApiError> {
    Ok(Json(with_store(&store, |s| s.list_report()).await?))
}

pub async fn create_profile(
    State(store): State<SharedStore>,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(with_store(&store, move |s| s.create(draft)).await?))
}

pub async fn update_profile(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<ActionResponse>, ApiError> {
    let found = with_store(&store, move |s| s.update(&id, &patch)).await?;
    if !found {
        return Err(ApiError::NotFound);
    }
    Ok(ActionResponse::ok("profile updated"))
}

pub async fn delete_profile(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let found = with_store(&store, move |s| s.delete(&id)).await?;
    if !found {
        return Err(ApiError::NotFound);
    }
    Ok(ActionResponse::ok("profile deleted"))
}

pub async fn apply_profile(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let applied = with_store(&store, move |s| s.activate(&id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ApplyResponse {
        success: true,
        message: format!("profile '{}' is now active in Claude Code", applied.name),
        applied_profile: applied,
    }))
}

pub async fn current(State(store): State<SharedStore>) -> Result<Json<CurrentView>, ApiError> {
    let current = with_store(&store, |s| s.current()).await?;
    Ok(Json(CurrentView::from(current)))
}

pub async fn status(State(store): State<SharedStore>) -> Result<Json<StatusResponse>, ApiError> {
    let report = with_store(&store, |s| s.status()).await?;
    Ok(Json(StatusResponse {
        status: "running",
        report,
    }))
}

pub async fn backup(State(store): State<SharedStore>) -> Result<Json<ActionResponse>, ApiError> {
    let path = with_store(&store, |s| s.backup()).await?;
    Ok(ActionResponse::ok(format!(
        "profiles backed up to {}",
        path.display()
    )))
}
