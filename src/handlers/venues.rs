use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::Value;

use crate::{
    error::Result,
    services::{
        mutations,
        queries::{self, Area, SearchResults, VenueDetail},
        FormBag,
    },
    state::AppState,
};

use super::{request_time, MutationOutcome, SearchQuery};

/// Venues grouped by city and state
pub async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<Area>>> {
    Ok(Json(queries::list_venue_areas(&state.db, request_time()).await?))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let results = queries::search_venues(&state.db, &query.search_term, request_time()).await?;
    Ok(Json(results))
}

pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>> {
    Ok(Json(queries::venue_detail(&state.db, id, request_time()).await?))
}

pub async fn create_venue(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let result = match FormBag::from_json(body) {
        Ok(form) => mutations::create_venue(&state.db, &form).await,
        Err(e) => Err(e),
    };
    MutationOutcome::respond(result, StatusCode::CREATED, "Venue was successfully listed!".to_string())
}

pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    let result = match FormBag::from_json(body) {
        Ok(form) => mutations::update_venue(&state.db, id, &form).await.map(|v| v.id),
        Err(e) => Err(e),
    };
    MutationOutcome::respond(result, StatusCode::OK, "Venue was successfully updated!".to_string())
}

pub async fn delete_venue(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let result = mutations::delete_venue(&state.db, id).await.map(|_| id);
    MutationOutcome::respond(result, StatusCode::OK, "Venue was successfully deleted!".to_string())
}
