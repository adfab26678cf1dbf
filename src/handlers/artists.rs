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
        queries::{self, ArtistDetail, ArtistSummary, SearchResults},
        FormBag,
    },
    state::AppState,
};

use super::{request_time, MutationOutcome, SearchQuery};

pub async fn list_artists(State(state): State<AppState>) -> Result<Json<Vec<ArtistSummary>>> {
    Ok(Json(queries::list_artists(&state.db).await?))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let results = queries::search_artists(&state.db, &query.search_term, request_time()).await?;
    Ok(Json(results))
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>> {
    Ok(Json(queries::artist_detail(&state.db, id, request_time()).await?))
}

pub async fn create_artist(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let result = match FormBag::from_json(body) {
        Ok(form) => mutations::create_artist(&state.db, &form).await,
        Err(e) => Err(e),
    };
    MutationOutcome::respond(result, StatusCode::CREATED, "Artist was successfully listed!".to_string())
}

pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    let result = match FormBag::from_json(body) {
        Ok(form) => mutations::update_artist(&state.db, id, &form).await.map(|a| a.id),
        Err(e) => Err(e),
    };
    MutationOutcome::respond(result, StatusCode::OK, "Artist was successfully updated!".to_string())
}

pub async fn delete_artist(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let result = mutations::delete_artist(&state.db, id).await.map(|_| id);
    MutationOutcome::respond(result, StatusCode::OK, "Artist was successfully deleted!".to_string())
}
