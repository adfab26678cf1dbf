use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde_json::Value;

use crate::{
    error::Result,
    services::{
        mutations,
        queries::{self, ShowListing},
        FormBag,
    },
    state::AppState,
};

use super::MutationOutcome;

/// All shows, earliest first
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<ShowListing>>> {
    Ok(Json(queries::list_shows(&state.db).await?))
}

pub async fn create_show(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let result = match FormBag::from_json(body) {
        Ok(form) => mutations::create_show(&state.db, &form).await,
        Err(e) => Err(e),
    };
    MutationOutcome::respond(result, StatusCode::CREATED, "Show was successfully listed!".to_string())
}
