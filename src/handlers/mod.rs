pub mod artists;
pub mod health;
pub mod html;
pub mod shows;
pub mod venues;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{error::Result, state::AppState};

/// Result of a create/update/delete as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    Success { id: i32, message: String },
    Failure { reason: String },
}

impl MutationOutcome {
    /// Pairs the outcome with its status: `success_status` on success, the
    /// error's own status otherwise.
    pub fn respond(result: Result<i32>, success_status: StatusCode, message: String) -> Response {
        match result {
            Ok(id) => (success_status, Json(Self::Success { id, message })).into_response(),
            Err(e) => (
                e.status(),
                Json(Self::Failure {
                    reason: e.public_message(),
                }),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: String,
}

/// The instant a request classifies shows against.
pub fn request_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Venue endpoints
        .route("/venues", get(venues::list_venues).post(venues::create_venue))
        .route("/venues/search", get(venues::search_venues))
        .route(
            "/venues/:id",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )

        // Artist endpoints
        .route("/artists", get(artists::list_artists).post(artists::create_artist))
        .route("/artists/search", get(artists::search_artists))
        .route(
            "/artists/:id",
            get(artists::get_artist)
                .put(artists::update_artist)
                .delete(artists::delete_artist),
        )

        // Show endpoints
        .route("/shows", get(shows::list_shows).post(shows::create_show))
}

pub fn html_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(html::index))

        .route("/venues", get(html::venues))
        .route("/venues/search", post(html::search_venues))
        .route(
            "/venues/create",
            get(html::create_venue_form).post(html::create_venue_submission),
        )
        .route("/venues/:id", get(html::show_venue).delete(html::delete_venue))
        .route(
            "/venues/:id/edit",
            get(html::edit_venue).post(html::edit_venue_submission),
        )

        .route("/artists", get(html::artists))
        .route("/artists/search", post(html::search_artists))
        .route(
            "/artists/create",
            get(html::create_artist_form).post(html::create_artist_submission),
        )
        .route("/artists/:id", get(html::show_artist).delete(html::delete_artist))
        .route(
            "/artists/:id/edit",
            get(html::edit_artist).post(html::edit_artist_submission),
        )

        .route("/shows", get(html::shows))
        .route(
            "/shows/create",
            get(html::create_show_form).post(html::create_show_submission),
        )
}

/// Full application router with middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .merge(html_routes())
        .nest_service("/static", ServeDir::new("static"))
        .fallback(html::not_found)
        .layer(CatchPanicLayer::custom(html::handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
