//! Integration tests for the server-rendered pages
//!
//! Runs against the full router so the fallback and middleware stack are
//! exercised too.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Html,
    routing::get as get_route,
    Router,
};
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::util::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use fyyur::db::entities::{show, venue};
use fyyur::handlers;
use fyyur::handlers::html;
use fyyur::state::AppState;
use fyyur::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    handlers::router(state.clone())
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const HOP_FORM: &str = "name=Hop&city=SF&state=CA&phone=123&image_link=x\
    &facebook_link=y&website=z&genres=Jazz&genres=Swing";

#[tokio::test]
async fn test_home_page() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Fyyur"));
    assert!(html.contains("/venues/create"));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/nowhere/at/all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let html = body_text(response).await;
    assert!(html.contains("404"));
}

#[tokio::test]
async fn test_missing_venue_renders_not_found_page() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/venues/31337")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));
}

#[tokio::test]
async fn test_venues_page_lists_areas() {
    let state = setup_test_app_state().await;
    create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app.oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    let new_york = html.find("New York, NY").unwrap();
    let san_francisco = html.find("San Francisco, CA").unwrap();
    assert!(new_york < san_francisco);
    assert!(html.contains("The Musical Hop"));
}

#[tokio::test]
async fn test_search_form_submission() {
    let state = setup_test_app_state().await;
    create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form("/venues/search", "search_term=Music"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Number of search results for &quot;Music&quot;: 2"));
    assert!(!html.contains("The Dueling Pianos Bar"));
}

#[tokio::test]
async fn test_create_venue_form_renders_genre_choices() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/venues/create")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("name=\"genres\""));
    assert!(html.contains("Hip-Hop"));
}

#[tokio::test]
async fn test_create_venue_submission_success() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form("/venues/create", HOP_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let html = body_text(response).await;
    assert!(html.contains("Venue Hop was successfully listed!"));

    let venues = venue::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].genres.0, vec!["Jazz", "Swing"]);
    assert!(!venues[0].seeking_talent);
}

#[tokio::test]
async fn test_create_venue_submission_failure() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form("/venues/create", "name=Hop&city=SF"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("An error occurred. Venue Hop could not be listed."));
    assert_eq!(venue::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_artist_submission_with_seeking_checkbox() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form(
            "/artists/create",
            "name=Matt+Quevedo&city=New+York&state=NY&phone=300-400-5000\
             &image_link=x&facebook_link=y&website_link=z&genres=Jazz&seeking_venue=y",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_text(response)
        .await
        .contains("Artist Matt Quevedo was successfully listed!"));
}

#[tokio::test]
async fn test_edit_venue_form_is_prefilled() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(get(&format!("/venues/{}/edit", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("value=\"The Musical Hop\""));
    assert!(html.contains(&format!("action=\"/venues/{}/edit\"", venue.id)));
}

#[tokio::test]
async fn test_edit_venue_submission_redirects() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(&format!("/venues/{}/edit", venue.id), HOP_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/venues/{}", venue.id).as_str()
    );

    let updated = venue::Entity::find_by_id(venue.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Hop");
}

#[tokio::test]
async fn test_edit_venue_submission_invalid_rerenders_form() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(&format!("/venues/{}/edit", venue.id), "name=Hop"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("could not be updated"));

    let unchanged = venue::Entity::find_by_id(venue.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.name, "The Musical Hop");
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_delete_venue_renders_home_with_flash() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals", "San Francisco", "CA").await;
    create_test_show(&state.db, venue.id, artist.id, hours_from_now(24)).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(delete(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("flash-success"));
    assert!(html.contains("Venue was successfully deleted!"));

    assert_eq!(venue::Entity::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(show::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_artist_renders_home_with_flash() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Guns N Petals", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .clone()
        .oneshot(delete(&format!("/artists/{}", artist.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Artist was successfully deleted!"));

    let response = app
        .oneshot(delete(&format!("/artists/{}", artist.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));
}

#[tokio::test]
async fn test_venue_detail_page_shows_partitions() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let upcoming = create_test_artist(&state.db, "The Wild Sax Band", "San Francisco", "CA").await;
    let past = create_test_artist(&state.db, "Guns N Petals", "San Francisco", "CA").await;
    create_test_show(&state.db, venue.id, upcoming.id, hours_from_now(24)).await;
    create_test_show(&state.db, venue.id, past.id, hours_from_now(-24)).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(get(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    let upcoming_heading = html.find("Upcoming Shows").unwrap();
    let past_heading = html.find("Past Shows").unwrap();
    let upcoming_name = html.find("The Wild Sax Band").unwrap();
    let past_name = html.find("Guns N Petals").unwrap();
    assert!(upcoming_heading < upcoming_name && upcoming_name < past_heading);
    assert!(past_heading < past_name);
}

#[tokio::test]
async fn test_create_show_submission_unknown_venue() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Guns N Petals", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(
            "/shows/create",
            &format!("artist_id={}&venue_id=77&start_time=2035-04-01+20%3A00%3A00", artist.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("An error occurred. Show could not be listed."));
    assert_eq!(show::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_shows_page_lists_bookings() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals", "San Francisco", "CA").await;
    create_test_show(&state.db, venue.id, artist.id, hours_from_now(24)).await;

    let app = create_test_router(&state);
    let response = app.oneshot(get("/shows")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Guns N Petals"));
    assert!(html.contains("playing at"));
}

#[tokio::test]
async fn test_health_check() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_store_failure_renders_server_error() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    state.db.clone().close().await.unwrap();

    let response = app.clone().oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("500"));

    let response = app.oneshot(get("/api/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "Database error occurred");
}

async fn exploding_handler() -> Html<String> {
    panic!("template blew up")
}

#[tokio::test]
async fn test_handler_panic_renders_server_error() {
    let app = Router::new()
        .route("/explode", get_route(exploding_handler))
        .layer(CatchPanicLayer::custom(html::handle_panic));

    let response = app.oneshot(get("/explode")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let html = body_text(response).await;
    assert!(html.contains("500"));
    assert!(html.contains("Something went wrong"));
}
