use std::any::Any;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    db::entities::{artist, venue},
    error::AppError,
    services::{mutations, queries, FormBag},
    state::AppState,
    templates::{
        artist_detail_page, artist_form_page, artists_page, home_page, not_found_page,
        search_page, server_error_page, show_form_page, shows_page, venue_detail_page,
        venue_form_page, venues_page, Flash,
    },
};

use super::request_time;

/// Error rendered as a page: 404 and 500 get their own pages, validation
/// failures land on the home page with a flash.
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let markup = match status {
            StatusCode::NOT_FOUND => not_found_page(),
            StatusCode::UNPROCESSABLE_ENTITY => {
                home_page(Some(&Flash::error(self.0.public_message())))
            }
            _ => {
                tracing::error!("Request failed: {}", self.0);
                server_error_page()
            }
        };
        (status, Html(markup.into_string())).into_response()
    }
}

type PageResult<T> = std::result::Result<T, PageError>;

type FormPairs = Form<Vec<(String, String)>>;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

pub async fn index() -> Html<String> {
    Html(home_page(None).into_string())
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(not_found_page().into_string()))
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(server_error_page().into_string()),
    )
        .into_response()
}

fn submitted_name(form: &FormBag) -> String {
    form.scalar("name")
        .ok()
        .flatten()
        .unwrap_or_default()
        .to_string()
}

/// Home page carrying the outcome of a create: 201 on success, the error's
/// status otherwise.
fn created_page(result: crate::error::Result<i32>, success: String, failure: String) -> Response {
    match result {
        Ok(_) => (
            StatusCode::CREATED,
            Html(home_page(Some(&Flash::success(success))).into_string()),
        )
            .into_response(),
        Err(e) => {
            let flash = Flash::error(format!("{} {}", failure, e.public_message()));
            (e.status(), Html(home_page(Some(&flash)).into_string())).into_response()
        }
    }
}

/// Home page after a delete. Served in place so htmx can swap the body.
fn deleted_page(message: &str) -> Html<String> {
    Html(home_page(Some(&Flash::success(message))).into_string())
}

//  Venues
//  ----------------------------------------------------------------

pub async fn venues(State(state): State<AppState>) -> PageResult<Html<String>> {
    let areas = queries::list_venue_areas(&state.db, request_time()).await?;
    Ok(Html(venues_page(&areas).into_string()))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> PageResult<Html<String>> {
    let results = queries::search_venues(&state.db, &search.search_term, request_time()).await?;
    Ok(Html(search_page("/venues", &results).into_string()))
}

pub async fn show_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let detail = queries::venue_detail(&state.db, id, request_time()).await?;
    Ok(Html(venue_detail_page(&detail).into_string()))
}

pub async fn create_venue_form() -> Html<String> {
    Html(venue_form_page("List a new venue", "/venues/create", &FormBag::default(), None).into_string())
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    Form(pairs): FormPairs,
) -> Response {
    let form = FormBag::from_pairs(pairs);
    let name = submitted_name(&form);
    let result = mutations::create_venue(&state.db, &form).await;

    created_page(
        result,
        format!("Venue {name} was successfully listed!"),
        format!("An error occurred. Venue {name} could not be listed."),
    )
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    mutations::delete_venue(&state.db, id).await?;
    Ok(deleted_page("Venue was successfully deleted!"))
}

pub async fn edit_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let venue = queries::find_venue(&state.db, id).await?;
    let action = format!("/venues/{id}/edit");
    Ok(Html(
        venue_form_page("Edit venue", &action, &venue_form_values(&venue), None).into_string(),
    ))
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): FormPairs,
) -> PageResult<Response> {
    let form = FormBag::from_pairs(pairs);
    match mutations::update_venue(&state.db, id, &form).await {
        Ok(_) => Ok(Redirect::to(&format!("/venues/{id}")).into_response()),
        Err(AppError::Validation(msg)) => {
            let flash = Flash::error(format!(
                "An error occurred. Venue {} could not be updated: {}",
                submitted_name(&form),
                msg
            ));
            let action = format!("/venues/{id}/edit");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(venue_form_page("Edit venue", &action, &form, Some(&flash)).into_string()),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn venue_form_values(venue: &venue::Model) -> FormBag {
    let mut pairs = vec![
        ("name".to_string(), venue.name.clone()),
        ("city".to_string(), venue.city.clone()),
        ("state".to_string(), venue.state.clone()),
        ("address".to_string(), venue.address.clone()),
        ("phone".to_string(), venue.phone.clone()),
        ("image_link".to_string(), venue.image_link.clone()),
        ("facebook_link".to_string(), venue.facebook_link.clone()),
        ("website".to_string(), venue.website.clone()),
        ("seeking_description".to_string(), venue.seeking_description.clone()),
    ];
    if venue.seeking_talent {
        pairs.push(("seeking_talent".to_string(), "y".to_string()));
    }
    pairs.extend(venue.genres.iter().map(|g| ("genres".to_string(), g.to_string())));
    FormBag::from_pairs(pairs)
}

//  Artists
//  ----------------------------------------------------------------

pub async fn artists(State(state): State<AppState>) -> PageResult<Html<String>> {
    let artists = queries::list_artists(&state.db).await?;
    Ok(Html(artists_page(&artists).into_string()))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> PageResult<Html<String>> {
    let results = queries::search_artists(&state.db, &search.search_term, request_time()).await?;
    Ok(Html(search_page("/artists", &results).into_string()))
}

pub async fn show_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let detail = queries::artist_detail(&state.db, id, request_time()).await?;
    Ok(Html(artist_detail_page(&detail).into_string()))
}

pub async fn create_artist_form() -> Html<String> {
    Html(artist_form_page("List a new artist", "/artists/create", &FormBag::default(), None).into_string())
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    Form(pairs): FormPairs,
) -> Response {
    let form = FormBag::from_pairs(pairs);
    let name = submitted_name(&form);
    let result = mutations::create_artist(&state.db, &form).await;

    created_page(
        result,
        format!("Artist {name} was successfully listed!"),
        format!("An error occurred. Artist {name} could not be listed."),
    )
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    mutations::delete_artist(&state.db, id).await?;
    Ok(deleted_page("Artist was successfully deleted!"))
}

pub async fn edit_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let artist = queries::find_artist(&state.db, id).await?;
    let action = format!("/artists/{id}/edit");
    Ok(Html(
        artist_form_page("Edit artist", &action, &artist_form_values(&artist), None).into_string(),
    ))
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): FormPairs,
) -> PageResult<Response> {
    let form = FormBag::from_pairs(pairs);
    match mutations::update_artist(&state.db, id, &form).await {
        Ok(_) => Ok(Redirect::to(&format!("/artists/{id}")).into_response()),
        Err(AppError::Validation(msg)) => {
            let flash = Flash::error(format!(
                "An error occurred. Artist {} could not be updated: {}",
                submitted_name(&form),
                msg
            ));
            let action = format!("/artists/{id}/edit");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(artist_form_page("Edit artist", &action, &form, Some(&flash)).into_string()),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn artist_form_values(artist: &artist::Model) -> FormBag {
    let mut pairs = vec![
        ("name".to_string(), artist.name.clone()),
        ("city".to_string(), artist.city.clone()),
        ("state".to_string(), artist.state.clone()),
        ("phone".to_string(), artist.phone.clone()),
        ("image_link".to_string(), artist.image_link.clone()),
        ("facebook_link".to_string(), artist.facebook_link.clone()),
        ("website".to_string(), artist.website.clone()),
        ("seeking_description".to_string(), artist.seeking_description.clone()),
    ];
    if artist.seeking_venue {
        pairs.push(("seeking_venue".to_string(), "y".to_string()));
    }
    pairs.extend(artist.genres.iter().map(|g| ("genres".to_string(), g.to_string())));
    FormBag::from_pairs(pairs)
}

//  Shows
//  ----------------------------------------------------------------

pub async fn shows(State(state): State<AppState>) -> PageResult<Html<String>> {
    let shows = queries::list_shows(&state.db).await?;
    Ok(Html(shows_page(&shows).into_string()))
}

pub async fn create_show_form() -> Html<String> {
    Html(show_form_page(&FormBag::default(), None).into_string())
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    Form(pairs): FormPairs,
) -> Response {
    let form = FormBag::from_pairs(pairs);
    let result = mutations::create_show(&state.db, &form).await;

    created_page(
        result,
        "Show was successfully listed!".to_string(),
        "An error occurred. Show could not be listed.".to_string(),
    )
}
