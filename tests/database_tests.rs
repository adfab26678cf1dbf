//! Database integration tests
//!
//! Exercises the entities plus the query and mutation layers directly:
//! - Foreign key constraints on shows
//! - Genres survive the JSON column
//! - Grouping, search and upcoming/past classification
//! - Transactional create/update/delete behaviour

use chrono::Duration;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use fyyur::db::entities::{artist, show, venue, Genres};
use fyyur::error::AppError;
use fyyur::services::{mutations, queries, FormBag};
use fyyur::test_utils::*;

fn form(items: &[(&str, &str)]) -> FormBag {
    FormBag::from_pairs(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

fn hop_form() -> FormBag {
    form(&[
        ("name", "Hop"),
        ("city", "SF"),
        ("state", "CA"),
        ("phone", "123"),
        ("image_link", "x"),
        ("facebook_link", "y"),
        ("website", "z"),
        ("genres", "Jazz"),
    ])
}

#[tokio::test]
async fn test_show_requires_existing_venue() {
    let db = setup_test_db().await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;

    let orphan = show::ActiveModel {
        venue_id: Set(99999),
        artist_id: Set(artist.id),
        start_time: Set(hours_from_now(1)),
        ..Default::default()
    };

    let result = orphan.insert(&db).await;
    assert!(result.is_err(), "Should fail to create show with invalid venue_id");
}

#[tokio::test]
async fn test_genres_round_trip_through_json_column() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;

    let mut active: venue::ActiveModel = venue.into();
    active.genres = Set(Genres(vec![
        "Jazz".to_string(),
        "Reggae".to_string(),
        "Swing".to_string(),
    ]));
    let updated = active.update(&db).await.expect("Update should succeed");

    let reloaded = venue::Entity::find_by_id(updated.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.genres.0, vec!["Jazz", "Reggae", "Swing"]);
}

#[tokio::test]
async fn test_create_venue_round_trip() {
    let db = setup_test_db().await;

    let id = mutations::create_venue(&db, &hop_form())
        .await
        .expect("create should succeed");
    let venue = queries::find_venue(&db, id).await.unwrap();

    assert_eq!(venue.name, "Hop");
    assert_eq!(venue.city, "SF");
    assert_eq!(venue.state, "CA");
    assert_eq!(venue.phone, "123");
    assert_eq!(venue.image_link, "x");
    assert_eq!(venue.facebook_link, "y");
    assert_eq!(venue.website, "z");
    assert_eq!(venue.genres, Genres(vec!["Jazz".to_string()]));
    assert!(!venue.seeking_talent);
}

#[tokio::test]
async fn test_invalid_create_writes_nothing() {
    let db = setup_test_db().await;

    let result = mutations::create_venue(&db, &form(&[("name", "Hop")])).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_detail_of_missing_venue_is_not_found() {
    let db = setup_test_db().await;

    let result = queries::venue_detail(&db, 42, hours_from_now(0)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_venue_detail_partitions_shows() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;

    let now = hours_from_now(0);
    create_test_show(&db, venue.id, artist.id, now - Duration::days(30)).await;
    create_test_show(&db, venue.id, artist.id, now).await;
    create_test_show(&db, venue.id, artist.id, now + Duration::days(30)).await;

    let detail = queries::venue_detail(&db, venue.id, now).await.unwrap();

    assert_eq!(detail.shows.upcoming_shows_count, 1);
    assert_eq!(detail.shows.past_shows_count, 2);
    assert_eq!(detail.shows.upcoming_shows[0].counterpart_id, artist.id);
    assert_eq!(detail.shows.upcoming_shows[0].counterpart_name, "Guns N Petals");
    assert!(detail.shows.past_shows[0].start_time < detail.shows.past_shows[1].start_time);
}

#[tokio::test]
async fn test_artist_detail_lists_venues() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "The Wild Sax Band", "San Francisco", "CA").await;
    create_test_show(&db, venue.id, artist.id, hours_from_now(48)).await;

    let detail = queries::artist_detail(&db, artist.id, hours_from_now(0)).await.unwrap();

    assert_eq!(detail.artist.name, "The Wild Sax Band");
    assert_eq!(detail.shows.upcoming_shows_count, 1);
    assert_eq!(
        detail.shows.upcoming_shows[0].counterpart_name,
        "Park Square Live Music & Coffee"
    );
}

#[tokio::test]
async fn test_venue_areas_are_grouped_and_ordered() {
    let db = setup_test_db().await;
    let artist = create_test_artist(&db, "Matt Quevedo", "New York", "NY").await;
    let hop = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;

    create_test_show(&db, hop.id, artist.id, hours_from_now(24)).await;
    create_test_show(&db, hop.id, artist.id, hours_from_now(48)).await;
    create_test_show(&db, hop.id, artist.id, hours_from_now(-24)).await;

    let areas = queries::list_venue_areas(&db, hours_from_now(0)).await.unwrap();

    assert_eq!(areas.len(), 2);
    assert_eq!((areas[0].city.as_str(), areas[0].state.as_str()), ("New York", "NY"));
    assert_eq!(areas[1].city, "San Francisco");

    let sf: Vec<(&str, i64)> = areas[1]
        .venues
        .iter()
        .map(|v| (v.name.as_str(), v.upcoming_shows))
        .collect();
    assert_eq!(
        sf,
        vec![("Park Square Live Music & Coffee", 0), ("The Musical Hop", 2)]
    );
}

#[tokio::test]
async fn test_search_is_case_insensitive_over_name_city_state() {
    let db = setup_test_db().await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;
    let hop = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    create_test_show(&db, hop.id, artist.id, hours_from_now(24)).await;

    let now = hours_from_now(0);

    let by_name = queries::search_venues(&db, "hOp", now).await.unwrap();
    assert_eq!(by_name.count, 1);
    assert_eq!(by_name.data[0].id, hop.id);
    assert_eq!(by_name.data[0].num_upcoming_shows, 1);

    let by_city = queries::search_venues(&db, "new york", now).await.unwrap();
    assert_eq!(by_city.count, 1);
    assert_eq!(by_city.data[0].name, "The Dueling Pianos Bar");

    let by_name_fragment = queries::search_venues(&db, "music", now).await.unwrap();
    assert_eq!(by_name_fragment.count, 2);

    let wildcard = queries::search_venues(&db, "%", now).await.unwrap();
    assert_eq!(wildcard.count, 0);
}

#[tokio::test]
async fn test_empty_search_matches_everything() {
    let db = setup_test_db().await;
    create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;
    create_test_artist(&db, "Matt Quevedo", "New York", "NY").await;
    create_test_artist(&db, "The Wild Sax Band", "San Francisco", "CA").await;

    let results = queries::search_artists(&db, "", hours_from_now(0)).await.unwrap();

    assert_eq!(results.count, 3);
    assert_eq!(results.count as u64, artist::Entity::find().count(&db).await.unwrap());
    assert!(results.data.iter().all(|hit| hit.num_upcoming_shows == 0));
}

#[tokio::test]
async fn test_update_overwrites_every_field() {
    let db = setup_test_db().await;
    let id = mutations::create_venue(&db, &hop_form()).await.unwrap();

    let updated = mutations::update_venue(
        &db,
        id,
        &form(&[
            ("name", "The Musical Hop"),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("address", "1015 Folsom Street"),
            ("phone", "123-123-1234"),
            ("image_link", "https://example.com/hop.jpg"),
            ("facebook_link", "https://www.facebook.com/TheMusicalHop"),
            ("website", "https://www.themusicalhop.com"),
            ("genres", "Swing"),
            ("genres", "Folk"),
            ("seeking_talent", "y"),
            ("seeking_description", "Looking for a local artist"),
        ]),
    )
    .await
    .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "The Musical Hop");
    assert_eq!(updated.address, "1015 Folsom Street");
    assert_eq!(updated.genres.0, vec!["Swing", "Folk"]);
    assert!(updated.seeking_talent);
}

#[tokio::test]
async fn test_invalid_update_leaves_entity_unchanged() {
    let db = setup_test_db().await;
    let id = mutations::create_venue(&db, &hop_form()).await.unwrap();
    let before = queries::find_venue(&db, id).await.unwrap();

    let result = mutations::update_venue(&db, id, &form(&[("name", "Renamed")])).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let after = queries::find_venue(&db, id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_update_missing_artist_is_not_found() {
    let db = setup_test_db().await;

    let result = mutations::update_artist(
        &db,
        7,
        &form(&[
            ("name", "Ghost"),
            ("city", "Nowhere"),
            ("state", "NA"),
            ("phone", "000"),
            ("image_link", "x"),
            ("facebook_link", "y"),
            ("website", "z"),
        ]),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_venue_cascades_to_shows() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let other = create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;
    create_test_show(&db, venue.id, artist.id, hours_from_now(24)).await;
    create_test_show(&db, venue.id, artist.id, hours_from_now(-24)).await;
    create_test_show(&db, other.id, artist.id, hours_from_now(24)).await;

    mutations::delete_venue(&db, venue.id).await.expect("delete should succeed");

    assert!(venue::Entity::find_by_id(venue.id).one(&db).await.unwrap().is_none());
    let remaining = show::Entity::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].venue_id, other.id);
}

#[tokio::test]
async fn test_delete_missing_venue_is_not_found() {
    let db = setup_test_db().await;

    let result = mutations::delete_venue(&db, 404).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_create_show_with_unknown_ids_leaves_table_unchanged() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;

    let venue_id = venue.id.to_string();
    let artist_id = artist.id.to_string();

    let unknown_venue = mutations::create_show(
        &db,
        &form(&[
            ("venue_id", "999"),
            ("artist_id", &artist_id),
            ("start_time", "2035-04-01 20:00:00"),
        ]),
    )
    .await;
    assert!(matches!(unknown_venue, Err(AppError::Validation(_))));

    let unknown_artist = mutations::create_show(
        &db,
        &form(&[
            ("venue_id", &venue_id),
            ("artist_id", "999"),
            ("start_time", "2035-04-01 20:00:00"),
        ]),
    )
    .await;
    assert!(matches!(unknown_artist, Err(AppError::Validation(_))));

    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_show_accepts_past_and_duplicate_bookings() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "Guns N Petals", "San Francisco", "CA").await;

    let venue_id = venue.id.to_string();
    let artist_id = artist.id.to_string();
    let booking = form(&[
        ("venue_id", &venue_id),
        ("artist_id", &artist_id),
        ("start_time", "2019-05-21 21:30:00"),
    ]);

    let first = mutations::create_show(&db, &booking).await.unwrap();
    let second = mutations::create_show(&db, &booking).await.unwrap();
    assert_ne!(first, second);

    let listing = queries::list_shows(&db).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].venue_name, "The Musical Hop");
    assert_eq!(listing[0].artist_name, "Guns N Petals");
    assert_eq!(listing[0].start_time.to_string(), "2019-05-21 21:30:00");
}

#[tokio::test]
async fn test_search_folds_uppercase_non_ascii_term() {
    let db = setup_test_db().await;
    let cafe = create_test_venue(&db, "Café Bohème", "Paris", "FR").await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;

    let results = queries::search_venues(&db, "CAFÉ BOHÈME", hours_from_now(0)).await.unwrap();

    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].id, cafe.id);
}
