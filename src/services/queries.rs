//! Read side: listings, search, detail pages and the show listing.
//!
//! Every function takes `now` explicitly so the upcoming/past split is
//! decided once per request and is reproducible in tests.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::{Condition, Expr, Func, LikeExpr},
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::{
    db::entities::{artist, show, venue},
    error::{AppError, Result},
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub upcoming_shows: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResults {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<SearchHit>,
}

/// A show seen from one side of the join: the counterpart's identity plus
/// the start time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromQueryResult)]
pub struct ShowSlot {
    pub show_id: i32,
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: String,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PartitionedShows {
    pub upcoming_shows: Vec<ShowSlot>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<ShowSlot>,
    pub past_shows_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: venue::Model,
    #[serde(flatten)]
    pub shows: PartitionedShows,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: artist::Model,
    #[serde(flatten)]
    pub shows: PartitionedShows,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromQueryResult)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, FromQueryResult)]
struct UpcomingCount {
    owner_id: i32,
    upcoming: i64,
}

/// Splits shows at `now`. A show starting exactly at `now` is past.
pub fn partition_shows(slots: Vec<ShowSlot>, now: NaiveDateTime) -> PartitionedShows {
    let (upcoming_shows, past_shows): (Vec<_>, Vec<_>) =
        slots.into_iter().partition(|slot| slot.start_time > now);

    PartitionedShows {
        upcoming_shows_count: upcoming_shows.len(),
        upcoming_shows,
        past_shows_count: past_shows.len(),
        past_shows,
    }
}

/// Upcoming show count per owner id, where the owner is the venue or the
/// artist side of the join depending on `owner`.
async fn upcoming_counts(
    db: &DatabaseConnection,
    owner: show::Column,
    now: NaiveDateTime,
) -> Result<HashMap<i32, i64>> {
    let counts = show::Entity::find()
        .select_only()
        .column_as(owner, "owner_id")
        .column_as(Expr::col((show::Entity, show::Column::Id)).count(), "upcoming")
        .filter(show::Column::StartTime.gt(now))
        .group_by(owner)
        .into_model::<UpcomingCount>()
        .all(db)
        .await?;

    Ok(counts
        .into_iter()
        .map(|row| (row.owner_id, row.upcoming))
        .collect())
}

/// `%term%`, lowercased, with LIKE wildcards in the term escaped by `\`.
///
/// The term is folded with Unicode rules to line up with PostgreSQL's
/// `LOWER`. SQLite's `LOWER` only folds ASCII, so there a non-ASCII
/// uppercase letter in the stored column only matches itself.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match on any of `columns`.
fn matches_any<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    columns.iter().fold(Condition::any(), |cond, col| {
        let lowered = Expr::expr(Func::lower(Expr::col(col.as_column_ref())));
        cond.add(lowered.like(LikeExpr::new(contains_pattern(term)).escape('\\')))
    })
}

pub async fn list_venue_areas(db: &DatabaseConnection, now: NaiveDateTime) -> Result<Vec<Area>> {
    let places: Vec<(String, String)> = venue::Entity::find()
        .select_only()
        .column(venue::Column::City)
        .column(venue::Column::State)
        .distinct()
        .order_by_asc(venue::Column::City)
        .order_by_asc(venue::Column::State)
        .into_tuple()
        .all(db)
        .await?;

    let venues = venue::Entity::find()
        .order_by_asc(venue::Column::Name)
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?;

    let counts = upcoming_counts(db, show::Column::VenueId, now).await?;

    let mut by_place: HashMap<(String, String), Vec<VenueSummary>> = HashMap::new();
    for v in venues {
        by_place
            .entry((v.city, v.state))
            .or_default()
            .push(VenueSummary {
                id: v.id,
                name: v.name,
                upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
            });
    }

    Ok(places
        .into_iter()
        .map(|(city, state)| {
            let venues = by_place
                .remove(&(city.clone(), state.clone()))
                .unwrap_or_default();
            Area {
                city,
                state,
                venues,
            }
        })
        .collect())
}

pub async fn list_artists(db: &DatabaseConnection) -> Result<Vec<ArtistSummary>> {
    let rows: Vec<(i32, String)> = artist::Entity::find()
        .select_only()
        .column(artist::Column::Id)
        .column(artist::Column::Name)
        .order_by_asc(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| ArtistSummary { id, name })
        .collect())
}

pub async fn search_venues(
    db: &DatabaseConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults> {
    let rows: Vec<(i32, String)> = venue::Entity::find()
        .select_only()
        .column(venue::Column::Id)
        .column(venue::Column::Name)
        .filter(matches_any(
            &[venue::Column::Name, venue::Column::City, venue::Column::State],
            term,
        ))
        .order_by_asc(venue::Column::Name)
        .order_by_asc(venue::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let counts = upcoming_counts(db, show::Column::VenueId, now).await?;
    Ok(search_results(term, rows, &counts))
}

pub async fn search_artists(
    db: &DatabaseConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults> {
    let rows: Vec<(i32, String)> = artist::Entity::find()
        .select_only()
        .column(artist::Column::Id)
        .column(artist::Column::Name)
        .filter(matches_any(
            &[artist::Column::Name, artist::Column::City, artist::Column::State],
            term,
        ))
        .order_by_asc(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let counts = upcoming_counts(db, show::Column::ArtistId, now).await?;
    Ok(search_results(term, rows, &counts))
}

fn search_results(term: &str, rows: Vec<(i32, String)>, counts: &HashMap<i32, i64>) -> SearchResults {
    let data: Vec<SearchHit> = rows
        .into_iter()
        .map(|(id, name)| SearchHit {
            id,
            name,
            num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
        })
        .collect();

    SearchResults {
        search_term: term.to_string(),
        count: data.len(),
        data,
    }
}

pub async fn find_venue(db: &DatabaseConnection, id: i32) -> Result<venue::Model> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id} not found")))
}

pub async fn find_artist(db: &DatabaseConnection, id: i32) -> Result<artist::Model> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {id} not found")))
}

pub async fn venue_detail(
    db: &DatabaseConnection,
    id: i32,
    now: NaiveDateTime,
) -> Result<VenueDetail> {
    let venue = find_venue(db, id).await?;

    let slots = show::Entity::find()
        .select_only()
        .column_as(show::Column::Id, "show_id")
        .column_as(artist::Column::Id, "counterpart_id")
        .column_as(artist::Column::Name, "counterpart_name")
        .column_as(artist::Column::ImageLink, "counterpart_image_link")
        .column(show::Column::StartTime)
        .join(JoinType::InnerJoin, show::Relation::Artist.def())
        .filter(show::Column::VenueId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .into_model::<ShowSlot>()
        .all(db)
        .await?;

    Ok(VenueDetail {
        venue,
        shows: partition_shows(slots, now),
    })
}

pub async fn artist_detail(
    db: &DatabaseConnection,
    id: i32,
    now: NaiveDateTime,
) -> Result<ArtistDetail> {
    let artist = find_artist(db, id).await?;

    let slots = show::Entity::find()
        .select_only()
        .column_as(show::Column::Id, "show_id")
        .column_as(venue::Column::Id, "counterpart_id")
        .column_as(venue::Column::Name, "counterpart_name")
        .column_as(venue::Column::ImageLink, "counterpart_image_link")
        .column(show::Column::StartTime)
        .join(JoinType::InnerJoin, show::Relation::Venue.def())
        .filter(show::Column::ArtistId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .into_model::<ShowSlot>()
        .all(db)
        .await?;

    Ok(ArtistDetail {
        artist,
        shows: partition_shows(slots, now),
    })
}

pub async fn list_shows(db: &DatabaseConnection) -> Result<Vec<ShowListing>> {
    Ok(show::Entity::find()
        .select_only()
        .column(show::Column::Id)
        .column(show::Column::VenueId)
        .column_as(venue::Column::Name, "venue_name")
        .column_as(venue::Column::ImageLink, "venue_image_link")
        .column(show::Column::ArtistId)
        .column_as(artist::Column::Name, "artist_name")
        .column_as(artist::Column::ImageLink, "artist_image_link")
        .column(show::Column::StartTime)
        .join(JoinType::InnerJoin, show::Relation::Venue.def())
        .join(JoinType::InnerJoin, show::Relation::Artist.def())
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .into_model::<ShowListing>()
        .all(db)
        .await?)
}
