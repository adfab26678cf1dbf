//! Write side. Each mutation validates its input before touching the store,
//! then applies and commits inside a single transaction. Returning `Err`
//! from the transaction body rolls it back; the connection goes back to the
//! pool on every path.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::{
    db::entities::{artist, show, venue},
    error::{AppError, Result},
};

use super::forms::{ArtistInput, FormBag, ShowInput, VenueInput};

fn log_outcome<T>(action: &str, result: &Result<T>) {
    match result {
        Ok(_) => tracing::info!("{} committed", action),
        Err(e) => tracing::warn!("{} rolled back: {}", action, e),
    }
}

impl VenueInput {
    fn apply(self, active: &mut venue::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.genres = Set(self.genres.into());
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
    }
}

impl ArtistInput {
    fn apply(self, active: &mut artist::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.genres = Set(self.genres.into());
        active.website = Set(self.website);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
    }
}

/// Creates a venue and returns its id.
pub async fn create_venue(db: &DatabaseConnection, form: &FormBag) -> Result<i32> {
    let input = VenueInput::from_form(form)?;

    let result = db
        .transaction::<_, i32, AppError>(|txn| {
            Box::pin(async move {
                let mut active = venue::ActiveModel {
                    ..Default::default()
                };
                input.apply(&mut active);
                let created = active.insert(txn).await?;
                Ok(created.id)
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("create venue", &result);
    result
}

/// Overwrites every mutable field of venue `id`.
pub async fn update_venue(db: &DatabaseConnection, id: i32, form: &FormBag) -> Result<venue::Model> {
    let input = VenueInput::from_form(form)?;

    let result = db
        .transaction::<_, venue::Model, AppError>(|txn| {
            Box::pin(async move {
                let existing = venue::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Venue {id} not found")))?;

                let mut active: venue::ActiveModel = existing.into();
                input.apply(&mut active);
                Ok(active.update(txn).await?)
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("update venue", &result);
    result
}

/// Deletes venue `id` together with its shows.
pub async fn delete_venue(db: &DatabaseConnection, id: i32) -> Result<()> {
    let result = db
        .transaction::<_, (), AppError>(|txn| {
            Box::pin(async move {
                let removed_shows = show::Entity::delete_many()
                    .filter(show::Column::VenueId.eq(id))
                    .exec(txn)
                    .await?;

                let deleted = venue::Entity::delete_by_id(id).exec(txn).await?;
                if deleted.rows_affected == 0 {
                    return Err(AppError::NotFound(format!("Venue {id} not found")));
                }

                tracing::debug!(venue_id = id, shows = removed_shows.rows_affected, "venue shows removed");
                Ok(())
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("delete venue", &result);
    result
}

/// Creates an artist and returns its id.
pub async fn create_artist(db: &DatabaseConnection, form: &FormBag) -> Result<i32> {
    let input = ArtistInput::from_form(form)?;

    let result = db
        .transaction::<_, i32, AppError>(|txn| {
            Box::pin(async move {
                let mut active = artist::ActiveModel {
                    ..Default::default()
                };
                input.apply(&mut active);
                let created = active.insert(txn).await?;
                Ok(created.id)
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("create artist", &result);
    result
}

/// Overwrites every mutable field of artist `id`.
pub async fn update_artist(
    db: &DatabaseConnection,
    id: i32,
    form: &FormBag,
) -> Result<artist::Model> {
    let input = ArtistInput::from_form(form)?;

    let result = db
        .transaction::<_, artist::Model, AppError>(|txn| {
            Box::pin(async move {
                let existing = artist::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Artist {id} not found")))?;

                let mut active: artist::ActiveModel = existing.into();
                input.apply(&mut active);
                Ok(active.update(txn).await?)
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("update artist", &result);
    result
}

/// Deletes artist `id` together with its shows.
pub async fn delete_artist(db: &DatabaseConnection, id: i32) -> Result<()> {
    let result = db
        .transaction::<_, (), AppError>(|txn| {
            Box::pin(async move {
                show::Entity::delete_many()
                    .filter(show::Column::ArtistId.eq(id))
                    .exec(txn)
                    .await?;

                let deleted = artist::Entity::delete_by_id(id).exec(txn).await?;
                if deleted.rows_affected == 0 {
                    return Err(AppError::NotFound(format!("Artist {id} not found")));
                }
                Ok(())
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("delete artist", &result);
    result
}

/// Books an artist at a venue. Both ids must exist; past start times,
/// duplicates and overlapping bookings are all accepted.
pub async fn create_show(db: &DatabaseConnection, form: &FormBag) -> Result<i32> {
    let input = ShowInput::from_form(form)?;

    let result = db
        .transaction::<_, i32, AppError>(|txn| {
            Box::pin(async move {
                if venue::Entity::find_by_id(input.venue_id).one(txn).await?.is_none() {
                    return Err(AppError::Validation(format!(
                        "venue_id {} does not reference an existing venue",
                        input.venue_id
                    )));
                }
                if artist::Entity::find_by_id(input.artist_id).one(txn).await?.is_none() {
                    return Err(AppError::Validation(format!(
                        "artist_id {} does not reference an existing artist",
                        input.artist_id
                    )));
                }

                let created = show::ActiveModel {
                    venue_id: Set(input.venue_id),
                    artist_id: Set(input.artist_id),
                    start_time: Set(input.start_time),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                Ok(created.id)
            })
        })
        .await
        .map_err(AppError::from);

    log_outcome("create show", &result);
    result
}
