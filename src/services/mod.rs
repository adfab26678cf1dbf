pub mod forms;
pub mod mutations;
pub mod queries;

pub use forms::{ArtistInput, FormBag, ShowInput, VenueInput, START_TIME_FORMAT};
