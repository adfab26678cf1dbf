pub mod artist;
pub mod genres;
pub mod show;
pub mod venue;

pub use artist::Entity as Artist;
pub use genres::Genres;
pub use show::Entity as Show;
pub use venue::Entity as Venue;
