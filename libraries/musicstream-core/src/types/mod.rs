mod entity;
mod favorites;
mod ids;
mod playlist;
mod track;

pub use entity::{Entity, EntityKind, EntityPayload};
pub use favorites::FavoriteSet;
pub use ids::{PlaylistId, TrackId, UserId};
pub use playlist::{CreatePlaylist, Playlist, PlaylistUpdate};
pub use track::Track;
