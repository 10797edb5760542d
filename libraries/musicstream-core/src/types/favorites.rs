//! Per-user favorite set

use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The set of tracks a user has marked as favorite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSet {
    #[serde(rename = "favoriteIds", default)]
    pub track_ids: HashSet<TrackId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.track_ids.contains(track_id)
    }

    /// Set membership of `track_id` to an absolute value.
    ///
    /// Returns true if membership changed.
    pub fn set(&mut self, track_id: TrackId, favorited: bool) -> bool {
        if favorited {
            self.track_ids.insert(track_id)
        } else {
            self.track_ids.remove(&track_id)
        }
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }
}

impl FromIterator<TrackId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self {
            track_ids: iter.into_iter().collect(),
        }
    }
}
