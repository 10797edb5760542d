//! Synchronizer Events
//!
//! Broadcast to subscribers so a UI can render pending intents and refresh
//! after reconciliation.

use crate::intent::Intent;
use musicstream_core::{EntityKind, FailureKind, TrackId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the synchronizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// An intent passed validation and was sent to the gateway
    IntentDispatched {
        ticket: Uuid,
        intent: Intent,
    },

    /// The gateway answered; `failure` is `None` on success
    IntentSettled {
        ticket: Uuid,
        failure: Option<FailureKind>,
    },

    /// The projection holds a new authoritative form of an entity
    EntityUpserted {
        kind: EntityKind,
        id: String,
    },

    /// An entity was dropped from the projection
    EntityRemoved {
        kind: EntityKind,
        id: String,
    },

    /// Favorite membership of a track was confirmed
    FavoriteChanged {
        track_id: TrackId,
        favorited: bool,
    },

    /// A collection was replaced by a full fetch
    CollectionReplaced {
        kind: EntityKind,
        count: usize,
    },
}
