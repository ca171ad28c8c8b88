//! Edge errors for the simulation core.
//!
//! Inside a tick there are no recoverable errors - impossible situations
//! are policy decisions (denied moves, reported capture failures). These
//! variants cover the edges where the world is driven from outside:
//! bootstrapping into a room, resolving travel targets.

use crate::actor::ActorId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("no room named {0:?} is registered")]
    UnknownRoom(String),

    #[error("no player actor present in the current room")]
    NoPlayer,

    #[error("actor {0:?} not found in the current room")]
    MissingActor(ActorId),
}
