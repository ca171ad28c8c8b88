//! Audio cue names emitted at simulation events.
//!
//! Cues are fire-and-forget: the core buffers them and the runtime's
//! audio collaborator drains the buffer once per tick. Nothing feeds
//! back into the simulation.

/// The cue vocabulary. `as_ref()` yields the asset-facing name.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Cue {
    /// An attack landed.
    Hit,
    /// An attack missed or was denied.
    Miss,
    /// A move was rejected by a blocking tile.
    Bump,
    /// A stat boost landed.
    Boost,
    /// A capture attempt succeeded.
    Caught,
    /// A combatant was destroyed.
    Death,
    /// A combatant's integrity hit zero and the next blow is lethal.
    Candie,
    /// A door or mechanism locked.
    Lock,
    /// A door or mechanism unlocked.
    Unlock,
}
