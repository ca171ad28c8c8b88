//! High-level events extracted from world state changes.
//!
//! The session compares world state across ticks and turns the deltas
//! into events for logging and test assertions. Diagnostics the world
//! recorded (dropped commands, unknown rooms) pass through here too.

use game_core::Diagnostic;

/// One noteworthy occurrence during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The current room changed.
    RoomEntered { name: String },
    /// A combat encounter spun up.
    EncounterStarted,
    /// The active encounter settled.
    EncounterEnded,
    /// The world dropped a command it has no rule for.
    CommandDropped { name: &'static str },
    /// A room name could not be built.
    RoomMissing { name: String },
}

impl RuntimeEvent {
    /// Converts a world diagnostic into its event form.
    pub fn from_diagnostic(diagnostic: Diagnostic) -> Self {
        match diagnostic {
            Diagnostic::UnhandledCommand { name } => RuntimeEvent::CommandDropped { name },
            Diagnostic::UnknownRoom { name } => RuntimeEvent::RoomMissing { name },
            other => RuntimeEvent::CommandDropped {
                name: diagnostic_name(&other),
            },
        }
    }

    /// Emits the event through `tracing` at an appropriate level.
    pub fn log(&self) {
        match self {
            RuntimeEvent::RoomEntered { name } => {
                tracing::info!(room = %name, "entered room");
            }
            RuntimeEvent::EncounterStarted => {
                tracing::info!("encounter started");
            }
            RuntimeEvent::EncounterEnded => {
                tracing::info!("encounter ended");
            }
            RuntimeEvent::CommandDropped { name } => {
                tracing::warn!(command = %name, "dropped unhandled command");
            }
            RuntimeEvent::RoomMissing { name } => {
                tracing::warn!(room = %name, "room could not be built");
            }
        }
    }
}

fn diagnostic_name(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic {
        Diagnostic::UnhandledCommand { .. } => "UnhandledCommand",
        Diagnostic::UnknownRoom { .. } => "UnknownRoom",
        Diagnostic::MissingActor { .. } => "MissingActor",
        Diagnostic::NotCombatCapable { .. } => "NotCombatCapable",
        Diagnostic::NoTraveler => "NoTraveler",
    }
}
