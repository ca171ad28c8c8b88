//! The closed command vocabulary.
//!
//! Commands are the only currency between actors, the room scheduler,
//! the world, and a live encounter. They are immutable values; a prompt
//! carries its handler as shared `Arc` state so the union stays cheaply
//! clonable.

use std::fmt;
use std::sync::Arc;

use crate::actor::ActorId;

/// One intent passed between actors, the room, and the world.
#[derive(Clone, Debug)]
pub enum Command {
    /// Move one tile by the given delta.
    Step { dx: i32, dy: i32 },
    /// Pure orientation toward a tile; never moves.
    Face { x: i32, y: i32 },
    /// Non-moving inspection of a tile.
    Investigate { x: i32, y: i32 },
    /// Start an encounter between two combat-capable actors.
    Combat { attacker: ActorId, defender: ActorId },
    /// Move an actor to another room.
    Travel(TravelSpec),
    /// Open a stacked UI prompt.
    Prompt(PromptSpec),
    /// A finished encounter's outcome.
    CombatResult(EncounterResult),
}

impl Command {
    /// Variant name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Step { .. } => "Step",
            Command::Face { .. } => "Face",
            Command::Investigate { .. } => "Investigate",
            Command::Combat { .. } => "Combat",
            Command::Travel(_) => "Travel",
            Command::Prompt(_) => "Prompt",
            Command::CombatResult(_) => "CombatResult",
        }
    }
}

/// Cross-room movement request.
///
/// The target actor (the traveling player when `None`) is placed at the
/// destination room's actor tagged `tag`, displaced by the offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TravelSpec {
    pub room: String,
    pub tag: String,
    pub offset_x: i32,
    pub offset_y: i32,
    pub target: Option<ActorId>,
}

/// Terminal outcome of one encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterResult {
    pub winner: ActorId,
    pub loser: ActorId,
    /// The loser was destroyed outright.
    pub destroyed: bool,
    /// The attacker fled; nobody was beaten.
    pub fled: bool,
    pub exp_gained: i32,
}

/// What a prompt handler asks the world to do after a selection.
#[derive(Clone, Debug, Default)]
pub struct PromptResponse {
    /// Pop this prompt off the stack.
    pub close: bool,
    /// A command for the world to interpret next (chained prompt,
    /// travel, ...).
    pub follow_up: Option<Command>,
}

impl PromptResponse {
    /// Close the prompt, nothing else.
    pub fn close() -> Self {
        Self {
            close: true,
            follow_up: None,
        }
    }

    /// Keep the prompt open.
    pub fn stay() -> Self {
        Self::default()
    }

    /// Close the prompt and hand the world a follow-up command.
    pub fn then(command: Command) -> Self {
        Self {
            close: true,
            follow_up: Some(command),
        }
    }
}

/// Selection callback: `(index, label)` of the chosen item, or
/// `(-1, "")` on cancel.
pub type PromptHandler = Arc<dyn Fn(i32, &str) -> PromptResponse + Send + Sync>;

/// A stacked selection prompt.
#[derive(Clone)]
pub struct PromptSpec {
    pub message: String,
    pub items: Vec<String>,
    pub handler: PromptHandler,
}

impl PromptSpec {
    pub fn new(
        message: impl Into<String>,
        items: Vec<String>,
        handler: impl Fn(i32, &str) -> PromptResponse + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            items,
            handler: Arc::new(handler),
        }
    }

    /// An informational prompt with a single dismiss item.
    pub fn notice(message: impl Into<String>, dismiss: impl Into<String>) -> Self {
        Self::new(message, vec![dismiss.into()], |_, _| PromptResponse::close())
    }
}

impl fmt::Debug for PromptSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptSpec")
            .field("message", &self.message)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_handler_round_trip() {
        let spec = PromptSpec::new("pick", vec!["a".into(), "b".into()], |i, label| {
            if i == 1 && label == "b" {
                PromptResponse::close()
            } else {
                PromptResponse::stay()
            }
        });
        assert!(!(spec.handler)(0, "a").close);
        assert!((spec.handler)(1, "b").close);
    }

    #[test]
    fn command_names_cover_every_variant() {
        let cmd = Command::Step { dx: 1, dy: 0 };
        assert_eq!(cmd.name(), "Step");
        assert_eq!(
            Command::Prompt(PromptSpec::notice("hi", "ok")).name(),
            "Prompt"
        );
    }
}
