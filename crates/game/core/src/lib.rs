//! Deterministic simulation core for the capture-combat crawler.
//!
//! `game-core` owns the canonical rules: stat blocks and their roll
//! formulas, abilities, the closed [`Command`] union, actors and rooms,
//! the per-room turn scheduler, the combat encounter state machine, and
//! the [`World`] orchestrator that ties them together. Everything here is
//! pure and deterministic - no I/O, no wall clock, and every random draw
//! flows through an explicitly seeded [`GameRng`].
//!
//! Presentation concerns (rendering, audio, raw input devices) live behind
//! the `runtime` crate's collaborator traits; this crate only produces the
//! data those collaborators consume (draw ordering, facing, audio cues).

pub mod ability;
pub mod actor;
pub mod combat;
pub mod command;
pub mod config;
pub mod cue;
pub mod error;
pub mod input;
pub mod rng;
pub mod room;
pub mod routine;
pub mod stats;
pub mod world;

pub use ability::{Ability, AbilityKind};
pub use actor::{
    ActorId, ActorIdAlloc, ActorState, Behavior, CombatKit, Creature, Facing, InteractHook,
};
pub use combat::{
    Combatant, Encounter, Menu, MenuAction, MenuEntry, MenuMode, Rect, Report, ReportLine, Tone,
};
pub use command::{
    Command, EncounterResult, PromptHandler, PromptResponse, PromptSpec, TravelSpec,
};
pub use config::GameConfig;
pub use cue::Cue;
pub use error::GameError;
pub use input::Intent;
pub use rng::GameRng;
pub use room::{Room, RoomHook, Tile, TileMessage};
pub use routine::{RoutineSender, RoutineStep, Routines};
pub use stats::{capture_chance, StatBlock, StatKind};
pub use world::{ActivePrompt, Diagnostic, RoomBuilder, World, WorldMessage};
