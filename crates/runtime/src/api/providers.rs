//! Abstractions for sourcing input and sinking presentation.
//!
//! Session users plug in implementations so the simulation can run
//! against real devices, scripted fixtures, or nothing at all. All
//! three seams are sampled/flushed exactly once per tick and none of
//! them can mutate simulation state.

use std::collections::VecDeque;

use game_core::{Cue, Intent, World};

/// Delivers at most one discrete input intent per tick.
///
/// Implementations: real device frontends, scripted fixtures
/// ([`ScriptedInput`]), or [`NullInput`] for headless runs.
pub trait InputProvider: Send {
    fn poll(&mut self) -> Option<Intent>;
}

/// An input provider that never has anything to say.
pub struct NullInput;

impl InputProvider for NullInput {
    fn poll(&mut self) -> Option<Intent> {
        None
    }
}

/// Test fixture: a fixed sequence of per-tick slots.
///
/// `then` schedules an intent for the next free tick, `wait` leaves a
/// gap of idle ticks (slides, transitions, combat animation).
#[derive(Default)]
pub struct ScriptedInput {
    slots: VecDeque<Option<Intent>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, intent: Intent) -> Self {
        self.slots.push_back(Some(intent));
        self
    }

    pub fn wait(mut self, ticks: usize) -> Self {
        for _ in 0..ticks {
            self.slots.push_back(None);
        }
        self
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self) -> Option<Intent> {
        self.slots.pop_front().flatten()
    }
}

/// Receives fire-and-forget audio cue names. No feedback into the core.
pub trait AudioSink: Send {
    fn play(&mut self, cue: Cue);
}

/// Swallows every cue.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Test fixture that records everything it was asked to play.
#[derive(Default)]
pub struct MemoryAudio {
    pub played: Vec<Cue>,
}

impl AudioSink for MemoryAudio {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}

/// Observes the world once per tick to draw it. Read-only by contract:
/// the room keeps its actors in draw order (z, then x - y) and exposes
/// facing/highlight/slide state for exactly this consumer.
pub trait Renderer: Send {
    fn present(&mut self, world: &World);
}

/// Draws nothing, very fast.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _world: &World) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_replays_in_order_with_gaps() {
        let mut input = ScriptedInput::new()
            .then(Intent::Confirm)
            .wait(2)
            .then(Intent::Cancel);
        assert_eq!(input.poll(), Some(Intent::Confirm));
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), Some(Intent::Cancel));
        assert_eq!(input.poll(), None);
    }
}
