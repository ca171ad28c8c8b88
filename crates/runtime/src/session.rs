//! The tick loop.
//!
//! A session owns the world plus its three collaborators and advances
//! everything in lockstep: sample one input intent, update the world,
//! flush audio cues and diagnostics, hand the frame to the renderer.
//! One `tick()` per rendered frame.

use game_core::World;

use crate::api::{AudioSink, InputProvider, Renderer};
use crate::error::SessionError;
use crate::events::RuntimeEvent;

pub struct Session<I, A, R> {
    world: World,
    input: I,
    audio: A,
    renderer: R,
    ticks: u64,
    events: Vec<RuntimeEvent>,
    room_name: Option<String>,
    in_encounter: bool,
}

impl<I, A, R> Session<I, A, R>
where
    I: InputProvider,
    A: AudioSink,
    R: Renderer,
{
    /// Starts a session over the shipped content, entering the start
    /// room with a random seed.
    pub fn start(input: I, audio: A, renderer: R) -> Result<Self, SessionError> {
        Self::with_seed(input, audio, renderer, rand::random())
    }

    /// Starts a session over the shipped content with an explicit seed
    /// (deterministic replay).
    pub fn with_seed(input: I, audio: A, renderer: R, seed: u64) -> Result<Self, SessionError> {
        let mut world = World::new(game_content::room_builder(), seed);
        world.spawn(game_content::START_ROOM)?;
        Ok(Self::over(world, input, audio, renderer))
    }

    /// Wraps an already-configured world (custom builders, test rooms).
    pub fn over(world: World, input: I, audio: A, renderer: R) -> Self {
        Self {
            world,
            input,
            audio,
            renderer,
            ticks: 0,
            events: Vec::new(),
            room_name: None,
            in_encounter: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<RuntimeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the simulation one frame.
    pub fn tick(&mut self) {
        let intent = self.input.poll();
        self.world.update(intent);

        self.observe();

        for cue in self.world.drain_cues() {
            self.audio.play(cue);
        }

        self.renderer.present(&self.world);
        self.ticks += 1;
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Extracts events from this tick's state changes and logs them.
    fn observe(&mut self) {
        let room = self.world.current_room().map(|r| r.name.clone());
        if room != self.room_name {
            if let Some(name) = &room {
                self.push_event(RuntimeEvent::RoomEntered { name: name.clone() });
            }
            self.room_name = room;
        }

        let in_encounter = self.world.encounter().is_some();
        if in_encounter != self.in_encounter {
            self.push_event(if in_encounter {
                RuntimeEvent::EncounterStarted
            } else {
                RuntimeEvent::EncounterEnded
            });
            self.in_encounter = in_encounter;
        }

        for diagnostic in self.world.drain_diagnostics() {
            self.push_event(RuntimeEvent::from_diagnostic(diagnostic));
        }
    }

    fn push_event(&mut self, event: RuntimeEvent) {
        event.log();
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NullAudio, NullInput, NullRenderer};

    #[test]
    fn headless_session_boots_into_the_start_room() {
        let mut session =
            Session::with_seed(NullInput, NullAudio, NullRenderer, 7).expect("content spawns");
        session.run(5);
        let room = session.world().current_room().expect("room entered");
        assert_eq!(room.name, game_content::START_ROOM);
        assert!(room.is_active());
        assert!(session
            .drain_events()
            .contains(&RuntimeEvent::RoomEntered {
                name: game_content::START_ROOM.into()
            }));
    }
}
