//! Rooms and the per-room turn scheduler.
//!
//! A room owns a tile grid, its actors, and the discrete turn machinery:
//! every tick it drains routines, updates passive visual state, lets
//! actors think, and - once the player has buffered a command - advances
//! one full turn for everybody and resolves the resulting movement and
//! interactions deterministically. Commands the room cannot settle
//! locally (combat, travel, prompts) escape to the world.

mod resolve;
mod tile;

pub use tile::{Tile, TileMessage};

use std::collections::HashMap;
use std::sync::Arc;

use crate::actor::{ActorId, ActorState, Behavior};
use crate::command::Command;
use crate::cue::Cue;
use crate::rng::GameRng;
use crate::routine::{run_routines, Routines};

/// Hook invoked at room lifecycle points (enter, leave, each turn).
pub type RoomHook = Arc<dyn Fn(&mut Room) + Send + Sync>;

pub struct Room {
    pub name: String,
    /// Row-major grid; `None` cells are the void.
    tiles: Vec<Vec<Option<Tile>>>,
    pub actors: Vec<ActorState>,
    /// Commands drained from actors this turn, awaiting resolution.
    pending: Vec<(ActorId, Command)>,
    pub messages: Vec<TileMessage>,
    /// Free-form content state (door locks, counters, cutscene flags).
    pub metadata: HashMap<String, String>,
    pub routines: Routines<Room>,
    pub song: String,
    pub on_enter: Option<RoomHook>,
    pub on_leave: Option<RoomHook>,
    pub on_turn: Option<RoomHook>,
    pub on_update: Option<RoomHook>,

    cues: Vec<Cue>,
    active: bool,
    turn: u64,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

impl Room {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            tiles: vec![vec![None; width]; height],
            actors: Vec::new(),
            pending: Vec::new(),
            messages: Vec::new(),
            metadata: HashMap::new(),
            routines: Routines::new(),
            song: String::new(),
            on_enter: None,
            on_leave: None,
            on_turn: None,
            on_update: None,
            cues: Vec::new(),
            active: false,
            turn: 0,
        }
    }

    // ========================================================================
    // Grid access
    // ========================================================================

    pub fn size(&self) -> (usize, usize) {
        let height = self.tiles.len();
        let width = self.tiles.first().map_or(0, Vec::len);
        (width, height)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.size();
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h
    }

    /// The tile at a cell; `None` for the void *and* out of bounds
    /// (callers that care use [`Room::in_bounds`] to tell them apart).
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles[y as usize][x as usize].as_ref()
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize][x as usize] = Some(tile);
        }
    }

    pub fn clear_tile(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize][x as usize] = None;
        }
    }

    // ========================================================================
    // Actors
    // ========================================================================

    pub fn add_actor(&mut self, actor: ActorState) {
        self.actors.push(actor);
    }

    /// Removes and returns an actor. Only ever called between turn
    /// resolutions (encounter end, travel) - never mid-resolution.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<ActorState> {
        let idx = self.actors.iter().position(|a| a.id == id)?;
        Some(self.actors.remove(idx))
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// The actor occupying a cell, by committed grid position.
    pub fn actor_at(&self, x: i32, y: i32) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.pos() == (x, y))
    }

    pub fn actor_by_tag(&self, tag: &str) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.tag == tag)
    }

    pub fn player(&self) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut ActorState> {
        self.actors.iter_mut().find(|a| a.is_player())
    }

    // ========================================================================
    // Messages & cues
    // ========================================================================

    pub fn tile_message(&mut self, text: impl Into<String>, x: i32, y: i32, ttl: u32) {
        self.messages.push(TileMessage {
            text: text.into(),
            x,
            y,
            ttl,
        });
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    // ========================================================================
    // The tick
    // ========================================================================

    /// Advances the room by one tick and returns the commands that
    /// escaped local resolution for the world to interpret.
    pub fn update(&mut self, rng: &mut GameRng) -> Vec<Command> {
        // Deferred routines first: they may mutate anything below.
        run_routines(self, |room| &mut room.routines);

        // Passive visual state.
        for row in &mut self.tiles {
            for tile in row.iter_mut().flatten() {
                tile.ticker += 1;
            }
        }
        for message in &mut self.messages {
            message.ttl = message.ttl.saturating_sub(1);
        }
        self.messages.retain(|m| m.ttl > 0);

        // Mid-transition rooms do not process actors or commands.
        if !self.active {
            return Vec::new();
        }

        // Let every actor think. Volunteered commands buffer on the actor
        // and do not consume a turn.
        let chase_targets: Vec<Option<(i32, i32)>> = self
            .actors
            .iter()
            .map(|a| match &a.behavior {
                Behavior::Wander {
                    chase: Some(tag), ..
                } => self.actor_by_tag(tag).map(ActorState::pos),
                _ => None,
            })
            .collect();
        for (actor, chase) in self.actors.iter_mut().zip(chase_targets) {
            actor.update(rng, chase);
        }

        // A buffered player command advances one full turn for everybody.
        if self.player().is_some_and(ActorState::is_ready) {
            for actor in &mut self.actors {
                actor.set_ready(false);
            }
            let drained: Vec<(ActorId, Command)> = self
                .actors
                .iter_mut()
                .filter_map(|a| a.take_turn().map(|cmd| (a.id, cmd)))
                .collect();
            self.pending.extend(drained);
            self.turn += 1;

            if let Some(hook) = self.on_turn.clone() {
                hook(self);
            }
        }

        // Keep the render list in draw order while things are moving.
        if !self.pending.is_empty() {
            self.actors.sort_by_key(|a| (a.z, a.x - a.y));
        }

        if let Some(hook) = self.on_update.clone() {
            hook(self);
        }

        if self.pending.is_empty() {
            Vec::new()
        } else {
            self.resolve_pending()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorIdAlloc, Behavior};
    use crate::input::Intent;
    use crate::stats::StatBlock;

    fn open_room(w: usize, h: usize) -> Room {
        let mut room = Room::new("test", w, h);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                room.set_tile(x, y, Tile::new("floor").named("floor"));
            }
        }
        room.activate();
        room
    }

    fn player(ids: &mut ActorIdAlloc, x: i32, y: i32) -> ActorState {
        let mut a = ActorState::new(ids.next(), x, y);
        a.name = "player".into();
        a.behavior = Behavior::Player;
        a.combat = Some(crate::actor::CombatKit::new(StatBlock::new(4, 4, 8)));
        a
    }

    fn step(room: &mut Room, rng: &mut GameRng, ticks: usize) -> Vec<Command> {
        let mut out = Vec::new();
        for _ in 0..ticks {
            out.extend(room.update(rng));
        }
        out
    }

    #[test]
    fn player_step_moves_after_turn() {
        let mut rng = GameRng::new(4);
        let mut ids = ActorIdAlloc::default();
        let mut room = open_room(5, 5);
        let p = player(&mut ids, 1, 1);
        let pid = p.id;
        room.add_actor(p);

        room.player_mut().unwrap().handle_intent(Intent::Direction {
            dx: 1,
            dy: 0,
            face_only: false,
        });
        step(&mut room, &mut rng, 12);
        assert_eq!(room.actor(pid).unwrap().pos(), (2, 1));
    }

    #[test]
    fn blocked_tile_denies_move_and_bumps() {
        let mut rng = GameRng::new(4);
        let mut ids = ActorIdAlloc::default();
        let mut room = open_room(5, 5);
        room.set_tile(2, 1, Tile::new("wall").named("wall").blocking());
        let p = player(&mut ids, 1, 1);
        let pid = p.id;
        room.add_actor(p);

        room.player_mut().unwrap().handle_intent(Intent::Direction {
            dx: 1,
            dy: 0,
            face_only: false,
        });
        step(&mut room, &mut rng, 12);
        assert_eq!(room.actor(pid).unwrap().pos(), (1, 1));
        assert!(room.drain_cues().contains(&Cue::Bump));
        assert!(room.messages.iter().any(|m| m.text.contains("blocked")));
    }

    #[test]
    fn void_and_out_of_bounds_are_denied_with_distinct_messages() {
        let mut rng = GameRng::new(4);
        let mut ids = ActorIdAlloc::default();
        let mut room = open_room(3, 3);
        room.clear_tile(2, 1);
        let p = player(&mut ids, 1, 1);
        let pid = p.id;
        room.add_actor(p);

        room.player_mut().unwrap().handle_intent(Intent::Direction {
            dx: 1,
            dy: 0,
            face_only: false,
        });
        step(&mut room, &mut rng, 2);
        assert!(room.messages.iter().any(|m| m.text.contains("void")));

        // Walk off the west edge.
        let p = room.actor_mut(pid).unwrap();
        p.set_position(0, 1);
        p.handle_intent(Intent::Direction {
            dx: -1,
            dy: 0,
            face_only: false,
        });
        step(&mut room, &mut rng, 2);
        assert!(room.messages.iter().any(|m| m.text.contains("impossible")));
        assert_eq!(room.actor(pid).unwrap().pos(), (0, 1));
    }

    #[test]
    fn investigate_reports_without_moving() {
        let mut rng = GameRng::new(4);
        let mut ids = ActorIdAlloc::default();
        let mut room = open_room(5, 5);
        let p = player(&mut ids, 1, 1);
        let pid = p.id;
        room.add_actor(p);

        // Adjacent tile: "feel".
        room.player_mut()
            .unwrap()
            .handle_intent(Intent::PointerAt { x: 2, y: 1 });
        step(&mut room, &mut rng, 2);
        assert!(room.messages.iter().any(|m| m.text.contains("feel")));
        assert_eq!(room.actor(pid).unwrap().pos(), (1, 1));

        // Distant tile: "see".
        room.player_mut()
            .unwrap()
            .handle_intent(Intent::PointerAt { x: 4, y: 4 });
        step(&mut room, &mut rng, 2);
        assert!(room.messages.iter().any(|m| m.text.contains("see")));
    }

    #[test]
    fn mutual_step_yields_single_interaction_and_facing() {
        let mut rng = GameRng::new(4);
        let mut ids = ActorIdAlloc::default();
        let mut room = open_room(6, 3);
        let mut p = player(&mut ids, 1, 1);
        p.tag = "player".into();
        let pid = p.id;
        room.add_actor(p);

        let mut glitch = ActorState::new(ids.next(), 2, 1);
        glitch.name = "wisp".into();
        glitch.behavior = Behavior::chase("player");
        glitch.combat = Some(crate::actor::CombatKit::new(StatBlock::new(2, 2, 4)));
        let gid = glitch.id;
        room.add_actor(glitch);

        // Both step into each other's tile on the same turn.
        room.player_mut().unwrap().handle_intent(Intent::Direction {
            dx: 1,
            dy: 0,
            face_only: false,
        });
        let cmds = step(&mut room, &mut rng, 3);

        let combats: Vec<_> = cmds
            .iter()
            .filter(|c| matches!(c, Command::Combat { .. }))
            .collect();
        assert_eq!(combats.len(), 1, "exactly one interaction command");
        if let Command::Combat { attacker, defender } = combats[0] {
            assert_eq!(*attacker, pid);
            assert_eq!(*defender, gid);
        }
        // Both participants face each other and neither moved.
        assert_eq!(room.actor(pid).unwrap().pos(), (1, 1));
        assert_eq!(room.actor(gid).unwrap().pos(), (2, 1));
        assert_eq!(room.actor(pid).unwrap().facing, crate::actor::Facing::East);
        assert_eq!(room.actor(gid).unwrap().facing, crate::actor::Facing::West);
    }

    #[test]
    fn routines_drain_before_the_turn() {
        let mut rng = GameRng::new(4);
        let mut room = open_room(3, 3);
        let sender = room.routines.sender();
        let mut remaining = 2;
        sender.push(move |room: &mut Room| {
            room.metadata.insert("ran".into(), remaining.to_string());
            remaining -= 1;
            if remaining == 0 {
                crate::routine::RoutineStep::Done
            } else {
                crate::routine::RoutineStep::Again
            }
        });
        step(&mut room, &mut rng, 1);
        assert_eq!(room.metadata.get("ran").map(String::as_str), Some("2"));
        step(&mut room, &mut rng, 1);
        assert_eq!(room.metadata.get("ran").map(String::as_str), Some("1"));
    }
}
