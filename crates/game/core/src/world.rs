//! The world: rooms, transitions, prompts, and encounter lifecycle.
//!
//! The world is a thin orchestrator. Rooms do their own turn resolution
//! and hand back the commands they cannot settle; the world interprets
//! those (spawning encounters, traveling actors, stacking prompts) and
//! records anything it does not understand as a diagnostic instead of
//! halting - a forward-compatible no-op the runtime logs.

use std::collections::HashMap;

use crate::actor::{ActorId, ActorIdAlloc, Creature};
use crate::combat::{Combatant, Encounter};
use crate::command::{Command, EncounterResult, PromptSpec, TravelSpec};
use crate::cue::Cue;
use crate::error::GameError;
use crate::input::Intent;
use crate::rng::GameRng;
use crate::room::Room;
use crate::routine::{run_routines, Routines};

/// Builds a room by name on first visit; rooms are cached afterwards.
pub type RoomBuilder = Box<dyn FnMut(&str, &mut ActorIdAlloc) -> Option<Room> + Send>;

/// A world-level banner message with a tick lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldMessage {
    pub text: String,
    pub ttl: u32,
}

/// One entry on the stacked prompt UI.
pub struct ActivePrompt {
    pub spec: PromptSpec,
    pub selected: usize,
}

/// Things the world noticed but deliberately did not act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A command escaped room resolution that the world has no rule for.
    UnhandledCommand { name: &'static str },
    /// Travel or spawn referenced a room the builder cannot produce.
    UnknownRoom { name: String },
    /// A command referenced an actor that is not in the current room.
    MissingActor { id: ActorId },
    /// A combat command named an actor with no combat capability.
    NotCombatCapable { id: ActorId },
    /// Travel with no explicit target and no player in the room.
    NoTraveler,
}

pub struct World {
    rooms: HashMap<String, Room>,
    current: Option<String>,
    builder: RoomBuilder,
    ids: ActorIdAlloc,
    pub routines: Routines<World>,
    pub messages: Vec<WorldMessage>,
    prompts: Vec<ActivePrompt>,
    encounter: Option<Encounter>,
    diagnostics: Vec<Diagnostic>,
    cues: Vec<Cue>,
    rng: GameRng,
    /// Debug flag propagated to new encounters.
    pub auto_capture: bool,
}

impl World {
    pub fn new(builder: RoomBuilder, seed: u64) -> Self {
        Self {
            rooms: HashMap::new(),
            current: None,
            builder,
            ids: ActorIdAlloc::default(),
            routines: Routines::new(),
            messages: Vec::new(),
            prompts: Vec::new(),
            encounter: None,
            diagnostics: Vec::new(),
            cues: Vec::new(),
            rng: GameRng::new(seed),
            auto_capture: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_room(&self) -> Option<&Room> {
        self.current.as_ref().and_then(|name| self.rooms.get(name))
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        let name = self.current.clone()?;
        self.rooms.get_mut(&name)
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    pub fn encounter_mut(&mut self) -> Option<&mut Encounter> {
        self.encounter.as_mut()
    }

    pub fn prompts(&self) -> &[ActivePrompt] {
        &self.prompts
    }

    /// Pushes a prompt onto the stack directly (content convenience).
    pub fn add_prompt(&mut self, spec: PromptSpec) {
        self.prompts.push(ActivePrompt { spec, selected: 0 });
    }

    pub fn message(&mut self, text: impl Into<String>, ttl: u32) {
        self.messages.push(WorldMessage {
            text: text.into(),
            ttl,
        });
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Collects this tick's audio cues from every layer.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        let mut cues = std::mem::take(&mut self.cues);
        if let Some(encounter) = self.encounter.as_mut() {
            cues.extend(encounter.drain_cues());
        }
        if let Some(room) = self.current_room_mut() {
            cues.extend(room.drain_cues());
        }
        cues
    }

    // ========================================================================
    // Bootstrapping & transitions
    // ========================================================================

    /// Enters the starting room; fails fast when the builder does not
    /// know it.
    pub fn spawn(&mut self, name: &str) -> Result<(), GameError> {
        if !self.ensure_room(name) {
            return Err(GameError::UnknownRoom(name.to_string()));
        }
        self.enter_room(name);
        Ok(())
    }

    /// Queues the three-stage room transition: leave the old room, swap,
    /// then activate the new one. Each stage runs on its own tick so
    /// presentation can keep up.
    pub fn enter_room(&mut self, name: impl Into<String>) {
        let name = name.into();
        let mut stage = 0;
        self.routines.push(move |world: &mut World| {
            use crate::routine::RoutineStep;
            match stage {
                0 => {
                    if let Some(room) = world.current_room_mut() {
                        if let Some(hook) = room.on_leave.clone() {
                            hook(room);
                        }
                        room.deactivate();
                    }
                }
                1 => {
                    if !world.ensure_room(&name) {
                        return RoutineStep::Done;
                    }
                    world.current = Some(name.clone());
                    if let Some(room) = world.current_room_mut() {
                        if let Some(hook) = room.on_enter.clone() {
                            hook(room);
                        }
                    }
                }
                _ => {
                    if let Some(room) = world.current_room_mut() {
                        room.activate();
                    }
                    return RoutineStep::Done;
                }
            }
            stage += 1;
            RoutineStep::Again
        });
    }

    /// Builds and caches a room on demand. False when the builder does
    /// not know the name (also recorded as a diagnostic).
    fn ensure_room(&mut self, name: &str) -> bool {
        if self.rooms.contains_key(name) {
            return true;
        }
        let built = (self.builder)(name, &mut self.ids);
        match built {
            Some(room) => {
                self.rooms.insert(name.to_string(), room);
                true
            }
            None => {
                self.diagnostics.push(Diagnostic::UnknownRoom {
                    name: name.to_string(),
                });
                false
            }
        }
    }

    // ========================================================================
    // The tick
    // ========================================================================

    /// Advances the world by one tick, feeding it at most one input
    /// intent.
    pub fn update(&mut self, intent: Option<Intent>) {
        if let Some(intent) = intent {
            self.route_input(intent);
        }

        run_routines(self, |world| &mut world.routines);

        for message in &mut self.messages {
            message.ttl = message.ttl.saturating_sub(1);
        }
        self.messages.retain(|m| m.ttl > 0);

        // A live encounter pauses room-turn advancement entirely.
        if self.encounter.is_some() {
            let result = self
                .encounter
                .as_mut()
                .and_then(Encounter::update);
            if let Some(result) = result {
                self.finish_encounter(result);
            }
            return;
        }

        let commands = {
            let World {
                rooms,
                current,
                rng,
                ..
            } = self;
            match current.as_ref().and_then(|name| rooms.get_mut(name)) {
                Some(room) => room.update(rng),
                None => Vec::new(),
            }
        };
        for command in commands {
            self.handle_command(command);
        }
    }

    /// Routes input by priority: top prompt, then a live encounter, then
    /// the player actor.
    fn route_input(&mut self, intent: Intent) {
        if !self.prompts.is_empty() {
            self.prompt_input(intent);
            return;
        }
        if let Some(encounter) = self.encounter.as_mut() {
            encounter.input(intent);
            return;
        }
        if let Some(room) = self.current_room_mut() {
            if let Intent::PointerAt { x, y } = intent {
                for actor in &mut room.actors {
                    actor.highlight = actor.pos() == (x, y);
                }
            }
            if let Some(player) = room.player_mut() {
                player.handle_intent(intent);
            }
        }
    }

    fn prompt_input(&mut self, intent: Intent) {
        let Some(prompt) = self.prompts.last_mut() else {
            return;
        };
        let (index, label) = match intent {
            Intent::Direction { dy, .. } => {
                if dy < 0 {
                    prompt.selected = prompt.selected.saturating_sub(1);
                } else if dy > 0 {
                    prompt.selected =
                        (prompt.selected + 1).min(prompt.spec.items.len().saturating_sub(1));
                }
                return;
            }
            Intent::Confirm => {
                let index = prompt.selected;
                let label = prompt
                    .spec
                    .items
                    .get(index)
                    .cloned()
                    .unwrap_or_default();
                (index as i32, label)
            }
            Intent::Cancel => (-1, String::new()),
            Intent::PointerAt { .. } => return,
        };
        let handler = prompt.spec.handler.clone();
        let response = handler(index, &label);
        if response.close {
            self.prompts.pop();
        }
        if let Some(command) = response.follow_up {
            self.handle_command(command);
        }
    }

    // ========================================================================
    // Command interpretation
    // ========================================================================

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Combat { attacker, defender } => {
                self.start_encounter(attacker, defender);
            }
            Command::Travel(spec) => self.travel(spec),
            Command::Prompt(spec) => self.add_prompt(spec),
            Command::CombatResult(result) => self.finish_encounter(result),
            other => {
                self.diagnostics.push(Diagnostic::UnhandledCommand {
                    name: other.name(),
                });
            }
        }
    }

    fn next_seed(&mut self) -> u64 {
        ((self.rng.next_u32() as u64) << 32) | self.rng.next_u32() as u64
    }

    /// Lifts both combatants' kits out of the room and spins up the
    /// encounter. The room keeps the (kit-less) actors in place until
    /// the battle settles.
    fn start_encounter(&mut self, attacker: ActorId, defender: ActorId) {
        if self.encounter.is_some() {
            return;
        }
        let seed = self.next_seed();
        let auto_capture = self.auto_capture;

        let mut failure = None;
        let mut combatants = None;
        if let Some(room) = self.current_room_mut() {
            let attacker_part = room
                .actor_mut(attacker)
                .map(|a| (a.name.clone(), a.combat.take()));
            let defender_part = room
                .actor_mut(defender)
                .map(|a| (a.name.clone(), a.combat.take()));
            match (attacker_part, defender_part) {
                (Some((a_name, Some(a_kit))), Some((d_name, Some(d_kit)))) => {
                    combatants = Some((
                        Combatant {
                            id: attacker,
                            name: a_name,
                            kit: a_kit,
                        },
                        Combatant {
                            id: defender,
                            name: d_name,
                            kit: d_kit,
                        },
                    ));
                }
                (None, _) => failure = Some(Diagnostic::MissingActor { id: attacker }),
                (_, None) => failure = Some(Diagnostic::MissingActor { id: defender }),
                (Some((_, kit_a)), Some((_, kit_d))) => {
                    // Hand back whatever was taken; this pairing cannot
                    // fight.
                    if let Some(kit) = kit_a {
                        if let Some(actor) = room.actor_mut(attacker) {
                            actor.combat = Some(kit);
                        }
                        failure = Some(Diagnostic::NotCombatCapable { id: defender });
                    } else {
                        if let Some(kit) = kit_d {
                            if let Some(actor) = room.actor_mut(defender) {
                                actor.combat = Some(kit);
                            }
                        }
                        failure = Some(Diagnostic::NotCombatCapable { id: attacker });
                    }
                }
            }
        }

        if let Some(diagnostic) = failure {
            self.diagnostics.push(diagnostic);
            return;
        }
        if let Some((attacker, defender)) = combatants {
            let mut encounter = Encounter::new(attacker, defender, seed);
            encounter.auto_capture = auto_capture;
            self.encounter = Some(encounter);
        }
    }

    /// Settles a finished battle: exp to the winner, penalties cleared,
    /// kits returned, and the loser removed or captured. Actor removal
    /// happens here - never mid-encounter.
    fn finish_encounter(&mut self, result: EncounterResult) {
        let Some(encounter) = self.encounter.take() else {
            return;
        };
        let (attacker, defender) = encounter.into_combatants();
        let winner_is_attacker = result.winner == attacker.id;
        let (mut winner, mut loser) = if winner_is_attacker {
            (attacker, defender)
        } else {
            (defender, attacker)
        };
        winner.kit.stats.add_exp(result.exp_gained);
        winner.kit.stats.clear_penalties();
        loser.kit.stats.clear_penalties();

        let mut player_lost = false;
        if let Some(room) = self.current_room_mut() {
            fn restore(room: &mut Room, combatant: Combatant) {
                if let Some(actor) = room.actor_mut(combatant.id) {
                    actor.combat = Some(combatant.kit);
                }
            }

            if result.fled {
                restore(room, winner);
                restore(room, loser);
            } else if result.destroyed {
                let loser_is_player =
                    room.actor(loser.id).is_some_and(|a| a.is_player());
                restore(room, winner);
                if loser_is_player {
                    // The player is never deleted; they limp on with
                    // cleared penalties and a bruised ego.
                    player_lost = true;
                    restore(room, loser);
                } else {
                    room.remove_actor(loser.id);
                }
            } else {
                // Capture: the loser leaves the room and joins the
                // winner's roster.
                loser.kit.stats.capture();
                let creature = Creature {
                    name: loser.name.clone(),
                    stats: loser.kit.stats,
                    ability: loser.kit.ability,
                };
                winner.kit.capture(creature);
                restore(room, winner);
                room.remove_actor(loser.id);
            }
        }

        if player_lost {
            self.message("the system rejects you", 240);
        }
    }

    fn travel(&mut self, spec: TravelSpec) {
        // Resolve the traveler: an explicit target, or the player.
        let traveler = match spec.target {
            Some(id) => Some(id),
            None => self.current_room().and_then(Room::player).map(|p| p.id),
        };
        let Some(traveler) = traveler else {
            self.diagnostics.push(Diagnostic::NoTraveler);
            return;
        };

        let Some(room) = self.current_room_mut() else {
            return;
        };
        let Some(mut actor) = room.remove_actor(traveler) else {
            self.diagnostics
                .push(Diagnostic::MissingActor { id: traveler });
            return;
        };
        let is_player = actor.is_player();

        if !self.ensure_room(&spec.room) {
            // Unknown destination: put the traveler back where it was.
            if let Some(room) = self.current_room_mut() {
                room.add_actor(actor);
            }
            return;
        }

        let destination = self
            .rooms
            .get_mut(&spec.room)
            .expect("ensure_room just built this");
        let anchor = destination
            .actor_by_tag(&spec.tag)
            .map(|a| a.pos())
            .unwrap_or((0, 0));
        actor.set_position(anchor.0 + spec.offset_x, anchor.1 + spec.offset_y);
        destination.add_actor(actor);

        if is_player {
            self.enter_room(spec.room);
        }
    }
}
