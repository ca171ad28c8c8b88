//! Actors - everything that occupies a tile.
//!
//! An actor is identity plus position plus behavior. Combat capability is
//! a component ([`CombatKit`]) referenced by the actor, not a base class:
//! the player, wild glitches, and static interactables are all the same
//! [`ActorState`] with different parts populated.

use std::collections::VecDeque;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::ability::{Ability, AbilityKind};
use crate::command::Command;
use crate::config::GameConfig;
use crate::input::Intent;
use crate::rng::GameRng;
use crate::room::Room;
use crate::stats::StatBlock;

// ============================================================================
// Identity
// ============================================================================

/// World-unique actor identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

/// Monotonic id allocator, owned by the world and threaded through room
/// builders.
#[derive(Clone, Debug, Default)]
pub struct ActorIdAlloc {
    next: u32,
}

impl ActorIdAlloc {
    pub fn next(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next += 1;
        id
    }
}

/// Grid-facing direction, derived from movement and Face commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    North,
    #[default]
    South,
    East,
    West,
}

impl Facing {
    /// Faces from one tile toward another; x displacement wins ties.
    pub fn towards(from: (i32, i32), to: (i32, i32)) -> Self {
        if to.0 < from.0 {
            Facing::West
        } else if to.0 > from.0 {
            Facing::East
        } else if to.1 < from.1 {
            Facing::North
        } else {
            Facing::South
        }
    }
}

// ============================================================================
// Combat capability
// ============================================================================

/// A capturable combat-capable creature: the unit that lives in a roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    pub name: String,
    pub stats: StatBlock,
    pub ability: Option<Ability>,
}

/// Combat component: own stat block, own ability, and the roster of
/// captured sub-creatures.
///
/// A wild glitch is its own creature (empty roster, own ability); the
/// player fights with their own stats but borrows the active roster
/// creature's ability.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatKit {
    pub stats: StatBlock,
    pub ability: Option<Ability>,
    pub roster: ArrayVec<Creature, { GameConfig::ROSTER_CAP }>,
    pub active: Option<usize>,
}

impl CombatKit {
    pub fn new(stats: StatBlock) -> Self {
        Self {
            stats,
            ..Self::default()
        }
    }

    pub fn with_ability(stats: StatBlock, ability: Ability) -> Self {
        Self {
            stats,
            ability: Some(ability),
            ..Self::default()
        }
    }

    /// The roster creature currently fronting for this actor, if any.
    pub fn current_creature(&self) -> Option<&Creature> {
        self.active.and_then(|i| self.roster.get(i))
    }

    /// The ability in effect: the active roster creature's, or the
    /// actor's own. An actor with no current sub-creature and no own
    /// ability simply has none - effects are skipped.
    pub fn current_ability(&self) -> Option<&Ability> {
        match self.active.and_then(|i| self.roster.get(i)) {
            Some(creature) => creature.ability.as_ref(),
            None => self.ability.as_ref(),
        }
    }

    pub fn current_ability_mut(&mut self) -> Option<&mut Ability> {
        match self.active.and_then(|i| self.roster.get_mut(i)) {
            Some(creature) => creature.ability.as_mut(),
            None => self.ability.as_mut(),
        }
    }

    /// An ability of the given kind currently in its active window?
    pub fn active_ability(&self, kind: AbilityKind) -> bool {
        self.current_ability()
            .is_some_and(|a| a.kind == kind && a.is_active())
    }

    pub fn has_roster(&self) -> bool {
        !self.roster.is_empty()
    }

    pub fn roster_full(&self) -> bool {
        self.roster.len() >= GameConfig::ROSTER_CAP
    }

    /// Appends a captured creature, activating it if nothing was active.
    /// Returns false when the roster is at capacity.
    pub fn capture(&mut self, creature: Creature) -> bool {
        if self.roster.try_push(creature).is_err() {
            return false;
        }
        if self.active.is_none() {
            self.active = Some(self.roster.len() - 1);
        }
        true
    }

    /// One combat round elapses for every ability this actor carries.
    pub fn round(&mut self) {
        if let Some(ability) = self.ability.as_mut() {
            ability.round();
        }
        for creature in self.roster.iter_mut() {
            if let Some(ability) = creature.ability.as_mut() {
                ability.round();
            }
        }
    }
}

// ============================================================================
// Behavior
// ============================================================================

/// How an actor decides what to do with its turn.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Driven by buffered input; at most one command per turn.
    Player,
    /// Idle random walk, optionally chasing the actor with a tag.
    Wander {
        think: i32,
        wanders: bool,
        chase: Option<String>,
    },
    /// Never moves, never takes a turn on its own.
    Static,
}

impl Behavior {
    pub fn wander() -> Self {
        Behavior::Wander {
            think: 0,
            wanders: true,
            chase: None,
        }
    }

    pub fn chase(tag: impl Into<String>) -> Self {
        Behavior::Wander {
            think: 0,
            wanders: true,
            chase: Some(tag.into()),
        }
    }
}

/// Interaction hook: `(room, target, mover)` to an optional command.
/// Registered by content; a `None` result falls back to the default
/// (combat for wild combat-capable actors bumped by the player).
pub type InteractHook =
    Arc<dyn Fn(&Room, &ActorState, &ActorState) -> Option<Command> + Send + Sync>;

// ============================================================================
// Actor state
// ============================================================================

/// One entity in a room.
pub struct ActorState {
    pub id: ActorId,
    pub name: String,
    pub tag: String,
    /// Sprite key consumed by the renderer.
    pub sprite: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub facing: Facing,
    /// Pointer-hover highlight, consumed by the renderer.
    pub highlight: bool,
    /// Renderer hint: this actor's sprite stack wobbles.
    pub skews: bool,
    /// Renderer hint: this actor hovers above its tile.
    pub floats: bool,
    /// Free-running visual ticker driving skew/float phases.
    pub warble: u64,
    /// Whether other actors collide with this one.
    pub blocks: bool,
    /// Ghosting actors pass through blocking tiles.
    pub ghosting: bool,
    pub behavior: Behavior,
    pub combat: Option<CombatKit>,
    pub on_interact: Option<InteractHook>,

    ready: bool,
    moving_ticker: i32,
    target_x: i32,
    target_y: i32,
    pending: VecDeque<Command>,
}

impl ActorState {
    pub fn new(id: ActorId, x: i32, y: i32) -> Self {
        Self {
            id,
            name: String::new(),
            tag: String::new(),
            sprite: String::new(),
            x,
            y,
            z: 0,
            facing: Facing::default(),
            highlight: false,
            skews: false,
            floats: false,
            warble: 0,
            blocks: true,
            ghosting: false,
            behavior: Behavior::Static,
            combat: None,
            on_interact: None,
            ready: false,
            moving_ticker: 0,
            target_x: x,
            target_y: y,
            pending: VecDeque::new(),
        }
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.target_x = x;
        self.target_y = y;
        self.moving_ticker = 0;
    }

    pub fn is_player(&self) -> bool {
        matches!(self.behavior, Behavior::Player)
    }

    /// Mid-slide interpolation ratio for the renderer: 0 when settled.
    pub fn slide_ratio(&self) -> f32 {
        self.moving_ticker as f32 / GameConfig::SLIDE_TICKS as f32
    }

    // ========================================================================
    // Turn-taking
    // ========================================================================

    /// A player actor is ready once input buffered a command for it.
    pub fn is_ready(&self) -> bool {
        self.ready && !self.pending.is_empty()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Drains one buffered command; called once per advanced turn.
    pub fn take_turn(&mut self) -> Option<Command> {
        if let Behavior::Wander { think, .. } = &mut self.behavior {
            *think -= 1;
        }
        self.pending.pop_front()
    }

    /// Applies a resolved command to this actor's own state. Orientation
    /// is immediate; movement starts a tile slide that commits on a later
    /// update.
    pub fn command(&mut self, cmd: &Command) {
        match *cmd {
            Command::Face { x, y } => {
                self.facing = Facing::towards((self.x, self.y), (x, y));
            }
            Command::Step { dx, dy } => {
                let (tx, ty) = (self.x + dx, self.y + dy);
                self.facing = Facing::towards((self.x, self.y), (tx, ty));
                self.target_x = tx;
                self.target_y = ty;
                self.moving_ticker = GameConfig::SLIDE_TICKS;
            }
            _ => {}
        }
    }

    /// Translates one input intent into at most one buffered command.
    /// Only meaningful for player actors.
    pub fn handle_intent(&mut self, intent: Intent) {
        if !self.is_player() || self.moving_ticker > 0 {
            return;
        }
        let cmd = match intent {
            Intent::Direction { dx, dy, face_only } => {
                if face_only {
                    Some(Command::Face {
                        x: self.x + dx,
                        y: self.y + dy,
                    })
                } else {
                    Some(Command::Step { dx, dy })
                }
            }
            Intent::PointerAt { x, y } => Some(Command::Investigate { x, y }),
            Intent::Confirm | Intent::Cancel => None,
        };
        if let Some(cmd) = cmd {
            self.pending.clear();
            self.pending.push_back(cmd);
            self.ready = true;
        }
    }

    /// Per-tick update: progresses a tile slide, and lets wandering
    /// creatures think up their next step. Volunteered commands land in
    /// the actor's own buffer - they never consume a turn directly.
    pub fn update(&mut self, rng: &mut GameRng, chase_to: Option<(i32, i32)>) {
        self.warble += 1;
        if self.moving_ticker > 0 {
            self.moving_ticker -= 1;
            if self.moving_ticker == 0 {
                self.x = self.target_x;
                self.y = self.target_y;
            }
            return;
        }

        let (x, y) = (self.x, self.y);
        if let Behavior::Wander { think, wanders, .. } = &mut self.behavior {
            if *think > 0 {
                return;
            }
            *think = GameConfig::THINK_TICKS;

            if let Some((tx, ty)) = chase_to {
                let mut dx = (tx - x).signum();
                let mut dy = (ty - y).signum();
                if dx != 0 && dy != 0 {
                    // No diagonal steps; drop one axis at random.
                    if rng.range(2) == 0 {
                        dx = 0;
                    } else {
                        dy = 0;
                    }
                }
                if dx != 0 || dy != 0 {
                    self.pending.push_back(Command::Step { dx, dy });
                }
            } else if *wanders && self.pending.is_empty() {
                let mut dx = rng.range(3) - 1;
                let mut dy = rng.range(3) - 1;
                if dx != 0 && dy != 0 {
                    if rng.range(2) == 0 {
                        dx = 0;
                    } else {
                        dy = 0;
                    }
                }
                self.pending.push_back(Command::Step { dx, dy });
            }
        }
    }

    /// Resolves an interaction with `other` bumping into this actor.
    ///
    /// The content hook gets first refusal; the built-in fallback starts
    /// combat when a combat-capable non-player actor is bumped by the
    /// player.
    pub fn interact(&self, room: &Room, other: &ActorState) -> Option<Command> {
        if let Some(hook) = &self.on_interact {
            if let Some(cmd) = hook(room, self, other) {
                return Some(cmd);
            }
        }
        match &self.combat {
            Some(kit) if !self.is_player() && other.is_player() && !kit.stats.killed() => {
                Some(Command::Combat {
                    attacker: other.id,
                    defender: self.id,
                })
            }
            _ => None,
        }
    }
}
