//! Two-pass resolution of a turn's pending commands.
//!
//! Pass one settles head-on collisions: two actors swapping into each
//! other's tiles trigger a single shared interaction instead of two
//! conflicting move approvals, and both end the turn facing each other.
//! Pass two re-checks every remaining step against occupants, the void,
//! blocking tiles, and the room bounds, applying the moves that survive.

use std::collections::HashSet;

use crate::actor::ActorId;
use crate::command::Command;
use crate::config::GameConfig;
use crate::cue::Cue;

use super::Room;

impl Room {
    /// Resolves this turn's pending commands and returns those that
    /// escape the room (combat, travel, prompts).
    pub(super) fn resolve_pending(&mut self) -> Vec<Command> {
        let pending = std::mem::take(&mut self.pending);
        let player_id = self.player().map(|p| p.id);
        let mut collided: HashSet<ActorId> = HashSet::new();
        let mut results = Vec::new();

        // Pass 1: shared interactions for actors stepping into occupied
        // tiles. Both participants leave the turn via the collided set so
        // neither is processed twice.
        for (actor_id, cmd) in &pending {
            if collided.contains(actor_id) {
                continue;
            }
            let Command::Step { dx, dy } = *cmd else {
                continue;
            };
            let Some((ax, ay)) = self.actor(*actor_id).map(|a| a.pos()) else {
                continue;
            };
            let (x, y) = (ax + dx, ay + dy);
            let occupant = self
                .actor_at(x, y)
                .filter(|o| o.id != *actor_id)
                .map(|o| o.id);
            let Some(occupant_id) = occupant else {
                continue;
            };
            if let Some(cmd) = self.run_interact(occupant_id, *actor_id) {
                results.push(cmd);
                collided.insert(occupant_id);
                collided.insert(*actor_id);
                let (ox, oy) = self.actor(occupant_id).map(|o| o.pos()).unwrap_or((x, y));
                if let Some(mover) = self.actor_mut(*actor_id) {
                    mover.command(&Command::Face { x: ox, y: oy });
                }
                if let Some(occupant) = self.actor_mut(occupant_id) {
                    occupant.command(&Command::Face { x: ax, y: ay });
                }
            }
        }

        // Pass 2: everything that did not collide.
        for (actor_id, cmd) in &pending {
            if collided.contains(actor_id) {
                continue;
            }
            match *cmd {
                Command::Step { dx, dy } => {
                    let Some((ax, ay)) = self.actor(*actor_id).map(|a| a.pos()) else {
                        continue;
                    };
                    let (x, y) = (ax + dx, ay + dy);
                    if let Some(face) = self.actor_mut(*actor_id) {
                        face.command(&Command::Face { x, y });
                    }
                    let is_player = player_id == Some(*actor_id);

                    let occupant = self
                        .actor_at(x, y)
                        .filter(|o| o.id != *actor_id)
                        .map(|o| (o.id, o.name.clone()));
                    if let Some((occupant_id, occupant_name)) = occupant {
                        if let Some(cmd) = self.run_interact(occupant_id, *actor_id) {
                            results.push(cmd);
                            collided.insert(occupant_id);
                            collided.insert(*actor_id);
                        } else if is_player {
                            let who = if occupant_name.is_empty() {
                                "something".to_string()
                            } else {
                                format!("<{occupant_name}>")
                            };
                            self.tile_message(
                                format!("{who} is there..."),
                                ax,
                                ay,
                                GameConfig::NOTICE_MESSAGE_TTL,
                            );
                        }
                    } else if !self.in_bounds(x, y) {
                        if is_player {
                            self.tile_message("impossible", ax, ay, GameConfig::TILE_MESSAGE_TTL);
                        }
                    } else {
                        let blocked = self.tile(x, y).map(|t| t.blocks_move);
                        let ghosting = self.actor(*actor_id).is_some_and(|a| a.ghosting);
                        match blocked {
                            // No tile at all: the void.
                            None => {
                                if is_player {
                                    self.tile_message(
                                        "the void gazes at you",
                                        ax,
                                        ay,
                                        GameConfig::TILE_MESSAGE_TTL,
                                    );
                                }
                            }
                            Some(true) if !ghosting => {
                                if is_player {
                                    self.tile_message(
                                        "the way is blocked",
                                        ax,
                                        ay,
                                        GameConfig::TILE_MESSAGE_TTL,
                                    );
                                }
                                self.cue(Cue::Bump);
                            }
                            Some(_) => {
                                if let Some(actor) = self.actor_mut(*actor_id) {
                                    actor.command(cmd);
                                }
                            }
                        }
                    }
                }
                Command::Investigate { x, y } => {
                    let Some((ax, ay)) = self.actor(*actor_id).map(|a| a.pos()) else {
                        continue;
                    };
                    if let Some(actor) = self.actor_mut(*actor_id) {
                        actor.command(&Command::Face { x, y });
                    }
                    let verb = if (ax - x).abs() > 1 || (ay - y).abs() > 1 {
                        "see"
                    } else {
                        "feel"
                    };
                    let text = if let Some(found) = self.actor_at(x, y) {
                        format!("i {verb} thing <{}>", found.name)
                    } else if let Some(tile) = self.tile(x, y).filter(|t| !t.name.is_empty()) {
                        format!("i {verb} <{}>", tile.name)
                    } else {
                        format!("i {verb} nil")
                    };
                    self.tile_message(text, ax, ay, GameConfig::TILE_MESSAGE_TTL);
                }
                Command::Face { x, y } => {
                    if let Some(actor) = self.actor_mut(*actor_id) {
                        actor.command(&Command::Face { x, y });
                    }
                }
                // Everything else is the world's problem.
                _ => results.push(cmd.clone()),
            }
        }

        results
    }

    /// One interaction: the occupant's hook, or the built-in fallback.
    fn run_interact(&self, target: ActorId, mover: ActorId) -> Option<Command> {
        let target = self.actor(target)?;
        let mover = self.actor(mover)?;
        target.interact(self, mover)
    }
}
