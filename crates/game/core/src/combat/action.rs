//! Timed combat sub-actions.
//!
//! Each variant is one phase of a combat turn: it is `update`d once per
//! tick and reports completion through `done`, optionally chaining into
//! a follow-up action (a killing attack chains into `Done`). Timers are
//! fixed tick offsets; all randomness comes from the encounter's own
//! generator.

use crate::ability::AbilityKind;
use crate::command::EncounterResult;
use crate::config::GameConfig;
use crate::cue::Cue;
use crate::stats::StatKind;

use super::{Encounter, Tone};

pub(crate) enum CombatAction {
    Attack {
        stat: StatKind,
        is_attacker: bool,
        timer: i32,
        next: Option<Box<CombatAction>>,
    },
    Boost {
        stat: StatKind,
        is_attacker: bool,
        timer: i32,
    },
    Ability {
        is_attacker: bool,
        timer: i32,
    },
    Flee {
        is_attacker: bool,
        can_flee: bool,
        timer: i32,
    },
    Capture {
        is_attacker: bool,
        caught: bool,
        timer: i32,
    },
    Swap {
        slot: usize,
        is_attacker: bool,
        timer: i32,
    },
    Done {
        result: EncounterResult,
        is_attacker: bool,
        timer: i32,
    },
}

impl CombatAction {
    pub fn attack(stat: StatKind, is_attacker: bool) -> Self {
        CombatAction::Attack {
            stat,
            is_attacker,
            timer: 0,
            next: None,
        }
    }

    pub fn boost(stat: StatKind, is_attacker: bool) -> Self {
        CombatAction::Boost {
            stat,
            is_attacker,
            timer: 0,
        }
    }

    pub fn ability(is_attacker: bool) -> Self {
        CombatAction::Ability {
            is_attacker,
            timer: 0,
        }
    }

    pub fn flee(can_flee: bool, is_attacker: bool) -> Self {
        CombatAction::Flee {
            is_attacker,
            can_flee,
            timer: 0,
        }
    }

    pub fn capture(is_attacker: bool) -> Self {
        CombatAction::Capture {
            is_attacker,
            caught: false,
            timer: 0,
        }
    }

    pub fn swap(slot: usize, is_attacker: bool) -> Self {
        CombatAction::Swap {
            slot,
            is_attacker,
            timer: 0,
        }
    }

    /// Whose action this is; `true` is the player's side.
    pub fn is_attacker(&self) -> bool {
        match self {
            CombatAction::Attack { is_attacker, .. }
            | CombatAction::Boost { is_attacker, .. }
            | CombatAction::Ability { is_attacker, .. }
            | CombatAction::Flee { is_attacker, .. }
            | CombatAction::Capture { is_attacker, .. }
            | CombatAction::Swap { is_attacker, .. }
            | CombatAction::Done { is_attacker, .. } => *is_attacker,
        }
    }

    // ========================================================================
    // Per-tick update
    // ========================================================================

    pub fn update(&mut self, enc: &mut Encounter) {
        match self {
            CombatAction::Attack {
                stat,
                is_attacker,
                timer,
                next,
            } => {
                *timer += 1;
                if *timer == GameConfig::ACTION_REPORT_TICK {
                    Self::resolve_attack(enc, *stat, *is_attacker, timer, next);
                }
            }
            CombatAction::Boost {
                stat,
                is_attacker,
                timer,
            } => {
                *timer += 1;
                if *timer == GameConfig::ACTION_REPORT_TICK {
                    Self::resolve_boost(enc, *stat, *is_attacker);
                }
            }
            CombatAction::Ability { is_attacker, timer } => {
                *timer += 1;
                if *timer == GameConfig::ACTION_REPORT_TICK {
                    Self::resolve_ability(enc, *is_attacker);
                }
            }
            CombatAction::Flee { can_flee, timer, .. } => {
                *timer += 1;
                if *timer == GameConfig::FLEE_REPORT_TICK {
                    if *can_flee {
                        enc.report.push(
                            format!("{} flees successfully!", enc.attacker.name),
                            Tone::Neutral,
                        );
                    } else {
                        enc.report.push("escape is denied!", Tone::Neutral);
                    }
                }
            }
            CombatAction::Capture { caught, timer, .. } => {
                *timer += 1;
                Self::update_capture(enc, caught, timer);
            }
            CombatAction::Swap {
                slot,
                is_attacker: _,
                timer,
            } => {
                *timer += 1;
                if *timer == GameConfig::ACTION_REPORT_TICK {
                    let name = enc
                        .attacker
                        .kit
                        .roster
                        .get(*slot)
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    enc.report.push(
                        format!("{} swaps to {}!", enc.attacker.name, name),
                        Tone::Neutral,
                    );
                } else if *timer == GameConfig::SWAP_APPLY_TICK {
                    if *slot < enc.attacker.kit.roster.len() {
                        enc.attacker.kit.active = Some(*slot);
                    }
                }
            }
            CombatAction::Done {
                result,
                is_attacker,
                timer,
            } => {
                *timer += 1;
                if *timer == GameConfig::ACTION_REPORT_TICK {
                    if result.fled {
                        // Nothing to announce; the flee already reported.
                    } else if *is_attacker {
                        if result.destroyed {
                            enc.report.push(
                                format!(
                                    "{} destroys {}!",
                                    enc.attacker.name, enc.defender.name
                                ),
                                Tone::Attack,
                            );
                            enc.cues.push(Cue::Death);
                        }
                        // Captures were already reported by the capture
                        // attempt itself.
                    } else {
                        enc.report.push(
                            format!("{} infects {}!", enc.defender.name, enc.attacker.name),
                            Tone::Attack,
                        );
                        enc.cues.push(Cue::Death);
                    }
                }
            }
        }
    }

    fn resolve_attack(
        enc: &mut Encounter,
        stat: StatKind,
        is_attacker: bool,
        timer: &mut i32,
        next: &mut Option<Box<CombatAction>>,
    ) {
        let Encounter {
            attacker,
            defender,
            rng,
            report,
            cues,
            ..
        } = enc;
        let (att, def) = if is_attacker {
            (attacker, defender)
        } else {
            (defender, attacker)
        };

        let mut v = att.kit.stats.roll_attack(rng);
        let mut bonus = 0;

        // Offensive ability modifiers on the acting side.
        if let Some(ability) = att.kit.current_ability().filter(|a| a.is_active()) {
            match ability.kind {
                AbilityKind::PerfectHit => {
                    v = ability.tier * 2;
                    bonus = 0;
                    report.push(format!("{} for {}!", ability.kind, v), Tone::Ability);
                }
                AbilityKind::RandomDamage => {
                    let extra = rng.range(ability.tier + 1);
                    bonus += extra;
                    report.push(format!("{} for +{}!", ability.kind, extra), Tone::Ability);
                }
                _ => {}
            }
        }

        if v + bonus <= 0 {
            report.push(
                format!("{} attacks {}, but misses!", att.name, stat),
                Tone::Info,
            );
            cues.push(Cue::Miss);
            return;
        }

        // Defensive ability gates on the receiving side.
        if let Some(ability) = def.kit.current_ability().filter(|a| a.is_active()) {
            match ability.kind {
                AbilityKind::Block => {
                    let shaved = ability.tier * 2;
                    v -= shaved;
                    if v < 0 {
                        bonus += v;
                        if bonus < 0 {
                            bonus = 0;
                        }
                        v = 0;
                    }
                    report.push(format!("{}!", ability.kind), Tone::Ability);
                }
                AbilityKind::PerfectBlock => {
                    v = 0;
                    bonus = 0;
                    report.push(format!("{}!", ability.kind), Tone::Ability);
                }
                _ => {}
            }
        }

        let reduced = def.kit.stats.reduce_damage(v + bonus, rng);
        let applied = def.kit.stats.apply_damage(stat, reduced);
        if applied <= 0 {
            report.push(
                format!("{} attacks {}, but is denied!", att.name, stat),
                Tone::Info,
            );
            cues.push(Cue::Miss);
            return;
        }

        if bonus > 0 {
            report.push(
                format!(
                    "{} attacks {} for {}({}+{})!",
                    att.name,
                    stat,
                    applied,
                    applied - bonus,
                    bonus
                ),
                Tone::Attack,
            );
        } else {
            report.push(
                format!("{} attacks {} for {}!", att.name, stat, applied),
                Tone::Attack,
            );
        }
        cues.push(Cue::Hit);

        // The killing blow lands the moment integrity empties.
        if stat == StatKind::Integrity && def.kit.stats.current(StatKind::Integrity) == 0 {
            if def.kit.active_ability(AbilityKind::Hardy) {
                report.push(format!("{}!", AbilityKind::Hardy), Tone::Info);
                cues.push(Cue::Miss);
                if let Some(ability) = def.kit.current_ability_mut() {
                    ability.consume();
                }
                def.kit.stats.spare();
            } else {
                def.kit.stats.kill();
                *next = Some(Box::new(CombatAction::Done {
                    result: EncounterResult {
                        winner: att.id,
                        loser: def.id,
                        destroyed: true,
                        fled: false,
                        exp_gained: def.kit.stats.exp_value(),
                    },
                    is_attacker,
                    timer: 0,
                }));
                *timer = GameConfig::ACTION_TICKS;
            }
        }
    }

    fn resolve_boost(enc: &mut Encounter, stat: StatKind, is_attacker: bool) {
        let Encounter {
            attacker,
            defender,
            rng,
            report,
            cues,
            ..
        } = enc;
        let (att, _) = if is_attacker {
            (attacker, defender)
        } else {
            (defender, attacker)
        };

        let rolled = att.kit.stats.roll_boost(stat, rng);
        let applied = att.kit.stats.apply_boost(stat, rolled);
        if applied <= 0 {
            report.push(
                format!("{} fails to boost {}", att.name, stat),
                Tone::Info,
            );
            cues.push(Cue::Miss);
        } else {
            report.push(
                format!("{} boosts {} for {}!", att.name, stat, applied),
                Tone::Defense,
            );
            cues.push(Cue::Boost);
        }
    }

    fn resolve_ability(enc: &mut Encounter, is_attacker: bool) {
        let Encounter {
            attacker,
            defender,
            rng,
            report,
            cues,
            ..
        } = enc;
        let (att, def) = if is_attacker {
            (attacker, defender)
        } else {
            (defender, attacker)
        };

        // Cleave is the only activated offensive effect; the rest modify
        // the attack pipeline passively while active.
        if !att.kit.active_ability(AbilityKind::Cleave) {
            return;
        }
        let kind = StatKind::ALL[rng.range(3) as usize];
        report.push(
            format!("{} cleaves {}!", att.name, kind),
            Tone::Ability,
        );
        let mut dmg = def.kit.stats.current(kind) / 2;
        if let Some(ability) = def.kit.current_ability().filter(|a| a.is_active()) {
            match ability.kind {
                AbilityKind::Block => {
                    dmg = (dmg - ability.tier * 2).max(0);
                    report.push(format!("{}!", ability.kind), Tone::Ability);
                }
                AbilityKind::PerfectBlock => {
                    dmg = 0;
                    report.push(format!("{}!", ability.kind), Tone::Ability);
                }
                _ => {}
            }
        }
        if dmg <= 0 {
            cues.push(Cue::Miss);
            return;
        }
        let reduced = def.kit.stats.reduce_damage(dmg, rng);
        let applied = def.kit.stats.apply_damage(kind, reduced);
        if applied > 0 {
            report.push(
                format!("{} loses {} {}!", def.name, applied, kind),
                Tone::Attack,
            );
            cues.push(Cue::Hit);
        } else {
            cues.push(Cue::Miss);
        }
    }

    fn update_capture(enc: &mut Encounter, caught: &mut bool, timer: &mut i32) {
        let [first, second, last] = GameConfig::CAPTURE_TRY_TICKS;
        let skip_to_end = last + 1;
        if *timer == 1 {
            if enc.attacker.kit.roster_full() {
                enc.report.push(
                    format!(
                        "{} attempts to capture {}, but the quarantine is full!",
                        enc.attacker.name, enc.defender.name
                    ),
                    Tone::Neutral,
                );
                enc.cues.push(Cue::Miss);
                *timer = skip_to_end;
            } else {
                enc.report.push(
                    format!(
                        "{} attempts to capture {}!",
                        enc.attacker.name, enc.defender.name
                    ),
                    Tone::Neutral,
                );
            }
        } else if *timer == first / 2 {
            enc.report.push("maybe...", Tone::Neutral);
        } else if *timer == first || *timer == second {
            if Self::try_capture(enc) {
                Self::report_caught(enc);
                *caught = true;
                *timer = skip_to_end;
            }
        } else if *timer == (first + second) / 2 {
            enc.report.push("maybe...!", Tone::Neutral);
        } else if *timer == last {
            if Self::try_capture(enc) {
                Self::report_caught(enc);
                *caught = true;
            } else {
                enc.report.push(
                    format!(
                        "{} failed to capture {}!",
                        enc.attacker.name, enc.defender.name
                    ),
                    Tone::Neutral,
                );
                enc.cues.push(Cue::Miss);
            }
        }
    }

    fn try_capture(enc: &mut Encounter) -> bool {
        let chance = enc.capture_chance();
        enc.rng.chance(chance)
    }

    fn report_caught(enc: &mut Encounter) {
        enc.report.push(
            format!("{} captures {}!", enc.attacker.name, enc.defender.name),
            Tone::Neutral,
        );
        enc.cues.push(Cue::Caught);
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Whether this action is finished, and the action it chains into.
    pub fn done(&mut self, enc: &mut Encounter) -> (Option<CombatAction>, bool) {
        match self {
            CombatAction::Attack {
                stat,
                is_attacker,
                timer,
                next,
            } => {
                if *timer < GameConfig::ACTION_TICKS {
                    return (None, false);
                }
                if let Some(next) = next.take() {
                    return (Some(*next), true);
                }
                // Completion warnings for emptied non-lethal pools.
                let target = if *is_attacker {
                    &enc.defender
                } else {
                    &enc.attacker
                };
                let down = target.kit.stats.current(*stat) <= 0;
                let name = target.name.clone();
                if down && *stat != StatKind::Integrity {
                    enc.report.push(
                        format!("{}'s {} is down!", name, stat.as_ref().to_lowercase()),
                        Tone::Neutral,
                    );
                }
                (None, true)
            }
            CombatAction::Boost { timer, .. }
            | CombatAction::Ability { timer, .. }
            | CombatAction::Swap { timer, .. } => (None, *timer >= GameConfig::ACTION_TICKS),
            CombatAction::Flee { timer, .. } => (None, *timer >= GameConfig::ACTION_TICKS),
            CombatAction::Capture {
                is_attacker,
                caught,
                timer,
            } => {
                if enc.auto_capture || (*caught && *timer >= GameConfig::CAPTURE_DONE_TICK) {
                    let result = EncounterResult {
                        winner: enc.attacker.id,
                        loser: enc.defender.id,
                        destroyed: false,
                        fled: false,
                        exp_gained: enc.defender.kit.stats.exp_value(),
                    };
                    return (
                        Some(CombatAction::Done {
                            result,
                            is_attacker: *is_attacker,
                            timer: 0,
                        }),
                        true,
                    );
                }
                (None, *timer >= GameConfig::CAPTURE_DONE_TICK)
            }
            CombatAction::Done { timer, .. } => (None, *timer >= GameConfig::DONE_TICKS),
        }
    }
}
