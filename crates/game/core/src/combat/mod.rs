//! The combat encounter state machine.
//!
//! One [`Encounter`] resolves one battle to one of three terminal
//! outcomes: the attacker destroys the defender, captures it, or flees.
//! The attacker is conventionally the player and always acts first; menu
//! states collect the player's choice, and a chosen [`CombatAction`]
//! animates over a fixed tick budget before control alternates.
//!
//! The encounter *owns* both combatants' combat kits for its duration -
//! the world takes them from the room actors when combat starts and
//! settles them back (with rewards, removals, and captures) when the
//! result surfaces. Room turn advancement is paused the whole time.

mod action;
mod menu;
mod report;

pub use menu::{Menu, MenuAction, MenuEntry, MenuMode, Menus, Rect};
pub use report::{Report, ReportLine, Tone};

pub(crate) use action::CombatAction;

use crate::actor::{ActorId, CombatKit};
use crate::command::EncounterResult;
use crate::config::GameConfig;
use crate::cue::Cue;
use crate::input::Intent;
use crate::rng::GameRng;
use crate::stats::{capture_chance, StatKind};

/// One side of a battle: the actor's identity plus its combat kit,
/// owned by the encounter until the battle settles.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: ActorId,
    pub name: String,
    pub kit: CombatKit,
}

pub struct Encounter {
    pub(crate) attacker: Combatant,
    pub(crate) defender: Combatant,
    pub(crate) action: Option<CombatAction>,
    pub(crate) menus: Menus,
    pub(crate) menu_mode: MenuMode,
    pub(crate) report: Report,
    /// Debug flag: capture attempts resolve immediately as successes.
    pub auto_capture: bool,
    pub(crate) rng: GameRng,
    pub(crate) cues: Vec<Cue>,
    done: Option<EncounterResult>,
}

impl Encounter {
    /// Starts a battle. Each encounter owns its own seeded generator so
    /// a battle can be replayed deterministically.
    pub fn new(attacker: Combatant, defender: Combatant, seed: u64) -> Self {
        let mut encounter = Self {
            attacker,
            defender,
            action: None,
            menus: Menus::default(),
            menu_mode: MenuMode::Main,
            report: Report::default(),
            auto_capture: false,
            rng: GameRng::new(seed),
            cues: Vec::new(),
            done: None,
        };
        encounter.refresh_menus();
        encounter
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn attacker(&self) -> &Combatant {
        &self.attacker
    }

    pub fn defender(&self) -> &Combatant {
        &self.defender
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn menu_mode(&self) -> MenuMode {
        self.menu_mode
    }

    pub fn menu(&self) -> &Menu {
        self.menus.by_mode(self.menu_mode)
    }

    /// An action is animating; menu input is ignored.
    pub fn action_in_progress(&self) -> bool {
        self.action.is_some()
    }

    /// Live capture probability, shown next to the defender's stats.
    pub fn capture_chance(&self) -> f64 {
        capture_chance(&self.attacker.kit.stats, &self.defender.kit.stats)
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Reclaims both combatants once the encounter has produced its
    /// result.
    pub fn into_combatants(self) -> (Combatant, Combatant) {
        (self.attacker, self.defender)
    }

    /// Presentation cache write-back for pointer hit-testing; called by
    /// the renderer after laying out the current menu.
    pub fn set_item_bounds(&mut self, index: usize, bounds: Rect) {
        let menu = self.menus.by_mode_mut(self.menu_mode);
        if let Some(entry) = menu.entries.get_mut(index) {
            entry.bounds = Some(bounds);
        }
    }

    // ========================================================================
    // The tick
    // ========================================================================

    /// Advances the encounter one tick. Returns the terminal result once
    /// it surfaces; the world then settles the battle.
    pub fn update(&mut self) -> Option<EncounterResult> {
        if let Some(result) = &self.done {
            return Some(result.clone());
        }
        let Some(mut action) = self.action.take() else {
            return None;
        };

        action.update(self);
        let (next, finished) = action.done(self);
        if !finished {
            self.action = Some(action);
            return None;
        }

        // A finished action first settles every ability's round counters
        // on both sides.
        self.attacker.kit.round();
        self.defender.kit.round();

        if let Some(next) = next {
            self.action = Some(next);
            return None;
        }

        match &action {
            CombatAction::Done { result, .. } => {
                self.done = Some(result.clone());
            }
            CombatAction::Flee {
                is_attacker: true,
                can_flee: true,
                ..
            } => {
                self.done = Some(EncounterResult {
                    winner: self.attacker.id,
                    loser: self.defender.id,
                    destroyed: false,
                    fled: true,
                    exp_gained: 0,
                });
            }
            a if a.is_attacker() => {
                // The player's action resolved without ending the battle:
                // the enemy answers.
                self.action = Some(self.generate_enemy_action());
            }
            _ => {
                // Enemy action finished; back to the player's menu.
                self.menu_mode = MenuMode::Main;
                self.refresh_menus();
            }
        }

        self.done.clone()
    }

    /// Placeholder enemy policy: a uniform stat, then a coin flip
    /// between attacking and boosting.
    fn generate_enemy_action(&mut self) -> CombatAction {
        let stat = StatKind::ALL[self.rng.range(3) as usize];
        if self.rng.range(2) == 0 {
            CombatAction::attack(stat, false)
        } else {
            CombatAction::boost(stat, false)
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Routes one input intent into the current menu. Ignored while an
    /// action is animating.
    pub fn input(&mut self, intent: Intent) {
        if self.action.is_some() || self.done.is_some() {
            return;
        }
        match intent {
            Intent::Cancel => {
                self.menu_mode = MenuMode::Main;
            }
            Intent::Confirm => {
                let menu = self.menus.by_mode(self.menu_mode);
                if let Some(entry) = menu.selected_entry().filter(|e| !e.disabled) {
                    let action = entry.action;
                    self.trigger(action);
                }
            }
            Intent::Direction { dy, .. } => {
                self.menus.by_mode_mut(self.menu_mode).move_selection(dy);
            }
            Intent::PointerAt { x, y } => {
                let menu = self.menus.by_mode_mut(self.menu_mode);
                if let Some(index) = menu.hit_test(x, y) {
                    menu.selected = index;
                    let action = menu.entries[index].action;
                    self.trigger(action);
                }
            }
        }
    }

    /// Executes one confirmed menu entry.
    fn trigger(&mut self, action: MenuAction) {
        match action {
            MenuAction::OpenMenu(mode) => {
                self.menu_mode = mode;
            }
            MenuAction::Attack(stat) => {
                self.action = Some(CombatAction::attack(stat, true));
            }
            MenuAction::Boost(stat) => {
                self.action = Some(CombatAction::boost(stat, true));
            }
            MenuAction::UseAbility => {
                if let Some(ability) = self.attacker.kit.current_ability_mut() {
                    if ability.activate() {
                        self.action = Some(CombatAction::ability(true));
                    }
                }
            }
            MenuAction::SwapTo(slot) => {
                if self.attacker.kit.active != Some(slot) {
                    self.action = Some(CombatAction::swap(slot, true));
                }
            }
            MenuAction::Capture => {
                self.action = Some(CombatAction::capture(true));
            }
            MenuAction::Flee => {
                // The flee roll happens up front; the action just plays
                // out the pre-rolled outcome.
                let fire = self.defender.kit.stats.current(StatKind::Firewall);
                let inte = self.defender.kit.stats.current(StatKind::Integrity);
                let roll = self
                    .rng
                    .range(GameConfig::FLEE_WINDOW + fire + inte);
                let can_flee = roll < GameConfig::FLEE_THRESHOLD;
                self.report.push(
                    format!("{} attempts to flee!", self.attacker.name),
                    Tone::Neutral,
                );
                self.action = Some(CombatAction::flee(can_flee, true));
            }
        }
    }

    // ========================================================================
    // Menus
    // ========================================================================

    /// Rebuilds every menu whose contents are turn-dependent.
    pub(crate) fn refresh_menus(&mut self) {
        let has_roster = self.attacker.kit.has_roster();
        self.menus.main = Menu::new(vec![
            MenuEntry::new("ATTACK", MenuAction::OpenMenu(MenuMode::AttackStat)),
            MenuEntry::new("BOOST STAT", MenuAction::OpenMenu(MenuMode::BoostStat)),
            MenuEntry::new("USE GLITCH", MenuAction::OpenMenu(MenuMode::UseGlitch))
                .disabled(!has_roster),
            MenuEntry::new("SWAP GLITCH", MenuAction::OpenMenu(MenuMode::SwapGlitch))
                .disabled(!has_roster),
            MenuEntry::new("CAPTURE GLITCH", MenuAction::Capture),
            MenuEntry::new("FLEE", MenuAction::Flee),
        ]);
        self.menus.attack = Self::stat_menu(MenuAction::Attack);
        self.menus.boost = Self::stat_menu(MenuAction::Boost);
        self.refresh_glitch_use();
        self.refresh_glitch_swap();
    }

    fn stat_menu(make: fn(StatKind) -> MenuAction) -> Menu {
        Menu::new(vec![
            MenuEntry::new("INTEGRITY", make(StatKind::Integrity)),
            MenuEntry::new("FIREWALL", make(StatKind::Firewall)),
            MenuEntry::new("PENETRATION", make(StatKind::Penetration)),
            MenuEntry::new("CANCEL", MenuAction::OpenMenu(MenuMode::Main)),
        ])
    }

    fn refresh_glitch_use(&mut self) {
        let mut entries = Vec::new();
        if let Some(ability) = self.attacker.kit.current_ability() {
            let unavailable = ability.on_cooldown() || ability.is_active();
            let label = if unavailable {
                format!("{} ({})", ability.kind, ability.menu_delay())
            } else {
                ability.kind.to_string()
            };
            entries.push(MenuEntry::new(label, MenuAction::UseAbility).disabled(unavailable));
        }
        entries.push(MenuEntry::new("CANCEL", MenuAction::OpenMenu(MenuMode::Main)));
        self.menus.use_glitch = Menu::new(entries);
    }

    fn refresh_glitch_swap(&mut self) {
        let active = self.attacker.kit.active;
        let mut entries: Vec<MenuEntry> = self
            .attacker
            .kit
            .roster
            .iter()
            .enumerate()
            .map(|(i, creature)| {
                MenuEntry::new(
                    format!("{} ({})", creature.name, creature.stats.level()),
                    MenuAction::SwapTo(i),
                )
                .disabled(active == Some(i))
            })
            .collect();
        entries.push(MenuEntry::new("CANCEL", MenuAction::OpenMenu(MenuMode::Main)));
        self.menus.swap = Menu::new(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Creature;
    use crate::stats::StatBlock;

    fn combatant(id: u32, name: &str, stats: StatBlock) -> Combatant {
        Combatant {
            id: ActorId(id),
            name: name.into(),
            kit: CombatKit::new(stats),
        }
    }

    fn run_until_result(enc: &mut Encounter, max_ticks: usize) -> Option<EncounterResult> {
        for _ in 0..max_ticks {
            if let Some(result) = enc.update() {
                return Some(result);
            }
        }
        None
    }

    /// Navigate: Confirm on main (opens a stat menu), move to the wanted
    /// stat, Confirm again.
    fn choose_attack(enc: &mut Encounter, stat: StatKind) {
        enc.input(Intent::Confirm); // ATTACK
        let index = match stat {
            StatKind::Integrity => 0,
            StatKind::Firewall => 1,
            StatKind::Penetration => 2,
        };
        for _ in 0..index {
            enc.input(Intent::Direction {
                dx: 0,
                dy: 1,
                face_only: false,
            });
        }
        enc.input(Intent::Confirm);
    }

    #[test]
    fn lethal_hit_destroys_and_surfaces_result() {
        let attacker = combatant(0, "player", StatBlock::new(20, 2, 10));
        let defender = combatant(1, "wisp", StatBlock::new(2, 0, 1));
        let mut enc = Encounter::new(attacker, defender, 7);

        choose_attack(&mut enc, StatKind::Integrity);
        let result = run_until_result(&mut enc, 400).expect("battle should end");
        assert!(result.destroyed);
        assert!(!result.fled);
        assert_eq!(result.winner, ActorId(0));
        assert_eq!(result.loser, ActorId(1));
        assert!(result.exp_gained > 0);
        assert!(enc.defender.kit.stats.killed());
        assert!(enc.report.contains("destroys"));
    }

    #[test]
    fn denied_attack_leaves_defender_untouched() {
        let attacker = combatant(0, "player", StatBlock::new(0, 2, 10));
        let defender = combatant(1, "bulwark", StatBlock::new(5, 40, 10));
        let mut enc = Encounter::new(attacker, defender, 11);

        let before = enc.defender.kit.stats.clone();
        choose_attack(&mut enc, StatKind::Penetration);
        // Play out the attack action.
        for _ in 0..GameConfig::ACTION_TICKS + 1 {
            enc.update();
        }
        assert!(enc.report.contains("denied"));
        for kind in StatKind::ALL {
            assert_eq!(
                enc.defender.kit.stats.current(kind),
                before.current(kind),
                "{kind} changed"
            );
        }
    }

    #[test]
    fn successful_flee_ends_combat_without_enemy_action() {
        let attacker = combatant(0, "player", StatBlock::new(4, 4, 8));
        let defender = combatant(1, "wisp", StatBlock::new(2, 2, 4));
        let mut enc = Encounter::new(attacker, defender, 5);

        enc.action = Some(CombatAction::flee(true, true));
        let result = run_until_result(&mut enc, 200).expect("flee should resolve");
        assert!(result.fled);
        assert!(!result.destroyed);
        assert_eq!(result.exp_gained, 0);
        // No enemy counter-action was queued.
        assert!(enc.action.is_none());
    }

    #[test]
    fn denied_flee_hands_the_enemy_a_turn() {
        let attacker = combatant(0, "player", StatBlock::new(4, 4, 8));
        let defender = combatant(1, "wisp", StatBlock::new(2, 2, 4));
        let mut enc = Encounter::new(attacker, defender, 5);

        enc.action = Some(CombatAction::flee(false, true));
        for _ in 0..GameConfig::ACTION_TICKS + 1 {
            enc.update();
        }
        assert!(enc.report.contains("denied"));
        let action = enc.action.as_ref().expect("enemy action");
        assert!(!action.is_attacker());
    }

    #[test]
    fn turn_alternates_after_a_non_terminal_player_action() {
        let attacker = combatant(0, "player", StatBlock::new(4, 2, 10));
        let defender = combatant(1, "wisp", StatBlock::new(4, 2, 40));
        let mut enc = Encounter::new(attacker, defender, 13);

        choose_attack(&mut enc, StatKind::Firewall);
        for _ in 0..GameConfig::ACTION_TICKS + 1 {
            if enc.update().is_some() {
                panic!("battle ended unexpectedly");
            }
        }
        let action = enc.action.as_ref().expect("enemy action follows");
        assert!(!action.is_attacker());

        // Once the enemy finishes, control returns to the main menu.
        for _ in 0..GameConfig::ACTION_TICKS + 1 {
            enc.update();
        }
        assert!(enc.action.is_none());
        assert_eq!(enc.menu_mode(), MenuMode::Main);
    }

    #[test]
    fn capture_with_full_roster_fails_immediately() {
        let mut attacker = combatant(0, "player", StatBlock::new(20, 2, 10));
        for i in 0..GameConfig::ROSTER_CAP {
            attacker.kit.roster.push(Creature {
                name: format!("g{i}"),
                stats: StatBlock::new(1, 1, 1),
                ability: None,
            });
        }
        let defender = combatant(1, "wisp", StatBlock::new(0, 0, 0));
        let mut enc = Encounter::new(attacker, defender, 21);

        enc.action = Some(CombatAction::capture(true));
        let mut result = None;
        for _ in 0..GameConfig::CAPTURE_DONE_TICK + 10 {
            result = enc.update();
            if result.is_some() {
                break;
            }
        }
        assert!(result.is_none(), "full roster must never capture");
        assert!(enc.report.contains("quarantine is full"));
    }

    #[test]
    fn certain_capture_succeeds_and_reports() {
        let attacker = combatant(0, "player", StatBlock::new(10, 2, 10));
        let mut weakened = StatBlock::new(5, 0, 5);
        weakened.apply_damage(StatKind::Penetration, 50);
        weakened.apply_damage(StatKind::Integrity, 50);
        let defender = combatant(1, "wisp", weakened);
        let mut enc = Encounter::new(attacker, defender, 17);
        assert!((enc.capture_chance() - 1.0).abs() < f64::EPSILON);

        enc.action = Some(CombatAction::capture(true));
        let result =
            run_until_result(&mut enc, (GameConfig::CAPTURE_DONE_TICK + 200) as usize)
                .expect("capture should resolve");
        assert!(!result.destroyed);
        assert!(!result.fled);
        assert_eq!(result.winner, ActorId(0));
        assert!(result.exp_gained > 0);
        assert!(enc.report.contains("captures"));
    }

    #[test]
    fn auto_capture_resolves_without_attempts() {
        let attacker = combatant(0, "player", StatBlock::new(4, 2, 10));
        let defender = combatant(1, "wisp", StatBlock::new(4, 2, 10));
        let mut enc = Encounter::new(attacker, defender, 3);
        enc.auto_capture = true;

        enc.action = Some(CombatAction::capture(true));
        let result = run_until_result(&mut enc, (GameConfig::DONE_TICKS + 10) as usize)
            .expect("auto capture is immediate");
        assert!(!result.destroyed && !result.fled);
    }

    #[test]
    fn menu_navigation_skips_disabled_glitch_entries() {
        // No roster: USE GLITCH / SWAP GLITCH are disabled.
        let attacker = combatant(0, "player", StatBlock::new(4, 2, 10));
        let defender = combatant(1, "wisp", StatBlock::new(4, 2, 10));
        let mut enc = Encounter::new(attacker, defender, 3);

        assert!(enc.menu().entries[2].disabled);
        assert!(enc.menu().entries[3].disabled);
        // Cursor moves from BOOST STAT (1) straight to CAPTURE (4).
        enc.input(Intent::Direction { dx: 0, dy: 1, face_only: false });
        enc.input(Intent::Direction { dx: 0, dy: 1, face_only: false });
        assert_eq!(enc.menu().selected, 4);
    }

    #[test]
    fn swap_changes_active_creature_mid_battle() {
        let mut attacker = combatant(0, "player", StatBlock::new(4, 2, 10));
        for name in ["alpha", "beta"] {
            attacker.kit.roster.push(Creature {
                name: name.into(),
                stats: StatBlock::new(2, 2, 2),
                ability: None,
            });
        }
        attacker.kit.active = Some(0);
        let defender = combatant(1, "wisp", StatBlock::new(4, 2, 10));
        let mut enc = Encounter::new(attacker, defender, 3);

        enc.action = Some(CombatAction::swap(1, true));
        for _ in 0..GameConfig::ACTION_TICKS + 1 {
            enc.update();
        }
        assert_eq!(enc.attacker.kit.active, Some(1));
        assert!(enc.report.contains("swaps to beta"));
    }
}
