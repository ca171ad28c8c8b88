//! Abilities - cooldown/duration-gated special effects.
//!
//! An ability is carried by a creature and activated from the combat
//! menu. While active it modifies the attack/defense pipeline for its
//! owner's side; when the active window runs out the cooldown re-arms.
//!
//! Counter discipline: `cooldown > 0` implies not active, and active
//! means `turns_active > 0`. Each combat round consumes one unit from
//! whichever counter is nonzero.

/// The enumerated special effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum AbilityKind {
    /// Attacks land for a fixed `tier * 2` instead of a roll.
    #[strum(serialize = "PERFECT HIT")]
    PerfectHit,
    /// Attacks gain a random bonus in `[0, tier]`.
    #[strum(serialize = "RANDOM DAMAGE")]
    RandomDamage,
    /// Prevents one killing blow, consuming the active window.
    #[strum(serialize = "HARDY")]
    Hardy,
    /// Shaves `tier * 2` off incoming hits.
    #[strum(serialize = "BLOCK")]
    Block,
    /// Nullifies incoming hits outright.
    #[strum(serialize = "PERFECT BLOCK")]
    PerfectBlock,
    /// Halves one of the defender's pools, chosen at random.
    #[strum(serialize = "CLEAVE")]
    Cleave,
}

/// One ability instance with its live counters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub kind: AbilityKind,
    /// Effect magnitude.
    pub tier: i32,
    /// Active-duration budget in combat rounds.
    pub turns: i32,
    /// Cooldown value re-armed when the active window expires.
    pub cooldown_reset: i32,
    cooldown: i32,
    turns_active: i32,
}

impl Ability {
    pub fn new(kind: AbilityKind, tier: i32, turns: i32, cooldown_reset: i32) -> Self {
        Self {
            kind,
            tier,
            turns,
            cooldown_reset,
            cooldown: 0,
            turns_active: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.turns_active > 0
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown > 0
    }

    /// Activates the ability if it is neither active nor cooling down.
    /// Returns whether activation happened.
    pub fn activate(&mut self) -> bool {
        if self.is_active() || self.on_cooldown() {
            return false;
        }
        self.turns_active = self.turns;
        true
    }

    /// Ends the active window immediately and re-arms the cooldown.
    /// Used by one-shot effects such as Hardy.
    pub fn consume(&mut self) {
        if self.is_active() {
            self.turns_active = 0;
            self.cooldown = self.cooldown_reset;
        }
    }

    /// One combat round elapses: burn a unit of active duration if any
    /// (re-arming the cooldown when it runs out), otherwise a unit of
    /// cooldown.
    pub fn round(&mut self) {
        if self.turns_active > 0 {
            self.turns_active -= 1;
            if self.turns_active == 0 {
                self.cooldown = self.cooldown_reset;
            }
        } else if self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    /// Rounds until the ability can be activated again, as shown in the
    /// combat menu next to an unavailable entry.
    pub fn menu_delay(&self) -> i32 {
        self.cooldown + (self.turns - self.turns_active)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn ability() -> Ability {
        Ability::new(AbilityKind::Block, 2, 3, 4)
    }

    #[test]
    fn cooldown_excludes_active() {
        let mut a = ability();
        assert!(a.activate());
        assert!(a.is_active());
        // Burn the whole active window.
        for _ in 0..3 {
            assert!(a.is_active());
            a.round();
        }
        assert!(!a.is_active());
        assert!(a.on_cooldown());
        // While cooling down, activation is refused.
        assert!(!a.activate());
        for _ in 0..4 {
            assert!(!a.is_active());
            a.round();
        }
        assert!(!a.on_cooldown());
        assert!(a.activate());
    }

    #[test]
    fn activate_sets_full_window() {
        let mut a = ability();
        a.activate();
        assert_eq!(a.menu_delay(), 0);
        a.round();
        assert_eq!(a.menu_delay(), 1);
    }

    #[test]
    fn consume_ends_window_and_rearms() {
        let mut a = ability();
        a.activate();
        a.consume();
        assert!(!a.is_active());
        assert!(a.on_cooldown());
    }

    #[test]
    fn display_names_match_menu_labels() {
        assert_eq!(AbilityKind::PerfectHit.to_string(), "PERFECT HIT");
        assert_eq!(AbilityKind::Cleave.to_string(), "CLEAVE");
    }
}
