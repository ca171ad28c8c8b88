//! Stat blocks - the combat attribute component.
//!
//! Every combat-capable actor owns a [`StatBlock`]: three resource pools
//! (penetration for offense, firewall for mitigation, integrity for
//! health), a level/exp accumulator, transient post-combat penalties, and
//! the terminal `killed`/`captured` flags.
//!
//! # Invariants
//!
//! - The effective current of every pool stays within `[0, max]` where
//!   `max = base + base * level / 10`.
//! - Pools restore to max on creation and on explicit level-up.

use crate::config::GameConfig;
use crate::rng::GameRng;

// ============================================================================
// Stat Kind
// ============================================================================

/// The three combat resource pools.
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
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum StatKind {
    /// Offense pool; drives attack rolls and capture strength.
    Penetration,
    /// Mitigation pool; reduces incoming damage.
    Firewall,
    /// Health pool; reaching 0 under attack is lethal.
    Integrity,
}

impl StatKind {
    /// All three pools, in display order.
    pub const ALL: [StatKind; 3] = [
        StatKind::Penetration,
        StatKind::Firewall,
        StatKind::Integrity,
    ];
}

// ============================================================================
// Pools
// ============================================================================

/// One resource pool: stored current, base maximum, transient penalty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Pool {
    current: i32,
    base: i32,
    penalty: i32,
}

/// Combat attributes shared by every fighting actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    level: i32,
    exp: i32,
    penetration: Pool,
    firewall: Pool,
    integrity: Pool,
    killed: bool,
    captured: bool,
}

impl StatBlock {
    /// Creates a block with the given base pools, restored to max.
    pub fn new(pen: i32, fire: i32, inte: i32) -> Self {
        let mut block = Self::default();
        block.set_stats(pen, fire, inte);
        block
    }

    /// Sets base pools and restores current values to the new maximums.
    pub fn set_stats(&mut self, pen: i32, fire: i32, inte: i32) {
        self.penetration.base = pen;
        self.firewall.base = fire;
        self.integrity.base = inte;
        self.restore();
    }

    fn pool(&self, kind: StatKind) -> &Pool {
        match kind {
            StatKind::Penetration => &self.penetration,
            StatKind::Firewall => &self.firewall,
            StatKind::Integrity => &self.integrity,
        }
    }

    fn pool_mut(&mut self, kind: StatKind) -> &mut Pool {
        match kind {
            StatKind::Penetration => &mut self.penetration,
            StatKind::Firewall => &mut self.firewall,
            StatKind::Integrity => &mut self.integrity,
        }
    }

    /// Maximum for a pool at the current level: `base + base * level / 10`.
    pub fn max(&self, kind: StatKind) -> i32 {
        let base = self.pool(kind).base;
        base + base * self.level / 10
    }

    /// Effective current value: stored current minus penalty, clamped to
    /// `[0, max]`.
    pub fn current(&self, kind: StatKind) -> i32 {
        let pool = self.pool(kind);
        (pool.current - pool.penalty).clamp(0, self.max(kind))
    }

    /// Restores every pool to its maximum.
    pub fn restore(&mut self) {
        for kind in StatKind::ALL {
            let max = self.max(kind);
            self.pool_mut(kind).current = max;
        }
    }

    // ========================================================================
    // Leveling
    // ========================================================================

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Sets the level and restores pools to the new maximums.
    pub fn set_level(&mut self, level: i32) {
        self.level = level;
        self.restore();
    }

    pub fn exp(&self) -> i32 {
        self.exp
    }

    /// Accumulates experience; rolling past `level * 100` levels up once
    /// and restores pools to max.
    pub fn add_exp(&mut self, exp: i32) {
        self.exp += exp;
        if self.exp >= self.level * GameConfig::EXP_PER_LEVEL {
            self.exp -= self.level * GameConfig::EXP_PER_LEVEL;
            self.level += 1;
            self.restore();
        }
    }

    /// Experience this block is worth to whoever defeats or captures it.
    pub fn exp_value(&self) -> i32 {
        StatKind::ALL.iter().map(|&k| self.max(k)).sum::<i32>()
            + self.level * GameConfig::EXP_LEVEL_BONUS
    }

    // ========================================================================
    // Damage & Boost
    // ========================================================================

    /// Offense roll: `roll(max(current penetration, 1))`.
    pub fn roll_attack(&self, rng: &mut GameRng) -> i32 {
        rng.roll(self.current(StatKind::Penetration).max(1))
    }

    /// Defensive mitigation preview: subtracts a firewall-scaled dice roll
    /// from a positive incoming amount, flooring at 1 so chip damage is
    /// never erased outright. Non-positive amounts pass through.
    pub fn reduce_damage(&self, amount: i32, rng: &mut GameRng) -> i32 {
        if amount <= 0 {
            return amount;
        }
        let guard = self.current(StatKind::Firewall).max(2);
        (amount - rng.roll(guard)).max(1)
    }

    /// Applies damage to one pool. The firewall's effective current is
    /// subtracted from the incoming amount first and the result clamped at
    /// zero, so a strong firewall can deny a hit entirely. Returns the
    /// amount actually removed from the pool.
    pub fn apply_damage(&mut self, kind: StatKind, amount: i32) -> i32 {
        let mut dmg = amount;
        if dmg > 0 {
            dmg -= self.current(StatKind::Firewall);
        }
        if dmg < 0 {
            dmg = 0;
        }
        let before = self.pool(kind).current;
        let after = (before - dmg).max(0);
        self.pool_mut(kind).current = after;
        before - after
    }

    /// Boost roll for one pool: the more depleted the pool, the more dice
    /// are accumulated (`max / current`, at least 2), capped at a third of
    /// the pool's maximum so one boost can never refill it.
    pub fn roll_boost(&self, kind: StatKind, rng: &mut GameRng) -> i32 {
        let max = self.max(kind);
        let divisor = (max / self.current(kind).max(1)).max(2);
        rng.roll(divisor).min(max / 3)
    }

    /// Applies a boost to one pool. Boosting a pool already above its base
    /// (unleveled) maximum only lands half the amount, and the pool is
    /// clamped to its leveled maximum. Returns the delta actually applied.
    pub fn apply_boost(&mut self, kind: StatKind, amount: i32) -> i32 {
        let mut amt = amount;
        if amt != 0 && self.pool(kind).current > self.pool(kind).base {
            amt /= 2;
        }
        let max = self.max(kind);
        let before = self.pool(kind).current;
        let after = (before + amt).clamp(0, max);
        self.pool_mut(kind).current = after;
        after - before
    }

    // ========================================================================
    // Penalties & terminal flags
    // ========================================================================

    /// Adds transient penalty deltas, applied whenever pools are read.
    pub fn penalize(&mut self, pen: i32, fire: i32, inte: i32) {
        self.penetration.penalty += pen;
        self.firewall.penalty += fire;
        self.integrity.penalty += inte;
    }

    pub fn clear_penalties(&mut self) {
        self.penetration.penalty = 0;
        self.firewall.penalty = 0;
        self.integrity.penalty = 0;
    }

    pub fn killed(&self) -> bool {
        self.killed
    }

    pub fn kill(&mut self) {
        self.killed = true;
    }

    /// Floors integrity at 1, undoing a killing blow. Used by the Hardy
    /// ability.
    pub fn spare(&mut self) {
        self.killed = false;
        if self.current(StatKind::Integrity) < 1 {
            let floor = 1 + self.integrity.penalty;
            self.integrity.current = floor.min(self.max(StatKind::Integrity));
        }
    }

    pub fn captured(&self) -> bool {
        self.captured
    }

    pub fn capture(&mut self) {
        self.captured = true;
    }
}

// ============================================================================
// Capture chance
// ============================================================================

/// Probability that a capture attempt succeeds:
/// `clamp(0, 1, attacker pen ratio - mean defender pool ratio)`.
///
/// A pool with a non-positive maximum contributes a ratio of 0, so fresh
/// or degenerate blocks never divide by zero.
pub fn capture_chance(attacker: &StatBlock, defender: &StatBlock) -> f64 {
    fn ratio(current: i32, max: i32) -> f64 {
        if max <= 0 {
            0.0
        } else {
            current as f64 / max as f64
        }
    }

    let atk = ratio(
        attacker.current(StatKind::Penetration),
        attacker.max(StatKind::Penetration),
    );
    let def = StatKind::ALL
        .iter()
        .map(|&k| ratio(defender.current(k), defender.max(k)))
        .sum::<f64>()
        / StatKind::ALL.len() as f64;

    (atk - def).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_starts_at_max() {
        let block = StatBlock::new(4, 3, 6);
        assert_eq!(block.current(StatKind::Penetration), 4);
        assert_eq!(block.current(StatKind::Firewall), 3);
        assert_eq!(block.current(StatKind::Integrity), 6);
    }

    #[test]
    fn max_scales_with_level() {
        let mut block = StatBlock::new(10, 10, 10);
        block.set_level(5);
        assert_eq!(block.max(StatKind::Integrity), 15);
        // Level-up restored the pool to the new max.
        assert_eq!(block.current(StatKind::Integrity), 15);
    }

    #[test]
    fn clamp_invariant_under_arbitrary_damage_and_boost() {
        let mut rng = GameRng::new(99);
        let mut block = StatBlock::new(5, 4, 8);
        block.set_level(2);
        for i in 0..500 {
            let kind = StatKind::ALL[(i % 3) as usize];
            if i % 2 == 0 {
                block.apply_damage(kind, rng.range(30) - 5);
            } else {
                block.apply_boost(kind, rng.range(30) - 5);
            }
            for k in StatKind::ALL {
                let cur = block.current(k);
                assert!(cur >= 0 && cur <= block.max(k), "{k} out of range: {cur}");
            }
        }
    }

    #[test]
    fn roll_attack_with_zero_penetration_rolls_one_die() {
        let mut rng = GameRng::new(3);
        let mut block = StatBlock::new(4, 2, 2);
        block.apply_damage(StatKind::Penetration, 100);
        assert_eq!(block.current(StatKind::Penetration), 0);
        for _ in 0..50 {
            let v = block.roll_attack(&mut rng);
            assert!(v == 1 || v == 2, "roll_attack = {v}");
        }
    }

    #[test]
    fn reduce_damage_floors_positive_input_at_one() {
        let mut rng = GameRng::new(11);
        let wall = StatBlock::new(1, 50, 5);
        for _ in 0..50 {
            assert_eq!(wall.reduce_damage(2, &mut rng), 1);
        }
        // Non-positive amounts pass through untouched.
        assert_eq!(wall.reduce_damage(0, &mut rng), 0);
        assert_eq!(wall.reduce_damage(-4, &mut rng), -4);
    }

    #[test]
    fn strong_firewall_denies_applied_damage() {
        let mut block = StatBlock::new(6, 40, 6);
        let applied = block.apply_damage(StatKind::Penetration, 2);
        assert_eq!(applied, 0);
        assert_eq!(block.current(StatKind::Penetration), 6);
    }

    #[test]
    fn boost_halves_above_base_and_never_exceeds_max() {
        let mut block = StatBlock::new(10, 10, 10);
        block.set_level(10);
        // max = 20; pool starts at 20, knock it down below base first.
        block.apply_damage(StatKind::Firewall, 100);
        block.apply_boost(StatKind::Firewall, 100);
        assert!(block.current(StatKind::Firewall) <= block.max(StatKind::Firewall));

        // Above base: boost lands halved.
        let mut above = StatBlock::new(10, 10, 10);
        above.set_level(10);
        // current 20 > base 10, so a boost of 6 applies 3 - but the pool is
        // already at max, so nothing lands.
        assert_eq!(above.apply_boost(StatKind::Firewall, 6), 0);
    }

    #[test]
    fn roll_boost_caps_at_third_of_max() {
        let mut rng = GameRng::new(5);
        let mut block = StatBlock::new(9, 9, 9);
        block.apply_damage(StatKind::Integrity, 100);
        for _ in 0..100 {
            assert!(block.roll_boost(StatKind::Integrity, &mut rng) <= 3);
        }
    }

    #[test]
    fn capture_chance_is_always_a_probability() {
        let strong = StatBlock::new(50, 1, 1);
        let weak = StatBlock::new(1, 1, 1);
        let zeroed = StatBlock::new(0, 0, 0);
        for (a, d) in [
            (&strong, &weak),
            (&weak, &strong),
            (&strong, &zeroed),
            (&zeroed, &strong),
            (&zeroed, &zeroed),
        ] {
            let p = capture_chance(a, d);
            assert!((0.0..=1.0).contains(&p), "chance out of bounds: {p}");
            assert!(p.is_finite());
        }
    }

    #[test]
    fn exp_rolls_into_level_and_restores() {
        let mut block = StatBlock::new(10, 10, 10);
        block.set_level(1);
        block.apply_damage(StatKind::Integrity, 200);
        block.add_exp(120);
        assert_eq!(block.level(), 2);
        assert_eq!(block.exp(), 20);
        assert_eq!(block.current(StatKind::Integrity), block.max(StatKind::Integrity));
    }

    #[test]
    fn penalties_subtract_until_cleared() {
        let mut block = StatBlock::new(8, 8, 8);
        block.penalize(3, 0, 10);
        assert_eq!(block.current(StatKind::Penetration), 5);
        assert_eq!(block.current(StatKind::Integrity), 0);
        block.clear_penalties();
        assert_eq!(block.current(StatKind::Penetration), 8);
        assert_eq!(block.current(StatKind::Integrity), 8);
    }

    #[test]
    fn spare_floors_integrity_at_one() {
        let mut block = StatBlock::new(5, 0, 3);
        block.apply_damage(StatKind::Integrity, 50);
        block.kill();
        block.spare();
        assert!(!block.killed());
        assert_eq!(block.current(StatKind::Integrity), 1);
    }
}
