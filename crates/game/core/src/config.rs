/// Numeric constants for the simulation.
///
/// Several of these are balance knobs carried over from the original
/// tuning (capture attempt timing, the boost cap divisor) rather than
/// load-bearing invariants; change them freely, but change them here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard cap on captured creatures carried by one actor.
    pub const ROSTER_CAP: usize = 9;

    // ===== combat action timing (in ticks) =====
    /// Length of a standard combat action (attack, boost, ability, swap).
    pub const ACTION_TICKS: i32 = 120;
    /// Tick at which a standard action rolls and reports its effect.
    pub const ACTION_REPORT_TICK: i32 = 10;
    /// Tick at which a flee attempt reports success or denial.
    pub const FLEE_REPORT_TICK: i32 = 60;
    /// Tick at which a glitch swap takes effect.
    pub const SWAP_APPLY_TICK: i32 = 60;
    /// Capture attempts are evaluated at these ticks, in order.
    pub const CAPTURE_TRY_TICKS: [i32; 3] = [120, 240, 300];
    /// Tick at which a capture action (caught or not) completes.
    pub const CAPTURE_DONE_TICK: i32 = 360;
    /// Display delay before a terminal result surfaces to the world.
    pub const DONE_TICKS: i32 = 120;

    // ===== flee roll =====
    /// Flee succeeds when `rand(FLEE_WINDOW + fire + inte) < FLEE_THRESHOLD`.
    pub const FLEE_WINDOW: i32 = 100;
    pub const FLEE_THRESHOLD: i32 = 50;

    // ===== leveling =====
    /// Exp threshold per level is `level * EXP_PER_LEVEL`.
    pub const EXP_PER_LEVEL: i32 = 100;
    /// Flat exp bonus a creature is worth per level it holds.
    pub const EXP_LEVEL_BONUS: i32 = 5;

    // ===== room pacing =====
    /// Ticks an actor takes to slide between adjacent tiles.
    pub const SLIDE_TICKS: i32 = 10;
    /// Ticks between wander/chase decisions for idle creatures.
    pub const THINK_TICKS: i32 = 2;
    /// Default lifetime of a positional tile message.
    pub const TILE_MESSAGE_TTL: u32 = 60;
    /// Longer lifetime used for "someone is there" style notices.
    pub const NOTICE_MESSAGE_TTL: u32 = 180;

    // ===== combat presentation =====
    /// Visible height of the scrolling combat report, in lines.
    pub const REPORT_LINES: usize = 12;
}
