//! Discrete input intents.
//!
//! The input collaborator delivers at most one [`Intent`] per tick; the
//! world routes it to the top prompt, the live encounter, or the player
//! actor, which turns it into at most one buffered [`crate::Command`].

/// One discrete player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// A directional press. `face_only` requests orientation without
    /// movement (the walk modifier held).
    Direction { dx: i32, dy: i32, face_only: bool },
    /// Accept / trigger the current selection.
    Confirm,
    /// Back out of the current menu or prompt.
    Cancel,
    /// A pointer event resolved to a grid tile (room mode) or a panel
    /// coordinate (combat menus).
    PointerAt { x: i32, y: i32 },
}
