//! Room content for the crawler.
//!
//! Rooms are authored as ASCII art: one string for the tile grid, one
//! for the entity overlay, each with a per-glyph definition table. The
//! loader turns a spec into a live `game_core::Room` and the room module
//! wires up interaction hooks (doors, terminals, wild glitches).

pub mod factory;
pub mod rooms;
pub mod tiles;

use game_core::RoomBuilder;

/// The room every new world starts in.
pub const START_ROOM: &str = "000_boot";

/// Builder handed to `game_core::World`; unknown names and malformed
/// maps both come back as `None` (the world records the diagnostic).
pub fn room_builder() -> RoomBuilder {
    Box::new(|name, ids| rooms::build(name, ids).ok())
}
