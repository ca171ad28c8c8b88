//! Tiles and positional messages.

/// One grid tile. A grid cell with no tile at all is the void.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Sprite key consumed by the renderer.
    pub sprite: String,
    /// Display name used by Investigate; empty means anonymous.
    pub name: String,
    /// Movement onto this tile is denied.
    pub blocks_move: bool,
    /// Free-running visual ticker, offset per tile so animations don't
    /// march in lockstep.
    pub ticker: u64,
}

impl Tile {
    pub fn new(sprite: impl Into<String>) -> Self {
        Self {
            sprite: sprite.into(),
            name: String::new(),
            blocks_move: false,
            ticker: 0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn blocking(mut self) -> Self {
        self.blocks_move = true;
        self
    }
}

/// Short-lived flavor text anchored to a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMessage {
    pub text: String,
    pub x: i32,
    pub y: i32,
    /// Remaining lifetime in ticks.
    pub ttl: u32,
}
