//! Shared tile definitions used across rooms.

/// One glyph's worth of tile: sprite key, investigate name, blocking.
#[derive(Clone, Copy, Debug)]
pub struct TileDef {
    pub sprite: &'static str,
    pub name: &'static str,
    pub blocks: bool,
}

/// Per-room glyph table.
pub type TileDefs = &'static [(char, TileDef)];

pub const WALL: TileDef = TileDef {
    sprite: "wall",
    name: "wall",
    blocks: true,
};

pub const FLOOR: TileDef = TileDef {
    sprite: "floor",
    name: "",
    blocks: false,
};

pub const DOORWAY: TileDef = TileDef {
    sprite: "doorway",
    name: "doorway",
    blocks: false,
};

pub const CONDUIT: TileDef = TileDef {
    sprite: "conduit",
    name: "conduit",
    blocks: true,
};

/// The default glyph table most rooms start from.
pub const DEFAULTS: TileDefs = &[
    ('#', WALL),
    ('.', FLOOR),
    ('D', DOORWAY),
    ('|', CONDUIT),
];
