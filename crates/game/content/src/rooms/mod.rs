//! The shipped rooms.
//!
//! Each room module declares its ASCII tile and entity maps plus glyph
//! tables, then wires interaction hooks onto the loaded actors (doors
//! travel, terminals prompt, seals unlock through the room's routine
//! queue).

mod backbone;
mod boot;
mod nest;

use anyhow::{bail, ensure, Context, Result};
use game_core::{ActorIdAlloc, ActorState, Room, Tile};

use crate::factory;
use crate::tiles::TileDefs;

/// One glyph's worth of entity: factory key plus a create hook that
/// customizes the baseline actor.
#[derive(Clone, Copy)]
pub struct EntityDef {
    pub kind: &'static str,
    pub create: Option<fn(&mut ActorState)>,
}

pub type EntityDefs = &'static [(char, EntityDef)];

/// Everything the loader needs to assemble a room.
pub(crate) struct RoomSpec {
    pub name: &'static str,
    pub song: &'static str,
    pub tiles: &'static str,
    pub tile_defs: TileDefs,
    pub entities: &'static str,
    pub entity_defs: EntityDefs,
}

/// Builds a room by name.
pub fn build(name: &str, ids: &mut ActorIdAlloc) -> Result<Room> {
    match name {
        boot::NAME => boot::build(ids),
        backbone::NAME => backbone::build(ids),
        nest::NAME => nest::build(ids),
        _ => bail!("no room named {name:?}"),
    }
}

/// Every registered room name.
pub fn names() -> &'static [&'static str] {
    &[boot::NAME, backbone::NAME, nest::NAME]
}

/// Splits an ASCII map into grid rows. The first line is layout
/// scaffolding and is ignored; leading tabs are stripped (indented
/// authoring), trailing empty lines dropped. Interior spaces are
/// significant.
fn grid_lines(src: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = src
        .split('\n')
        .map(|line| line.trim_start_matches('\t'))
        .collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Assembles the tile grid and actor list from a spec.
pub(crate) fn load(spec: &RoomSpec, ids: &mut ActorIdAlloc) -> Result<Room> {
    let tile_lines = grid_lines(spec.tiles);
    let height = tile_lines.len();
    let width = tile_lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    ensure!(
        width > 0 && height > 0,
        "room {} has an empty tile map",
        spec.name
    );

    let mut room = Room::new(spec.name, width, height);
    room.song = spec.song.into();

    for (y, line) in tile_lines.iter().enumerate() {
        for (x, glyph) in line.chars().enumerate() {
            if glyph == ' ' {
                continue;
            }
            let def = spec
                .tile_defs
                .iter()
                .find(|(g, _)| *g == glyph)
                .map(|(_, def)| def)
                .with_context(|| {
                    format!("unknown tile glyph {glyph:?} in room {}", spec.name)
                })?;
            let mut tile = Tile::new(def.sprite);
            tile.name = def.name.into();
            tile.blocks_move = def.blocks;
            room.set_tile(x as i32, y as i32, tile);
        }
    }

    for (y, line) in grid_lines(spec.entities).iter().enumerate() {
        for (x, glyph) in line.chars().enumerate() {
            if glyph == ' ' {
                continue;
            }
            let def = spec
                .entity_defs
                .iter()
                .find(|(g, _)| *g == glyph)
                .map(|(_, def)| def)
                .with_context(|| {
                    format!("unknown entity glyph {glyph:?} in room {}", spec.name)
                })?;
            let mut actor = factory::build(def.kind, ids.next(), x as i32, y as i32)
                .with_context(|| format!("unregistered actor kind {:?}", def.kind))?;
            if let Some(create) = def.create {
                create(&mut actor);
            }
            room.add_actor(actor);
        }
    }

    Ok(room)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_room_builds() {
        for name in names() {
            let mut ids = ActorIdAlloc::default();
            let room = build(name, &mut ids)
                .unwrap_or_else(|e| panic!("room {name} failed to build: {e:#}"));
            let (w, h) = room.size();
            assert!(w > 0 && h > 0);
        }
    }

    #[test]
    fn unknown_room_is_an_error() {
        let mut ids = ActorIdAlloc::default();
        assert!(build("999_nowhere", &mut ids).is_err());
    }

    #[test]
    fn boot_room_holds_the_player_and_a_wild_glitch() {
        let mut ids = ActorIdAlloc::default();
        let room = build(boot::NAME, &mut ids).unwrap();
        let player = room.player().expect("player spawns in boot");
        assert_eq!(player.tag, "player");
        assert!(room
            .actors
            .iter()
            .any(|a| !a.is_player() && a.combat.is_some()));
    }

    #[test]
    fn loader_rejects_unknown_glyphs() {
        let spec = RoomSpec {
            name: "broken",
            song: "",
            tiles: "\n#?#\n",
            tile_defs: crate::tiles::DEFAULTS,
            entities: "\n\n",
            entity_defs: &[],
        };
        let mut ids = ActorIdAlloc::default();
        let err = load(&spec, &mut ids).unwrap_err();
        assert!(err.to_string().contains("unknown tile glyph"));
    }

    #[test]
    fn doors_travel_between_rooms_symmetrically() {
        // Every Travel target must name a room that exists and a tag
        // present in it.
        let mut ids = ActorIdAlloc::default();
        let boot = build(boot::NAME, &mut ids).unwrap();
        let backbone = build(backbone::NAME, &mut ids).unwrap();
        let nest = build(nest::NAME, &mut ids).unwrap();

        assert!(boot.actor_by_tag("backbone-door").is_some());
        assert!(backbone.actor_by_tag("boot-door").is_some());
        assert!(backbone.actor_by_tag("nest-door").is_some());
        assert!(nest.actor_by_tag("backbone-door").is_some());
    }
}
