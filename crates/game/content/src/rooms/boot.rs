//! 000_boot - the boot sector. Where every run wakes up.

use std::sync::Arc;

use anyhow::Result;
use game_core::{
    ActorIdAlloc, ActorState, Command, PromptResponse, PromptSpec, Room, TravelSpec,
};

use super::{load, EntityDef, EntityDefs, RoomSpec};
use crate::tiles;

pub const NAME: &str = "000_boot";

const TILES: &str = "
##D##
#...#
#...#
#...#
#####
";

const ENTITIES: &str = "
  E

  @
 g T
";

fn make_door(actor: &mut ActorState) {
    actor.name = "door to the backbone".into();
    actor.sprite = "door".into();
    actor.tag = "backbone-door".into();
}

fn make_terminal(actor: &mut ActorState) {
    actor.name = "boot terminal".into();
    actor.sprite = "terminal".into();
    actor.tag = "boot-terminal".into();
}

fn make_wisp(actor: &mut ActorState) {
    actor.name = "stray wisp".into();
    actor.sprite = "glitch-wisp".into();
    // Dormant until disturbed; it fights but does not roam.
    actor.behavior = game_core::Behavior::Static;
    if let Some(kit) = actor.combat.as_mut() {
        kit.stats.set_stats(2, 1, 3);
    }
}

const ENTITY_DEFS: EntityDefs = &[
    (
        '@',
        EntityDef {
            kind: "player",
            create: None,
        },
    ),
    (
        'E',
        EntityDef {
            kind: "interactable",
            create: Some(make_door),
        },
    ),
    (
        'T',
        EntityDef {
            kind: "interactable",
            create: Some(make_terminal),
        },
    ),
    (
        'g',
        EntityDef {
            kind: "glitch",
            create: Some(make_wisp),
        },
    ),
];

const SPEC: RoomSpec = RoomSpec {
    name: NAME,
    song: "boot",
    tiles: TILES,
    tile_defs: tiles::DEFAULTS,
    entities: ENTITIES,
    entity_defs: ENTITY_DEFS,
};

pub fn build(ids: &mut ActorIdAlloc) -> Result<Room> {
    let mut room = load(&SPEC, ids)?;
    wire(&mut room);
    Ok(room)
}

fn wire(room: &mut Room) {
    if let Some(door) = room
        .actors
        .iter_mut()
        .find(|a| a.tag == "backbone-door")
    {
        door.on_interact = Some(Arc::new(|_room, _door, other| {
            Some(Command::Travel(TravelSpec {
                room: super::backbone::NAME.into(),
                tag: "boot-door".into(),
                offset_x: 0,
                offset_y: -1,
                target: Some(other.id),
            }))
        }));
    }

    if let Some(terminal) = room
        .actors
        .iter_mut()
        .find(|a| a.tag == "boot-terminal")
    {
        terminal.on_interact =
            Some(Arc::new(|_room, _terminal, _other| {
                Some(Command::Prompt(status_prompt()))
            }));
    }

    room.on_enter = Some(Arc::new(|room: &mut Room| {
        room.tile_message("boot sequence complete", 2, 2, 120);
    }));
}

fn status_prompt() -> PromptSpec {
    PromptSpec::new(
        "sys 000 // boot sector",
        vec!["read log".into(), "exit".into()],
        |index, _| match index {
            0 => PromptResponse {
                close: false,
                follow_up: Some(Command::Prompt(PromptSpec::notice(
                    "01: glitches loose past the backbone\n02: quarantine space available",
                    "return",
                ))),
            },
            _ => PromptResponse::close(),
        },
    )
}
