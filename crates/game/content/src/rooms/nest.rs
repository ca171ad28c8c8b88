//! 002_nest - where the loose glitches roost. Everything here fights,
//! and the warden comes looking for you.

use std::sync::Arc;

use anyhow::Result;
use game_core::{
    Ability, AbilityKind, ActorIdAlloc, ActorState, Behavior, Command, Room, RoutineStep,
    TravelSpec,
};

use super::{load, EntityDef, EntityDefs, RoomSpec};
use crate::tiles;

pub const NAME: &str = "002_nest";

const TILES: &str = "
#######
#.....#
#..|..#
D.....#
#..|..#
#.....#
#######
";

const ENTITIES: &str = "
   W

B    c

  h
";

fn make_door(actor: &mut ActorState) {
    actor.name = "door to the backbone".into();
    actor.sprite = "door".into();
    actor.tag = "backbone-door".into();
}

fn make_warden(actor: &mut ActorState) {
    actor.name = "nest warden".into();
    actor.sprite = "glitch-warden".into();
    actor.behavior = Behavior::chase("player");
    if let Some(kit) = actor.combat.as_mut() {
        kit.stats.set_stats(3, 3, 6);
        kit.stats.set_level(1);
        kit.ability = Some(Ability::new(AbilityKind::Block, 2, 2, 3));
    }
}

fn make_cleaver(actor: &mut ActorState) {
    actor.name = "render fiend".into();
    actor.sprite = "glitch-fiend".into();
    actor.floats = true;
    actor.skews = true;
    if let Some(kit) = actor.combat.as_mut() {
        kit.stats.set_stats(3, 1, 4);
        kit.ability = Some(Ability::new(AbilityKind::Cleave, 2, 1, 4));
    }
}

fn make_husk(actor: &mut ActorState) {
    actor.name = "hollow husk".into();
    actor.sprite = "glitch-husk".into();
    if let Some(kit) = actor.combat.as_mut() {
        kit.stats.set_stats(1, 2, 5);
        kit.ability = Some(Ability::new(AbilityKind::Hardy, 1, 2, 5));
    }
}

const ENTITY_DEFS: EntityDefs = &[
    (
        'B',
        EntityDef {
            kind: "interactable",
            create: Some(make_door),
        },
    ),
    (
        'W',
        EntityDef {
            kind: "glitch",
            create: Some(make_warden),
        },
    ),
    (
        'c',
        EntityDef {
            kind: "glitch",
            create: Some(make_cleaver),
        },
    ),
    (
        'h',
        EntityDef {
            kind: "glitch",
            create: Some(make_husk),
        },
    ),
];

const SPEC: RoomSpec = RoomSpec {
    name: NAME,
    song: "nest",
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
                tag: "nest-door".into(),
                offset_x: -1,
                offset_y: 0,
                target: Some(other.id),
            }))
        }));
    }

    // A short scripted beat on entry: two lines of static, one tick
    // apart enough to read.
    room.on_enter = Some(Arc::new(|room: &mut Room| {
        let mut tick = 0;
        room.routines.push(move |room: &mut Room| {
            tick += 1;
            match tick {
                1 => {
                    room.tile_message("the static thickens here", 3, 3, 120);
                    RoutineStep::Again
                }
                40 => {
                    room.tile_message("something is watching", 3, 4, 120);
                    RoutineStep::Done
                }
                _ => RoutineStep::Again,
            }
        });
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameRng;

    #[test]
    fn every_glitch_in_the_nest_carries_an_ability() {
        let mut ids = ActorIdAlloc::default();
        let room = build(&mut ids).unwrap();
        let armed = room
            .actors
            .iter()
            .filter(|a| {
                a.combat
                    .as_ref()
                    .is_some_and(|kit| kit.ability.is_some())
            })
            .count();
        assert_eq!(armed, 3);
    }

    #[test]
    fn entry_cutscene_plays_over_the_routine_queue() {
        let mut ids = ActorIdAlloc::default();
        let mut room = build(&mut ids).unwrap();
        let mut rng = GameRng::new(2);

        let hook = room.on_enter.clone().unwrap();
        hook(&mut room);
        for _ in 0..2 {
            room.update(&mut rng);
        }
        assert!(room.messages.iter().any(|m| m.text.contains("static")));
        assert!(!room.messages.iter().any(|m| m.text.contains("watching")));
        for _ in 0..40 {
            room.update(&mut rng);
        }
        assert!(room.messages.iter().any(|m| m.text.contains("watching")));
    }
}
