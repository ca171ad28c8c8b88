//! 001_backbone - the long corridor between the boot sector and the
//! nest. A sealed gate guards the far end until the terminal releases
//! it.

use std::sync::Arc;

use anyhow::Result;
use game_core::{
    ActorIdAlloc, ActorState, Command, Cue, PromptResponse, PromptSpec, Room, RoutineStep,
    TravelSpec,
};

use super::{load, EntityDef, EntityDefs, RoomSpec};
use crate::tiles;

pub const NAME: &str = "001_backbone";

/// Metadata key flipped by the terminal; the nest gate checks it.
const UNSEALED: &str = "nest-unsealed";

const TILES: &str = "
#########
#.......#
#.......D
#.......#
####D####
";

const ENTITIES: &str = "
  T

        N
 w
    B
";

fn make_boot_door(actor: &mut ActorState) {
    actor.name = "door to the boot sector".into();
    actor.sprite = "door".into();
    actor.tag = "boot-door".into();
}

fn make_nest_gate(actor: &mut ActorState) {
    actor.name = "sealed gate".into();
    actor.sprite = "gate-sealed".into();
    actor.tag = "nest-door".into();
}

fn make_terminal(actor: &mut ActorState) {
    actor.name = "backbone terminal".into();
    actor.sprite = "terminal".into();
    actor.tag = "backbone-terminal".into();
}

fn make_wanderer(actor: &mut ActorState) {
    actor.name = "wounded wanderer".into();
    actor.sprite = "glitch-wanderer".into();
    if let Some(kit) = actor.combat.as_mut() {
        kit.stats.set_stats(2, 2, 4);
    }
}

const ENTITY_DEFS: EntityDefs = &[
    (
        'B',
        EntityDef {
            kind: "interactable",
            create: Some(make_boot_door),
        },
    ),
    (
        'N',
        EntityDef {
            kind: "interactable",
            create: Some(make_nest_gate),
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
        'w',
        EntityDef {
            kind: "glitch",
            create: Some(make_wanderer),
        },
    ),
];

const SPEC: RoomSpec = RoomSpec {
    name: NAME,
    song: "backbone",
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
    let routines = room.routines.sender();

    if let Some(door) = room.actors.iter_mut().find(|a| a.tag == "boot-door") {
        door.on_interact = Some(Arc::new(|_room, _door, other| {
            Some(Command::Travel(TravelSpec {
                room: super::boot::NAME.into(),
                tag: "backbone-door".into(),
                offset_x: 0,
                offset_y: 1,
                target: Some(other.id),
            }))
        }));
    }

    if let Some(gate) = room.actors.iter_mut().find(|a| a.tag == "nest-door") {
        // The gate only answers once the terminal has flipped the seal;
        // until then a bump just reports the gate's presence.
        gate.on_interact = Some(Arc::new(|room: &Room, _gate, other| {
            if !room.metadata.contains_key(UNSEALED) {
                return None;
            }
            Some(Command::Travel(TravelSpec {
                room: super::nest::NAME.into(),
                tag: "backbone-door".into(),
                offset_x: 1,
                offset_y: 0,
                target: Some(other.id),
            }))
        }));
    }

    if let Some(terminal) = room
        .actors
        .iter_mut()
        .find(|a| a.tag == "backbone-terminal")
    {
        let routines = routines.clone();
        terminal.on_interact = Some(Arc::new(move |_room, _terminal, _other| {
            Some(Command::Prompt(terminal_prompt(routines.clone())))
        }));
    }
}

fn terminal_prompt(routines: game_core::RoutineSender<Room>) -> PromptSpec {
    PromptSpec::new(
        "sys 001 // backbone relay",
        vec![
            "release the nest seal".into(),
            "safeguard status".into(),
            "exit".into(),
        ],
        move |index, _| match index {
            0 => {
                routines.push(unseal_routine());
                PromptResponse::then(Command::Prompt(PromptSpec::notice(
                    "the seal releases with a long exhale",
                    "return",
                )))
            }
            1 => PromptResponse {
                close: false,
                follow_up: Some(Command::Prompt(PromptSpec::notice(
                    "safeguard: engaged at the nest gate",
                    "return",
                ))),
            },
            _ => PromptResponse::close(),
        },
    )
}

/// Runs on the next room tick: flips the seal flag, retitles the gate,
/// and plays the unlock cue. Idempotent if triggered twice.
fn unseal_routine() -> impl FnMut(&mut Room) -> RoutineStep + Send + 'static {
    |room: &mut Room| {
        if !room.metadata.contains_key(UNSEALED) {
            room.metadata.insert(UNSEALED.into(), "1".into());
            if let Some(gate) = room.actors.iter_mut().find(|a| a.tag == "nest-door") {
                gate.name = "open gate to the nest".into();
                gate.sprite = "gate-open".into();
            }
            room.cue(Cue::Unlock);
        }
        RoutineStep::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameRng;

    #[test]
    fn gate_stays_shut_until_unsealed() {
        let mut ids = ActorIdAlloc::default();
        let mut room = build(&mut ids).unwrap();
        // A mover to bump the gate with.
        let mover = crate::factory::build("player", ids.next(), 7, 2).unwrap();

        let gate = room.actor_by_tag("nest-door").unwrap();
        assert!(gate.interact(&room, &mover).is_none());

        room.metadata.insert(UNSEALED.into(), "1".into());
        let gate = room.actor_by_tag("nest-door").unwrap();
        match gate.interact(&room, &mover) {
            Some(Command::Travel(spec)) => assert_eq!(spec.room, super::super::nest::NAME),
            other => panic!("expected travel, got {other:?}"),
        }
    }

    #[test]
    fn terminal_unseals_through_the_routine_queue() {
        let mut ids = ActorIdAlloc::default();
        let mut room = build(&mut ids).unwrap();
        let mut rng = GameRng::new(1);

        let spec = terminal_prompt(room.routines.sender());
        let response = (spec.handler)(0, "release the nest seal");
        assert!(response.close);

        // The mutation lands on the next tick, through the queue.
        assert!(!room.metadata.contains_key(UNSEALED));
        room.update(&mut rng);
        assert!(room.metadata.contains_key(UNSEALED));
        assert_eq!(
            room.actor_by_tag("nest-door").unwrap().sprite,
            "gate-open"
        );
        assert!(room.drain_cues().contains(&Cue::Unlock));
    }
}
