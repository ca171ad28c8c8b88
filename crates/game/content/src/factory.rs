//! String-keyed actor factory.
//!
//! Entity maps name the kind of actor to place on a glyph; the factory
//! builds the baseline and the room's create hook customizes it (name,
//! tag, stats, ability, behavior).

use game_core::{ActorId, ActorState, Behavior, CombatKit, StatBlock};

/// Builds the baseline actor for a factory key, or `None` for an
/// unregistered key.
pub fn build(kind: &str, id: ActorId, x: i32, y: i32) -> Option<ActorState> {
    let mut actor = ActorState::new(id, x, y);
    match kind {
        "player" => {
            actor.name = "player".into();
            actor.tag = "player".into();
            actor.sprite = "player".into();
            actor.behavior = Behavior::Player;
            let mut stats = StatBlock::new(4, 4, 8);
            stats.set_level(1);
            actor.combat = Some(CombatKit::new(stats));
        }
        "glitch" => {
            actor.sprite = "glitch".into();
            actor.behavior = Behavior::wander();
            actor.combat = Some(CombatKit::new(StatBlock::new(2, 2, 4)));
        }
        "interactable" => {
            actor.sprite = "interactable".into();
            actor.behavior = Behavior::Static;
        }
        _ => return None,
    }
    Some(actor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_build_and_unknown_do_not() {
        assert!(build("player", ActorId(0), 1, 1).is_some());
        assert!(build("glitch", ActorId(1), 1, 1).is_some());
        assert!(build("interactable", ActorId(2), 1, 1).is_some());
        assert!(build("dragon", ActorId(3), 1, 1).is_none());
    }

    #[test]
    fn player_baseline_is_combat_capable() {
        let player = build("player", ActorId(0), 2, 3).unwrap();
        assert!(player.is_player());
        let kit = player.combat.as_ref().expect("player fights");
        assert!(kit.stats.current(game_core::StatKind::Integrity) > 0);
        assert_eq!(player.pos(), (2, 3));
    }
}
