//! Player physics and platform collision
//!
//! One call per tick integrates the player and resolves overlaps against
//! static platforms, one axis at a time. The order of the steps is part of
//! the game feel and must not be rearranged:
//!
//! 1. gravity (clamped to max fall speed)
//! 2. horizontal input (set, not accumulate) or friction decay
//! 3. jump impulse if grounded
//! 4. integrate X, push out of platforms along X
//! 5. integrate Y, push out of platforms along Y (landing sets grounded)
//! 6. clamp X to the left level edge
//!
//! Overlapping platforms are resolved independently in entity order. This is
//! an approximation, not a minimal-translation solve: each correction zeroes
//! the velocity on its axis, so a later platform still overlapping on the same
//! axis no longer moves the player.

use super::rect::Rect;
use super::state::{Entity, Player};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// A jump impulse was applied this step
    pub jumped: bool,
}

/// Advance the player by one tick against the given entity set
pub fn step_player(
    player: &mut Player,
    input: &TickInput,
    entities: &[Entity],
    tuning: &Tuning,
) -> StepResult {
    let mut result = StepResult::default();

    // 1. Gravity
    player.vel.y = (player.vel.y + tuning.gravity).min(tuning.max_fall_speed);

    // 2. Horizontal input; right wins if both are held
    if input.move_right {
        player.vel.x = tuning.move_speed;
    } else if input.move_left {
        player.vel.x = -tuning.move_speed;
    } else {
        player.vel.x *= tuning.friction;
    }

    // 3. Jump (level-triggered: holding re-jumps on every landing)
    if input.jump && player.grounded {
        player.vel.y = tuning.jump_force;
        player.grounded = false;
        result.jumped = true;
    }

    // 4. X axis
    player.rect.pos.x += player.vel.x;
    for platform in platforms(entities) {
        resolve_x(player, &platform.rect);
    }

    // 5. Y axis
    player.rect.pos.y += player.vel.y;
    player.grounded = false;
    for platform in platforms(entities) {
        resolve_y(player, &platform.rect);
    }

    // 6. Left edge
    if player.rect.pos.x < 0.0 {
        player.rect.pos.x = 0.0;
    }

    result
}

/// Static platforms in entity order
fn platforms(entities: &[Entity]) -> impl Iterator<Item = &Entity> {
    entities.iter().filter(|e| e.is_platform())
}

/// Push the player out of `obstacle` along X, toward the side it came from
pub fn resolve_x(player: &mut Player, obstacle: &Rect) {
    if !player.rect.overlaps(obstacle) {
        return;
    }
    if player.vel.x > 0.0 {
        player.rect.pos.x = obstacle.left() - player.rect.size.x;
    } else if player.vel.x < 0.0 {
        player.rect.pos.x = obstacle.right();
    }
    player.vel.x = 0.0;
}

/// Push the player out of `obstacle` along Y. Landing on top grounds the
/// player; bumping the underside only stops upward motion.
pub fn resolve_y(player: &mut Player, obstacle: &Rect) {
    if !player.rect.overlaps(obstacle) {
        return;
    }
    if player.vel.y > 0.0 {
        player.rect.pos.y = obstacle.top() - player.rect.size.y;
        player.grounded = true;
        player.vel.y = 0.0;
    } else if player.vel.y < 0.0 {
        player.rect.pos.y = obstacle.bottom();
        player.vel.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EntitySpec, EntityType};
    use glam::Vec2;
    use proptest::prelude::*;

    fn platform(id: &str, x: f32, y: f32, w: f32, h: f32) -> Entity {
        let spec = EntitySpec::new(id, EntityType::Platform, x, y, w, h);
        Entity::from_spec(&spec, false, &Tuning::default()).unwrap()
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &Tuning::default())
    }

    fn floor() -> Vec<Entity> {
        vec![platform("floor", 0.0, 540.0, 2000.0, 60.0)]
    }

    #[test]
    fn test_gravity_and_max_fall() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 0.0);
        let input = TickInput::default();

        step_player(&mut player, &input, &[], &tuning);
        assert!((player.vel.y - 0.6).abs() < 1e-6);
        assert!((player.rect.pos.y - 0.6).abs() < 1e-6);

        for _ in 0..100 {
            step_player(&mut player, &input, &[], &tuning);
        }
        assert_eq!(player.vel.y, tuning.max_fall_speed);
    }

    #[test]
    fn test_landing_grounds_player() {
        let tuning = Tuning::default();
        let entities = floor();
        let mut player = player_at(100.0, 440.0);
        let input = TickInput::default();

        for _ in 0..60 {
            step_player(&mut player, &input, &entities, &tuning);
        }
        assert!(player.grounded);
        assert_eq!(player.rect.bottom(), 540.0);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_move_overrides_velocity() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 460.0);
        player.vel.x = -30.0;
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        step_player(&mut player, &input, &floor(), &tuning);
        assert_eq!(player.vel.x, tuning.move_speed);
        assert_eq!(player.rect.pos.x, 105.0);

        // Both held: right wins
        let input = TickInput {
            move_right: true,
            move_left: true,
            ..Default::default()
        };
        step_player(&mut player, &input, &floor(), &tuning);
        assert_eq!(player.vel.x, tuning.move_speed);
    }

    #[test]
    fn test_jump_requires_ground() {
        let tuning = Tuning::default();
        let entities = floor();
        let mut player = player_at(100.0, 460.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        // Not grounded yet on the spawn tick
        let first = step_player(&mut player, &jump, &entities, &tuning);
        assert!(!first.jumped);
        assert!(player.grounded);

        let second = step_player(&mut player, &jump, &entities, &tuning);
        assert!(second.jumped);
        assert_eq!(player.vel.y, tuning.jump_force);
        assert!(!player.grounded);
        assert_eq!(player.rect.pos.y, 460.0 + tuning.jump_force);
    }

    #[test]
    fn test_held_jump_retriggers_on_landing() {
        let tuning = Tuning::default();
        let entities = floor();
        let mut player = player_at(100.0, 460.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        let mut jumps = 0;
        for _ in 0..200 {
            if step_player(&mut player, &jump, &entities, &tuning).jumped {
                jumps += 1;
            }
        }
        // Each hop lasts ~48 ticks; holding the key keeps bouncing
        assert!(jumps >= 3, "expected repeated jumps, got {jumps}");
    }

    #[test]
    fn test_wall_pushes_back_along_x() {
        let tuning = Tuning::default();
        let mut entities = floor();
        entities.push(platform("wall", 200.0, 400.0, 40.0, 140.0));
        let mut player = player_at(148.0, 460.0);
        player.grounded = true;
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };

        step_player(&mut player, &right, &entities, &tuning);
        assert_eq!(player.rect.right(), 200.0);
        assert_eq!(player.vel.x, 0.0);

        // Approaching from the right side
        let mut player = player_at(243.0, 460.0);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        step_player(&mut player, &left, &entities, &tuning);
        assert_eq!(player.rect.left(), 240.0);
    }

    #[test]
    fn test_head_bump_does_not_ground() {
        let tuning = Tuning::default();
        let entities = vec![platform("ceiling", 0.0, 380.0, 400.0, 20.0)];
        let mut player = player_at(100.0, 402.0);
        player.vel.y = -10.0;

        step_player(&mut player, &TickInput::default(), &entities, &tuning);
        assert_eq!(player.rect.top(), 400.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_overlap_resolution_follows_entity_order() {
        let tuning = Tuning::default();
        let low = platform("low", 0.0, 540.0, 400.0, 60.0);
        let high = platform("high", 0.0, 530.0, 400.0, 70.0);

        // The first overlapping platform zeroes vy, so later overlaps leave the
        // position alone: entity order decides which surface the player lands on
        let mut player = player_at(100.0, 455.0);
        player.vel.y = 5.0;
        step_player(
            &mut player,
            &TickInput::default(),
            &[low.clone(), high.clone()],
            &tuning,
        );
        assert_eq!(player.rect.bottom(), 540.0);

        let mut player = player_at(100.0, 455.0);
        player.vel.y = 5.0;
        step_player(&mut player, &TickInput::default(), &[high, low], &tuning);
        assert_eq!(player.rect.bottom(), 530.0);
    }

    #[test]
    fn test_friction_decay() {
        let tuning = Tuning::default();
        let mut player = player_at(500.0, 0.0);
        player.vel.x = 5.0;
        let v0 = player.vel.x;
        let n = 12;
        for _ in 0..n {
            step_player(&mut player, &TickInput::default(), &[], &tuning);
        }
        let expected = v0 * tuning.friction.powi(n);
        assert!((player.vel.x - expected).abs() < 1e-4);
        assert!(player.vel.x > 0.0, "decay never reaches exactly zero");
    }

    #[test]
    fn test_non_platforms_do_not_block() {
        let tuning = Tuning::default();
        let spec = EntitySpec::new("deco", EntityType::Decoration, 0.0, 540.0, 400.0, 60.0);
        let entities = vec![Entity::from_spec(&spec, false, &tuning).unwrap()];
        let mut player = player_at(100.0, 461.0);
        step_player(&mut player, &TickInput::default(), &entities, &tuning);
        assert!(!player.grounded);
        assert!(player.rect.bottom() > 540.0);
    }

    proptest! {
        #[test]
        fn left_edge_clamp_holds(
            start_x in 0.0f32..300.0,
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>()),
                1..200
            )
        ) {
            let tuning = Tuning::default();
            let entities = floor();
            let mut player = player_at(start_x, 460.0);
            for (left, right, jump) in inputs {
                let input = TickInput { move_left: left, move_right: right, jump };
                step_player(&mut player, &input, &entities, &tuning);
                prop_assert!(player.rect.pos.x >= 0.0);
            }
        }

        #[test]
        fn landing_snaps_to_platform_top(
            x in 0.0f32..300.0,
            drop in 1.0f32..200.0
        ) {
            let tuning = Tuning::default();
            let entities = vec![platform("ledge", 0.0, 400.0, 400.0, 20.0)];
            let mut player = player_at(x, 400.0 - tuning.player_height - drop);
            for _ in 0..120 {
                step_player(&mut player, &TickInput::default(), &entities, &tuning);
                if player.grounded {
                    break;
                }
            }
            prop_assert!(player.grounded);
            prop_assert_eq!(player.rect.bottom(), 400.0);
            prop_assert_eq!(player.vel.y, 0.0);
        }

        #[test]
        fn friction_matches_geometric_decay(
            v0 in -5.0f32..5.0,
            n in 1i32..30
        ) {
            let tuning = Tuning::default();
            let mut player = player_at(1000.0, 0.0);
            player.vel.x = v0;
            for _ in 0..n {
                step_player(&mut player, &TickInput::default(), &[], &tuning);
            }
            let expected = v0 * tuning.friction.powi(n);
            prop_assert!((player.vel.x - expected).abs() < 1e-4);
        }
    }
}
