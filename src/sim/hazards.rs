//! Hazard behaviour state machines
//!
//! Runs before player physics each tick:
//! - Falling walls hang dormant until the player gets close, drop under
//!   reduced gravity, and become ordinary platforms once they hit the floor.
//! - Fireballs patrol back and forth around the x they spawned at.

use glam::Vec2;

use super::state::{Entity, EntityKind, Fireball, HazardBehavior, SimState, WallState};
use crate::tuning::Tuning;

/// Advance every behaving hazard by one tick
pub fn update_hazards(state: &mut SimState) {
    let player_center = state.player.rect.center_x();
    let floor_line = state.level.floor_line();
    let tuning = &state.tuning;

    for entity in state.entities.iter_mut() {
        let EntityKind::Hazard { behavior, .. } = &mut entity.kind else {
            continue;
        };
        match behavior {
            HazardBehavior::Static => {}
            HazardBehavior::Fireball(fireball) => {
                let mut fireball = *fireball;
                step_fireball(entity, &mut fireball);
                if let EntityKind::Hazard {
                    behavior: HazardBehavior::Fireball(stored),
                    ..
                } = &mut entity.kind
                {
                    *stored = fireball;
                }
            }
            HazardBehavior::FallingWall(wall) => {
                let wall = *wall;
                step_falling_wall(entity, wall, player_center, floor_line, tuning);
            }
        }
    }
}

/// One tick of a falling wall. Landing rewrites the entity into a platform;
/// platforms are never revisited here, so the transition happens once.
pub fn step_falling_wall(
    entity: &mut Entity,
    wall: WallState,
    player_center: f32,
    floor_line: f32,
    tuning: &Tuning,
) {
    match wall {
        WallState::Dormant => {
            if (player_center - entity.rect.center_x()).abs() < tuning.wall_trigger_distance {
                log::debug!("Falling wall `{}` triggered", entity.id);
                set_wall_state(entity, WallState::Falling);
                entity.velocity = Some(Vec2::new(0.0, tuning.wall_initial_fall_speed));
            }
        }
        WallState::Falling => {
            let vel = entity
                .velocity
                .get_or_insert(Vec2::new(0.0, tuning.wall_initial_fall_speed));
            vel.y += tuning.wall_gravity;
            entity.rect.pos.y += vel.y;

            if entity.rect.bottom() >= floor_line {
                land_wall(entity, floor_line);
            }
        }
    }
}

fn set_wall_state(entity: &mut Entity, state: WallState) {
    if let EntityKind::Hazard { behavior, .. } = &mut entity.kind {
        *behavior = HazardBehavior::FallingWall(state);
    }
}

/// Snap to the floor and turn into a climbable platform
fn land_wall(entity: &mut Entity, floor_line: f32) {
    entity.rect.pos.y = floor_line - entity.rect.size.y;
    entity.kind = EntityKind::Platform;
    entity.velocity = None;
    entity.is_static = true;
    log::debug!("Falling wall `{}` landed at y={}", entity.id, entity.rect.pos.y);
}

/// One tick of a fireball patrol
pub fn step_fireball(entity: &mut Entity, fireball: &mut Fireball) {
    let anchor = *fireball.anchor_x.get_or_insert(entity.rect.pos.x);
    let vel = entity.velocity.get_or_insert_with(|| {
        log::debug!("Fireball `{}` anchored at x={}", entity.id, anchor);
        Vec2::new(fireball.speed * fireball.direction, 0.0)
    });

    entity.rect.pos.x += vel.x;

    let range = fireball.range;
    if entity.rect.pos.x >= anchor + range {
        entity.rect.pos.x = anchor + range;
        vel.x = -fireball.speed;
        fireball.direction = -1.0;
    } else if entity.rect.pos.x <= anchor - range {
        entity.rect.pos.x = anchor - range;
        vel.x = fireball.speed;
        fireball.direction = 1.0;
    }
}
