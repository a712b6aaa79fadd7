//! Data-driven game balance
//!
//! Every number that shapes game feel lives here so it can be tweaked from a
//! JSON blob without recompiling. Missing fields fall back to [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics and gameplay constants consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub gravity: f32,
    pub friction: f32,
    pub move_speed: f32,
    pub jump_force: f32,
    pub max_fall_speed: f32,

    pub viewport_width: f32,
    pub viewport_height: f32,

    pub player_width: f32,
    pub player_height: f32,

    pub gate_proximity: f32,
    pub gate_open_step: f32,
    pub goal_unlock_fraction: f32,

    pub wall_trigger_distance: f32,
    pub wall_initial_fall_speed: f32,
    pub wall_gravity: f32,

    pub fireball_range: f32,
    pub fireball_default_speed: f32,

    pub default_score_value: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            move_speed: MOVE_SPEED,
            jump_force: JUMP_FORCE,
            max_fall_speed: MAX_FALL_SPEED,

            viewport_width: CANVAS_WIDTH,
            viewport_height: CANVAS_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            gate_proximity: GATE_PROXIMITY,
            gate_open_step: GATE_OPEN_STEP,
            goal_unlock_fraction: GOAL_UNLOCK_FRACTION,

            wall_trigger_distance: WALL_TRIGGER_DISTANCE,
            wall_initial_fall_speed: WALL_INITIAL_FALL_SPEED,
            wall_gravity: WALL_GRAVITY,

            fireball_range: FIREBALL_RANGE,
            fireball_default_speed: FIREBALL_DEFAULT_SPEED,

            default_score_value: DEFAULT_SCORE_VALUE,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of ticks the gate needs after proximity before a gated goal unlocks
    pub fn ticks_until_goal_unlock(&self) -> u32 {
        if self.gate_open_step <= 0.0 {
            return u32::MAX;
        }
        // Epsilon absorbs f32 representation error in the ratio (0.7 / 0.02)
        (self.goal_unlock_fraction / self.gate_open_step - 1e-4).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1.0, "moveSpeed": 7.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.0);
        assert_eq!(tuning.move_speed, 7.5);
        // Untouched fields keep defaults
        assert_eq!(tuning.friction, FRICTION);
        assert_eq!(tuning.jump_force, JUMP_FORCE);
    }

    #[test]
    fn test_json_rejects_wrong_types() {
        assert!(Tuning::from_json(r#"{ "gravity": "heavy" }"#).is_err());
    }

    #[test]
    fn test_goal_unlock_ticks() {
        let tuning = Tuning::default();
        assert_eq!(tuning.ticks_until_goal_unlock(), 35);
    }
}
