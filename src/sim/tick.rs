//! Fixed-rate simulation tick
//!
//! One call advances the level by one display frame. The host samples input
//! once per frame and passes a snapshot; nothing here reads the clock.

use super::camera::{update_camera, update_tutorial};
use super::hazards::update_hazards;
use super::interaction::{advance_gate, check_boundary, check_gate_proximity, scan_interactions};
use super::physics::step_player;
use super::state::{SimState, SoundCue};

/// Held controls for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Level-triggered: holding jump re-jumps on every landing
    pub jump: bool,
}

/// Advance the level by one tick. A latched run is left untouched, but the
/// tick that sets the latch still refreshes the camera and hint.
pub fn tick(state: &mut SimState, input: &TickInput) {
    if state.ending {
        return;
    }
    state.time_ticks += 1;

    update_hazards(state);

    let step = step_player(&mut state.player, input, &state.entities, &state.tuning);
    if step.jumped {
        state.play_sound(SoundCue::Jump);
    }

    check_gate_proximity(state);

    scan_interactions(state);
    check_boundary(state);
    if !state.ending {
        advance_gate(state);
    }

    update_camera(state);
    update_tutorial(state);
}
