//! Horizontal camera follow and tutorial hint tracking

use super::state::{GameEvent, SimState};
use crate::level::TutorialZone;

/// Scroll offset keeping the player a third of the way into the viewport.
///
/// Never negative, and never past the right edge of the level. A level
/// narrower than the viewport pins the camera at 0.
pub fn camera_offset(player_x: f32, level_width: f32, viewport_width: f32) -> f32 {
    // Not f32::clamp: the bounds cross when the level is narrower than the view
    (player_x - viewport_width / 3.0)
        .min(level_width - viewport_width)
        .max(0.0)
}

pub fn update_camera(state: &mut SimState) {
    state.camera_x = camera_offset(
        state.player.rect.pos.x,
        state.level.width,
        state.tuning.viewport_width,
    );
}

/// First zone containing `x`, in authored order
pub fn active_tutorial(zones: &[TutorialZone], x: f32) -> Option<&TutorialZone> {
    zones.iter().find(|z| z.contains(x))
}

/// Refresh the hint text, emitting an event only when it changes
pub fn update_tutorial(state: &mut SimState) {
    let text = active_tutorial(state.tutorial_zones(), state.player.rect.pos.x)
        .map(|z| z.text.as_str())
        .unwrap_or("");
    if text != state.tutorial_text {
        let text = text.to_string();
        log::debug!("Tutorial hint: {:?}", text);
        state.tutorial_text = text.clone();
        state.emit(GameEvent::TutorialChanged(text));
    }
}
