//! Player vs entity interactions, the castle gate, and the fall-out boundary
//!
//! Entities are scanned from last to first so a collected pickup can be
//! removed in place without skipping its neighbour. The first terminal event
//! latches the run and stops the scan.

use super::state::{EntityKind, GameEvent, Outcome, SimState, SoundCue};

/// Start opening the gate once the player is close enough. Fires once per run.
pub fn check_gate_proximity(state: &mut SimState) {
    if state.gate.triggered {
        return;
    }
    let Some(gate) = state.gate_entity() else {
        return;
    };
    let distance = (state.player.rect.pos.x - gate.rect.center_x()).abs();
    if distance < state.tuning.gate_proximity {
        log::info!("Gate triggered at player x={:.1}", state.player.rect.pos.x);
        state.gate.triggered = true;
        state.play_sound(SoundCue::Victory);
    }
}

/// Animate the gate toward fully open
pub fn advance_gate(state: &mut SimState) {
    if state.gate.triggered && state.gate.progress < 1.0 {
        state.gate.progress = (state.gate.progress + state.tuning.gate_open_step).min(1.0);
    }
}

/// Gate is far enough open for the gated goal to count
pub fn gate_open(state: &SimState) -> bool {
    state.gate.triggered && state.gate.progress >= state.tuning.goal_unlock_fraction
}

/// Resolve every entity the player currently overlaps
pub fn scan_interactions(state: &mut SimState) {
    for i in (0..state.entities.len()).rev() {
        if state.ending {
            break;
        }
        if !state.player.rect.overlaps(&state.entities[i].rect) {
            continue;
        }

        match state.entities[i].kind {
            EntityKind::Hazard { .. } => {
                log::debug!("Hit hazard `{}`", state.entities[i].id);
                state.play_sound(SoundCue::Damage);
                state.end(Outcome::GameOver);
            }
            EntityKind::Collectible { score_value } => {
                let collected = state.entities.remove(i);
                state.score += score_value;
                log::debug!(
                    "Collected `{}` (+{}, total {})",
                    collected.id,
                    score_value,
                    state.score
                );
                state.emit(GameEvent::ScoreChanged(state.score));
                state.play_sound(SoundCue::Coin);
            }
            EntityKind::Goal { gated } => {
                if !gated || gate_open(state) {
                    state.play_sound(SoundCue::Victory);
                    state.end(Outcome::Victory);
                }
            }
            EntityKind::Platform | EntityKind::Decoration | EntityKind::Gate => {}
        }
    }
}

/// Falling below the level is fatal
pub fn check_boundary(state: &mut SimState) {
    if state.ending {
        return;
    }
    if state.player.rect.pos.y > state.level.height {
        log::debug!("Player fell out at x={:.1}", state.player.rect.pos.x);
        state.play_sound(SoundCue::Damage);
        state.end(Outcome::GameOver);
    }
}
