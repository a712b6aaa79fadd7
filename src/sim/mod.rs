//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed rate: one tick per frame, no wall-clock reads
//! - Stable iteration order (authored entity order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod hazards;
pub mod interaction;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use camera::{active_tutorial, camera_offset};
pub use physics::{StepResult, step_player};
pub use rect::Rect;
pub use state::{
    Entity, EntityKind, Fireball, GameEvent, GateState, HazardBehavior, Outcome, Player, SimState,
    SoundCue, WallState, DEFAULT_COLOR, STARTING_HEALTH,
};
pub use tick::{TickInput, tick};
