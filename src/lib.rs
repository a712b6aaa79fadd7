//! Castle Run - A side-scrolling castle platformer
//!
//! Core modules:
//! - `sim`: Per-frame simulation (physics, hazards, interactions, camera)
//! - `level`: Level data input model and the built-in level catalogue
//! - `session`: Game loop driver (game phases, pause, level progression)
//! - `input`: Held-key table sampled once per tick
//! - `snapshot`: Render-consumable view of the simulation
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod input;
pub mod level;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use input::InputState;
pub use level::{LevelData, LevelError};
pub use session::{FrameHandle, GameHooks, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Downward acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Horizontal velocity multiplier per tick with no input held
    pub const FRICTION: f32 = 0.8;
    /// Horizontal speed while a move key is held (pixels/tick)
    pub const MOVE_SPEED: f32 = 5.0;
    /// Vertical velocity set on jump (negative = up)
    pub const JUMP_FORCE: f32 = -14.0;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 12.0;

    /// Viewport dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;

    /// Ground strip thickness used by the catalogue and the default floor line
    pub const FLOOR_THICKNESS: f32 = 60.0;

    /// Gate opens when the player is this close (horizontally) to its center
    pub const GATE_PROXIMITY: f32 = 150.0;
    /// Gate opening progress added per tick once triggered
    pub const GATE_OPEN_STEP: f32 = 0.02;
    /// Gated goal only triggers once the gate is at least this open
    pub const GOAL_UNLOCK_FRACTION: f32 = 0.7;

    /// Falling wall triggers when player center is within this distance of its center
    pub const WALL_TRIGGER_DISTANCE: f32 = 200.0;
    /// Fall speed assigned when a wall is triggered
    pub const WALL_INITIAL_FALL_SPEED: f32 = 2.0;
    /// Reduced gravity applied to falling walls
    pub const WALL_GRAVITY: f32 = 0.3;

    /// Fireball patrol half-width around its anchor
    pub const FIREBALL_RANGE: f32 = 150.0;
    /// Fireball speed when the level data omits it
    pub const FIREBALL_DEFAULT_SPEED: f32 = 3.0;

    /// Collectible score when the level data omits it
    pub const DEFAULT_SCORE_VALUE: u32 = 10;
}

/// Parse a `#rrggbb` / `#rgb` colour into linear RGBA components.
///
/// Returns `None` for anything else; callers fall back to a default colour.
pub fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.strip_prefix('#')?;
    let channel = |v: u8| v as f32 / 255.0;
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some([
                channel((v >> 16) as u8),
                channel((v >> 8) as u8),
                channel(v as u8),
                1.0,
            ])
        }
        3 => {
            let v = u16::from_str_radix(hex, 16).ok()?;
            let expand = |n: u16| channel(((n & 0xf) * 17) as u8);
            Some([expand(v >> 8), expand(v >> 4), expand(v), 1.0])
        }
        _ => None,
    }
}
