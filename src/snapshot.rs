//! Render-consumable view of the simulation
//!
//! Built after the tick in the same frame, so a renderer never sees a
//! half-updated level. Instances are plain `Pod` data and can be uploaded to
//! a GPU buffer as-is or drawn one rect at a time on a 2D canvas.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Entity, EntityKind, SimState};

/// Background fill
pub const SKY_COLOR: [f32; 4] = [
    0x87 as f32 / 255.0,
    0xce as f32 / 255.0,
    0xeb as f32 / 255.0,
    1.0,
];
/// Player fill
pub const PLAYER_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];

/// One axis-aligned box in level space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// [`EntityKind::code`], 0 for the player
    pub kind: u32,
    /// Gate opening progress (0 for everything but the gate)
    pub open_fraction: f32,
    /// 0 = do not draw
    pub visible: u32,
    pub _pad: u32,
}

impl RectInstance {
    pub fn is_visible(&self) -> bool {
        self.visible != 0
    }

    fn from_entity(entity: &Entity, gate_progress: f32) -> Self {
        let (open_fraction, visible) = match entity.kind {
            EntityKind::Gate => (gate_progress, true),
            // Goals are trigger volumes; the castle art shows where they are
            EntityKind::Goal { .. } => (0.0, false),
            _ => (0.0, true),
        };
        Self {
            pos: entity.rect.pos.to_array(),
            size: entity.rect.size.to_array(),
            color: entity.color,
            kind: entity.kind.code(),
            open_fraction,
            visible: visible as u32,
            _pad: 0,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub camera_x: f32,
    pub viewport: [f32; 2],
    pub player: RectInstance,
    /// In authored order, which is also the draw order
    pub entities: Vec<RectInstance>,
    pub tutorial_text: String,
    pub gate_open: f32,
}

impl RenderSnapshot {
    pub fn capture(state: &SimState) -> Self {
        let gate_open = state.gate.progress;
        Self {
            camera_x: state.camera_x,
            viewport: [state.tuning.viewport_width, state.tuning.viewport_height],
            player: RectInstance {
                pos: state.player.rect.pos.to_array(),
                size: state.player.rect.size.to_array(),
                color: PLAYER_COLOR,
                kind: 0,
                open_fraction: 0.0,
                visible: 1,
                _pad: 0,
            },
            entities: state
                .entities
                .iter()
                .map(|e| RectInstance::from_entity(e, gate_open))
                .collect(),
            tutorial_text: state.tutorial_text.clone(),
            gate_open,
        }
    }

    /// Entities overlapping the visible horizontal window
    pub fn visible_entities(&self) -> impl Iterator<Item = &RectInstance> {
        let left = self.camera_x;
        let right = self.camera_x + self.viewport[0];
        self.entities
            .iter()
            .filter(move |r| r.is_visible() && r.pos[0] < right && r.pos[0] + r.size[0] > left)
    }

    /// Raw bytes of the entity instances for a GPU upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.entities)
    }
}
