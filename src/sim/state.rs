//! Simulation state and core entity types
//!
//! Everything the per-frame tick reads or writes lives in [`SimState`]. The
//! level's declarative data is copied into typed [`Entity`] values at load so
//! behaviour is selected by variant, never by probing optional fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::level::{EntitySpec, EntityType, LevelData, TutorialZone};
use crate::parse_hex_color;
use crate::tuning::Tuning;

/// Colour used when the level data has none (or an unparseable one)
pub const DEFAULT_COLOR: [f32; 4] = [
    0x88 as f32 / 255.0,
    0x88 as f32 / 255.0,
    0x88 as f32 / 255.0,
    1.0,
];

/// Starting health; hazards are fatal on first contact so this never drops
pub const STARTING_HEALTH: u8 = 3;

/// Sound cue keys understood by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Jump,
    Coin,
    Damage,
    Victory,
}

impl SoundCue {
    pub fn key(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Coin => "coin",
            SoundCue::Damage => "damage",
            SoundCue::Victory => "victory",
        }
    }
}

/// Things that happened during a tick, drained by the host afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Running score total after a pickup
    ScoreChanged(u32),
    GameOver,
    Victory,
    Sound(SoundCue),
    /// Active tutorial hint changed (empty = none)
    TutorialChanged(String),
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    GameOver,
    Victory,
}

/// Falling wall lifecycle. Landing turns the entity into a platform, which
/// is the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallState {
    Dormant,
    Falling,
}

/// Oscillating projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fireball {
    /// Patrol speed (always positive)
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    /// Half-width of the patrol around the anchor
    pub range: f32,
    /// Patrol center, captured on the first tick if not authored
    pub anchor_x: Option<f32>,
}

/// Behaviour attached to a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardBehavior {
    /// Lava and other inert hazards
    Static,
    Fireball(Fireball),
    FallingWall(WallState),
}

/// What an entity is and the data its behaviour needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Hazard { damage: f32, behavior: HazardBehavior },
    Collectible { score_value: u32 },
    /// `gated` goals wait for the level's gate to open
    Goal { gated: bool },
    Decoration,
    Gate,
}

impl EntityKind {
    /// Stable numeric code for render instance buffers
    pub fn code(&self) -> u32 {
        match self {
            EntityKind::Platform => 1,
            EntityKind::Hazard { .. } => 2,
            EntityKind::Collectible { .. } => 3,
            EntityKind::Goal { .. } => 4,
            EntityKind::Decoration => 5,
            EntityKind::Gate => 6,
        }
    }
}

/// A non-player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    pub rect: Rect,
    /// Never moves on its own; only the player is pushed out of static boxes
    pub is_static: bool,
    /// `None` means "does not move under physics" (or not yet activated)
    pub velocity: Option<Vec2>,
    pub color: [f32; 4],
}

impl Entity {
    /// Build a typed entity from its authored form.
    ///
    /// `gated` marks the goal that must wait for the gate. Returns `None` for
    /// a `PLAYER` entry, which validation normally rejects earlier.
    pub fn from_spec(spec: &EntitySpec, gated: bool, tuning: &Tuning) -> Option<Self> {
        let props = &spec.properties;
        let kind = match spec.kind {
            EntityType::Player => {
                log::warn!("Skipping player entry `{}` in entity list", spec.id);
                return None;
            }
            EntityType::Platform => EntityKind::Platform,
            EntityType::Hazard => {
                let behavior = if props.is_fireball == Some(true) {
                    let speed = props.speed.unwrap_or(tuning.fireball_default_speed).abs();
                    let direction = if props.direction.unwrap_or(1.0) < 0.0 {
                        -1.0
                    } else {
                        1.0
                    };
                    HazardBehavior::Fireball(Fireball {
                        speed,
                        direction,
                        range: props.range.unwrap_or(tuning.fireball_range).abs(),
                        anchor_x: props.initial_x,
                    })
                } else if props.is_falling == Some(true) {
                    if props.has_started == Some(true) {
                        HazardBehavior::FallingWall(WallState::Falling)
                    } else {
                        HazardBehavior::FallingWall(WallState::Dormant)
                    }
                } else {
                    HazardBehavior::Static
                };
                EntityKind::Hazard {
                    damage: props.damage.unwrap_or(1.0),
                    behavior,
                }
            }
            EntityType::Collectible => EntityKind::Collectible {
                score_value: props.score_value.unwrap_or(tuning.default_score_value),
            },
            EntityType::Goal => EntityKind::Goal { gated },
            EntityType::Decoration => EntityKind::Decoration,
            EntityType::CastleGate => EntityKind::Gate,
        };

        let color = match spec.color.as_deref() {
            None => DEFAULT_COLOR,
            Some(s) => parse_hex_color(s).unwrap_or_else(|| {
                log::warn!("Entity `{}` has unparseable color {:?}", spec.id, s);
                DEFAULT_COLOR
            }),
        };

        Some(Self {
            id: spec.id.clone(),
            kind,
            rect: Rect::new(spec.x, spec.y, spec.width, spec.height),
            is_static: spec.is_static,
            velocity: spec.velocity.map(|v| Vec2::new(v.vx, v.vy)),
            color,
        })
    }

    #[inline]
    pub fn is_platform(&self) -> bool {
        matches!(self.kind, EntityKind::Platform)
    }

    /// Damage dealt on contact (0 for anything that is not a hazard)
    pub fn damage(&self) -> f32 {
        match self.kind {
            EntityKind::Hazard { damage, .. } => damage,
            _ => 0.0,
        }
    }
}

/// The player-controlled character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    /// Resting on top of a platform after the last vertical resolve
    pub grounded: bool,
}

impl Player {
    pub fn new(start: Vec2, tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(start.x, start.y, tuning.player_width, tuning.player_height),
            vel: Vec2::ZERO,
            grounded: false,
        }
    }
}

/// Gate opening animation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GateState {
    /// Player has come within proximity range
    pub triggered: bool,
    /// 0 = closed, 1 = fully open
    pub progress: f32,
}

/// Complete simulation state for one level run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Immutable level description this run was seeded from
    pub level: LevelData,
    pub tuning: Tuning,
    pub player: Player,
    /// All non-player entities, in authored order
    pub entities: Vec<Entity>,
    pub score: u32,
    /// Declared but never decremented: hazard contact is immediately fatal
    pub health: u8,
    /// Horizontal scroll offset
    pub camera_x: f32,
    /// Active tutorial hint (empty when outside every zone)
    pub tutorial_text: String,
    pub gate: GateState,
    /// Ending latch: set by the first terminal event, freezes the run
    pub ending: bool,
    pub outcome: Option<Outcome>,
    /// Ticks simulated since load
    pub time_ticks: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl SimState {
    /// Deep-copy a level into fresh simulation state
    pub fn new(level: &LevelData, tuning: Tuning) -> Self {
        let has_gate = level.has_gate();
        // A gate gates exactly one goal: the one flagged, else the first
        let gated_index = if has_gate {
            level
                .entities
                .iter()
                .position(|e| {
                    e.kind == EntityType::Goal && e.properties.requires_gate == Some(true)
                })
                .or_else(|| level.entities.iter().position(|e| e.kind == EntityType::Goal))
        } else {
            None
        };

        let entities = level
            .entities
            .iter()
            .enumerate()
            .filter_map(|(i, spec)| Entity::from_spec(spec, gated_index == Some(i), &tuning))
            .collect();

        let player = Player::new(level.start_pos.into(), &tuning);

        log::info!(
            "Level {} '{}' loaded ({} entities, gate: {})",
            level.id,
            level.name,
            level.entities.len(),
            has_gate
        );

        Self {
            level: level.clone(),
            tuning,
            player,
            entities,
            score: 0,
            health: STARTING_HEALTH,
            camera_x: 0.0,
            tutorial_text: String::new(),
            gate: GateState::default(),
            ending: false,
            outcome: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Rebuild from the stored level data (restart)
    pub fn reset(&mut self) {
        let level = self.level.clone();
        *self = Self::new(&level, self.tuning.clone());
    }

    /// Queue an outbound event
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, cue: SoundCue) {
        self.emit(GameEvent::Sound(cue));
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set the ending latch. Returns false if it was already set.
    pub fn end(&mut self, outcome: Outcome) -> bool {
        if self.ending {
            return false;
        }
        self.ending = true;
        self.outcome = Some(outcome);
        match outcome {
            Outcome::GameOver => {
                log::info!("Game over (score {})", self.score);
                self.emit(GameEvent::GameOver);
            }
            Outcome::Victory => {
                log::info!("Level {} cleared (score {})", self.level.id, self.score);
                self.emit(GameEvent::Victory);
            }
        }
        true
    }

    /// The level's gate, if any
    pub fn gate_entity(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::Gate))
    }

    pub fn has_gate(&self) -> bool {
        self.gate_entity().is_some()
    }

    pub fn tutorial_zones(&self) -> &[TutorialZone] {
        &self.level.tutorial_zones
    }

    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
