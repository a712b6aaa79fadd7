//! Level data input model
//!
//! A level arrives as an immutable, declarative description produced by the
//! level-authoring side (the built-in [`catalog`] or a JSON document). The
//! simulation deep-copies it into typed entities at load time; nothing here
//! is ever mutated during play.
//!
//! The wire shape mirrors the authoring format: a flat entity list whose
//! behaviour is selected by a `type` tag plus an optional property bag.

pub mod catalog;

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::FLOOR_THICKNESS;

/// Errors raised while ingesting level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: f32, height: f32 },
    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),
    #[error("entity `{id}` has non-positive size {width}x{height}")]
    BadEntitySize { id: String, width: f32, height: f32 },
    #[error("entity `{0}` is a PLAYER; the player is spawned from startPos, not the entity list")]
    PlayerInEntityList(String),
    #[error("start position ({x}, {y}) lies outside the level")]
    StartOutOfBounds { x: f32, y: f32 },
    #[error("tutorial zone `{text}` ends ({x_end}) before it starts ({x_start})")]
    BadTutorialZone { text: String, x_start: f32, x_end: f32 },
    #[error("no built-in level numbered {0}")]
    UnknownLevel(u32),
}

/// Entity type tag as authored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Player,
    Platform,
    /// Lava, fireballs, falling walls
    Hazard,
    /// Coins, potions
    Collectible,
    Goal,
    Decoration,
    #[serde(alias = "GATE")]
    CastleGate,
}

/// Authored velocity (pixels/tick)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

/// Optional behaviour flags; presence selects behaviour at load time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyBag {
    pub damage: Option<f32>,
    pub score_value: Option<u32>,
    /// Fireball patrol half-width; falls back to the tuned default
    pub range: Option<f32>,
    pub initial_x: Option<f32>,
    pub is_falling: Option<bool>,
    pub has_started: Option<bool>,
    pub is_fireball: Option<bool>,
    /// 1 = right, -1 = left
    pub direction: Option<f32>,
    pub speed: Option<f32>,
    /// Marks the goal that waits for the gate to open
    pub requires_gate: Option<bool>,
}

/// One authored entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_static")]
    pub is_static: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub velocity: Option<Velocity>,
    #[serde(default)]
    pub properties: PropertyBag,
}

fn default_static() -> bool {
    true
}

impl EntitySpec {
    /// Shorthand used by the catalogue
    pub fn new(id: &str, kind: EntityType, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            kind,
            x,
            y,
            width,
            height,
            is_static: true,
            color: None,
            velocity: None,
            properties: PropertyBag::default(),
        }
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn properties(mut self, properties: PropertyBag) -> Self {
        self.properties = properties;
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.is_static = false;
        self
    }
}

/// Authored point in level space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for Vec2 {
    fn from(p: Position) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Horizontal hint region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialZone {
    pub x_start: f32,
    pub x_end: f32,
    pub text: String,
}

impl TutorialZone {
    pub fn new(x_start: f32, x_end: f32, text: &str) -> Self {
        Self {
            x_start,
            x_end,
            text: text.to_string(),
        }
    }

    /// Inclusive on both ends
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_start && x <= self.x_end
    }
}

/// Full description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub width: f32,
    pub height: f32,
    pub entities: Vec<EntitySpec>,
    pub start_pos: Position,
    #[serde(default)]
    pub tutorial_zones: Vec<TutorialZone>,
    /// Y of the ground surface falling walls land on
    #[serde(default)]
    pub floor_y: Option<f32>,
}

impl LevelData {
    /// Parse and validate a level document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ground line; defaults to one floor strip above the bottom edge
    pub fn floor_line(&self) -> f32 {
        self.floor_y.unwrap_or(self.height - FLOOR_THICKNESS)
    }

    /// Whether any gate entity exists (enables gated goals)
    pub fn has_gate(&self) -> bool {
        self.entities.iter().any(|e| e.kind == EntityType::CastleGate)
    }

    /// Reject data the simulation cannot run
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LevelError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let start = self.start_pos;
        if start.x < 0.0 || start.x > self.width || start.y > self.height {
            return Err(LevelError::StartOutOfBounds {
                x: start.x,
                y: start.y,
            });
        }

        let mut seen = HashSet::with_capacity(self.entities.len());
        for entity in &self.entities {
            if entity.kind == EntityType::Player {
                return Err(LevelError::PlayerInEntityList(entity.id.clone()));
            }
            if !(entity.width > 0.0 && entity.height > 0.0) {
                return Err(LevelError::BadEntitySize {
                    id: entity.id.clone(),
                    width: entity.width,
                    height: entity.height,
                });
            }
            if !seen.insert(entity.id.as_str()) {
                return Err(LevelError::DuplicateId(entity.id.clone()));
            }
        }

        for zone in &self.tutorial_zones {
            if zone.x_end < zone.x_start {
                return Err(LevelError::BadTutorialZone {
                    text: zone.text.clone(),
                    x_start: zone.x_start,
                    x_end: zone.x_end,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"{
        "id": 7,
        "name": "Test Yard",
        "description": "json fixture",
        "width": 1000,
        "height": 600,
        "startPos": { "x": 50, "y": 400 },
        "entities": [
            { "id": "floor", "type": "PLATFORM", "x": 0, "y": 540, "width": 1000, "height": 60, "isStatic": true, "color": "#4a5d23" },
            { "id": "coin", "type": "COLLECTIBLE", "x": 300, "y": 400, "width": 20, "height": 20, "isStatic": true, "properties": { "scoreValue": 25 } },
            { "id": "fb", "type": "HAZARD", "x": 500, "y": 300, "width": 30, "height": 30, "isStatic": false, "properties": { "isFireball": true, "direction": -1, "speed": 4, "range": 90 } },
            { "id": "gate", "type": "CASTLE_GATE", "x": 900, "y": 400, "width": 40, "height": 140 }
        ],
        "tutorialZones": [ { "xStart": 0, "xEnd": 200, "text": "Go" } ]
    }"##;

    #[test]
    fn test_parse_minimal_level() {
        let level = LevelData::from_json(MINIMAL).unwrap();
        assert_eq!(level.id, 7);
        assert_eq!(level.entities.len(), 4);
        assert_eq!(level.entities[1].properties.score_value, Some(25));
        assert_eq!(level.entities[2].properties.is_fireball, Some(true));
        assert_eq!(level.entities[2].properties.direction, Some(-1.0));
        assert_eq!(level.entities[2].properties.range, Some(90.0));
        assert!(level.entities[3].is_static, "isStatic defaults to true");
        assert!(level.has_gate());
        assert_eq!(level.floor_line(), 540.0);
        assert_eq!(level.tutorial_zones.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.entities[1].id = "floor".to_string();
        assert!(matches!(level.validate(), Err(LevelError::DuplicateId(id)) if id == "floor"));
    }

    #[test]
    fn test_player_entry_rejected() {
        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.entities.push(EntitySpec::new(
            "p",
            EntityType::Player,
            0.0,
            0.0,
            50.0,
            80.0,
        ));
        assert!(matches!(
            level.validate(),
            Err(LevelError::PlayerInEntityList(_))
        ));
    }

    #[test]
    fn test_bad_sizes_rejected() {
        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.entities[0].height = 0.0;
        assert!(matches!(
            level.validate(),
            Err(LevelError::BadEntitySize { .. })
        ));

        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.width = -5.0;
        assert!(matches!(
            level.validate(),
            Err(LevelError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_start_and_zones_checked() {
        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.start_pos = Position::new(-10.0, 0.0);
        assert!(matches!(
            level.validate(),
            Err(LevelError::StartOutOfBounds { .. })
        ));

        let mut level = LevelData::from_json(MINIMAL).unwrap();
        level.tutorial_zones[0].x_end = -1.0;
        assert!(matches!(
            level.validate(),
            Err(LevelError::BadTutorialZone { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = LevelData::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
        assert!(err.to_string().starts_with("malformed level JSON"));
    }
}
