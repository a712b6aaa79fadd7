//! Built-in hand-authored levels
//!
//! Each call builds a fresh [`LevelData`]; the simulation copies it, so the
//! catalogue never shares mutable state with a running level.

use super::{EntitySpec, EntityType, LevelData, LevelError, Position, PropertyBag, TutorialZone};
use crate::consts::{CANVAS_HEIGHT, FLOOR_THICKNESS};

/// Number of built-in levels
pub const LEVEL_COUNT: u32 = 3;

const GROUND: &str = "#4a5d23";
const WOOD: &str = "#78350f";
const LAVA: &str = "#ef4444";
const COIN: &str = "#fbbf24";
const STONE: &str = "#4a5568";
const TOWER: &str = "#2d3748";

/// Look up a built-in level by its 1-based number
pub fn level(number: u32) -> Result<LevelData, LevelError> {
    match number {
        1 => Ok(level_1()),
        2 => Ok(level_2()),
        3 => Ok(level_3()),
        n => Err(LevelError::UnknownLevel(n)),
    }
}

fn floor(id: &str, x: f32, width: f32) -> EntitySpec {
    let floor_y = CANVAS_HEIGHT - FLOOR_THICKNESS;
    EntitySpec::new(id, EntityType::Platform, x, floor_y, width, FLOOR_THICKNESS).color(GROUND)
}

fn lava(id: &str, x: f32, width: f32) -> EntitySpec {
    EntitySpec::new(id, EntityType::Hazard, x, CANVAS_HEIGHT - 20.0, width, 20.0)
        .color(LAVA)
        .properties(PropertyBag {
            damage: Some(1.0),
            ..Default::default()
        })
}

fn ledge(id: &str, x: f32, y: f32, width: f32) -> EntitySpec {
    EntitySpec::new(id, EntityType::Platform, x, y, width, 20.0).color(WOOD)
}

fn coin(id: &str, x: f32, y: f32, value: u32) -> EntitySpec {
    EntitySpec::new(id, EntityType::Collectible, x, y, 20.0, 20.0)
        .color(COIN)
        .properties(PropertyBag {
            score_value: Some(value),
            ..Default::default()
        })
}

/// Castle base, two towers, the gate and the gated goal behind it
fn castle(base_x: f32, floor_y: f32) -> Vec<EntitySpec> {
    vec![
        EntitySpec::new(
            "castle-base",
            EntityType::Decoration,
            base_x,
            floor_y - 200.0,
            200.0,
            200.0,
        )
        .color(STONE),
        EntitySpec::new(
            "castle-tower-left",
            EntityType::Decoration,
            base_x + 20.0,
            floor_y - 350.0,
            60.0,
            150.0,
        )
        .color(TOWER),
        EntitySpec::new(
            "castle-tower-right",
            EntityType::Decoration,
            base_x + 120.0,
            floor_y - 350.0,
            60.0,
            150.0,
        )
        .color(TOWER),
        EntitySpec::new(
            "castle-gate",
            EntityType::CastleGate,
            base_x + 80.0,
            floor_y - 80.0,
            40.0,
            140.0,
        )
        .color(WOOD),
        EntitySpec::new(
            "goal",
            EntityType::Goal,
            base_x + 100.0,
            floor_y - 80.0,
            60.0,
            140.0,
        )
        .color("#ec4899")
        .properties(PropertyBag {
            requires_gate: Some(true),
            ..Default::default()
        }),
    ]
}

/// Level 1: The Castle Gate (training stage)
pub fn level_1() -> LevelData {
    let floor_y = CANVAS_HEIGHT - FLOOR_THICKNESS;

    let mut entities = vec![
        // Ground segments with gaps
        floor("floor-1", 0.0, 600.0),
        floor("floor-2", 750.0, 400.0),
        floor("floor-3", 1300.0, 800.0),
        // Lava in the gaps
        lava("lava-1", 600.0, 150.0),
        lava("lava-2", 1150.0, 150.0),
        // Platforms
        ledge("plat-1", 300.0, floor_y - 100.0, 100.0),
        ledge("plat-2", 500.0, floor_y - 200.0, 100.0),
        ledge("plat-3", 800.0, floor_y - 150.0, 100.0),
        // Collectibles
        coin("coin-1", 330.0, floor_y - 140.0, 10),
        coin("coin-2", 530.0, floor_y - 240.0, 10),
        coin("coin-3", 900.0, floor_y - 40.0, 10),
        ledge("plat-mov-1", 1000.0, floor_y - 250.0, 120.0).color("#a16207"),
    ];
    entities.extend(castle(1800.0, floor_y));

    LevelData {
        id: 1,
        name: "The Castle Gate".to_string(),
        description: "Training Stage".to_string(),
        width: 2000.0,
        height: CANVAS_HEIGHT,
        entities,
        start_pos: Position::new(50.0, floor_y - 100.0),
        tutorial_zones: vec![
            TutorialZone::new(0.0, 200.0, "Welcome! Use Arrow Keys to MOVE."),
            TutorialZone::new(250.0, 450.0, "Press SPACE to JUMP over obstacles."),
            TutorialZone::new(550.0, 700.0, "Watch out for LAVA! Fall and you restart."),
            TutorialZone::new(
                800.0,
                1100.0,
                "Collect COINS for points and use PLATFORMS to climb.",
            ),
            TutorialZone::new(1700.0, 1950.0, "Reach the CASTLE GATE to enter!"),
        ],
        floor_y: Some(floor_y),
    }
}

/// Level 2: Inside the Castle
pub fn level_2() -> LevelData {
    let floor_y = CANVAS_HEIGHT - FLOOR_THICKNESS;

    let mut entities = vec![
        floor("floor-1", 0.0, 400.0),
        floor("floor-2", 500.0, 300.0),
        floor("floor-3", 900.0, 400.0),
        floor("floor-4", 1400.0, 600.0),
        lava("lava-1", 400.0, 100.0),
        lava("lava-2", 800.0, 100.0),
        lava("lava-3", 1300.0, 100.0),
        ledge("plat-1", 200.0, floor_y - 120.0, 80.0),
        ledge("plat-2", 600.0, floor_y - 180.0, 80.0),
        ledge("plat-3", 1000.0, floor_y - 150.0, 80.0),
        ledge("plat-4", 1200.0, floor_y - 220.0, 80.0),
        ledge("plat-5", 1500.0, floor_y - 100.0, 100.0),
        coin("coin-1", 230.0, floor_y - 160.0, 20),
        coin("coin-2", 630.0, floor_y - 220.0, 20),
        coin("coin-3", 1030.0, floor_y - 190.0, 20),
        coin("coin-4", 1230.0, floor_y - 260.0, 20),
        coin("coin-5", 1530.0, floor_y - 140.0, 20),
        ledge("plat-mov-1", 700.0, floor_y - 300.0, 100.0).color("#a16207"),
    ];
    entities.extend(castle(1700.0, floor_y));

    LevelData {
        id: 2,
        name: "Inside the Castle".to_string(),
        description: "The Inner Keep".to_string(),
        width: 2000.0,
        height: CANVAS_HEIGHT,
        entities,
        start_pos: Position::new(50.0, floor_y - 100.0),
        tutorial_zones: vec![
            TutorialZone::new(0.0, 300.0, "Level 2! More challenges ahead!"),
            TutorialZone::new(400.0, 700.0, "Watch out for more LAVA pits!"),
            TutorialZone::new(900.0, 1400.0, "Use platforms to reach higher areas!"),
            TutorialZone::new(1600.0, 1950.0, "Reach the next CASTLE GATE!"),
        ],
        floor_y: Some(floor_y),
    }
}

/// Level 3: The Dragon's Lair (falling walls and fireballs, open goal)
pub fn level_3() -> LevelData {
    let floor_y = CANVAS_HEIGHT - FLOOR_THICKNESS;

    let falling_wall = |id: &str, x: f32| {
        EntitySpec::new(id, EntityType::Hazard, x, floor_y - 420.0, 40.0, 110.0)
            .color("#57534e")
            .dynamic()
            .properties(PropertyBag {
                damage: Some(1.0),
                is_falling: Some(true),
                has_started: Some(false),
                ..Default::default()
            })
    };
    let fireball = |id: &str, x: f32, y: f32, direction: f32, speed: f32| {
        EntitySpec::new(id, EntityType::Hazard, x, y, 30.0, 30.0)
            .color("#f97316")
            .dynamic()
            .properties(PropertyBag {
                damage: Some(1.0),
                is_fireball: Some(true),
                direction: Some(direction),
                speed: Some(speed),
                ..Default::default()
            })
    };

    let entities = vec![
        floor("floor-1", 0.0, 700.0),
        floor("floor-2", 850.0, 650.0),
        floor("floor-3", 1650.0, 550.0),
        lava("lava-1", 700.0, 150.0),
        lava("lava-2", 1500.0, 150.0),
        falling_wall("wall-1", 450.0),
        falling_wall("wall-2", 1150.0),
        ledge("plat-1", 620.0, floor_y - 130.0, 120.0),
        ledge("plat-2", 1420.0, floor_y - 140.0, 120.0),
        fireball("fireball-1", 1000.0, floor_y - 230.0, 1.0, 3.0),
        fireball("fireball-2", 1850.0, floor_y - 200.0, -1.0, 5.0),
        coin("coin-1", 660.0, floor_y - 200.0, 30),
        coin("coin-2", 1300.0, floor_y - 60.0, 30),
        coin("coin-3", 1460.0, floor_y - 210.0, 30),
        EntitySpec::new("lair-exit", EntityType::Goal, 2100.0, floor_y - 100.0, 60.0, 100.0)
            .color("#ec4899"),
    ];

    LevelData {
        id: 3,
        name: "The Dragon's Lair".to_string(),
        description: "Fire and Stone".to_string(),
        width: 2200.0,
        height: CANVAS_HEIGHT,
        entities,
        start_pos: Position::new(50.0, floor_y - 100.0),
        tutorial_zones: vec![
            TutorialZone::new(0.0, 250.0, "The Dragon's Lair! Mind the ceiling."),
            TutorialZone::new(
                300.0,
                500.0,
                "Walls drop when you get close. Climb them once they land!",
            ),
            TutorialZone::new(900.0, 1300.0, "Time your jumps around the FIREBALLS."),
            TutorialZone::new(1900.0, 2150.0, "The exit is just ahead!"),
        ],
        floor_y: Some(floor_y),
    }
}
