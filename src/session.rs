//! Game loop driver
//!
//! Owns the current run, the screen-level state machine, and level
//! progression. The host calls [`Session::run_frame`] once per animation
//! frame with the [`FrameHandle`] it was scheduled with; a handle from before
//! a restart or level change is rejected so a stale callback can never touch
//! the new level.

use serde::{Deserialize, Serialize};

use crate::input::InputState;
use crate::level::{LevelData, LevelError, catalog};
use crate::sim::{GameEvent, SimState, SoundCue, tick};
use crate::snapshot::RenderSnapshot;
use crate::tuning::Tuning;

/// Screen-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    /// Story screens before level 1
    Intro,
    Playing,
    Paused,
    GameOver,
    Victory,
    LevelSelect,
}

/// Outbound notifications. Every method defaults to a no-op so hosts only
/// implement what they present.
pub trait GameHooks {
    fn on_score_update(&mut self, _total: u32) {}
    fn on_game_over(&mut self) {}
    fn on_victory(&mut self) {}
    fn set_game_state(&mut self, _phase: GamePhase) {}
    /// Fire-and-forget; implementations must swallow playback failures
    fn play_sound(&mut self, _cue: SoundCue) {}
    fn on_tutorial_changed(&mut self, _text: &str) {}
}

/// Hooks that ignore everything
#[derive(Debug, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

/// Ticket for one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle {
    generation: u64,
}

/// One player's session: menus, the active run, and progression
#[derive(Debug)]
pub struct Session {
    phase: GamePhase,
    /// 1-based level number of the current or last run
    level_number: u32,
    /// The run came from [`Session::play_level`], not the catalogue
    external: bool,
    sim: Option<SimState>,
    tuning: Tuning,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Menu,
            level_number: 1,
            external: false,
            sim: None,
            tuning,
            generation: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn sim(&self) -> Option<&SimState> {
        self.sim.as_ref()
    }

    pub fn sim_mut(&mut self) -> Option<&mut SimState> {
        self.sim.as_mut()
    }

    /// Current run's score (0 outside a run)
    pub fn score(&self) -> u32 {
        self.sim.as_ref().map_or(0, |s| s.score)
    }

    /// HUD level label, e.g. `1 - THE CASTLE GATE`
    pub fn level_label(&self) -> String {
        match &self.sim {
            Some(sim) => format!("{} - {}", self.level_number, sim.level.name.to_uppercase()),
            None => format!("{}", self.level_number),
        }
    }

    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.sim.as_ref().map(RenderSnapshot::capture)
    }

    /// Handle for the next frame callback
    pub fn frame_handle(&self) -> FrameHandle {
        FrameHandle {
            generation: self.generation,
        }
    }

    /// The handle was issued before the latest restart or level change
    pub fn is_superseded(&self, handle: FrameHandle) -> bool {
        handle.generation < self.generation
    }

    /// The handle belongs to the current run and that run can still tick
    pub fn is_live(&self, handle: FrameHandle) -> bool {
        handle.generation == self.generation
            && self.phase == GamePhase::Playing
            && self.sim.as_ref().is_some_and(|s| !s.ending)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Game state {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Replace the active run; invalidates every outstanding frame handle
    fn begin(&mut self, number: u32, level: LevelData, external: bool) {
        self.generation += 1;
        self.level_number = number;
        self.external = external;
        self.sim = Some(SimState::new(&level, self.tuning.clone()));
        self.set_phase(GamePhase::Playing);
    }

    fn load_catalog_level(&mut self, number: u32) -> Result<(), LevelError> {
        let level = catalog::level(number)?;
        self.begin(number, level, false);
        Ok(())
    }

    /// Menu -> story screens
    pub fn open_intro(&mut self) {
        self.set_phase(GamePhase::Intro);
    }

    /// New game from level 1 with a zero score
    pub fn start(&mut self) -> Result<(), LevelError> {
        self.load_catalog_level(1)
    }

    pub fn open_level_select(&mut self) {
        self.set_phase(GamePhase::LevelSelect);
    }

    /// Jump straight into a built-in level
    pub fn select_level(&mut self, number: u32) -> Result<(), LevelError> {
        self.load_catalog_level(number)
    }

    /// Play an externally authored level after validating it. Clearing it
    /// returns to the menu rather than continuing into the catalogue.
    pub fn play_level(&mut self, level: LevelData) -> Result<(), LevelError> {
        level.validate()?;
        self.begin(level.id, level, true);
        Ok(())
    }

    /// Pause a running level; no-op in any other state
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Replay the current level from scratch (score back to 0)
    pub fn restart(&mut self) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        sim.reset();
        self.generation += 1;
        log::info!("Restarted level {}", self.level_number);
        self.set_phase(GamePhase::Playing);
    }

    /// Continue after a victory; past the last level this returns to the menu
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        if self.external {
            log::info!("External level {} cleared", self.level_number);
            self.back_to_menu();
            return Ok(());
        }
        if self.level_number >= catalog::LEVEL_COUNT {
            log::info!("All levels cleared");
            self.back_to_menu();
            return Ok(());
        }
        let next = self.level_number + 1;
        log::info!("Advancing to level {}", next);
        self.load_catalog_level(next)
    }

    /// Tear down the run
    pub fn back_to_menu(&mut self) {
        self.generation += 1;
        self.sim = None;
        self.level_number = 1;
        self.external = false;
        self.set_phase(GamePhase::Menu);
    }

    /// Run one frame: consume the pause request, tick once, dispatch events.
    ///
    /// Returns whether the simulation advanced.
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        input: &mut InputState,
        hooks: &mut dyn GameHooks,
    ) -> bool {
        if handle.generation != self.generation {
            if self.is_superseded(handle) {
                log::debug!("Dropping frame from generation {}", handle.generation);
            } else {
                log::warn!(
                    "Dropping frame from unknown generation {} (current {})",
                    handle.generation,
                    self.generation
                );
            }
            return false;
        }

        if input.take_pause_request() {
            match self.phase {
                GamePhase::Playing => {
                    self.pause();
                    hooks.set_game_state(GamePhase::Paused);
                    return false;
                }
                GamePhase::Paused => {
                    self.resume();
                    hooks.set_game_state(GamePhase::Playing);
                }
                _ => {}
            }
        }

        if !self.is_live(handle) {
            return false;
        }
        let Some(sim) = self.sim.as_mut() else {
            return false;
        };

        // Sampled once, before anything moves
        let snapshot = input.tick_input();
        tick(sim, &snapshot);
        let events = sim.drain_events();

        for event in events {
            match event {
                GameEvent::ScoreChanged(total) => hooks.on_score_update(total),
                GameEvent::Sound(cue) => hooks.play_sound(cue),
                GameEvent::TutorialChanged(text) => hooks.on_tutorial_changed(&text),
                GameEvent::GameOver => {
                    self.set_phase(GamePhase::GameOver);
                    hooks.on_game_over();
                }
                GameEvent::Victory => {
                    self.set_phase(GamePhase::Victory);
                    hooks.on_victory();
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EntitySpec, EntityType, Position};

    #[derive(Debug, Default)]
    struct Recorder {
        scores: Vec<u32>,
        game_overs: u32,
        victories: u32,
        states: Vec<GamePhase>,
        sounds: Vec<SoundCue>,
        hints: Vec<String>,
    }

    impl GameHooks for Recorder {
        fn on_score_update(&mut self, total: u32) {
            self.scores.push(total);
        }
        fn on_game_over(&mut self) {
            self.game_overs += 1;
        }
        fn on_victory(&mut self) {
            self.victories += 1;
        }
        fn set_game_state(&mut self, phase: GamePhase) {
            self.states.push(phase);
        }
        fn play_sound(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }
        fn on_tutorial_changed(&mut self, text: &str) {
            self.hints.push(text.to_string());
        }
    }

    fn run(session: &mut Session, input: &mut InputState, hooks: &mut Recorder, frames: u32) {
        for _ in 0..frames {
            let handle = session.frame_handle();
            session.run_frame(handle, input, hooks);
        }
    }

    #[test]
    fn test_start_flow() {
        let mut session = Session::default();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.sim().is_none());

        session.open_intro();
        assert_eq!(session.phase(), GamePhase::Intro);

        session.start().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.level_number(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level_label(), "1 - THE CASTLE GATE");
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut session = Session::default();
        session.start().unwrap();
        let old = session.frame_handle();

        session.restart();
        assert!(!session.is_live(old));
        let mut input = InputState::new();
        assert!(!session.run_frame(old, &mut input, &mut NoHooks));
        assert_eq!(session.sim().unwrap().time_ticks, 0);

        let fresh = session.frame_handle();
        assert!(session.run_frame(fresh, &mut input, &mut NoHooks));
        assert_eq!(session.sim().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_superseded_vs_unknown_handles() {
        let mut session = Session::default();
        session.start().unwrap();
        let old = session.frame_handle();
        assert!(!session.is_superseded(old));

        session.next_level().unwrap();
        assert!(session.is_superseded(old));
        let current = session.frame_handle();
        assert!(!session.is_superseded(current));

        let unknown = FrameHandle {
            generation: current.generation + 5,
        };
        assert!(!session.is_superseded(unknown));
        assert!(!session.is_live(unknown));
        assert!(!session.run_frame(unknown, &mut InputState::new(), &mut NoHooks));
        assert_eq!(session.sim().unwrap().time_ticks, 0);
    }

    #[test]
    fn test_external_level_returns_to_menu() {
        // Shares its id with the first catalogue level
        let mut level = catalog::level_1();
        level.name = "Custom Yard".to_string();
        let mut session = Session::default();
        session.play_level(level).unwrap();
        assert_eq!(session.level_label(), "1 - CUSTOM YARD");

        session.next_level().unwrap();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.sim().is_none());

        // Catalogue progression is unaffected afterwards
        session.select_level(1).unwrap();
        session.next_level().unwrap();
        assert_eq!(session.level_number(), 2);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut session = Session::default();
        session.start().unwrap();
        let mut input = InputState::new();
        let mut hooks = Recorder::default();

        input.key_down("Escape");
        run(&mut session, &mut input, &mut hooks, 5);
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(session.sim().unwrap().time_ticks, 0);
        assert_eq!(hooks.states, vec![GamePhase::Paused]);

        input.key_down("Escape");
        run(&mut session, &mut input, &mut hooks, 1);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.sim().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_game_over_dispatched_once() {
        let mut session = Session::default();
        session.start().unwrap();
        let mut input = InputState::new();
        let mut hooks = Recorder::default();

        input.key_down("ArrowRight");
        run(&mut session, &mut input, &mut hooks, 400);

        assert_eq!(hooks.game_overs, 1);
        assert_eq!(hooks.victories, 0);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(hooks.sounds.last(), Some(&SoundCue::Damage));
        assert_eq!(
            hooks.hints.first().map(String::as_str),
            Some("Welcome! Use Arrow Keys to MOVE.")
        );

        // Frozen until restarted
        let handle = session.frame_handle();
        assert!(!session.run_frame(handle, &mut input, &mut hooks));

        session.restart();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.score(), 0);
        assert!(!session.sim().unwrap().ending);
    }

    #[test]
    fn test_score_updates_reach_hooks() {
        let level = LevelData {
            id: 1,
            name: "Coin Hop".to_string(),
            description: String::new(),
            width: 800.0,
            height: 600.0,
            entities: vec![
                EntitySpec::new("floor", EntityType::Platform, 0.0, 540.0, 800.0, 60.0),
                EntitySpec::new("coin", EntityType::Collectible, 330.0, 400.0, 20.0, 20.0),
            ],
            start_pos: Position::new(310.0, 460.0),
            tutorial_zones: Vec::new(),
            floor_y: None,
        };
        let mut session = Session::default();
        session.play_level(level).unwrap();
        let mut input = InputState::new();
        let mut hooks = Recorder::default();

        input.key_down("Space");
        run(&mut session, &mut input, &mut hooks, 100);
        assert_eq!(hooks.scores, vec![10]);
        assert_eq!(session.score(), 10);
        assert!(hooks.sounds.contains(&SoundCue::Jump));
        assert!(hooks.sounds.contains(&SoundCue::Coin));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut level = catalog::level_1();
        level.width = 0.0;
        let mut session = Session::default();
        assert!(session.play_level(level).is_err());
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.sim().is_none());
    }

    #[test]
    fn test_level_progression() {
        let mut session = Session::default();
        session.open_level_select();
        assert_eq!(session.phase(), GamePhase::LevelSelect);

        assert!(matches!(
            session.select_level(7),
            Err(LevelError::UnknownLevel(7))
        ));
        assert_eq!(session.phase(), GamePhase::LevelSelect);

        session.select_level(2).unwrap();
        assert_eq!(session.level_label(), "2 - INSIDE THE CASTLE");

        session.next_level().unwrap();
        assert_eq!(session.level_number(), 3);
        assert_eq!(session.phase(), GamePhase::Playing);

        session.next_level().unwrap();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.sim().is_none());
    }

    #[test]
    fn test_victory_on_open_goal() {
        let mut session = Session::default();
        session.select_level(3).unwrap();
        let exit = session.sim().unwrap().find("lair-exit").unwrap().rect;
        if let Some(sim) = session.sim_mut() {
            sim.player.rect.pos = exit.pos;
        }
        let mut hooks = Recorder::default();
        run(&mut session, &mut InputState::new(), &mut hooks, 3);
        assert_eq!(hooks.victories, 1);
        assert_eq!(session.phase(), GamePhase::Victory);
        assert!(hooks.sounds.contains(&SoundCue::Victory));
    }

    #[test]
    fn test_back_to_menu_invalidates_handles() {
        let mut session = Session::default();
        session.start().unwrap();
        let handle = session.frame_handle();
        session.back_to_menu();
        assert!(!session.run_frame(handle, &mut InputState::new(), &mut NoHooks));
        assert_eq!(session.phase(), GamePhase::Menu);
    }
}
