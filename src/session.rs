//! Application loop: fixed timestep, match lifecycle and auto-reset
//!
//! A `Session` owns the current `GameState`, the input normalizer and the
//! audio director. The host calls `frame` once per rendered frame with the
//! wall-clock delta; the session runs as many 60 Hz steps as have accumulated.

use crate::audio::{AudioDirector, AudioSink};
use crate::consts::*;
use crate::input::InputNormalizer;
use crate::settings::Settings;
use crate::sim::{GameConfig, GameState, GameStatus, advance};

pub struct Session {
    state: GameState,
    input: InputNormalizer,
    director: AudioDirector,
    /// Config of the last started match, reused on reset
    config: GameConfig,
    fixed_seed: Option<u64>,
    matches_started: u64,
    accumulator: f32,
    /// Seconds spent on the result screen
    result_timer: f32,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        let config = settings.game_config();
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self {
            state: GameState::new(config, seed),
            input: InputNormalizer::new(),
            director: AudioDirector::new(settings),
            config,
            fixed_seed: settings.seed,
            matches_started: 0,
            accumulator: 0.0,
            result_timer: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Event sink for keyboard and control-surface input
    pub fn input_mut(&mut self) -> &mut InputNormalizer {
        &mut self.input
    }

    pub fn matches_started(&self) -> u64 {
        self.matches_started
    }

    /// A fixed seed still gives every match its own world
    fn next_seed(&self) -> u64 {
        match self.fixed_seed {
            Some(seed) => seed.wrapping_add(self.matches_started),
            None => rand::random(),
        }
    }

    /// Generate a fresh world and start playing it
    pub fn start(&mut self, config: GameConfig) {
        self.config = config.clamped();
        let seed = self.next_seed();
        self.state = GameState::new_match(self.config, seed);
        self.matches_started += 1;
        self.accumulator = 0.0;
        self.result_timer = 0.0;
    }

    /// Run simulation steps for `frame_dt` seconds of wall-clock time.
    /// Returns the number of steps taken.
    pub fn frame(&mut self, frame_dt: f32, sink: &mut dyn AudioSink) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.sample();
            let next = advance(&self.state, &input);
            self.director.observe(&self.state, &next, sink);
            self.state = next;
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.update_result_screen(sink);
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        substeps
    }

    /// After a finished match, return to a fresh menu world
    fn update_result_screen(&mut self, sink: &mut dyn AudioSink) {
        if !self.state.status.is_finished() {
            self.result_timer = 0.0;
            return;
        }

        self.result_timer += SIM_DT;
        if self.result_timer >= RESULT_SCREEN_SECONDS {
            log::info!("Result screen over, back to menu");
            let seed = self.next_seed();
            self.state = GameState::new(self.config, seed);
            self.result_timer = 0.0;
            self.director.sync_music(GameStatus::Menu, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, LogSink, MusicTrack};
    use crate::input::Key;

    fn session() -> Session {
        let settings = Settings {
            seed: Some(17),
            ..Default::default()
        };
        Session::new(&settings)
    }

    #[test]
    fn test_starts_in_menu() {
        let s = session();
        assert_eq!(s.state().status, GameStatus::Menu);
        assert_eq!(s.config(), GameConfig::default());
        assert_eq!(s.matches_started(), 0);
    }

    #[test]
    fn test_accumulator() {
        let mut s = session();
        let mut sink = LogSink::default();
        s.start(GameConfig::default());

        assert_eq!(s.frame(SIM_DT / 2.0, &mut sink), 0);
        assert_eq!(s.frame(SIM_DT / 2.0, &mut sink), 1);
        assert_eq!(s.state().time_ticks, 1);

        // Long hitches are clamped and capped
        assert_eq!(s.frame(5.0, &mut sink), MAX_SUBSTEPS);
        assert_eq!(s.state().time_ticks, 1 + MAX_SUBSTEPS as u64);
        assert_eq!(s.frame(-1.0, &mut sink), 0);
    }

    #[test]
    fn test_start_clamps_config() {
        let mut s = session();
        s.start(GameConfig {
            wall_count: 99,
            dog_count: 0,
            old_man_count: 1,
            game_duration: 10.0,
        });
        assert_eq!(s.state().status, GameStatus::Playing);
        assert_eq!(s.config().wall_count, 10);
        assert_eq!(s.state().time_left, 30.0);
        assert_eq!(s.matches_started(), 1);
    }

    #[test]
    fn test_fixed_seed_gives_new_world_per_match() {
        let mut s = session();
        s.start(GameConfig::default());
        let first = s.state().walls.clone();
        s.start(GameConfig::default());
        assert_ne!(s.state().walls, first);

        let mut again = session();
        again.start(GameConfig::default());
        assert_eq!(again.state().walls, first);
    }

    #[test]
    fn test_keyboard_moves_player() {
        let mut s = session();
        let mut sink = LogSink::default();
        s.start(GameConfig::default());
        let start = s.state().player.pos;

        s.input_mut().key_down(Key::ArrowLeft, false);
        s.frame(SIM_DT, &mut sink);
        assert_eq!(s.state().player.pos.x, start.x - PLAYER_SPEED);
        assert_eq!(sink.track, Some(MusicTrack::Game));
    }

    #[test]
    fn test_cancel_key_returns_to_menu() {
        let mut s = session();
        let mut sink = LogSink::default();
        s.start(GameConfig::default());
        s.input_mut().key_down(Key::KeyA, false);
        s.frame(SIM_DT, &mut sink);
        assert_eq!(s.state().status, GameStatus::Menu);
    }

    #[test]
    fn test_result_screen_resets_to_menu() {
        let mut s = session();
        let mut sink = LogSink::default();
        s.start(GameConfig::default());
        s.state.status = GameStatus::Victory;

        for _ in 0..290 {
            s.frame(SIM_DT, &mut sink);
        }
        assert_eq!(s.state().status, GameStatus::Victory);

        for _ in 0..20 {
            s.frame(SIM_DT, &mut sink);
        }
        assert_eq!(s.state().status, GameStatus::Menu);
        assert_eq!(s.state().time_ticks, 0);
        assert_eq!(s.state().config, s.config());
        assert_eq!(sink.track, Some(MusicTrack::Intro));
    }

    #[test]
    fn test_timeout_plays_game_over() {
        let mut s = session();
        let mut sink = LogSink::default();
        s.start(GameConfig::default());
        s.state.time_left = SIM_DT / 2.0;
        s.frame(SIM_DT, &mut sink);
        assert_eq!(s.state().status, GameStatus::GameOver);
        assert!(sink.cues.contains(&AudioCue::GameOver));
        assert_eq!(sink.track, Some(MusicTrack::Lose));
    }
}
