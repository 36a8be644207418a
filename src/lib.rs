//! Le Tchipeur - a wall-tagging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, movement, enemies, scoring)
//! - `input`: Keyboard + relative-encoder input normalization
//! - `audio`: Audio cue interface consumed by playback backends
//! - `session`: Frame loop, match lifecycle and auto-reset
//! - `autopilot`: Keyboard-driven demo player
//! - `settings`: Match configuration and preferences

pub mod audio;
pub mod autopilot;
pub mod input;
pub mod session;
pub mod settings;
pub mod sim;

pub use input::{InputNormalizer, InputState};
pub use session::Session;
pub use settings::Settings;
pub use sim::{GameConfig, GameState, GameStatus, advance};

/// Game configuration constants
pub mod consts {
    /// Simulation timestep (one rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (HD reference resolution)
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;
    /// Distance kept between any entity and the arena edge
    pub const ARENA_MARGIN: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 7.0;
    pub const PLAYER_BOOST_SPEED: f32 = 11.0;
    pub const PLAYER_RADIUS: f32 = 35.0;
    /// Boost reserve in seconds
    pub const PLAYER_MAX_BOOST_TIME: f32 = 10.0;
    /// Spawn point, bottom center
    pub const PLAYER_START_X: f32 = ARENA_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = ARENA_HEIGHT - 100.0;
    /// Frames of stun after enemy contact
    pub const STUN_FRAMES: u32 = 120;
    /// Dog contacts that end the match
    pub const MAX_DOG_HITS: u32 = 3;

    /// Enemy speeds (units per frame)
    pub const DOG_SPEED: f32 = 1.6;
    pub const DOG_SPRINT_SPEED: f32 = 4.5;
    pub const DOG_BOOST_SPEED: f32 = 6.0;
    pub const OLD_MAN_SPEED: f32 = 1.8;
    /// Manual control speed multiplier over autonomous base speed
    pub const MANUAL_SPEED_FACTOR: f32 = 1.5;
    /// Enemy sizes (square boxes)
    pub const DOG_SIZE: f32 = 60.0;
    pub const OLD_MAN_SIZE: f32 = 80.0;
    /// Frames spent barking/yelling after a hit
    pub const POST_HIT_COOLDOWN: u32 = 120;
    /// Frames of a dog sprint burst
    pub const SPRINT_FRAMES: u32 = 120;

    /// Tagging
    pub const TAG_TIME_REQUIRED: f32 = 100.0;
    pub const TAG_INCREMENT: f32 = 4.0;
    pub const TAG_REACH: f32 = PLAYER_RADIUS + 25.0;
    pub const TAG_MARGIN: f32 = 10.0;

    /// Wall dimensions (long side x short side)
    pub const WALL_LENGTH: f32 = 250.0;
    pub const WALL_THICKNESS: f32 = 40.0;

    /// Default match length in seconds
    pub const GAME_DURATION: f32 = 180.0;
    /// Seconds the victory/game-over screen stays up before returning to menu
    pub const RESULT_SCREEN_SECONDS: f32 = 5.0;
}
