//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (stored in `GameState`)
//! - Stable iteration order (walls and enemies in spawn order)
//! - No audio, rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod mover;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use behavior::{DogBehavior, EnemyBehavior, OldManBehavior, SteerContext, behavior_for};
pub use collision::{Rect, circle_intersects_rect, rect_intersects_rect};
pub use mover::{MoveResult, Shape, move_entity};
pub use state::{
    AudioEvent, Enemy, EnemyKind, EnemyMode, GameConfig, GameState, GameStatus, MAX_PARTICLES,
    Particle, Player, Wall,
};
pub use tick::{advance, advance_with_dt};
pub use worldgen::{SpawnReport, create_initial_state};
