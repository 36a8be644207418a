//! World generation
//!
//! Places walls and enemies with bounded random retry. Running out of
//! attempts leaves the world short of entities rather than failing; the
//! shortfall is reported in a [`SpawnReport`] and logged.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::behavior::behavior_for;
use super::collision::Rect;
use super::state::{Enemy, EnemyKind, GameConfig, GameState, GameStatus, Player, Wall};
use crate::consts::*;

/// Placement attempts per wall
pub const WALL_ATTEMPTS: u32 = 200;
/// Placement attempts per enemy
pub const ENEMY_ATTEMPTS: u32 = 500;
/// Minimum gap between two walls
pub const WALL_SPACING: f32 = 150.0;
/// Minimum center distance between two enemies
pub const ENEMY_SPACING: f32 = 100.0;
/// Clearance kept between an enemy box and any wall at spawn
pub const ENEMY_WALL_CLEARANCE: f32 = 20.0;

/// Walls never spawn over the HUD corner (bottom right)
const UI_SAFE_ZONE: Rect = Rect::new(ARENA_WIDTH - 500.0, ARENA_HEIGHT - 300.0, 450.0, 250.0);

/// How many entities were asked for versus actually placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub walls_requested: u32,
    pub walls_placed: u32,
    pub dogs_requested: u32,
    pub dogs_placed: u32,
    pub old_men_requested: u32,
    pub old_men_placed: u32,
}

impl SpawnReport {
    pub fn is_complete(&self) -> bool {
        self.walls_placed == self.walls_requested
            && self.dogs_placed == self.dogs_requested
            && self.old_men_placed == self.old_men_requested
    }
}

impl GameState {
    /// Generate a fresh world in `Menu` status
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::generate(config, seed).0
    }

    /// Generate a fresh world and start playing immediately
    pub fn new_match(config: GameConfig, seed: u64) -> Self {
        let mut state = Self::new(config, seed);
        state.status = GameStatus::Playing;
        log::info!(
            "Match started: {} walls, {} enemies, {}s (seed {})",
            state.walls.len(),
            state.enemies.len(),
            config.game_duration,
            seed
        );
        state
    }

    /// Generate a fresh world and report how well placement went
    pub fn generate(config: GameConfig, seed: u64) -> (Self, SpawnReport) {
        let mut state = Self {
            seed,
            status: GameStatus::Menu,
            config,
            time_left: config.game_duration,
            time_ticks: 0,
            player: Player::default(),
            walls: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            screen_shake: 0.0,
            audio_events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        let mut report = SpawnReport {
            walls_requested: config.wall_count,
            dogs_requested: config.dog_count,
            old_men_requested: config.old_man_count,
            ..Default::default()
        };

        for _ in 0..config.wall_count {
            if state.place_wall() {
                report.walls_placed += 1;
            }
        }
        for _ in 0..config.dog_count {
            if state.place_enemy(EnemyKind::Dog) {
                report.dogs_placed += 1;
            }
        }
        for _ in 0..config.old_man_count {
            if state.place_enemy(EnemyKind::OldMan) {
                report.old_men_placed += 1;
            }
        }

        if !report.is_complete() {
            log::warn!(
                "World under-populated after retries: walls {}/{}, dogs {}/{}, old men {}/{}",
                report.walls_placed,
                report.walls_requested,
                report.dogs_placed,
                report.dogs_requested,
                report.old_men_placed,
                report.old_men_requested
            );
        }

        (state, report)
    }

    fn place_wall(&mut self) -> bool {
        let spawn_zone = Rect::centered(Vec2::new(PLAYER_START_X, PLAYER_START_Y), 120.0, 120.0);

        for _ in 0..WALL_ATTEMPTS {
            let (w, h) = if self.rng.random::<f32>() > 0.5 {
                (WALL_LENGTH, WALL_THICKNESS)
            } else {
                (WALL_THICKNESS, WALL_LENGTH)
            };
            let x = self.rng.random::<f32>() * (ARENA_WIDTH - w - 100.0) + 50.0;
            let y = self.rng.random::<f32>() * (ARENA_HEIGHT - h - 100.0) + 50.0;
            let rect = Rect::new(x, y, w, h);

            if rect.inflate(20.0).intersects(&spawn_zone) || rect.intersects(&UI_SAFE_ZONE) {
                continue;
            }
            let spaced = rect.inflate(WALL_SPACING);
            if self.walls.iter().any(|wall| spaced.intersects(&wall.rect)) {
                continue;
            }

            let id = self.next_entity_id();
            self.walls.push(Wall::new(id, rect));
            return true;
        }
        false
    }

    fn place_enemy(&mut self, kind: EnemyKind) -> bool {
        let behavior = behavior_for(kind);
        let size = behavior.size();
        let player_start = Vec2::new(PLAYER_START_X, PLAYER_START_Y);

        for _ in 0..ENEMY_ATTEMPTS {
            let pos = Vec2::new(
                self.rng.random::<f32>() * (ARENA_WIDTH - 200.0) + 100.0,
                self.rng.random::<f32>() * (ARENA_HEIGHT - 200.0) + 50.0,
            );

            if pos.distance(player_start) < behavior.spawn_distance() {
                continue;
            }
            let footprint = Rect::centered(pos, size, size).inflate(ENEMY_WALL_CLEARANCE);
            if self.walls.iter().any(|wall| footprint.intersects(&wall.rect)) {
                continue;
            }
            if self.enemies.iter().any(|other| pos.distance(other.pos) < ENEMY_SPACING) {
                continue;
            }

            let velocity = behavior.initial_velocity(&mut self.rng);
            let id = self.next_entity_id();
            self.enemies.push(Enemy::new(id, kind, pos, size, velocity));
            return true;
        }
        false
    }
}

/// Fresh `Menu` world seeded from the process RNG
pub fn create_initial_state(config: GameConfig) -> GameState {
    GameState::new(config, rand::random())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyMode;
    use crate::sim::collision::circle_intersects_rect;

    fn config(walls: u32, dogs: u32, old_men: u32) -> GameConfig {
        GameConfig {
            wall_count: walls,
            dog_count: dogs,
            old_man_count: old_men,
            game_duration: 120.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new(config(5, 1, 1), 42);
        assert_eq!(state.status, GameStatus::Menu);
        assert_eq!(state.time_left, 120.0);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert!(state.player.can_teleport);
        assert_eq!(state.player.boost_time_left, PLAYER_MAX_BOOST_TIME);
        assert!(state.particles.is_empty());
        assert!(state.audio_events.is_empty());
        assert!(state.walls.iter().all(|w| !w.is_tagged && w.tag_progress == 0.0));
    }

    #[test]
    fn test_walls_respect_constraints() {
        for seed in 0..20 {
            let (state, report) = GameState::generate(config(10, 0, 0), seed);
            assert_eq!(report.walls_placed as usize, state.walls.len());
            assert!(state.walls.len() <= 10);

            let spawn_zone =
                Rect::centered(Vec2::new(PLAYER_START_X, PLAYER_START_Y), 120.0, 120.0);
            for (i, wall) in state.walls.iter().enumerate() {
                let r = wall.rect;
                assert!(r.x >= 50.0 && r.right() <= ARENA_WIDTH - 50.0);
                assert!(r.y >= 50.0 && r.bottom() <= ARENA_HEIGHT - 50.0);
                assert!((r.w, r.h) == (250.0, 40.0) || (r.w, r.h) == (40.0, 250.0));
                assert!(!r.intersects(&UI_SAFE_ZONE));
                assert!(!r.inflate(20.0).intersects(&spawn_zone));
                // Player never starts inside a wall
                assert!(!circle_intersects_rect(state.player.pos, PLAYER_RADIUS, &r));
                for other in &state.walls[i + 1..] {
                    assert!(!r.inflate(WALL_SPACING).intersects(&other.rect));
                }
            }
        }
    }

    #[test]
    fn test_enemies_respect_constraints() {
        for seed in 0..20 {
            let state = GameState::new(config(5, 2, 4), seed);
            let start = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
            for (i, enemy) in state.enemies.iter().enumerate() {
                let min_dist = match enemy.kind {
                    EnemyKind::Dog => 400.0,
                    EnemyKind::OldMan => 200.0,
                };
                assert!(enemy.pos.distance(start) >= min_dist);
                let footprint = enemy.rect().inflate(ENEMY_WALL_CLEARANCE);
                assert!(state.walls.iter().all(|w| !footprint.intersects(&w.rect)));
                for other in &state.enemies[i + 1..] {
                    assert!(enemy.pos.distance(other.pos) >= ENEMY_SPACING);
                }
                assert_eq!(enemy.mode, EnemyMode::Chasing);
                assert!(!enemy.is_manual);
            }
        }
    }

    #[test]
    fn test_enemy_initial_motion() {
        let state = GameState::new(config(3, 2, 3), 9);
        for enemy in &state.enemies {
            match enemy.kind {
                EnemyKind::Dog => {
                    assert_eq!(enemy.velocity, Vec2::ZERO);
                    assert_eq!(enemy.size, Vec2::splat(DOG_SIZE));
                }
                EnemyKind::OldMan => {
                    assert!((enemy.velocity.length() - OLD_MAN_SPEED).abs() < 1e-4);
                    assert_eq!(enemy.size, Vec2::splat(OLD_MAN_SIZE));
                }
            }
        }
    }

    #[test]
    fn test_overcrowded_world_degrades_gracefully() {
        // Far more walls than fit with 150 units of spacing
        let (state, report) = GameState::generate(config(60, 0, 0), 5);
        assert!(!report.is_complete());
        assert!(state.walls.len() < 60);
        assert_eq!(report.walls_placed as usize, state.walls.len());
        assert_eq!(report.walls_requested, 60);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(GameConfig::default(), 1234);
        let b = GameState::new(GameConfig::default(), 1234);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.enemies, b.enemies);

        let c = GameState::new(GameConfig::default(), 4321);
        assert_ne!(a.walls, c.walls);
    }

    #[test]
    fn test_new_match_is_playing() {
        let state = GameState::new_match(GameConfig::default(), 1);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(create_initial_state(GameConfig::default()).status, GameStatus::Menu);
    }
}
