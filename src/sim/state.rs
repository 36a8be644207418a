//! Game state and core simulation types
//!
//! `GameState` is the aggregate root: the simulation step is its only writer.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Match status state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Configuration menu, world generated but idle
    Menu,
    /// Active gameplay
    Playing,
    /// All walls tagged
    Victory,
    /// Time ran out or too many dog bites
    GameOver,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::GameOver)
    }
}

/// Per-match parameters, chosen before start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub wall_count: u32,
    pub dog_count: u32,
    pub old_man_count: u32,
    /// Match length in seconds
    pub game_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wall_count: 5,
            dog_count: 1,
            old_man_count: 1,
            game_duration: GAME_DURATION,
        }
    }
}

impl GameConfig {
    /// Apply the menu bounds. The simulation itself trusts whatever it is given.
    pub fn clamped(&self) -> Self {
        Self {
            wall_count: self.wall_count.clamp(1, 10),
            dog_count: self.dog_count.min(2),
            old_man_count: self.old_man_count.clamp(1, 10),
            game_duration: self.game_duration.clamp(30.0, 300.0),
        }
    }
}

/// One-frame signals for the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioEvent {
    /// Player sprayed a wall
    Spray,
    /// A wall reached full tag progress
    WallDone,
    /// A dog bit the player
    HitDog,
    /// An old man bumped into the player
    HitOldMan,
    /// One of the last ten seconds ticked away
    Countdown,
}

/// A taggable wall (axis-aligned, never destroyed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub rect: Rect,
    pub is_tagged: bool,
    /// 0 to `TAG_TIME_REQUIRED`
    pub tag_progress: f32,
    /// Match tick at which the wall was completed
    pub completed_tick: Option<u64>,
}

impl Wall {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self {
            id,
            rect,
            is_tagged: false,
            tag_progress: 0.0,
            completed_tick: None,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.rect.w > self.rect.h
    }

    /// Distance from `pos` to the wall's facing edge, if the point is within
    /// tagging reach. The point must sit alongside the wall's long axis
    /// (with `TAG_MARGIN` of slack at each end).
    pub fn reach_distance(&self, pos: Vec2) -> Option<f32> {
        let r = &self.rect;
        let (along, along_min, along_max, across, center, half_thickness) =
            if self.is_horizontal() {
                (pos.x, r.x, r.right(), pos.y, r.y + r.h / 2.0, r.h / 2.0)
            } else {
                (pos.y, r.y, r.bottom(), pos.x, r.x + r.w / 2.0, r.w / 2.0)
            };

        if along <= along_min - TAG_MARGIN || along >= along_max + TAG_MARGIN {
            return None;
        }
        let dist = (across - center).abs() - half_thickness;
        (dist < TAG_REACH).then_some(dist)
    }

    /// Add one spray of progress. Returns true on the spray that completes
    /// the wall; a tagged wall never changes again.
    pub fn spray(&mut self, tick: u64) -> bool {
        if self.is_tagged {
            return false;
        }
        self.tag_progress = (self.tag_progress + TAG_INCREMENT).min(TAG_TIME_REQUIRED);
        if self.tag_progress >= TAG_TIME_REQUIRED {
            self.is_tagged = true;
            self.completed_tick = Some(tick);
            return true;
        }
        false
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Hunts the player, three bites lose the match
    Dog,
    /// Wanders, stuns on contact
    OldMan,
}

/// Enemy behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyMode {
    Idle,
    #[default]
    Chasing,
    /// Dog post-hit freeze
    Barking,
    /// Old man post-hit state
    Yelling,
    Cleaning,
}

/// An enemy entity (square box centered on `pos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub mode: EnemyMode,
    /// Frames left in `Barking`/`Yelling`
    pub cooldown: u32,
    /// Frames left in a dog sprint burst
    pub sprint_timer: u32,
    /// Driven by an external operator (sticky for the match)
    pub is_manual: bool,
    pub is_boosting: bool,
    /// Last unit direction requested by the operator
    pub last_move_dir: Vec2,
    /// Dog speed jitter, re-rolled every `random_speed_timer` frames
    pub random_speed_factor: f32,
    pub random_speed_timer: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, size: f32, velocity: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(size),
            velocity,
            mode: EnemyMode::Chasing,
            cooldown: 0,
            sprint_timer: 0,
            is_manual: false,
            is_boosting: false,
            last_move_dir: Vec2::X,
            random_speed_factor: 1.0,
            random_speed_timer: 0.0,
        }
    }

    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size.x, self.size.y)
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    pub is_boosting: bool,
    /// One-shot teleport, spent on first use
    pub can_teleport: bool,
    pub tags_completed: u32,
    /// Frames left during which tagging is blocked
    pub stun_timer: u32,
    /// Boost reserve in seconds
    pub boost_time_left: f32,
    pub dog_hits: u32,
    pub last_hit_tick: Option<u64>,
    /// Last non-zero unit direction, reused for cruise boosting
    pub last_move_dir: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            radius: PLAYER_RADIUS,
            velocity: Vec2::ZERO,
            is_boosting: false,
            can_teleport: true,
            tags_completed: 0,
            stun_timer: 0,
            boost_time_left: PLAYER_MAX_BOOST_TIME,
            dog_hits: 0,
            last_hit_tick: None,
            last_move_dir: Vec2::ZERO,
        }
    }
}

impl Player {
    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0
    }
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Maximum live particles
pub const MAX_PARTICLES: usize = 512;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the world and RNG stream were created from
    pub seed: u64,
    pub status: GameStatus,
    pub config: GameConfig,
    /// Seconds remaining
    pub time_left: f32,
    /// Frames simulated while playing
    pub time_ticks: u64,
    pub player: Player,
    pub walls: Vec<Wall>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub screen_shake: f32,
    /// Events emitted by the last step only
    pub audio_events: Vec<AudioEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) next_id: u32,
}

impl GameState {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn untagged_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| !w.is_tagged)
    }

    /// Push a particle unless the pool is full
    pub(crate) fn spawn_particle(&mut self, pos: Vec2, vel: Vec2, life: u32, color: u32) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(Particle {
                pos,
                vel,
                life,
                color,
            });
        }
    }

    /// Burst of `count` particles around `pos`
    pub(crate) fn spawn_burst(
        &mut self,
        pos: Vec2,
        count: usize,
        jitter: f32,
        speed: f32,
        life: u32,
        color: u32,
    ) {
        for _ in 0..count {
            let offset = Vec2::new(self.rng.random::<f32>() - 0.5, self.rng.random::<f32>() - 0.5);
            let vel = Vec2::new(self.rng.random::<f32>() - 0.5, self.rng.random::<f32>() - 0.5);
            self.spawn_particle(pos + offset * jitter, vel * speed, life, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_orientation_and_reach() {
        let horizontal = Wall::new(1, Rect::new(800.0, 700.0, 250.0, 40.0));
        assert!(horizontal.is_horizontal());
        // Above the wall, 40 units from the top edge
        assert_eq!(horizontal.reach_distance(Vec2::new(900.0, 660.0)), Some(40.0));
        // Too far away
        assert_eq!(horizontal.reach_distance(Vec2::new(900.0, 600.0)), None);
        // Past the end, beyond the margin
        assert_eq!(horizontal.reach_distance(Vec2::new(1065.0, 660.0)), None);
        // Past the end but inside the margin
        assert!(horizontal.reach_distance(Vec2::new(1055.0, 660.0)).is_some());

        let vertical = Wall::new(2, Rect::new(300.0, 200.0, 40.0, 250.0));
        assert!(!vertical.is_horizontal());
        assert_eq!(vertical.reach_distance(Vec2::new(360.0, 300.0)), Some(20.0));
        assert_eq!(vertical.reach_distance(Vec2::new(360.0, 100.0)), None);
    }

    #[test]
    fn test_wall_spray_completes_once() {
        let mut wall = Wall::new(1, Rect::new(0.0, 0.0, 250.0, 40.0));
        for _ in 0..24 {
            assert!(!wall.spray(7));
        }
        assert_eq!(wall.tag_progress, 96.0);
        assert!(wall.spray(9));
        assert!(wall.is_tagged);
        assert_eq!(wall.completed_tick, Some(9));

        // Further sprays are ignored
        assert!(!wall.spray(20));
        assert_eq!(wall.tag_progress, TAG_TIME_REQUIRED);
        assert_eq!(wall.completed_tick, Some(9));
    }

    #[test]
    fn test_config_clamped() {
        let wild = GameConfig {
            wall_count: 40,
            dog_count: 9,
            old_man_count: 0,
            game_duration: 5.0,
        };
        assert_eq!(
            wild.clamped(),
            GameConfig {
                wall_count: 10,
                dog_count: 2,
                old_man_count: 1,
                game_duration: 30.0,
            }
        );
        assert_eq!(GameConfig::default().clamped(), GameConfig::default());
    }

    #[test]
    fn test_status_finished() {
        assert!(GameStatus::Victory.is_finished());
        assert!(GameStatus::GameOver.is_finished());
        assert!(!GameStatus::Playing.is_finished());
        assert!(!GameStatus::Menu.is_finished());
    }
}
