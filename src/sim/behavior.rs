//! Per-type enemy behavior
//!
//! Each enemy type gets one strategy object describing how it reads its
//! remote channel, steers on its own, and reacts to contact with the player.
//! The simulation step drives them all through [`EnemyBehavior`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AudioEvent, Enemy, EnemyKind, EnemyMode, Player, Wall};
use crate::consts::*;
use crate::input::ActorInput;

/// Chance per frame that an idle dog starts sprinting
const SPRINT_CHANCE: f32 = 0.005;
/// Dogs stop steering this close to the player
const DOG_ARRIVE_DISTANCE: f32 = 10.0;
/// Wall gap under which a dog is pushed away from the wall
const DOG_WALL_AVOID_DISTANCE: f32 = 40.0;
const DOG_WALL_AVOID_STRENGTH: f32 = 1.5;

/// Old man random walk
const OLD_MAN_JITTER: f32 = 0.8;
const OLD_MAN_ATTRACTION: f32 = 0.15;
const OLD_MAN_RETARGET_CHANCE: f32 = 0.02;
/// Slack past the clamp line within which old men turn back from an edge
const OLD_MAN_EDGE_SLACK: f32 = 1.0;

/// What autonomous steering can see
pub struct SteerContext<'a> {
    pub player_pos: Vec2,
    pub walls: &'a [Wall],
}

pub trait EnemyBehavior: Sync {
    fn kind(&self) -> EnemyKind;

    /// Autonomous speed (units per frame)
    fn base_speed(&self) -> f32;

    /// Side of the square bounding box
    fn size(&self) -> f32;

    /// Minimum spawn distance from the player start
    fn spawn_distance(&self) -> f32;

    /// State entered after hitting the player while chasing
    fn hit_mode(&self) -> EnemyMode;

    fn hit_event(&self) -> AudioEvent;

    fn initial_velocity(&self, rng: &mut Pcg32) -> Vec2;

    /// Read the remote channel. Any signal latches manual control for good.
    fn observe_control(&self, enemy: &mut Enemy, control: &ActorInput);

    /// Per-frame timers that run in both manual and autonomous mode
    fn update_timers(&self, _enemy: &mut Enemy, _rng: &mut Pcg32) {}

    /// Displacement while an operator is in control
    fn manual_velocity(&self, _enemy: &Enemy, control: &ActorInput) -> Vec2 {
        control.axis() * self.base_speed() * MANUAL_SPEED_FACTOR
    }

    /// Displacement while the AI is in control
    fn autonomous_velocity(
        &self,
        enemy: &mut Enemy,
        ctx: &SteerContext,
        rng: &mut Pcg32,
    ) -> Vec2;

    /// Called after the swept move
    fn after_move(&self, _enemy: &mut Enemy, _hit_wall: bool) {}

    /// Apply contact consequences to the player. Returns true if the
    /// contact ends the match.
    fn on_contact(&self, _player: &mut Player, _tick: u64) -> bool {
        false
    }
}

pub struct DogBehavior;
pub struct OldManBehavior;

pub fn behavior_for(kind: EnemyKind) -> &'static dyn EnemyBehavior {
    match kind {
        EnemyKind::Dog => &DogBehavior,
        EnemyKind::OldMan => &OldManBehavior,
    }
}

impl EnemyBehavior for DogBehavior {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Dog
    }

    fn base_speed(&self) -> f32 {
        DOG_SPEED
    }

    fn size(&self) -> f32 {
        DOG_SIZE
    }

    fn spawn_distance(&self) -> f32 {
        400.0
    }

    fn hit_mode(&self) -> EnemyMode {
        EnemyMode::Barking
    }

    fn hit_event(&self) -> AudioEvent {
        AudioEvent::HitDog
    }

    fn initial_velocity(&self, _rng: &mut Pcg32) -> Vec2 {
        Vec2::ZERO
    }

    fn observe_control(&self, enemy: &mut Enemy, control: &ActorInput) {
        if control.has_axis_signal() {
            enemy.is_manual = true;
            enemy.last_move_dir = control.axis().normalize();
        }
        if control.boost {
            enemy.is_manual = true;
        }
        enemy.is_boosting = control.boost;
    }

    fn update_timers(&self, enemy: &mut Enemy, rng: &mut Pcg32) {
        enemy.random_speed_timer -= 1.0;
        if enemy.random_speed_timer <= 0.0 {
            enemy.random_speed_factor = 0.8 + rng.random::<f32>() * 1.4;
            enemy.random_speed_timer = 20.0 + rng.random::<f32>() * 40.0;
        }
    }

    fn manual_velocity(&self, enemy: &Enemy, control: &ActorInput) -> Vec2 {
        if enemy.is_boosting {
            // Boosting keeps the last latched heading
            enemy.last_move_dir * DOG_BOOST_SPEED
        } else {
            control.axis() * DOG_SPEED * MANUAL_SPEED_FACTOR * enemy.random_speed_factor
        }
    }

    fn autonomous_velocity(
        &self,
        enemy: &mut Enemy,
        ctx: &SteerContext,
        rng: &mut Pcg32,
    ) -> Vec2 {
        if enemy.mode != EnemyMode::Chasing {
            return Vec2::ZERO;
        }

        let speed = if enemy.sprint_timer > 0 {
            enemy.sprint_timer -= 1;
            DOG_SPRINT_SPEED
        } else {
            if rng.random::<f32>() < SPRINT_CHANCE {
                enemy.sprint_timer = SPRINT_FRAMES;
            }
            DOG_SPEED
        };

        let to_player = ctx.player_pos - enemy.pos;
        let distance = to_player.length();
        if distance <= DOG_ARRIVE_DISTANCE {
            return Vec2::ZERO;
        }

        let heading = to_player / distance + wall_repulsion(enemy, ctx.walls);
        let vel = heading.normalize_or_zero() * speed;
        enemy.velocity = vel;
        vel
    }

    fn on_contact(&self, player: &mut Player, tick: u64) -> bool {
        player.dog_hits += 1;
        player.last_hit_tick = Some(tick);
        player.dog_hits >= MAX_DOG_HITS
    }
}

/// Sum of unit pushes away from every wall the dog is close to
fn wall_repulsion(enemy: &Enemy, walls: &[Wall]) -> Vec2 {
    let half = enemy.half_size();
    walls
        .iter()
        .filter_map(|wall| {
            let center = wall.rect.center();
            let gap_x = (enemy.pos.x - center.x).abs() - (wall.rect.w / 2.0 + half.x);
            let gap_y = (enemy.pos.y - center.y).abs() - (wall.rect.h / 2.0 + half.y);
            if gap_x < DOG_WALL_AVOID_DISTANCE && gap_y < DOG_WALL_AVOID_DISTANCE {
                Some((enemy.pos - center).normalize_or_zero() * DOG_WALL_AVOID_STRENGTH)
            } else {
                None
            }
        })
        .sum()
}

impl EnemyBehavior for OldManBehavior {
    fn kind(&self) -> EnemyKind {
        EnemyKind::OldMan
    }

    fn base_speed(&self) -> f32 {
        OLD_MAN_SPEED
    }

    fn size(&self) -> f32 {
        OLD_MAN_SIZE
    }

    fn spawn_distance(&self) -> f32 {
        200.0
    }

    fn hit_mode(&self) -> EnemyMode {
        EnemyMode::Yelling
    }

    fn hit_event(&self) -> AudioEvent {
        AudioEvent::HitOldMan
    }

    fn initial_velocity(&self, rng: &mut Pcg32) -> Vec2 {
        random_heading(rng) * OLD_MAN_SPEED
    }

    fn observe_control(&self, enemy: &mut Enemy, control: &ActorInput) {
        if control.has_axis_signal() {
            enemy.is_manual = true;
        }
    }

    fn autonomous_velocity(
        &self,
        enemy: &mut Enemy,
        ctx: &SteerContext,
        rng: &mut Pcg32,
    ) -> Vec2 {
        let toward_player = (ctx.player_pos - enemy.pos).normalize_or_zero();

        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
        let mut heading =
            enemy.velocity + jitter * OLD_MAN_JITTER + toward_player * OLD_MAN_ATTRACTION;
        if rng.random::<f32>() < OLD_MAN_RETARGET_CHANCE {
            heading = random_heading(rng);
        }

        let mut vel = if heading.length() > 0.0 {
            heading.normalize() * OLD_MAN_SPEED
        } else {
            Vec2::new(OLD_MAN_SPEED, 0.0)
        };

        // Turn back once pressed against the arena clamp
        let edge = enemy.half_size() + Vec2::splat(ARENA_MARGIN + OLD_MAN_EDGE_SLACK);
        if enemy.pos.x < edge.x {
            vel.x = vel.x.abs();
        } else if enemy.pos.x > ARENA_WIDTH - edge.x {
            vel.x = -vel.x.abs();
        }
        if enemy.pos.y < edge.y {
            vel.y = vel.y.abs();
        } else if enemy.pos.y > ARENA_HEIGHT - edge.y {
            vel.y = -vel.y.abs();
        }

        enemy.velocity = vel;
        vel
    }

    fn after_move(&self, enemy: &mut Enemy, hit_wall: bool) {
        if hit_wall && !enemy.is_manual {
            enemy.velocity = -enemy.velocity;
        }
    }
}

fn random_heading(rng: &mut Pcg32) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    Vec2::new(angle.cos(), angle.sin())
}
