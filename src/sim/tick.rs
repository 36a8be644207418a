//! Fixed timestep simulation step
//!
//! `advance` is the single authoritative per-frame transition. It clones the
//! incoming snapshot and mutates the copy, so a caller holding the previous
//! state never observes it change.

use glam::Vec2;
use rand::Rng;

use super::behavior::{SteerContext, behavior_for};
use super::collision::circle_intersects_rect;
use super::mover::{Shape, move_entity};
use super::state::{AudioEvent, EnemyMode, GameState, GameStatus, Wall};
use crate::consts::*;
use crate::input::InputState;

/// Axis magnitude under which the player is considered idle
const MOVE_THRESHOLD: f32 = 0.1;
/// Teleport placement attempts before giving up
const TELEPORT_ATTEMPTS: u32 = 10;
/// Clearance kept between a teleport target and any wall, on top of the radius
const TELEPORT_CLEARANCE: f32 = 10.0;
/// Fraction of enemy overlap corrected per frame
const SEPARATION_STRENGTH: f32 = 0.15;
const AMBIENT_PARTICLE_CHANCE: f32 = 0.05;

const SPRAY_COLOR: u32 = 0xEEEEEE;
const TELEPORT_COLOR: u32 = 0x00FFFF;
const AMBIENT_COLOR: u32 = 0xFFFFFF;

/// Advance the game by one 60 Hz frame
pub fn advance(state: &GameState, input: &InputState) -> GameState {
    advance_with_dt(state, input, SIM_DT)
}

/// Advance the game by one frame of `dt` seconds (boost drain and match timer)
pub fn advance_with_dt(state: &GameState, input: &InputState, dt: f32) -> GameState {
    let mut next = state.clone();
    step(&mut next, input, dt);
    next
}

/// In-place frame step
pub(crate) fn step(state: &mut GameState, input: &InputState, dt: f32) {
    state.audio_events.clear();

    update_particles(state);

    if input.action_cancel {
        if state.status != GameStatus::Menu {
            log::info!("Match cancelled, back to menu");
        }
        state.status = GameStatus::Menu;
        return;
    }

    if state.status != GameStatus::Playing {
        return;
    }
    state.time_ticks += 1;

    update_player(state, input, dt);

    if input.action_tertiary && state.player.can_teleport {
        teleport(state);
    }

    let moved = move_entity(
        state.player.pos,
        state.player.velocity,
        Shape::Circle {
            radius: state.player.radius,
        },
        &state.walls,
    );
    state.player.pos = moved.pos;

    if input.action_primary_trigger && !state.player.is_stunned() {
        spray_nearest_wall(state);
    }

    update_enemies(state, input);

    // Screen shake decay
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.5 {
        state.screen_shake = 0.0;
    }

    // A bite that ended the match wins over everything below
    if state.status != GameStatus::Playing {
        return;
    }

    if state.player.tags_completed >= state.config.wall_count {
        state.status = GameStatus::Victory;
        log::info!(
            "Victory: {} walls tagged with {:.1}s left",
            state.player.tags_completed,
            state.time_left
        );
        return;
    }

    update_timer(state, dt);
}

fn update_particles(state: &mut GameState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);

    if state.status == GameStatus::Menu && state.rng.random::<f32>() < AMBIENT_PARTICLE_CHANCE {
        let pos = Vec2::new(
            state.rng.random::<f32>() * ARENA_WIDTH,
            state.rng.random::<f32>() * ARENA_HEIGHT,
        );
        let vel = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        );
        state.spawn_particle(pos, vel, 60, AMBIENT_COLOR);
    }
}

fn update_player(state: &mut GameState, input: &InputState, dt: f32) {
    let player = &mut state.player;

    player.is_boosting = input.action_secondary && player.boost_time_left > 0.0;
    if player.is_boosting {
        player.boost_time_left = (player.boost_time_left - dt).max(0.0);
    }

    player.stun_timer = player.stun_timer.saturating_sub(1);

    let axis = input.axis();
    let dir = if axis.length() > MOVE_THRESHOLD {
        player.last_move_dir = axis.normalize();
        player.last_move_dir
    } else if player.is_boosting {
        // Cruise along the last heading
        player.last_move_dir
    } else {
        Vec2::ZERO
    };

    let speed = if player.is_boosting {
        PLAYER_BOOST_SPEED
    } else {
        PLAYER_SPEED
    };
    player.velocity = dir * speed;
}

/// One-shot: the flag is spent even when no free spot turns up
fn teleport(state: &mut GameState) {
    state.player.can_teleport = false;

    let clearance = state.player.radius + TELEPORT_CLEARANCE;
    let mut target = None;
    for _ in 0..TELEPORT_ATTEMPTS {
        let candidate = Vec2::new(
            state.rng.random::<f32>() * (ARENA_WIDTH - 100.0) + 50.0,
            state.rng.random::<f32>() * (ARENA_HEIGHT - 100.0) + 50.0,
        );
        if teleport_spot_clear(&state.walls, candidate, clearance) {
            target = Some(candidate);
            break;
        }
    }

    match target {
        Some(pos) => {
            state.player.pos = pos;
            log::debug!("Teleported to ({:.0}, {:.0})", pos.x, pos.y);
        }
        None => log::warn!("Teleport found no free spot, charge spent anyway"),
    }

    let pos = state.player.pos;
    state.spawn_burst(pos, 20, 0.0, 10.0, 20, TELEPORT_COLOR);
}

/// A landing spot must keep `clearance` from every wall
fn teleport_spot_clear(walls: &[Wall], spot: Vec2, clearance: f32) -> bool {
    !walls
        .iter()
        .any(|wall| circle_intersects_rect(spot, clearance, &wall.rect))
}

fn spray_nearest_wall(state: &mut GameState) {
    let pos = state.player.pos;
    let nearest = state
        .walls
        .iter()
        .enumerate()
        .filter(|(_, wall)| !wall.is_tagged)
        .filter_map(|(i, wall)| wall.reach_distance(pos).map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    let Some(index) = nearest else {
        return;
    };

    let tick = state.time_ticks;
    let completed = state.walls[index].spray(tick);
    state.audio_events.push(AudioEvent::Spray);
    state.spawn_burst(pos, 5, 20.0, 5.0, 15, SPRAY_COLOR);

    if completed {
        state.player.tags_completed += 1;
        state.screen_shake = 10.0;
        state.audio_events.push(AudioEvent::WallDone);
        log::info!(
            "Wall {} tagged ({}/{})",
            state.walls[index].id,
            state.player.tags_completed,
            state.config.wall_count
        );
    }
}

/// Soft push away from every overlapping neighbour
fn separation(state: &GameState, index: usize) -> Vec2 {
    let enemy = &state.enemies[index];
    state
        .enemies
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .filter_map(|(_, other)| {
            let offset = enemy.pos - other.pos;
            let dist = offset.length();
            let min_dist = enemy.half_size().x + other.half_size().x;
            (dist < min_dist && dist > 0.001)
                .then(|| offset / dist * (min_dist - dist) * SEPARATION_STRENGTH)
        })
        .sum()
}

fn update_enemies(state: &mut GameState, input: &InputState) {
    for i in 0..state.enemies.len() {
        let push = separation(state, i);
        let tick = state.time_ticks;
        let behavior = behavior_for(state.enemies[i].kind);
        let control = input.enemies.for_kind(behavior.kind());

        let enemy = &mut state.enemies[i];
        let was_manual = enemy.is_manual;
        behavior.observe_control(enemy, control);
        if enemy.is_manual && !was_manual {
            log::debug!("Enemy {} ({:?}) taken over by operator", enemy.id, enemy.kind);
        }
        behavior.update_timers(enemy, &mut state.rng);

        let vel = if enemy.is_manual {
            // Operators are never frozen by a post-hit state
            if matches!(enemy.mode, EnemyMode::Barking | EnemyMode::Yelling) {
                enemy.mode = EnemyMode::Chasing;
                enemy.cooldown = 0;
            }
            behavior.manual_velocity(enemy, control)
        } else {
            let ctx = SteerContext {
                player_pos: state.player.pos,
                walls: &state.walls,
            };
            behavior.autonomous_velocity(enemy, &ctx, &mut state.rng)
        };

        let half = enemy.half_size();
        let moved = move_entity(
            enemy.pos,
            vel + push,
            Shape::Box {
                half_w: half.x,
                half_h: half.y,
            },
            &state.walls,
        );
        enemy.pos = moved.pos;
        behavior.after_move(enemy, moved.hit_wall);

        let contact = enemy.pos.distance(state.player.pos) < state.player.radius + half.x;
        if contact && !state.player.is_stunned() {
            state.player.stun_timer = STUN_FRAMES;
            state.screen_shake = 5.0;
            state.audio_events.push(behavior.hit_event());

            if enemy.mode == EnemyMode::Chasing && !enemy.is_manual {
                enemy.mode = behavior.hit_mode();
                enemy.cooldown = POST_HIT_COOLDOWN;
                enemy.sprint_timer = 0;
            }

            if behavior.on_contact(&mut state.player, tick) {
                state.status = GameStatus::GameOver;
                log::info!("Game over: bitten {} times", state.player.dog_hits);
            }
        }

        let enemy = &mut state.enemies[i];
        if matches!(enemy.mode, EnemyMode::Barking | EnemyMode::Yelling) {
            if enemy.cooldown == 0 {
                enemy.mode = EnemyMode::Chasing;
            } else {
                enemy.cooldown -= 1;
            }
        }
    }
}

fn update_timer(state: &mut GameState, dt: f32) {
    let prev = state.time_left;
    let next = (prev - dt).max(0.0);
    state.time_left = next;

    if next <= 0.0 {
        state.status = GameStatus::GameOver;
        log::info!(
            "Game over: time up with {}/{} walls tagged",
            state.player.tags_completed,
            state.config.wall_count
        );
        return;
    }

    let (prev_sec, next_sec) = (prev.ceil(), next.ceil());
    if next_sec <= 10.0 && next_sec < prev_sec && next_sec > 0.0 {
        state.audio_events.push(AudioEvent::Countdown);
    }
}
