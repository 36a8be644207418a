//! Demo driver that plays the player side
//!
//! Feeds keyboard events into an `InputNormalizer`, exactly like a human at
//! the keyboard: walk to the nearest untagged wall, then mash the tag key.
//! Used by the headless runner and for attract-mode demos.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::*;
use crate::input::{InputNormalizer, Key};
use crate::sim::{GameState, GameStatus, Wall};

/// Close enough to the stand point to stop walking
const ARRIVE_TOLERANCE: f32 = 4.0;
/// Gap between the player's edge and the wall face when tagging
const STAND_GAP: f32 = 10.0;
/// Frames without progress before trying a detour
const STUCK_FRAMES: u32 = 30;
const DETOUR_FRAMES: u32 = 30;
/// Stuck this many times in a row: burn the teleport
const DETOURS_BEFORE_TELEPORT: u32 = 3;

#[derive(Debug, Default)]
pub struct Autopilot {
    held: HashSet<Key>,
    last_pos: Option<Vec2>,
    stuck_frames: u32,
    detour_frames: u32,
    detours: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press and release keys for the coming frame
    pub fn drive(&mut self, state: &GameState, input: &mut InputNormalizer) {
        if state.status != GameStatus::Playing {
            self.release_all(input);
            self.last_pos = None;
            return;
        }

        let pos = state.player.pos;
        let Some(target) = nearest_stand_point(state) else {
            self.release_all(input);
            return;
        };

        let mut dir = Vec2::ZERO;
        let delta = target - pos;
        if delta.x.abs() > ARRIVE_TOLERANCE {
            dir.x = delta.x.signum();
        }
        if delta.y.abs() > ARRIVE_TOLERANCE {
            dir.y = delta.y.signum();
        }

        // Blocked by a wall: sidestep for a while
        let moved = self.last_pos.is_none_or(|last| last.distance(pos) > 0.5);
        self.last_pos = Some(pos);
        if dir != Vec2::ZERO && !moved && self.detour_frames == 0 {
            self.stuck_frames += 1;
            if self.stuck_frames >= STUCK_FRAMES {
                self.stuck_frames = 0;
                self.detour_frames = DETOUR_FRAMES;
                self.detours += 1;
                log::debug!("Autopilot stuck at ({:.0}, {:.0}), detouring", pos.x, pos.y);
            }
        } else if moved {
            self.stuck_frames = 0;
        }
        if self.detour_frames > 0 {
            self.detour_frames -= 1;
            dir = if dir.x != 0.0 {
                Vec2::new(0.0, if pos.y > ARENA_HEIGHT / 2.0 { -1.0 } else { 1.0 })
            } else {
                Vec2::new(if pos.x > ARENA_WIDTH / 2.0 { -1.0 } else { 1.0 }, 0.0)
            };
        }
        if dir == Vec2::ZERO {
            self.detours = 0;
        }

        self.set(input, Key::ArrowLeft, dir.x < 0.0);
        self.set(input, Key::ArrowRight, dir.x > 0.0);
        self.set(input, Key::ArrowUp, dir.y < 0.0);
        self.set(input, Key::ArrowDown, dir.y > 0.0);

        let teleport = self.detours >= DETOURS_BEFORE_TELEPORT && state.player.can_teleport;
        self.set(input, Key::KeyZ, teleport);

        // Tap, don't hold: only fresh presses tag
        let tap = !self.held.contains(&Key::Space);
        self.set(input, Key::Space, tap);
    }

    fn set(&mut self, input: &mut InputNormalizer, key: Key, down: bool) {
        match (down, self.held.contains(&key)) {
            (true, false) => {
                input.key_down(key, false);
                self.held.insert(key);
            }
            (false, true) => {
                input.key_up(key);
                self.held.remove(&key);
            }
            _ => {}
        }
    }

    fn release_all(&mut self, input: &mut InputNormalizer) {
        for key in self.held.drain() {
            input.key_up(key);
        }
    }
}

/// Closest spot facing an untagged wall from which it can be sprayed
fn nearest_stand_point(state: &GameState) -> Option<Vec2> {
    let pos = state.player.pos;
    let offset = state.player.radius + STAND_GAP;
    state
        .untagged_walls()
        .map(|wall| stand_point(wall, pos, offset))
        .min_by(|a, b| a.distance(pos).total_cmp(&b.distance(pos)))
}

fn stand_point(wall: &Wall, from: Vec2, offset: f32) -> Vec2 {
    let r = &wall.rect;
    let center = r.center();
    let min = offset + ARENA_MARGIN;
    if wall.is_horizontal() {
        let above = center.y - r.h / 2.0 - offset;
        let below = center.y + r.h / 2.0 + offset;
        let y = if (from.y < center.y && above >= min) || below > ARENA_HEIGHT - min {
            above
        } else {
            below
        };
        Vec2::new(center.x, y)
    } else {
        let left = center.x - r.w / 2.0 - offset;
        let right = center.x + r.w / 2.0 + offset;
        let x = if (from.x < center.x && left >= min) || right > ARENA_WIDTH - min {
            left
        } else {
            right
        };
        Vec2::new(x, center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameConfig, Rect, advance};

    fn lone_wall_match(wall: Rect) -> GameState {
        let config = GameConfig {
            wall_count: 1,
            dog_count: 0,
            old_man_count: 0,
            game_duration: 60.0,
        };
        let mut state = GameState::new_match(config, 5);
        state.walls = vec![Wall::new(1, wall)];
        state.enemies.clear();
        state
    }

    #[test]
    fn test_stand_point_faces_wall() {
        let wall = Wall::new(1, Rect::new(800.0, 500.0, 250.0, 40.0));
        // From below
        let p = stand_point(&wall, Vec2::new(900.0, 900.0), 45.0);
        assert_eq!(p, Vec2::new(925.0, 585.0));
        assert!(wall.reach_distance(p).is_some());
        // From above
        let p = stand_point(&wall, Vec2::new(900.0, 100.0), 45.0);
        assert_eq!(p, Vec2::new(925.0, 455.0));

        // Hugging the top edge: only the far side is reachable
        let wall = Wall::new(2, Rect::new(800.0, 50.0, 250.0, 40.0));
        let p = stand_point(&wall, Vec2::new(900.0, 20.0), 45.0);
        assert_eq!(p.y, 135.0);

        let wall = Wall::new(3, Rect::new(300.0, 300.0, 40.0, 250.0));
        let p = stand_point(&wall, Vec2::new(900.0, 400.0), 45.0);
        assert_eq!(p, Vec2::new(385.0, 425.0));
        assert!(wall.reach_distance(p).is_some());
    }

    #[test]
    fn test_autopilot_tags_the_wall() {
        let mut state = lone_wall_match(Rect::new(800.0, 500.0, 250.0, 40.0));
        let mut input = InputNormalizer::new();
        let mut pilot = Autopilot::new();

        for _ in 0..600 {
            pilot.drive(&state, &mut input);
            state = advance(&state, &input.sample());
            if state.status != GameStatus::Playing {
                break;
            }
        }
        assert_eq!(state.status, GameStatus::Victory);
        assert!(state.walls[0].is_tagged);
        // Never needed the teleport on an open field
        assert!(state.player.can_teleport);
    }

    #[test]
    fn test_releases_keys_when_not_playing() {
        let mut state = lone_wall_match(Rect::new(800.0, 500.0, 250.0, 40.0));
        let mut input = InputNormalizer::new();
        let mut pilot = Autopilot::new();
        pilot.drive(&state, &mut input);
        assert!(!pilot.held.is_empty());

        state.status = GameStatus::Menu;
        pilot.drive(&state, &mut input);
        assert!(pilot.held.is_empty());
        let sampled = input.sample();
        assert_eq!(sampled.axis(), Vec2::ZERO);
        assert!(!sampled.action_primary);
    }
}
