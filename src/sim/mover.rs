//! Swept movement against arena bounds and walls
//!
//! Displacement is resolved one axis at a time, X before Y. The first wall
//! hit on an axis cancels that axis entirely. Resolving X first is what makes
//! entities slide along walls when moving diagonally into them.

use glam::Vec2;

use super::collision::{Rect, circle_intersects_rect, rect_intersects_rect};
use super::state::Wall;
use crate::consts::{ARENA_HEIGHT, ARENA_MARGIN, ARENA_WIDTH};

/// Collision shape of a moving entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Box { half_w: f32, half_h: f32 },
}

impl Shape {
    fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Box { half_w, half_h } => Vec2::new(half_w, half_h),
        }
    }

    /// Does the shape centered at `pos` overlap the rectangle?
    pub fn overlaps(&self, pos: Vec2, rect: &Rect) -> bool {
        match *self {
            Shape::Circle { radius } => circle_intersects_rect(pos, radius, rect),
            Shape::Box { half_w, half_h } => {
                rect_intersects_rect(&Rect::centered(pos, half_w * 2.0, half_h * 2.0), rect)
            }
        }
    }
}

/// Result of a swept move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    /// True if either axis was clamped or blocked
    pub hit_wall: bool,
}

/// Move `pos` by `vel`, resolving X then Y against the arena and `walls`
pub fn move_entity(pos: Vec2, vel: Vec2, shape: Shape, walls: &[Wall]) -> MoveResult {
    let half = shape.half_extents();

    // X axis, tested at the original Y
    let (x, hit_x) = resolve_axis(pos.x, vel.x, half.x, ARENA_WIDTH, |x| {
        walls.iter().any(|w| shape.overlaps(Vec2::new(x, pos.y), &w.rect))
    });

    // Y axis, tested at the resolved X
    let (y, hit_y) = resolve_axis(pos.y, vel.y, half.y, ARENA_HEIGHT, |y| {
        walls.iter().any(|w| shape.overlaps(Vec2::new(x, y), &w.rect))
    });

    MoveResult {
        pos: Vec2::new(x, y),
        hit_wall: hit_x || hit_y,
    }
}

/// Clamp against the arena first; only an unclamped candidate is wall-tested.
fn resolve_axis(
    start: f32,
    delta: f32,
    half: f32,
    extent: f32,
    blocked: impl Fn(f32) -> bool,
) -> (f32, bool) {
    let next = start + delta;
    let min = half + ARENA_MARGIN;
    let max = extent - ARENA_MARGIN - half;

    if next < min {
        (min, true)
    } else if next > max {
        (max, true)
    } else if blocked(next) {
        (start, true)
    } else {
        (next, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_RADIUS;
    use proptest::prelude::*;

    fn wall(x: f32, y: f32, w: f32, h: f32) -> Wall {
        Wall::new(0, Rect::new(x, y, w, h))
    }

    const PLAYER: Shape = Shape::Circle {
        radius: PLAYER_RADIUS,
    };

    #[test]
    fn test_free_move() {
        let r = move_entity(Vec2::new(500.0, 500.0), Vec2::new(7.0, -3.0), PLAYER, &[]);
        assert_eq!(r.pos, Vec2::new(507.0, 497.0));
        assert!(!r.hit_wall);
    }

    #[test]
    fn test_arena_clamp() {
        let r = move_entity(Vec2::new(60.0, 500.0), Vec2::new(-20.0, 0.0), PLAYER, &[]);
        assert_eq!(r.pos.x, PLAYER_RADIUS + ARENA_MARGIN);
        assert!(r.hit_wall);

        let b = Shape::Box {
            half_w: 30.0,
            half_h: 30.0,
        };
        let r = move_entity(Vec2::new(500.0, 1020.0), Vec2::new(0.0, 15.0), b, &[]);
        assert_eq!(r.pos.y, ARENA_HEIGHT - ARENA_MARGIN - 30.0);
        assert!(r.hit_wall);
    }

    #[test]
    fn test_blocked_axis_slides_along_wall() {
        // Vertical wall to the right of the player
        let walls = [wall(540.0, 300.0, 40.0, 250.0)];
        let start = Vec2::new(500.0, 400.0);

        // Straight into the wall: X is cancelled
        let r = move_entity(start, Vec2::new(7.0, 0.0), PLAYER, &walls);
        assert_eq!(r.pos, start);
        assert!(r.hit_wall);

        // Diagonal: X blocked, Y still moves
        let r = move_entity(start, Vec2::new(7.0, 5.0), PLAYER, &walls);
        assert_eq!(r.pos, Vec2::new(500.0, 405.0));
        assert!(r.hit_wall);
    }

    #[test]
    fn test_x_resolved_before_y() {
        // Wall below-right corner: moving diagonally, X is free at the
        // original Y, then Y is tested at the new X and blocked.
        let walls = [wall(520.0, 430.0, 250.0, 40.0)];
        let start = Vec2::new(480.0, 400.0);
        let r = move_entity(start, Vec2::new(10.0, 15.0), PLAYER, &walls);
        assert_eq!(r.pos, Vec2::new(490.0, 400.0));
        assert!(r.hit_wall);
    }

    #[test]
    fn test_first_hit_cancels_whole_axis() {
        // Even a move that would stop short of the wall is cancelled, not shortened
        let walls = [wall(540.0, 300.0, 40.0, 250.0)];
        let r = move_entity(Vec2::new(495.0, 400.0), Vec2::new(20.0, 0.0), PLAYER, &walls);
        assert_eq!(r.pos.x, 495.0);
    }

    fn free_walls() -> impl Strategy<Value = Vec<Wall>> {
        prop::collection::vec(
            (150.0f32..1500.0, 150.0f32..700.0, prop::bool::ANY),
            0..6,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, horizontal))| {
                    let (w, h) = if horizontal { (250.0, 40.0) } else { (40.0, 250.0) };
                    Wall::new(i as u32, Rect::new(x, y, w, h))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_mover_never_enters_walls(
            walls in free_walls(),
            sx in 60.0f32..1860.0,
            sy in 60.0f32..1020.0,
            vx in -15.0f32..15.0,
            vy in -15.0f32..15.0,
            as_box in prop::bool::ANY,
        ) {
            let shape = if as_box {
                Shape::Box { half_w: 30.0, half_h: 30.0 }
            } else {
                PLAYER
            };
            let start = Vec2::new(sx, sy);
            let half = shape.half_extents();
            prop_assume!(sx >= half.x + ARENA_MARGIN && sx <= ARENA_WIDTH - ARENA_MARGIN - half.x);
            prop_assume!(sy >= half.y + ARENA_MARGIN && sy <= ARENA_HEIGHT - ARENA_MARGIN - half.y);
            prop_assume!(walls.iter().all(|w| !shape.overlaps(start, &w.rect)));

            let r = move_entity(start, Vec2::new(vx, vy), shape, &walls);

            for w in &walls {
                prop_assert!(!shape.overlaps(r.pos, &w.rect));
            }
            prop_assert!(r.pos.x >= half.x + ARENA_MARGIN);
            prop_assert!(r.pos.x <= ARENA_WIDTH - ARENA_MARGIN - half.x);
            prop_assert!(r.pos.y >= half.y + ARENA_MARGIN);
            prop_assert!(r.pos.y <= ARENA_HEIGHT - ARENA_MARGIN - half.y);
        }
    }
}
