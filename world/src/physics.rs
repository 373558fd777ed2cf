//! Stateless kinematics and collision helpers.

use ghost_void_core::{Aabb, Vector2};

/// Downward acceleration in world units per second squared.
pub const GRAVITY: f32 = 480.0;

/// Returns `velocity` after `dt` seconds of `gravity`.
#[must_use]
pub fn apply_gravity(velocity: Vector2, gravity: f32, dt: f32) -> Vector2 {
    Vector2::new(velocity.x, velocity.y + gravity * dt)
}

/// Explicit Euler step of `position` by `velocity` over `dt` seconds.
#[must_use]
pub fn integrate(position: Vector2, velocity: Vector2, dt: f32) -> Vector2 {
    position + velocity * dt
}

/// Clamps `position` into `bounds`.
#[must_use]
pub fn enforce_bounds(position: Vector2, bounds: &Aabb) -> Vector2 {
    bounds.clamp(position)
}

/// Pushes `agent` out of `tile` along the axis of least penetration.
///
/// Returns the correction to add to the agent's position. The velocity
/// component that drove the agent into the tile is zeroed; motion away from
/// the tile is kept. Non-overlapping boxes yield a zero correction.
#[must_use]
pub fn resolve_collision(agent: &Aabb, tile: &Aabb, velocity: &mut Vector2) -> Vector2 {
    if !agent.overlaps(tile) {
        return Vector2::ZERO;
    }

    let overlap_x = agent.max.x.min(tile.max.x) - agent.min.x.max(tile.min.x);
    let overlap_y = agent.max.y.min(tile.max.y) - agent.min.y.max(tile.min.y);

    if overlap_x < overlap_y {
        if agent.min.x < tile.min.x {
            velocity.x = velocity.x.min(0.0);
            Vector2::new(-overlap_x, 0.0)
        } else {
            velocity.x = velocity.x.max(0.0);
            Vector2::new(overlap_x, 0.0)
        }
    } else if agent.min.y < tile.min.y {
        velocity.y = velocity.y.min(0.0);
        Vector2::new(0.0, -overlap_y)
    } else {
        velocity.y = velocity.y.max(0.0);
        Vector2::new(0.0, overlap_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabb {
        Aabb::new(Vector2::new(min_x, min_y), Vector2::new(max_x, max_y))
    }

    #[test]
    fn gravity_scales_with_dt() {
        let velocity = apply_gravity(Vector2::new(3.0, 0.0), 10.0, 0.5);
        assert_eq!(velocity, Vector2::new(3.0, 5.0));
    }

    #[test]
    fn integrate_moves_along_velocity() {
        let position = integrate(Vector2::new(1.0, 1.0), Vector2::new(4.0, -2.0), 0.25);
        assert_eq!(position, Vector2::new(2.0, 0.5));
    }

    #[test]
    fn landing_pushes_up_and_stops_fall() {
        let agent = rect(0.0, 0.0, 8.0, 12.0);
        let floor = rect(-50.0, 10.0, 50.0, 20.0);
        let mut velocity = Vector2::new(5.0, 30.0);

        let correction = resolve_collision(&agent, &floor, &mut velocity);

        assert_eq!(correction, Vector2::new(0.0, -2.0));
        assert_eq!(velocity, Vector2::new(5.0, 0.0));
    }

    #[test]
    fn wall_contact_pushes_sideways() {
        let agent = rect(497.0, -20.0, 503.0, 0.0);
        let wall = rect(500.0, -100.0, 520.0, 10.0);
        let mut velocity = Vector2::new(40.0, 10.0);

        let correction = resolve_collision(&agent, &wall, &mut velocity);

        assert_eq!(correction, Vector2::new(-3.0, 0.0));
        assert_eq!(velocity, Vector2::new(0.0, 10.0));
    }

    #[test]
    fn separated_boxes_need_no_correction() {
        let mut velocity = Vector2::new(1.0, 1.0);
        let correction =
            resolve_collision(&rect(0.0, 0.0, 1.0, 1.0), &rect(1.0, 0.0, 2.0, 1.0), &mut velocity);
        assert_eq!(correction, Vector2::ZERO);
        assert_eq!(velocity, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn bounds_clamp_position() {
        let bounds = rect(-10.0, -10.0, 10.0, 10.0);
        assert_eq!(
            enforce_bounds(Vector2::new(25.0, -3.0), &bounds),
            Vector2::new(10.0, -3.0)
        );
    }
}
