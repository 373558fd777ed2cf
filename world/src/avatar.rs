//! Player-controlled body resolved against the world's solid tiles.

use ghost_void_core::{Aabb, AvatarSnapshot, AvatarState, Vector2};

use crate::{physics, query, World};

/// Half extents of the avatar's collision box around its position.
pub const HALF_EXTENTS: Vector2 = Vector2::new(4.0, 8.0);
/// Horizontal speed at full run input, in world units per second.
pub const RUN_SPEED: f32 = 120.0;
/// Upward speed imparted by a jump, in world units per second.
pub const JUMP_SPEED: f32 = 240.0;

/// The player's body.
#[derive(Clone, Debug)]
pub struct Avatar {
    position: Vector2,
    velocity: Vector2,
    state: AvatarState,
    grounded: bool,
    firing: bool,
}

impl Avatar {
    /// Creates an avatar at rest at `spawn_point`.
    #[must_use]
    pub fn new(spawn_point: Vector2) -> Self {
        Self {
            position: spawn_point,
            velocity: Vector2::ZERO,
            state: AvatarState::Idle,
            grounded: false,
            firing: false,
        }
    }

    /// Places the avatar back at `spawn_point` with no momentum.
    pub fn respawn(&mut self, spawn_point: Vector2) {
        *self = Self::new(spawn_point);
    }

    /// Sets horizontal run intent. Values are clamped to `[-1, 1]`; non-finite input stops the avatar.
    pub fn set_direction(&mut self, direction: f32) {
        let direction = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.velocity.x = direction * RUN_SPEED;
    }

    /// Starts a jump. Returns `false` while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = -JUMP_SPEED;
        self.grounded = false;
        self.state = AvatarState::Jumping;
        true
    }

    /// Fires; the avatar reports [`AvatarState::Shooting`] for the next update.
    pub fn shoot(&mut self) {
        self.firing = true;
        self.state = AvatarState::Shooting;
    }

    /// Advances the avatar by `dt` seconds against the world's solid tiles.
    pub fn update(&mut self, dt: f32, world: &World) {
        self.velocity = physics::apply_gravity(self.velocity, physics::GRAVITY, dt);
        self.position = physics::integrate(self.position, self.velocity, dt);
        self.grounded = false;

        for tile in query::solid_tiles(world) {
            let correction = physics::resolve_collision(&self.body(), &tile.bounds, &mut self.velocity);
            self.position += correction;
            if correction.y < 0.0 {
                self.grounded = true;
            }
        }

        self.position = physics::enforce_bounds(self.position, &query::bounds(world));
        self.state = self.next_state();
        self.firing = false;
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Collision box around the current position.
    #[must_use]
    pub fn body(&self) -> Aabb {
        Aabb::around(self.position, HALF_EXTENTS)
    }

    /// Captures the avatar for read-only consumers.
    #[must_use]
    pub const fn snapshot(&self) -> AvatarSnapshot {
        AvatarSnapshot {
            position: self.position,
            velocity: self.velocity,
            state: self.state,
            grounded: self.grounded,
        }
    }

    fn next_state(&self) -> AvatarState {
        if self.firing {
            AvatarState::Shooting
        } else if !self.grounded {
            if self.velocity.y < 0.0 {
                AvatarState::Jumping
            } else {
                AvatarState::Falling
            }
        } else if self.velocity.x != 0.0 {
            AvatarState::Running
        } else {
            AvatarState::Idle
        }
    }
}
