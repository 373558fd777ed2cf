#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure boss AI that nudges bosses toward a target each tick.
//!
//! Behaviour variants are a closed set held in [`Behavior`]; each variant owns
//! the state it needs and [`Boss::update`] dispatches on it. Updates are total:
//! any finite `dt` and target produce a new position and never fail.

use ghost_void_core::{BossId, BossKind, BossSnapshot, Vector2};

/// Horizontal distance below which a boss stops tracking its target.
pub const DEADBAND: f32 = 1.0;
/// Starting health of a [`BossKind::Boss`].
pub const BOSS_HEALTH: u32 = 100;
/// Starting health of a [`BossKind::BigBoss`].
pub const BIG_BOSS_HEALTH: u32 = 500;

const BASE_SPEED: f32 = 1.0;
const CALM_SPEED: f32 = 0.5;
const RAGE_SPEED: f32 = 2.0;
/// Accumulated seconds after which a big boss enters rage mode.
pub const RAGE_THRESHOLD: f32 = 5.0;
/// Accumulated seconds after which the rage cycle restarts.
pub const RAGE_RESET: f32 = 8.0;

/// Per-variant behaviour state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    /// Tracks the target at unit speed.
    Base,
    /// Tracks slowly, then at high speed once `rage_timer` passes the threshold.
    Rage {
        /// Seconds accumulated in the current rage cycle.
        rage_timer: f32,
    },
}

impl Behavior {
    /// Advances the behaviour clock and returns the tracking speed for this tick.
    fn advance(&mut self, dt: f32) -> f32 {
        match self {
            Self::Base => BASE_SPEED,
            Self::Rage { rage_timer } => {
                *rage_timer += dt;
                if *rage_timer > RAGE_THRESHOLD {
                    if *rage_timer > RAGE_RESET {
                        *rage_timer = 0.0;
                    }
                    RAGE_SPEED
                } else {
                    CALM_SPEED
                }
            }
        }
    }
}

/// A boss taking part in an encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    id: BossId,
    position: Vector2,
    health: u32,
    behavior: Behavior,
}

impl Boss {
    /// Creates a boss of the requested kind at `position`.
    #[must_use]
    pub fn spawn(id: BossId, kind: BossKind, position: Vector2) -> Self {
        let (health, behavior) = match kind {
            BossKind::Boss => (BOSS_HEALTH, Behavior::Base),
            BossKind::BigBoss => (BIG_BOSS_HEALTH, Behavior::Rage { rage_timer: 0.0 }),
        };
        Self {
            id,
            position,
            health,
            behavior,
        }
    }

    /// Moves along the x axis toward `target` for `dt` seconds.
    ///
    /// The boss holds still while within [`DEADBAND`] of the target; the
    /// behaviour clock advances regardless of movement.
    pub fn update(&mut self, dt: f32, target: Vector2) {
        let speed = self.behavior.advance(dt);
        let offset = target.x - self.position.x;
        if offset.abs() > DEADBAND {
            self.position.x += offset.signum() * speed * dt;
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> BossId {
        self.id
    }

    /// Behaviour variant.
    #[must_use]
    pub const fn kind(&self) -> BossKind {
        match self.behavior {
            Behavior::Base => BossKind::Boss,
            Behavior::Rage { .. } => BossKind::BigBoss,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Behaviour state, including any rage clock.
    #[must_use]
    pub const fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Captures the boss for read-only consumers.
    #[must_use]
    pub const fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            id: self.id,
            kind: self.kind(),
            position: self.position,
            health: self.health,
        }
    }
}
