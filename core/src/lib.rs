#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ghost Void simulation.
//!
//! This crate defines the message surface that connects the command source,
//! the sandbox that owns every subsystem, and the outward snapshot layer.
//! Callers submit [`Command`] values describing desired mutations, the sandbox
//! executes them through its `apply` entry point, and then reports [`Event`]
//! values describing what changed. Rejected commands never mutate state and
//! surface as [`Event::CommandRejected`] carrying a typed [`SimError`].

pub mod error;
pub mod geometry;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::{BattleError, CityError, LevelError, SimError};
pub use geometry::{Aabb, Vector2};

/// Commands that express all permissible sandbox mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the world's tile set with the canonical set for `level`.
    LoadLevel {
        /// Level to activate.
        level: LevelId,
    },
    /// Appends a solid platform to the currently loaded level.
    SpawnPlane {
        /// Corner of the platform with the smallest coordinates.
        origin: Vector2,
        /// Horizontal extent in world units.
        width: f32,
        /// Vertical extent in world units.
        height: f32,
    },
    /// Sets the avatar's horizontal intent; `-1.0` runs left, `1.0` right.
    MoveAvatar {
        /// Signed run direction, clamped to `[-1, 1]`.
        direction: f32,
    },
    /// Makes the avatar jump when it stands on solid ground.
    Jump,
    /// Makes the avatar fire.
    Shoot,
    /// Adds a boss to the active encounter.
    SpawnBoss {
        /// Behaviour variant of the boss.
        kind: BossKind,
        /// Starting position.
        position: Vector2,
    },
    /// Ends the current encounter, dropping every active boss.
    EndEncounter,
    /// Starts a monster battle.
    StartBattle {
        /// Monster fighting for the player.
        player: Monster,
        /// Opposing monster.
        enemy: Monster,
    },
    /// Player attacks during its turn.
    Attack,
    /// Player flees the battle.
    Run,
    /// Rezones a single city cell.
    SetZone {
        /// Cell to rezone.
        cell: CellCoord,
        /// Zone to apply.
        zone: ZoneType,
    },
    /// Advances every subsystem by the provided delta time.
    ///
    /// Issued by the orchestrator once per frame; command sources that send
    /// it are refused with [`SimError::TickReserved`].
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Asks the orchestrator to stop after the current frame.
    Stop,
}

/// Events reported by the sandbox after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level finished loading.
    LevelLoaded {
        /// Level that became current.
        level: LevelId,
        /// Spawn point designated by the level.
        spawn_point: Vector2,
        /// Number of tiles the level contains.
        tile_count: usize,
    },
    /// Confirms that a plane was appended to the current level.
    PlaneSpawned {
        /// Tile that was added.
        tile: Tile,
    },
    /// The avatar left the ground.
    AvatarJumped,
    /// The avatar fired.
    AvatarFired,
    /// Confirms that a boss joined the encounter.
    BossSpawned {
        /// Identifier assigned to the boss.
        boss: BossId,
        /// Behaviour variant of the boss.
        kind: BossKind,
        /// Starting position.
        position: Vector2,
    },
    /// Confirms that the encounter ended.
    EncounterEnded {
        /// Number of bosses that were dropped.
        removed: usize,
    },
    /// Confirms that a battle started.
    BattleStarted {
        /// Name of the player's monster.
        player: String,
        /// Name of the enemy monster.
        enemy: String,
    },
    /// A line appended to the battle log.
    BattleLogged {
        /// Human-readable log line.
        line: String,
    },
    /// The battle became inactive.
    BattleEnded {
        /// How the battle concluded.
        outcome: BattleOutcome,
    },
    /// Confirms that a city cell was rezoned.
    ZoneChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// Zone now applied.
        zone: ZoneType,
    },
    /// A city simulation step completed.
    CityStepped {
        /// Population after the step.
        population: u32,
    },
    /// The command source asked to stop.
    StopRequested,
    /// A command was refused without mutating state.
    CommandRejected {
        /// Specific reason the command failed.
        reason: SimError,
    },
}

/// Identifier of a level in the level catalog.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Classification of a level tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Decorative region with no collision.
    Empty,
    /// Walkable floor or wall.
    Platform,
    /// Hazard that also blocks movement.
    Spikes,
    /// Climbable region the avatar passes through.
    Ladder,
    /// Door sealing the boss room.
    BossGate,
}

impl TileKind {
    /// Reports whether tiles of this kind block movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        match self {
            Self::Platform | Self::Spikes | Self::BossGate => true,
            Self::Empty | Self::Ladder => false,
        }
    }
}

/// Axis-aligned level region tagged with its kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Kind of the tile, which determines solidity.
    pub kind: TileKind,
    /// Region covered by the tile.
    pub bounds: Aabb,
}

impl Tile {
    /// Creates a tile spanning the provided corners.
    #[must_use]
    pub const fn new(kind: TileKind, min: Vector2, max: Vector2) -> Self {
        Self {
            kind,
            bounds: Aabb::new(min, max),
        }
    }

    /// Reports whether the tile blocks movement.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}

/// Location of a single city cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev (king-move) distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Zoning applied to a city cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    /// Unzoned land.
    #[default]
    Empty,
    /// Housing; contributes to population.
    Residential,
    /// Shops and offices.
    Commercial,
    /// Factories.
    Industrial,
    /// Supplies power to nearby cells.
    PowerPlant,
    /// Supplies water to nearby cells.
    WaterPump,
}

impl ZoneType {
    /// Reports whether cells of this zone accumulate density.
    #[must_use]
    pub const fn grows(self) -> bool {
        matches!(self, Self::Residential | Self::Commercial | Self::Industrial)
    }
}

/// State of a single city cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCell {
    /// Zoning applied to the cell.
    pub zone: ZoneType,
    /// Development level in `[0, 100]`.
    pub density: u8,
    /// Whether a power plant reaches the cell.
    pub has_power: bool,
    /// Whether a water pump reaches the cell.
    pub has_water: bool,
}

/// Elemental affinity of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterType {
    /// Fire affinity.
    Fire,
    /// Water affinity.
    Water,
    /// Grass affinity.
    Grass,
}

/// Combatant in a monster battle. Hit points never exceed `max_hp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MonsterRecord")]
pub struct Monster {
    name: String,
    kind: MonsterType,
    hp: u32,
    max_hp: u32,
    attack: u32,
}

impl Monster {
    /// Creates a monster at full health.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MonsterType, max_hp: u32, attack: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            hp: max_hp,
            max_hp,
            attack,
        }
    }

    /// Returns the monster with its current hit points set, capped at `max_hp`.
    #[must_use]
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elemental affinity.
    #[must_use]
    pub const fn kind(&self) -> MonsterType {
        self.kind
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.attack
    }

    /// Reports whether the monster has no hit points left.
    #[must_use]
    pub const fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Subtracts `amount` from the hit points, stopping at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

#[derive(Deserialize)]
struct MonsterRecord {
    name: String,
    kind: MonsterType,
    hp: u32,
    max_hp: u32,
    attack: u32,
}

impl From<MonsterRecord> for Monster {
    fn from(record: MonsterRecord) -> Self {
        Monster::new(record.name, record.kind, record.max_hp, record.attack).with_hp(record.hp)
    }
}

/// How a battle concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// The enemy fainted.
    Victory,
    /// The player's monster fainted.
    Defeat,
    /// The player ran away.
    Escaped,
}

/// Immutable representation of the battle used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleSnapshot {
    /// Whether a battle is in progress.
    pub active: bool,
    /// Whether the player holds the turn.
    pub player_turn: bool,
    /// The player's monster, once a battle has started.
    pub player: Option<Monster>,
    /// The enemy monster, once a battle has started.
    pub enemy: Option<Monster>,
    /// Log of the current or most recent battle.
    pub log: Vec<String>,
    /// Outcome of the most recent battle, once decided.
    pub outcome: Option<BattleOutcome>,
}

/// Behaviour variant of a boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Tracks its target at unit speed.
    Boss,
    /// Slow tracker that periodically enters rage mode.
    BigBoss,
}

/// Unique identifier assigned to a boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BossId(u32);

impl BossId {
    /// Creates a new boss identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Movement state of the avatar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarState {
    /// Standing still on the ground.
    #[default]
    Idle,
    /// Moving horizontally on the ground.
    Running,
    /// Airborne and rising.
    Jumping,
    /// Airborne and descending.
    Falling,
    /// Fired during the current frame.
    Shooting,
}

/// Immutable representation of the avatar used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AvatarSnapshot {
    /// Current position.
    pub position: Vector2,
    /// Current velocity in world units per second.
    pub velocity: Vector2,
    /// Movement state.
    pub state: AvatarState,
    /// Whether the avatar stood on a solid tile after the last update.
    pub grounded: bool,
}

/// Immutable representation of a single boss used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BossSnapshot {
    /// Identifier assigned by the sandbox.
    pub id: BossId,
    /// Behaviour variant.
    pub kind: BossKind,
    /// Current position.
    pub position: Vector2,
    /// Remaining health.
    pub health: u32,
}

/// Read-only snapshot describing all bosses in the encounter.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BossView {
    snapshots: Vec<BossSnapshot>,
}

impl BossView {
    /// Creates a new boss view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BossSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured boss snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BossSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured bosses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the encounter has no bosses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
