//! Recoverable failures surfaced to whoever drives the simulation.

use serde::Serialize;
use thiserror::Error;

use crate::{CellCoord, LevelId};

/// Failures raised while swapping levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum LevelError {
    /// The level catalog has no entry for the requested identifier.
    #[error("level {} is not defined", .0.get())]
    NotFound(LevelId),
    /// A plane was requested with a non-positive or non-finite footprint.
    #[error("plane footprint must be finite and positive")]
    InvalidPlane,
}

/// Failures raised by city grid edits and lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum CityError {
    /// The coordinate lies outside the configured grid.
    #[error("cell ({}, {}) lies outside the {width}x{height} city grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Coordinate supplied by the caller.
        cell: CellCoord,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
}

/// Failures raised by the battle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum BattleError {
    /// An action arrived while no battle was in progress.
    #[error("no battle is active")]
    NoActiveBattle,
    /// The player acted while the enemy held the turn.
    #[error("it is not the player's turn")]
    NotPlayersTurn,
    /// A battle was started over one already in progress.
    #[error("a battle is already in progress")]
    AlreadyActive,
}

/// Umbrella error covering every rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum SimError {
    /// Level loading or editing failed.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// A city edit failed.
    #[error(transparent)]
    City(#[from] CityError),
    /// A battle action failed.
    #[error(transparent)]
    Battle(#[from] BattleError),
    /// A command source tried to advance time; only the orchestrator ticks.
    #[error("ticks are issued by the orchestrator, not by command sources")]
    TickReserved,
}
