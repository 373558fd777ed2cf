#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cellular city growth simulation advanced on its own step cadence.
//!
//! Each step first recomputes power and water coverage, then moves every
//! cell's density one increment toward its target. Coverage is derived from
//! the zone layout alone: a cell is powered when a power plant lies within
//! `power_radius` cells of it in Chebyshev distance (the square centred on the
//! plant, plant included), and watered likewise for water pumps. Because the
//! result depends only on the zone snapshot, it is independent of scan order.

use ghost_void_core::{CellCoord, CityCell, CityError, ZoneType};

/// Highest density a cell can reach.
pub const MAX_DENSITY: u8 = 100;
/// Most steps a single [`CitySimulation::update`] call runs. Time owed beyond
/// this is dropped.
pub const MAX_STEPS_PER_UPDATE: u32 = 32;

const DEFAULT_STEP_INTERVAL: f32 = 1.0;
const DEFAULT_RADIUS: u32 = 5;
const DEFAULT_GROWTH_RATE: u8 = 1;

/// Configuration parameters required to construct the city simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    step_interval: f32,
    power_radius: u32,
    water_radius: u32,
    growth_rate: u8,
}

impl Config {
    /// Creates a configuration with the step cadence in seconds and the
    /// coverage radii of power plants and water pumps in cells.
    #[must_use]
    pub const fn new(step_interval: f32, power_radius: u32, water_radius: u32) -> Self {
        Self {
            step_interval,
            power_radius,
            water_radius,
            growth_rate: DEFAULT_GROWTH_RATE,
        }
    }

    /// Sets how much density changes per step.
    #[must_use]
    pub const fn with_growth_rate(mut self, growth_rate: u8) -> Self {
        self.growth_rate = growth_rate;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL, DEFAULT_RADIUS, DEFAULT_RADIUS)
    }
}

/// Grid of zoned cells.
#[derive(Clone, Debug)]
pub struct CitySimulation {
    width: u32,
    height: u32,
    cells: Vec<CityCell>,
    timer: f32,
    config: Config,
}

impl CitySimulation {
    /// Creates an unzoned grid of `width` by `height` cells.
    #[must_use]
    pub fn new(width: u32, height: u32, config: Config) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![CityCell::default(); capacity],
            timer: 0.0,
            config,
        }
    }

    /// Accumulates `dt` seconds and runs the simulation steps that came due,
    /// at most [`MAX_STEPS_PER_UPDATE`] of them. Non-finite `dt` is ignored.
    ///
    /// Returns the number of steps that ran.
    pub fn update(&mut self, dt: f32) -> u32 {
        let interval = self.config.step_interval;
        if !(interval > 0.0) {
            return 0;
        }

        if dt.is_finite() {
            self.timer += dt.max(0.0);
        }
        let mut steps = 0;
        while self.timer >= interval && steps < MAX_STEPS_PER_UPDATE {
            self.timer -= interval;
            self.step();
            steps += 1;
        }
        if self.timer >= interval {
            self.timer %= interval;
        }
        steps
    }

    /// Runs one resource pass followed by one growth pass.
    pub fn step(&mut self) {
        self.simulate_resources();
        self.simulate_growth();
    }

    /// Rezones a cell. Density and coverage are left for the next step.
    pub fn set_zone(&mut self, cell: CellCoord, zone: ZoneType) -> Result<(), CityError> {
        let index = self.index(cell)?;
        self.cells[index].zone = zone;
        Ok(())
    }

    /// Reads a single cell.
    pub fn cell(&self, cell: CellCoord) -> Result<&CityCell, CityError> {
        let index = self.index(cell)?;
        Ok(&self.cells[index])
    }

    /// Sum of the density of every residential cell.
    #[must_use]
    pub fn population(&self) -> u32 {
        self.cells
            .iter()
            .filter(|cell| cell.zone == ZoneType::Residential)
            .map(|cell| u32::from(cell.density))
            .sum()
    }

    /// Recomputes power and water coverage from the current zone layout.
    pub fn simulate_resources(&mut self) {
        let mut plants = Vec::new();
        let mut pumps = Vec::new();
        for (coord, cell) in self.iter_coords() {
            match cell.zone {
                ZoneType::PowerPlant => plants.push(coord),
                ZoneType::WaterPump => pumps.push(coord),
                _ => {}
            }
        }

        let power_radius = self.config.power_radius;
        let water_radius = self.config.water_radius;
        let coverage: Vec<(bool, bool)> = self
            .iter_coords()
            .map(|(coord, _)| {
                (
                    within(&plants, coord, power_radius),
                    within(&pumps, coord, water_radius),
                )
            })
            .collect();

        for (cell, (has_power, has_water)) in self.cells.iter_mut().zip(coverage) {
            cell.has_power = has_power;
            cell.has_water = has_water;
        }
    }

    /// Moves each cell's density one increment toward its target.
    ///
    /// Residential, commercial, and industrial cells with both power and water
    /// grow toward [`MAX_DENSITY`]; every other cell decays toward zero.
    pub fn simulate_growth(&mut self) {
        let rate = self.config.growth_rate;
        for cell in &mut self.cells {
            let serviced = cell.zone.grows() && cell.has_power && cell.has_water;
            cell.density = if serviced {
                cell.density.saturating_add(rate).min(MAX_DENSITY)
            } else {
                cell.density.saturating_sub(rate)
            };
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CityCell] {
        &self.cells
    }

    fn iter_coords(&self) -> impl Iterator<Item = (CellCoord, &CityCell)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), cell)
        })
    }

    fn index(&self, cell: CellCoord) -> Result<usize, CityError> {
        let out_of_bounds = CityError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        };
        if cell.column() >= self.width || cell.row() >= self.height {
            return Err(out_of_bounds);
        }
        let row = usize::try_from(cell.row()).map_err(|_| out_of_bounds)?;
        let column = usize::try_from(cell.column()).map_err(|_| out_of_bounds)?;
        let width = usize::try_from(self.width).map_err(|_| out_of_bounds)?;
        Ok(row * width + column)
    }
}

fn within(sources: &[CellCoord], cell: CellCoord, radius: u32) -> bool {
    sources
        .iter()
        .any(|source| source.chebyshev_distance(cell) <= radius)
}
