#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Self-contained simulation context and the fixed-step loop that drives it.
//!
//! A [`Sandbox`] exclusively owns one world, the avatar, the active boss set,
//! the battle state machine, and the city grid. Nothing is shared between
//! sandboxes, so independent instances can live on separate threads. Every
//! mutation arrives as a [`Command`] through [`Sandbox::apply`], which reports
//! what changed as [`Event`] values.

pub mod config;
mod orchestrator;

pub use config::{
    BattleSettings, BossSpawn, CitySettings, ConfigError, SandboxConfig, MAX_CITY_CELLS,
    MIN_CITY_STEP_SECONDS,
};
pub use orchestrator::{CommandSource, Frame, Orchestrator, StopReason};

use std::time::Duration;

use ghost_void_core::{
    AvatarSnapshot, BattleError, BattleSnapshot, BossId, BossView, Command, Event, LevelId,
    SimError, Vector2,
};
use ghost_void_system_battle::{self as battle, BattleSystem};
use ghost_void_system_boss_ai::Boss;
use ghost_void_system_city::{self as city, CitySimulation};
use ghost_void_world::{self as world, Avatar, World};
use serde::Serialize;

/// Everything one simulation instance owns.
#[derive(Debug)]
pub struct Sandbox {
    world: World,
    avatar: Avatar,
    bosses: Vec<Boss>,
    next_boss_id: u32,
    battle: BattleSystem,
    city: CitySimulation,
    tick: u64,
    stop_requested: bool,
}

impl Sandbox {
    /// Creates a sandbox with no level loaded, no bosses, and an idle battle.
    #[must_use]
    pub fn new(config: &SandboxConfig) -> Self {
        let world = World::new();
        let avatar = Avatar::new(world::query::spawn_point(&world));
        let city_config = city::Config::new(
            config.city.step_seconds,
            config.city.power_radius,
            config.city.water_radius,
        )
        .with_growth_rate(config.city.growth_rate);

        Self {
            world,
            avatar,
            bosses: Vec::new(),
            next_boss_id: 0,
            battle: BattleSystem::new(battle::Config::new(config.battle.enemy_turn_seconds)),
            city: CitySimulation::new(config.city.width, config.city.height, city_config),
            tick: 0,
            stop_requested: false,
        }
    }

    /// Executes a command, appending the resulting events to `out_events`.
    ///
    /// A rejected command leaves the sandbox untouched and reports a single
    /// [`Event::CommandRejected`].
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.execute(command, out_events) {
            tracing::warn!(%reason, "command rejected");
            out_events.push(Event::CommandRejected { reason });
        }
    }

    fn execute(&mut self, command: Command, out_events: &mut Vec<Event>) -> Result<(), SimError> {
        match command {
            Command::LoadLevel { level } => {
                let data = self.world.load_level(level)?;
                let spawn_point = data.spawn_point();
                let tile_count = data.tiles().len();
                self.avatar.respawn(spawn_point);
                out_events.push(Event::LevelLoaded {
                    level,
                    spawn_point,
                    tile_count,
                });
            }
            Command::SpawnPlane {
                origin,
                width,
                height,
            } => {
                let tile = self.world.spawn_plane(origin, width, height)?;
                out_events.push(Event::PlaneSpawned { tile });
            }
            Command::MoveAvatar { direction } => self.avatar.set_direction(direction),
            Command::Jump => {
                if self.avatar.jump() {
                    out_events.push(Event::AvatarJumped);
                }
            }
            Command::Shoot => {
                self.avatar.shoot();
                out_events.push(Event::AvatarFired);
            }
            Command::SpawnBoss { kind, position } => {
                let id = BossId::new(self.next_boss_id);
                self.next_boss_id += 1;
                self.bosses.push(Boss::spawn(id, kind, position));
                tracing::info!(boss = id.get(), ?kind, "boss spawned");
                out_events.push(Event::BossSpawned {
                    boss: id,
                    kind,
                    position,
                });
            }
            Command::EndEncounter => {
                let removed = self.bosses.len();
                self.bosses.clear();
                tracing::info!(removed, "encounter ended");
                out_events.push(Event::EncounterEnded { removed });
            }
            Command::StartBattle { player, enemy } => {
                let player_name = player.name().to_owned();
                let enemy_name = enemy.name().to_owned();
                self.battle.start_battle(player, enemy)?;
                out_events.push(Event::BattleStarted {
                    player: player_name,
                    enemy: enemy_name,
                });
                self.report_battle(0, true, out_events);
            }
            Command::Attack => self.battle_action(BattleSystem::attack, out_events)?,
            Command::Run => self.battle_action(BattleSystem::run, out_events)?,
            Command::SetZone { cell, zone } => {
                self.city.set_zone(cell, zone)?;
                out_events.push(Event::ZoneChanged { cell, zone });
            }
            Command::Tick { dt } => self.tick(dt, out_events),
            Command::Stop => {
                self.stop_requested = true;
                out_events.push(Event::StopRequested);
            }
        }
        Ok(())
    }

    /// Advances every subsystem by `dt`.
    ///
    /// The avatar moves first so bosses chase its updated position; the battle
    /// and the city then advance on their own cadences.
    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        out_events.push(Event::TimeAdvanced { dt });

        self.avatar.update(seconds, &self.world);

        let target = self.avatar.position();
        for boss in &mut self.bosses {
            boss.update(seconds, target);
        }

        let log_start = self.battle.log().len();
        let was_active = self.battle.is_active();
        self.battle.update(seconds);
        self.report_battle(log_start, was_active, out_events);

        if self.city.update(seconds) > 0 {
            out_events.push(Event::CityStepped {
                population: self.city.population(),
            });
        }

        self.tick += 1;
    }

    fn battle_action(
        &mut self,
        action: fn(&mut BattleSystem) -> Result<(), BattleError>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimError> {
        let log_start = self.battle.log().len();
        let was_active = self.battle.is_active();
        action(&mut self.battle)?;
        self.report_battle(log_start, was_active, out_events);
        Ok(())
    }

    fn report_battle(&self, log_start: usize, was_active: bool, out_events: &mut Vec<Event>) {
        let log = self.battle.log();
        out_events.extend(
            log.get(log_start..)
                .unwrap_or_default()
                .iter()
                .map(|line| Event::BattleLogged { line: line.clone() }),
        );

        if was_active && !self.battle.is_active() {
            if let Some(outcome) = self.battle.outcome() {
                out_events.push(Event::BattleEnded { outcome });
            }
        }
    }

    /// Captures the sandbox for read-only consumers.
    #[must_use]
    pub fn snapshot(&self) -> SandboxSnapshot {
        SandboxSnapshot {
            tick: self.tick,
            level: world::query::current_level(&self.world),
            spawn_point: world::query::spawn_point(&self.world),
            tile_count: world::query::tiles(&self.world).len(),
            avatar: self.avatar.snapshot(),
            bosses: BossView::from_snapshots(self.bosses.iter().map(Boss::snapshot).collect()),
            battle: self.battle.snapshot(),
            population: self.city.population(),
        }
    }

    /// The level state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player body.
    #[must_use]
    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    /// Bosses in the active encounter, in spawn order.
    #[must_use]
    pub fn bosses(&self) -> &[Boss] {
        &self.bosses
    }

    /// The battle state machine.
    #[must_use]
    pub fn battle(&self) -> &BattleSystem {
        &self.battle
    }

    /// The city grid.
    #[must_use]
    pub fn city(&self) -> &CitySimulation {
        &self.city
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Reports whether a [`Command::Stop`] has been applied.
    #[must_use]
    pub const fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

/// Read-only view of a sandbox, polled once per frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SandboxSnapshot {
    /// Ticks applied so far.
    pub tick: u64,
    /// Last successfully loaded level.
    pub level: Option<LevelId>,
    /// Spawn point of the current level.
    pub spawn_point: Vector2,
    /// Tiles in the current level, planes included.
    pub tile_count: usize,
    /// The player body.
    pub avatar: AvatarSnapshot,
    /// Active bosses ordered by identifier.
    pub bosses: BossView,
    /// Battle state.
    pub battle: BattleSnapshot,
    /// Sum of residential density in the city.
    pub population: u32,
}
