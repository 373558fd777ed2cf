//! Fixed-step loop that feeds commands into a boxed sandbox.

use std::collections::VecDeque;
use std::time::Duration;

use ghost_void_core::{Command, Event, LevelId, SimError};
use ghost_void_world::query;
use serde::Serialize;

use crate::{ConfigError, Sandbox, SandboxConfig, SandboxSnapshot};

/// Supplies the commands to apply before each tick.
pub trait CommandSource {
    /// Commands for the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<Vec<Command>>;
}

impl CommandSource for VecDeque<Vec<Command>> {
    fn next_frame(&mut self) -> Option<Vec<Command>> {
        self.pop_front()
    }
}

/// Outcome of one loop iteration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Events raised by the frame's commands and its tick, in order.
    pub events: Vec<Event>,
    /// Sandbox state after the tick.
    pub snapshot: SandboxSnapshot,
}

/// Why [`Orchestrator::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A [`Command::Stop`] was applied.
    Requested,
    /// The configured frame limit was reached.
    MaxTicks,
    /// The command source ran dry.
    SourceExhausted,
}

/// Sole owner and driver of one sandbox.
#[derive(Debug)]
pub struct Orchestrator {
    sandbox: Box<Sandbox>,
    fixed_dt: Duration,
    max_ticks: Option<u64>,
    pending: Vec<Event>,
}

impl Orchestrator {
    /// Builds the sandbox and applies the configured starting commands.
    ///
    /// Events raised while starting are delivered with the first frame. A
    /// start level missing from the catalog fails with
    /// [`ConfigError::UnknownStartLevel`].
    pub fn new(config: &SandboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fixed_dt = config.fixed_dt()?;
        let mut sandbox = Box::new(Sandbox::new(config));
        let mut pending = Vec::new();
        for command in config.initial_commands() {
            sandbox.apply(command, &mut pending);
        }
        if query::current_level(sandbox.world()) != Some(LevelId::new(config.start_level)) {
            return Err(ConfigError::UnknownStartLevel(config.start_level));
        }

        Ok(Self {
            sandbox,
            fixed_dt,
            max_ticks: config.max_ticks,
            pending,
        })
    }

    /// Runs frames until a stop condition holds.
    ///
    /// Each frame applies the source's commands in order, then one fixed tick,
    /// then hands the frame to `on_frame`. An error from `on_frame` aborts the
    /// loop and is returned unchanged.
    pub fn run<S, F, E>(&mut self, source: &mut S, mut on_frame: F) -> Result<StopReason, E>
    where
        S: CommandSource + ?Sized,
        F: FnMut(&Frame) -> Result<(), E>,
    {
        tracing::info!(
            dt = self.fixed_dt.as_secs_f32(),
            max_ticks = ?self.max_ticks,
            "orchestrator started"
        );

        let reason = loop {
            if self.limit_reached() {
                break StopReason::MaxTicks;
            }
            let Some(commands) = source.next_frame() else {
                break StopReason::SourceExhausted;
            };

            let frame = self.step(commands);
            on_frame(&frame)?;

            if self.sandbox.stop_requested() {
                break StopReason::Requested;
            }
        };

        tracing::info!(?reason, ticks = self.sandbox.tick_count(), "orchestrator stopped");
        Ok(reason)
    }

    /// Applies `commands` followed by one fixed tick.
    ///
    /// [`Command::Tick`] among `commands` is refused; time only advances by
    /// the fixed step.
    pub fn step(&mut self, commands: Vec<Command>) -> Frame {
        let mut events = std::mem::take(&mut self.pending);
        for command in commands {
            if matches!(command, Command::Tick { .. }) {
                tracing::warn!("command source tried to tick");
                events.push(Event::CommandRejected {
                    reason: SimError::TickReserved,
                });
                continue;
            }
            self.sandbox.apply(command, &mut events);
        }
        self.sandbox
            .apply(Command::Tick { dt: self.fixed_dt }, &mut events);

        tracing::debug!(
            tick = self.sandbox.tick_count(),
            events = events.len(),
            "frame complete"
        );
        Frame {
            events,
            snapshot: self.sandbox.snapshot(),
        }
    }

    /// The owned sandbox.
    #[must_use]
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Simulated time advanced per frame.
    #[must_use]
    pub const fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    fn limit_reached(&self) -> bool {
        self.max_ticks
            .is_some_and(|limit| self.sandbox.tick_count() >= limit)
    }
}
