#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based monster battle resolver.
//!
//! The battle cycles `Idle -> PlayerTurn -> EnemyTurn -> PlayerTurn ...` and
//! returns to `Idle` when either monster faints or the player runs. Player
//! actions resolve immediately; the enemy answers on its own turn once the
//! configured thinking delay has accumulated through [`BattleSystem::update`].

use ghost_void_core::{BattleError, BattleOutcome, BattleSnapshot, Monster};

const DEFAULT_ENEMY_TURN_DELAY: f32 = 1.5;

/// Configuration parameters required to construct the battle system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    enemy_turn_delay: f32,
}

impl Config {
    /// Creates a configuration with the enemy's thinking delay in seconds.
    #[must_use]
    pub const fn new(enemy_turn_delay: f32) -> Self {
        Self { enemy_turn_delay }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ENEMY_TURN_DELAY)
    }
}

/// Phase of the battle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No battle in progress.
    Idle,
    /// Waiting for the player to act.
    PlayerTurn,
    /// The enemy is about to act.
    EnemyTurn,
}

#[derive(Clone, Debug)]
struct Combatants {
    player: Monster,
    enemy: Monster,
}

/// Battle state machine for a single player-versus-enemy encounter.
#[derive(Clone, Debug)]
pub struct BattleSystem {
    enemy_turn_delay: f32,
    active: bool,
    combatants: Option<Combatants>,
    log: Vec<String>,
    turn_timer: f32,
    player_turn: bool,
    outcome: Option<BattleOutcome>,
}

impl Default for BattleSystem {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BattleSystem {
    /// Creates an idle battle system.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            enemy_turn_delay: config.enemy_turn_delay,
            active: false,
            combatants: None,
            log: Vec::new(),
            turn_timer: 0.0,
            player_turn: true,
            outcome: None,
        }
    }

    /// Starts a battle between copies of the two monsters.
    ///
    /// Fails with [`BattleError::AlreadyActive`] while a battle is in progress.
    /// A monster that enters already fainted decides the battle on the spot.
    pub fn start_battle(&mut self, player: Monster, enemy: Monster) -> Result<(), BattleError> {
        if self.active {
            return Err(BattleError::AlreadyActive);
        }

        tracing::info!(player = player.name(), enemy = enemy.name(), "battle started");
        self.log.clear();
        self.log.push(format!("A wild {} appeared!", enemy.name()));
        self.combatants = Some(Combatants { player, enemy });
        self.active = true;
        self.turn_timer = 0.0;
        self.player_turn = true;
        self.outcome = None;

        let (player_down, enemy_down) = self
            .combatants
            .as_ref()
            .map_or((false, false), |c| (c.player.is_fainted(), c.enemy.is_fainted()));
        if player_down {
            self.finish(BattleOutcome::Defeat, "You blacked out!");
        } else if enemy_down {
            self.finish(BattleOutcome::Victory, "You won!");
        }
        Ok(())
    }

    /// Accumulates the turn timer and resolves the enemy's turn once it is due.
    ///
    /// During the player's turn the timer does not advance; the battle waits
    /// for [`BattleSystem::attack`] or [`BattleSystem::run`].
    pub fn update(&mut self, dt: f32) {
        if !self.active || self.player_turn {
            return;
        }

        self.turn_timer += dt;
        if self.turn_timer >= self.enemy_turn_delay {
            self.turn_timer = 0.0;
            self.enemy_turn();
            if self.active {
                self.player_turn = true;
            }
        }
    }

    /// The player's monster attacks the enemy.
    ///
    /// Damage equals the attacker's `attack`, floored at zero hit points. A
    /// knockout ends the battle; otherwise the turn passes to the enemy.
    pub fn attack(&mut self) -> Result<(), BattleError> {
        if !self.active {
            return Err(BattleError::NoActiveBattle);
        }
        if !self.player_turn {
            return Err(BattleError::NotPlayersTurn);
        }
        let Some(combatants) = self.combatants.as_mut() else {
            return Err(BattleError::NoActiveBattle);
        };

        let damage = combatants.player.attack();
        combatants.enemy.take_damage(damage);
        let line = format!("{} used Tackle! {damage} damage.", combatants.player.name());
        let knocked_out = combatants.enemy.is_fainted();
        self.log.push(line);

        if knocked_out {
            self.finish(BattleOutcome::Victory, "You won!");
        } else {
            self.player_turn = false;
        }
        Ok(())
    }

    /// The player flees, ending the battle without damage.
    pub fn run(&mut self) -> Result<(), BattleError> {
        if !self.active {
            return Err(BattleError::NoActiveBattle);
        }
        self.finish(BattleOutcome::Escaped, "Got away safely!");
        Ok(())
    }

    /// Reports whether a battle is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Reports whether the player holds the turn.
    #[must_use]
    pub const fn is_player_turn(&self) -> bool {
        self.player_turn
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match (self.active, self.player_turn) {
            (false, _) => Phase::Idle,
            (true, true) => Phase::PlayerTurn,
            (true, false) => Phase::EnemyTurn,
        }
    }

    /// The player's monster in its current state, if a battle ever started.
    #[must_use]
    pub fn player_monster(&self) -> Option<&Monster> {
        self.combatants.as_ref().map(|c| &c.player)
    }

    /// The enemy monster in its current state, if a battle ever started.
    #[must_use]
    pub fn enemy_monster(&self) -> Option<&Monster> {
        self.combatants.as_ref().map(|c| &c.enemy)
    }

    /// Log lines of the current or most recent battle, oldest first.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Seconds accumulated toward the enemy's action.
    #[must_use]
    pub const fn turn_timer(&self) -> f32 {
        self.turn_timer
    }

    /// How the most recent battle ended, once it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Captures the battle for read-only consumers.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            active: self.active,
            player_turn: self.player_turn,
            player: self.player_monster().cloned(),
            enemy: self.enemy_monster().cloned(),
            log: self.log.clone(),
            outcome: self.outcome,
        }
    }

    fn enemy_turn(&mut self) {
        let Some(combatants) = self.combatants.as_mut() else {
            return;
        };

        let damage = combatants.enemy.attack();
        combatants.player.take_damage(damage);
        let line = format!("{} used Scratch! {damage} damage.", combatants.enemy.name());
        let knocked_out = combatants.player.is_fainted();
        self.log.push(line);

        if knocked_out {
            self.finish(BattleOutcome::Defeat, "You blacked out!");
        }
    }

    fn finish(&mut self, outcome: BattleOutcome, line: &str) {
        self.log.push(line.to_owned());
        self.active = false;
        self.player_turn = true;
        self.turn_timer = 0.0;
        self.outcome = Some(outcome);
        tracing::info!(?outcome, "battle ended");
    }
}
