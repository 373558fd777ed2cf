use std::collections::VecDeque;
use std::convert::Infallible;
use std::thread;
use std::time::Duration;

use ghost_void_core::{
    BattleOutcome, BossKind, CellCoord, CityError, Command, Event, LevelError, LevelId, Monster,
    MonsterType, SimError, Vector2, ZoneType,
};
use ghost_void_sandbox::{ConfigError, Frame, Orchestrator, Sandbox, SandboxConfig, StopReason};

fn run_script(config: &SandboxConfig, script: Vec<Vec<Command>>) -> (StopReason, Vec<Frame>) {
    let mut orchestrator = Orchestrator::new(config).expect("valid config");
    let mut source: VecDeque<Vec<Command>> = script.into();
    let mut frames = Vec::new();
    let reason = orchestrator
        .run(&mut source, |frame| {
            frames.push(frame.clone());
            Ok::<(), Infallible>(())
        })
        .expect("infallible");
    (reason, frames)
}

fn idle_frames(count: usize) -> Vec<Vec<Command>> {
    vec![Vec::new(); count]
}

fn scripted_session() -> Vec<Vec<Command>> {
    let mut script = vec![
        vec![Command::MoveAvatar { direction: 1.0 }],
        vec![Command::SetZone {
            cell: CellCoord::new(3, 3),
            zone: ZoneType::PowerPlant,
        }],
        vec![
            Command::SetZone {
                cell: CellCoord::new(4, 3),
                zone: ZoneType::WaterPump,
            },
            Command::SetZone {
                cell: CellCoord::new(5, 3),
                zone: ZoneType::Residential,
            },
        ],
        vec![Command::StartBattle {
            player: Monster::new("Embercub", MonsterType::Fire, 30, 10),
            enemy: Monster::new("Mossling", MonsterType::Grass, 25, 8),
        }],
        vec![Command::Attack],
    ];
    script.extend(idle_frames(150));
    script.push(vec![Command::Jump, Command::Shoot]);
    script.extend(idle_frames(40));
    script
}

#[test]
fn first_frame_reports_starting_state() {
    let (_, frames) = run_script(&SandboxConfig::default(), idle_frames(1));
    let first = &frames[0];

    assert_eq!(
        first.events[0],
        Event::LevelLoaded {
            level: LevelId::new(1),
            spawn_point: Vector2::new(-50.0, 40.0),
            tile_count: 5,
        }
    );
    assert!(matches!(
        first.events[1],
        Event::BossSpawned {
            kind: BossKind::BigBoss,
            ..
        }
    ));
    assert_eq!(first.snapshot.level, Some(LevelId::new(1)));
    assert_eq!(first.snapshot.tile_count, 5);
    assert_eq!(first.snapshot.bosses.len(), 1);
    assert_eq!(first.snapshot.tick, 1);
}

#[test]
fn replaying_a_script_is_deterministic() {
    let config = SandboxConfig::default();
    let first = run_script(&config, scripted_session());
    let second = run_script(&config, scripted_session());
    assert_eq!(first, second);
}

#[test]
fn sandboxes_run_in_isolation_on_separate_threads() {
    let handles: Vec<_> = (0..2)
        .map(|_| {
            thread::spawn(|| {
                let (_, frames) = run_script(&SandboxConfig::default(), scripted_session());
                frames
            })
        })
        .collect();
    let results: Vec<Vec<Frame>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .collect();

    let (_, single) = run_script(&SandboxConfig::default(), scripted_session());
    assert_eq!(results[0], single);
    assert_eq!(results[1], single);
}

#[test]
fn sandbox_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Sandbox>();
    assert_send::<Orchestrator>();
}

#[test]
fn stop_command_ends_the_run_after_its_frame() {
    let script = vec![Vec::new(), vec![Command::Stop], Vec::new(), Vec::new()];
    let (reason, frames) = run_script(&SandboxConfig::default(), script);

    assert_eq!(reason, StopReason::Requested);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].snapshot.tick, 2);
    assert!(frames[1].events.contains(&Event::StopRequested));
}

#[test]
fn frame_limit_bounds_the_run() {
    let config = SandboxConfig {
        max_ticks: Some(5),
        ..SandboxConfig::default()
    };
    let (reason, frames) = run_script(&config, idle_frames(20));
    assert_eq!(reason, StopReason::MaxTicks);
    assert_eq!(frames.len(), 5);
}

#[test]
fn exhausted_source_ends_the_run() {
    let (reason, frames) = run_script(&SandboxConfig::default(), idle_frames(3));
    assert_eq!(reason, StopReason::SourceExhausted);
    assert_eq!(frames.len(), 3);
}

#[test]
fn tolerates_no_bosses_no_battle_and_empty_city() {
    let mut config = SandboxConfig::default();
    config.bosses.clear();
    config.city.width = 0;
    config.city.height = 0;

    let mut script = idle_frames(100);
    script.push(vec![Command::SetZone {
        cell: CellCoord::new(0, 0),
        zone: ZoneType::Residential,
    }]);
    let (reason, frames) = run_script(&config, script);

    assert_eq!(reason, StopReason::SourceExhausted);
    let last = frames.last().expect("frames ran");
    assert!(last.snapshot.bosses.is_empty());
    assert!(!last.snapshot.battle.active);
    assert_eq!(last.snapshot.population, 0);
    assert!(last.events.contains(&Event::CommandRejected {
        reason: SimError::City(CityError::OutOfBounds {
            cell: CellCoord::new(0, 0),
            width: 0,
            height: 0,
        }),
    }));
}

#[test]
fn rejected_level_load_keeps_current_level() {
    let script = vec![
        vec![Command::SpawnPlane {
            origin: Vector2::new(0.0, 0.0),
            width: 40.0,
            height: 4.0,
        }],
        vec![Command::LoadLevel {
            level: LevelId::new(99),
        }],
    ];
    let (_, frames) = run_script(&SandboxConfig::default(), script);

    assert_eq!(frames[0].snapshot.tile_count, 6);
    let last = &frames[1];
    assert_eq!(
        last.events[0],
        Event::CommandRejected {
            reason: SimError::Level(LevelError::NotFound(LevelId::new(99))),
        }
    );
    assert_eq!(last.snapshot.level, Some(LevelId::new(1)));
    assert_eq!(last.snapshot.tile_count, 6);
}

#[test]
fn bosses_close_in_on_the_avatar() {
    let (_, frames) = run_script(&SandboxConfig::default(), idle_frames(30));
    let start = frames[0].snapshot.bosses.iter().next().expect("boss").position;
    let end = frames[29].snapshot.bosses.iter().next().expect("boss").position;
    let avatar_x = frames[29].snapshot.avatar.position.x;

    assert!(avatar_x < start.x);
    assert!(end.x < start.x);
    assert_eq!(end.y, start.y);
}

#[test]
fn end_encounter_drops_every_boss() {
    let script = vec![
        vec![Command::SpawnBoss {
            kind: BossKind::Boss,
            position: Vector2::new(0.0, 0.0),
        }],
        vec![Command::EndEncounter],
    ];
    let (_, frames) = run_script(&SandboxConfig::default(), script);

    assert_eq!(frames[0].snapshot.bosses.len(), 2);
    assert!(frames[1].events.contains(&Event::EncounterEnded { removed: 2 }));
    assert!(frames[1].snapshot.bosses.is_empty());
}

#[test]
fn enemy_answers_after_its_turn_delay() {
    let config = SandboxConfig {
        fixed_dt_seconds: 0.5,
        ..SandboxConfig::default()
    };
    let mut script = vec![
        vec![Command::StartBattle {
            player: Monster::new("Embercub", MonsterType::Fire, 30, 10),
            enemy: Monster::new("Mossling", MonsterType::Grass, 25, 8),
        }],
        vec![Command::Attack],
    ];
    script.extend(idle_frames(2));
    let (_, frames) = run_script(&config, script);

    let attack_frame = &frames[1];
    assert!(attack_frame.events.contains(&Event::BattleLogged {
        line: "Embercub used Tackle! 10 damage.".to_owned(),
    }));
    assert!(!attack_frame.snapshot.battle.player_turn);
    assert_eq!(
        attack_frame.snapshot.battle.enemy.as_ref().map(Monster::hp),
        Some(15)
    );

    assert!(!frames[2].snapshot.battle.player_turn);
    let answer = &frames[3];
    assert!(answer.events.contains(&Event::BattleLogged {
        line: "Mossling used Scratch! 8 damage.".to_owned(),
    }));
    assert!(answer.snapshot.battle.player_turn);
    assert_eq!(
        answer.snapshot.battle.player.as_ref().map(Monster::hp),
        Some(22)
    );
}

#[test]
fn out_of_turn_attack_is_rejected() {
    let script = vec![vec![
        Command::StartBattle {
            player: Monster::new("Embercub", MonsterType::Fire, 30, 10),
            enemy: Monster::new("Mossling", MonsterType::Grass, 25, 8),
        },
        Command::Attack,
        Command::Attack,
    ]];
    let (_, frames) = run_script(&SandboxConfig::default(), script);
    let rejections = frames[0]
        .events
        .iter()
        .filter(|event| matches!(event, Event::CommandRejected { .. }))
        .count();
    assert_eq!(rejections, 1);
    assert_eq!(
        frames[0].snapshot.battle.enemy.as_ref().map(Monster::hp),
        Some(15)
    );
}

#[test]
fn running_reports_escape() {
    let script = vec![
        vec![Command::StartBattle {
            player: Monster::new("Embercub", MonsterType::Fire, 30, 10),
            enemy: Monster::new("Mossling", MonsterType::Grass, 25, 8),
        }],
        vec![Command::Run],
        vec![Command::Run],
    ];
    let (_, frames) = run_script(&SandboxConfig::default(), script);

    assert!(frames[1].events.contains(&Event::BattleEnded {
        outcome: BattleOutcome::Escaped,
    }));
    assert!(!frames[1].snapshot.battle.active);
    assert!(matches!(
        frames[2].events[0],
        Event::CommandRejected { .. }
    ));
}

#[test]
fn serviced_city_grows_population() {
    let config = SandboxConfig {
        fixed_dt_seconds: 0.25,
        ..SandboxConfig::default()
    };
    let mut script = vec![vec![
        Command::SetZone {
            cell: CellCoord::new(0, 0),
            zone: ZoneType::PowerPlant,
        },
        Command::SetZone {
            cell: CellCoord::new(1, 0),
            zone: ZoneType::WaterPump,
        },
        Command::SetZone {
            cell: CellCoord::new(2, 0),
            zone: ZoneType::Residential,
        },
    ]];
    script.extend(idle_frames(11));
    let (_, frames) = run_script(&config, script);

    let stepped: Vec<u32> = frames
        .iter()
        .flat_map(|frame| frame.events.iter())
        .filter_map(|event| match event {
            Event::CityStepped { population } => Some(*population),
            _ => None,
        })
        .collect();
    assert_eq!(stepped, vec![1, 2, 3]);
    assert_eq!(frames[11].snapshot.population, 3);
}

#[test]
fn command_sources_cannot_advance_time() {
    let script = vec![vec![Command::Tick {
        dt: Duration::from_secs(33_554_432),
    }]];
    let (reason, frames) = run_script(&SandboxConfig::default(), script);

    assert_eq!(reason, StopReason::SourceExhausted);
    let frame = &frames[0];
    assert!(frame.events.contains(&Event::CommandRejected {
        reason: SimError::TickReserved,
    }));
    let ticks = frame
        .events
        .iter()
        .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
        .count();
    assert_eq!(ticks, 1);
    assert_eq!(frame.snapshot.tick, 1);
    assert_eq!(frame.snapshot.population, 0);
}

#[test]
fn unknown_start_level_fails_to_build() {
    let config = SandboxConfig {
        start_level: 9,
        ..SandboxConfig::default()
    };
    let error = Orchestrator::new(&config).expect_err("level 9 is not defined");
    assert!(matches!(error, ConfigError::UnknownStartLevel(9)));
}

#[test]
fn invalid_settings_fail_to_build() {
    let mut config = SandboxConfig::default();
    config.city.step_seconds = 0.0;
    assert!(matches!(
        Orchestrator::new(&config),
        Err(ConfigError::InvalidCityStep(_))
    ));

    let mut config = SandboxConfig::default();
    config.battle.enemy_turn_seconds = f32::NAN;
    assert!(matches!(
        Orchestrator::new(&config),
        Err(ConfigError::InvalidTurnDelay(_))
    ));
}
