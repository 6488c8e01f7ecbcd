use std::time::Duration;

use catcher_core::{Command, Event, FallingObjectId, GameConfig, MoveIntent};
use catcher_world::{self as world, query, World};

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

/// Configuration whose spawn timer never fires within a test's horizon.
fn quiet_config() -> GameConfig {
    GameConfig {
        spawn_interval: Duration::from_secs(600),
        ..GameConfig::default()
    }
}

/// Configuration where freshly spawned objects sit exactly on the player's row.
fn catch_row_config() -> GameConfig {
    let base = quiet_config();
    GameConfig {
        falling_object_size: base.player_size,
        falling_object_spawn_row: base.player_row,
        ..base
    }
}

fn new_world(config: GameConfig) -> World {
    World::new(config, SEED).expect("test configuration is valid")
}

fn spawn(world: &mut World, x: f32) -> FallingObjectId {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnFallingObject { x }, &mut events);
    match events.as_slice() {
        [Event::FallingObjectSpawned { id, .. }] => *id,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

fn run_ticks(world: &mut World, input: MoveIntent, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        world::apply(world, Command::Tick { input }, &mut events);
    }
    events
}

#[test]
fn gravity_advances_every_uncaught_object_uniformly() {
    let mut world = new_world(quiet_config());
    for x in [0.0, 100.0, 200.0] {
        let _ = spawn(&mut world, x);
    }

    let _ = run_ticks(&mut world, MoveIntent::IDLE, 20);

    let objects = query::falling_object_view(&world).into_vec();
    assert_eq!(objects.len(), 3);
    for object in objects {
        assert_eq!(object.position.y, -20.0 + 20.0 * 10.0);
    }
}

#[test]
fn overlapping_object_is_caught_exactly_once() {
    let mut world = new_world(catch_row_config());
    let player = query::player(&world);
    let id = spawn(&mut world, player.position.x);

    let object = query::falling_object_view(&world)
        .into_vec()
        .pop()
        .expect("spawned object is active");
    assert_eq!(object.collider, player.collider);

    let events = run_ticks(&mut world, MoveIntent::IDLE, 1);
    assert!(events.contains(&Event::FallingObjectCaught { id, score: 1 }));
    assert_eq!(query::score(&world), 1);
    assert!(query::falling_object_view(&world).is_empty());

    let events = run_ticks(&mut world, MoveIntent::IDLE, 10);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::FallingObjectCaught { .. })));
    assert_eq!(query::score(&world), 1);
}

#[test]
fn simultaneous_catches_are_all_counted() {
    let mut world = new_world(catch_row_config());
    let player_x = query::player(&world).position.x;
    let first = spawn(&mut world, player_x - 20.0);
    let second = spawn(&mut world, player_x);
    let third = spawn(&mut world, player_x + 20.0);

    let events = run_ticks(&mut world, MoveIntent::IDLE, 1);

    let caught: Vec<FallingObjectId> = events
        .iter()
        .filter_map(|event| match event {
            Event::FallingObjectCaught { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(caught, vec![first, second, third]);
    assert_eq!(query::score(&world), 3);
    assert!(query::falling_object_view(&world).is_empty());
}

#[test]
fn object_reaching_screen_bottom_costs_one_life() {
    let mut world = new_world(quiet_config());
    let _ = run_ticks(&mut world, MoveIntent::LEFT, 30);
    assert_eq!(query::player(&world).position.x, 0.0);

    let id = spawn(&mut world, 300.0);

    let events = run_ticks(&mut world, MoveIntent::IDLE, 49);
    let objects = query::falling_object_view(&world).into_vec();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].position.y, 470.0);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::FallingObjectMissed { .. })));

    let events = run_ticks(&mut world, MoveIntent::IDLE, 1);
    assert!(events.contains(&Event::FallingObjectMissed { id, lives: 2 }));
    assert_eq!(query::lives(&world), 2);
    assert_eq!(query::score(&world), 0);
    assert!(query::falling_object_view(&world).is_empty());
}

#[test]
fn losing_last_life_resets_the_world() {
    let mut world = new_world(catch_row_config());
    let player_x = query::player(&world).position.x;
    let _ = spawn(&mut world, player_x);
    let _ = run_ticks(&mut world, MoveIntent::IDLE, 1);
    assert_eq!(query::score(&world), 1);

    let doomed: Vec<FallingObjectId> = (0..3).map(|_| spawn(&mut world, 0.0)).collect();
    let events = run_ticks(&mut world, MoveIntent::IDLE, 6);

    let expected = vec![
        Event::FallingObjectMissed {
            id: doomed[0],
            lives: 2,
        },
        Event::FallingObjectMissed {
            id: doomed[1],
            lives: 1,
        },
        Event::FallingObjectMissed {
            id: doomed[2],
            lives: 0,
        },
        Event::WorldReset { final_score: 1 },
    ];
    let outcome: Vec<Event> = events
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                Event::FallingObjectMissed { .. } | Event::WorldReset { .. }
            )
        })
        .collect();
    assert_eq!(outcome, expected);

    assert_eq!(query::score(&world), 0);
    assert_eq!(query::lives(&world), 3);
    assert!(query::falling_object_view(&world).is_empty());
    assert_eq!(query::spawn_timer(&world).current_ticks(), 0);
    assert_eq!(
        query::player(&world).position,
        query::config(&world).player_spawn()
    );
}

#[test]
fn player_holds_left_boundary_under_continuous_input() {
    let mut world = new_world(quiet_config());
    let _ = run_ticks(&mut world, MoveIntent::LEFT, 30);
    assert_eq!(query::player(&world).position.x, 0.0);

    let events = run_ticks(&mut world, MoveIntent::LEFT, 100);

    assert_eq!(query::player(&world).position.x, 0.0);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::PlayerMoved { .. })));
}

#[test]
fn player_stops_after_crossing_right_bound() {
    let mut world = new_world(quiet_config());
    let _ = run_ticks(&mut world, MoveIntent::RIGHT, 100);

    let bound = query::config(&world).player_right_bound();
    let x = query::player(&world).position.x;
    assert!(x >= bound, "player should reach the right bound");
    assert!(x - bound < query::config(&world).player_speed());
}

#[test]
fn timer_spawned_objects_start_above_screen() {
    let mut world = new_world(GameConfig::default());
    let events = run_ticks(&mut world, MoveIntent::IDLE, 60);

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::FallingObjectSpawned { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    let position = spawned[0];
    assert_eq!(position.y, -20.0);
    assert!(position.x >= 0.0 && position.x <= 608.0);

    let active = query::falling_object_view(&world).into_vec();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].position.y, -10.0);
}

#[test]
fn misses_after_the_last_life_are_discarded_with_the_session() {
    let mut world = new_world(quiet_config());
    let ids: Vec<FallingObjectId> = (0..4).map(|_| spawn(&mut world, 0.0)).collect();

    let events = run_ticks(&mut world, MoveIntent::IDLE, 50);

    let outcome: Vec<Event> = events
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                Event::FallingObjectCaught { .. }
                    | Event::FallingObjectMissed { .. }
                    | Event::WorldReset { .. }
            )
        })
        .collect();
    assert_eq!(
        outcome,
        vec![
            Event::FallingObjectMissed {
                id: ids[0],
                lives: 2,
            },
            Event::FallingObjectMissed {
                id: ids[1],
                lives: 1,
            },
            Event::FallingObjectMissed {
                id: ids[2],
                lives: 0,
            },
            Event::WorldReset { final_score: 0 },
        ]
    );

    assert_eq!(query::lives(&world), 3);
    assert!(query::falling_object_view(&world).is_empty());

    let next = spawn(&mut world, 0.0);
    assert!(next > ids[3], "ids keep increasing across the reset");
}
