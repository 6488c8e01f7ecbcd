use std::collections::HashSet;

use catcher_core::{Command, Event, GameConfig, MoveIntent};
use catcher_world::{self as world, query, World};

const REPLAY_TICKS: usize = 6_000;

#[test]
fn replay_with_same_seed_produces_identical_events() {
    let first = replay(0x42f0_e1eb_d4a5_3c21);
    let second = replay(0x42f0_e1eb_d4a5_3c21);

    assert_eq!(first.events, second.events, "replay diverged between runs");
    assert_eq!(first.score, second.score);
    assert_eq!(first.lives, second.lives);
}

#[test]
fn every_object_leaves_the_world_at_most_once() {
    let outcome = replay(0x1234_5678);

    let mut spawned = HashSet::new();
    let mut removed = HashSet::new();
    for event in &outcome.events {
        match event {
            Event::FallingObjectSpawned { id, .. } => {
                assert!(spawned.insert(*id), "object {} spawned twice", id.get());
            }
            Event::FallingObjectCaught { id, .. } | Event::FallingObjectMissed { id, .. } => {
                assert!(spawned.contains(id), "object {} removed before spawning", id.get());
                assert!(removed.insert(*id), "object {} removed twice", id.get());
            }
            _ => {}
        }
    }

    assert!(
        !removed.is_empty(),
        "the scripted replay should catch or miss at least one object"
    );
}

#[test]
fn counters_match_events_since_last_reset() {
    let outcome = replay(0xdead_beef);

    let since_reset = outcome
        .events
        .iter()
        .rposition(|event| matches!(event, Event::WorldReset { .. }))
        .map_or(&outcome.events[..], |index| &outcome.events[index + 1..]);

    let catches = since_reset
        .iter()
        .filter(|event| matches!(event, Event::FallingObjectCaught { .. }))
        .count();
    let misses = since_reset
        .iter()
        .filter(|event| matches!(event, Event::FallingObjectMissed { .. }))
        .count();

    assert_eq!(outcome.score as usize, catches);
    assert_eq!(outcome.lives as usize, 3 - misses);
}

#[test]
fn lives_reported_by_misses_never_go_negative_and_trigger_reset_at_zero() {
    let outcome = replay(0x0bad_cafe);

    let mut previous: Option<&Event> = None;
    for event in &outcome.events {
        if let Some(Event::FallingObjectMissed { lives: 0, .. }) = previous {
            assert!(
                matches!(event, Event::WorldReset { .. }),
                "last life lost without a reset: {event:?}"
            );
        }
        previous = Some(event);
    }
}

struct ReplayOutcome {
    events: Vec<Event>,
    score: u32,
    lives: u32,
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut world = World::new(GameConfig::default(), seed).expect("default config is valid");
    let mut events = Vec::new();

    for (tick, input) in scripted_inputs().enumerate() {
        if tick % 97 == 0 {
            let x = (tick % 600) as f32;
            world::apply(&mut world, Command::SpawnFallingObject { x }, &mut events);
        }
        world::apply(&mut world, Command::Tick { input }, &mut events);
    }

    ReplayOutcome {
        score: query::score(&world),
        lives: query::lives(&world),
        events,
    }
}

fn scripted_inputs() -> impl Iterator<Item = MoveIntent> {
    (0..REPLAY_TICKS).map(|tick| match (tick / 45) % 4 {
        0 => MoveIntent::LEFT,
        1 | 3 => MoveIntent::IDLE,
        _ => MoveIntent::RIGHT,
    })
}
