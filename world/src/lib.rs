#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Catcher.

mod falling;
mod player;

use std::mem;

use catcher_core::{
    Command, ConfigError, Event, GameConfig, MoveIntent, Timer, WELCOME_BANNER,
};
use log::{debug, info};

use self::falling::{FallingObject, Spawner};
use self::player::Player;

/// Represents the authoritative Catcher world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    player: Player,
    falling_objects: Vec<FallingObject>,
    spawn_timer: Timer,
    spawner: Spawner,
    score: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world ready for simulation.
    ///
    /// `rng_seed` drives the horizontal placement of timer-spawned objects, so
    /// two worlds built from the same configuration and seed replay
    /// identically.
    pub fn new(config: GameConfig, rng_seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            player: Player::spawn(&config),
            falling_objects: Vec::new(),
            spawn_timer: config.spawn_timer(),
            spawner: Spawner::new(rng_seed),
            score: 0,
            tick_index: 0,
            config,
        })
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let final_score = self.score;
        self.player = Player::spawn(&self.config);
        self.falling_objects.clear();
        self.spawn_timer.reset();
        self.score = 0;
        info!("world reset after scoring {final_score}");
        out_events.push(Event::WorldReset { final_score });
    }

    fn push_falling_object(&mut self, object: FallingObject, out_events: &mut Vec<Event>) {
        debug!("falling object {} spawned at {:?}", object.id.get(), object.position);
        out_events.push(Event::FallingObjectSpawned {
            id: object.id,
            position: object.position,
        });
        self.falling_objects.push(object);
    }

    fn tick(&mut self, input: MoveIntent, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let from = self.player.position.x;
        self.player.update(input, &self.config);
        let to = self.player.position.x;
        if from != to {
            out_events.push(Event::PlayerMoved { from, to });
        }

        self.spawn_timer.advance();
        if self.spawn_timer.is_ready() {
            self.spawn_timer.reset();
            let object = self.spawner.spawn_random(&self.config);
            self.push_falling_object(object, out_events);
        }

        let player_collider = self.player.collider();
        let (caught, mut remaining): (Vec<FallingObject>, Vec<FallingObject>) =
            mem::take(&mut self.falling_objects)
                .into_iter()
                .partition(|object| object.collider().intersects(&player_collider));

        for object in caught {
            self.score = self.score.saturating_add(1);
            debug!("falling object {} caught, score {}", object.id.get(), self.score);
            out_events.push(Event::FallingObjectCaught {
                id: object.id,
                score: self.score,
            });
        }

        for object in remaining.iter_mut() {
            object.update(self.config.gravity);
        }

        let screen_height = self.config.screen_height;
        let (missed, remaining): (Vec<FallingObject>, Vec<FallingObject>) = remaining
            .into_iter()
            .partition(|object| object.has_left_screen(screen_height));
        self.falling_objects = remaining;

        for object in missed {
            let lives = self.player.lose_life();
            debug!("falling object {} missed, {lives} lives left", object.id.get());
            out_events.push(Event::FallingObjectMissed {
                id: object.id,
                lives,
            });

            if lives == 0 {
                self.reset(out_events);
                return;
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { input } => world.tick(input, out_events),
        Command::SpawnFallingObject { x } => {
            let x = x.clamp(0.0, world.config.falling_object_max_x());
            let object = world.spawner.spawn_at(x, &world.config);
            world.push_falling_object(object, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use catcher_core::{FallingObjectId, GameConfig, Rect, Timer, Vector};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the configuration the world runs with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of objects caught during the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives remaining in the current session.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.player.lives
    }

    /// Number of ticks simulated since the world was created.
    ///
    /// The counter keeps running across session resets.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the timer pacing falling object spawns.
    #[must_use]
    pub fn spawn_timer(world: &World) -> &Timer {
        &world.spawn_timer
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            collider: world.player.collider(),
            lives: world.player.lives,
        }
    }

    /// Captures a read-only view of the active falling objects in spawn order.
    #[must_use]
    pub fn falling_object_view(world: &World) -> FallingObjectView {
        FallingObjectView {
            snapshots: world
                .falling_objects
                .iter()
                .map(|object| FallingObjectSnapshot {
                    id: object.id,
                    position: object.position,
                    collider: object.collider(),
                })
                .collect(),
        }
    }

    /// Immutable representation of the player used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Top-left corner of the player sprite.
        pub position: Vector,
        /// Bounding box used for catch detection.
        pub collider: Rect,
        /// Lives remaining in the current session.
        pub lives: u32,
    }

    /// Immutable representation of a single falling object used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct FallingObjectSnapshot {
        /// Identifier assigned when the object spawned.
        pub id: FallingObjectId,
        /// Top-left corner of the object sprite.
        pub position: Vector,
        /// Bounding box used for catch detection.
        pub collider: Rect,
    }

    /// Read-only snapshot describing all active falling objects.
    #[derive(Clone, Debug, Default)]
    pub struct FallingObjectView {
        snapshots: Vec<FallingObjectSnapshot>,
    }

    impl FallingObjectView {
        /// Iterator over the captured snapshots in spawn order.
        pub fn iter(&self) -> impl Iterator<Item = &FallingObjectSnapshot> {
            self.snapshots.iter()
        }

        /// Number of active falling objects.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no falling objects are active.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<FallingObjectSnapshot> {
            self.snapshots
        }
    }
}
