//! Falling object state and the spawner that creates it.

use catcher_core::{FallingObjectId, GameConfig, Rect, Size, Vector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Object dropped from above the screen for the player to catch.
#[derive(Clone, Debug)]
pub(crate) struct FallingObject {
    pub(crate) id: FallingObjectId,
    pub(crate) position: Vector,
    pub(crate) size: Size,
}

impl FallingObject {
    /// Advances the object by one tick of gravity.
    pub(crate) fn update(&mut self, gravity: f32) {
        self.position.y += gravity;
    }

    /// Bounding box used for catch detection.
    pub(crate) fn collider(&self) -> Rect {
        Rect::from_origin_and_size(self.position, self.size)
    }

    /// Reports whether the object has dropped below the bottom screen edge.
    pub(crate) fn has_left_screen(&self, screen_height: f32) -> bool {
        self.position.y >= screen_height
    }
}

/// Seeded source of falling objects.
#[derive(Clone, Debug)]
pub(crate) struct Spawner {
    rng: ChaCha8Rng,
    next_id: u32,
}

impl Spawner {
    /// Creates a spawner whose horizontal placement is driven by `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Creates an object at a uniformly random column within the screen.
    pub(crate) fn spawn_random(&mut self, config: &GameConfig) -> FallingObject {
        let x = self.rng.gen::<f32>() * config.falling_object_max_x();
        self.spawn_at(x, config)
    }

    /// Creates an object at the provided column.
    pub(crate) fn spawn_at(&mut self, x: f32, config: &GameConfig) -> FallingObject {
        let id = FallingObjectId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        FallingObject {
            id,
            position: Vector::new(x, config.falling_object_spawn_row),
            size: config.falling_object_size,
        }
    }
}
