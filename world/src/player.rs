//! Player-controlled catcher state.

use catcher_core::{GameConfig, MoveIntent, Rect, Size, Vector};

/// Sprite steered by the player along the bottom of the screen.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Vector,
    pub(crate) size: Size,
    pub(crate) lives: u32,
}

impl Player {
    /// Creates a player at the configured spawn point with a full set of lives.
    pub(crate) fn spawn(config: &GameConfig) -> Self {
        Self {
            position: config.player_spawn(),
            size: config.player_size,
            lives: config.player_lives,
        }
    }

    /// Applies one tick of horizontal movement.
    ///
    /// A leftward step is dropped when it would cross the left screen edge.
    /// The rightward check only inspects the position before the step, so the
    /// final step towards the right bound may overshoot it by less than one
    /// speed increment.
    pub(crate) fn update(&mut self, input: MoveIntent, config: &GameConfig) {
        let speed = config.player_speed();

        if input.left && self.position.x - speed >= 0.0 {
            self.position.x -= speed;
        }

        if input.right && self.position.x < config.player_right_bound() {
            self.position.x += speed;
        }
    }

    /// Bounding box used for catch detection.
    pub(crate) fn collider(&self) -> Rect {
        Rect::from_origin_and_size(self.position, self.size)
    }

    /// Removes a single life and returns the remaining count.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}
