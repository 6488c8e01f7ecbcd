#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Catcher game.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems
//! consume to derive presentation data.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Catcher.";

/// Fixed number of simulation ticks executed per second of wall-clock time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distance the player covers per second, divided evenly across ticks.
pub const PLAYER_DISTANCE_PER_SECOND: u32 = 600;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by exactly one fixed tick.
    Tick {
        /// Movement intent sampled by the adapter for this tick.
        input: MoveIntent,
    },
    /// Appends a falling object at the provided horizontal position.
    ///
    /// The object starts at the configured spawn row just like objects
    /// produced by the spawn timer.
    SpawnFallingObject {
        /// Left edge of the new object in world units.
        x: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick: u64,
    },
    /// Reports that the player changed horizontal position.
    PlayerMoved {
        /// Horizontal position before the move.
        from: f32,
        /// Horizontal position after the move.
        to: f32,
    },
    /// Confirms that a falling object entered the world.
    FallingObjectSpawned {
        /// Identifier assigned to the object.
        id: FallingObjectId,
        /// Initial position of the object's top-left corner.
        position: Vector,
    },
    /// Confirms that the player caught a falling object.
    FallingObjectCaught {
        /// Identifier of the caught object.
        id: FallingObjectId,
        /// Score after the catch was counted.
        score: u32,
    },
    /// Reports that a falling object left the screen without being caught.
    FallingObjectMissed {
        /// Identifier of the missed object.
        id: FallingObjectId,
        /// Lives remaining after the miss was counted.
        lives: u32,
    },
    /// Announces that the world was reinitialised.
    WorldReset {
        /// Score held by the session that just ended.
        final_score: u32,
    },
}

/// Horizontal movement requested by the player for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    /// Whether the move-left control is held.
    pub left: bool,
    /// Whether the move-right control is held.
    pub right: bool,
}

impl MoveIntent {
    /// Intent with no movement requested.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
    };

    /// Intent holding only the move-left control.
    pub const LEFT: Self = Self {
        left: true,
        right: false,
    };

    /// Intent holding only the move-right control.
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
    };
}

/// Unique identifier assigned to a falling object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FallingObjectId(u32);

impl FallingObjectId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Point in world space measured in screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal coordinate, increasing to the right.
    pub x: f32,
    /// Vertical coordinate, increasing downwards.
    pub y: f32,
}

impl Vector {
    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of an entity measured in screen units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent, never negative.
    pub width: f32,
    /// Vertical extent, never negative.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle spanning `size` from `origin`.
    #[must_use]
    pub const fn from_origin_and_size(origin: Vector, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Reports whether the two rectangles overlap on both axes.
    ///
    /// Bounds are inclusive, so rectangles that only share an edge or a corner
    /// are reported as intersecting.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }
}

/// Tick-counted countdown used to pace recurring actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    current_ticks: u32,
    target_ticks: u32,
}

impl Timer {
    /// Creates a timer that becomes ready after `target_ticks` advances.
    #[must_use]
    pub const fn new(target_ticks: u32) -> Self {
        Self {
            current_ticks: 0,
            target_ticks,
        }
    }

    /// Creates a timer covering `duration` at the given simulation rate.
    ///
    /// Sub-millisecond precision is discarded and the tick count is truncated.
    #[must_use]
    pub fn from_duration(duration: Duration, ticks_per_second: u32) -> Self {
        Self::new(duration_to_ticks(duration, ticks_per_second))
    }

    /// Counts one tick, saturating at the target.
    pub fn advance(&mut self) {
        if self.current_ticks < self.target_ticks {
            self.current_ticks += 1;
        }
    }

    /// Reports whether the countdown has elapsed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.current_ticks >= self.target_ticks
    }

    /// Restarts the countdown from zero.
    pub fn reset(&mut self) {
        self.current_ticks = 0;
    }

    /// Ticks counted since the last reset.
    #[must_use]
    pub const fn current_ticks(&self) -> u32 {
        self.current_ticks
    }

    /// Ticks required before the timer reports ready.
    #[must_use]
    pub const fn target_ticks(&self) -> u32 {
        self.target_ticks
    }
}

fn duration_to_ticks(duration: Duration, ticks_per_second: u32) -> u32 {
    let ticks = duration.as_millis() * u128::from(ticks_per_second) / 1_000;
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Tunable constants that shape a game session.
///
/// Values are fixed at start-up; [`GameConfig::validate`] rejects
/// combinations the simulation cannot run with.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Width of the playable screen.
    pub screen_width: f32,
    /// Height of the playable screen.
    pub screen_height: f32,
    /// Simulation ticks executed per second.
    pub ticks_per_second: u32,
    /// Collider size of the player sprite.
    pub player_size: Size,
    /// Vertical position of the player's top edge.
    pub player_row: f32,
    /// Margin kept free between the player and the right screen edge.
    pub player_right_offset: f32,
    /// Lives granted at the start of every session.
    pub player_lives: u32,
    /// Collider size of a falling object sprite.
    pub falling_object_size: Size,
    /// Vertical position at which falling objects appear.
    pub falling_object_spawn_row: f32,
    /// Vertical distance a falling object covers per tick.
    pub gravity: f32,
    /// Delay between two timer-driven spawns.
    pub spawn_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640.0,
            screen_height: 480.0,
            ticks_per_second: TICKS_PER_SECOND,
            player_size: Size::new(40.0, 40.0),
            player_row: 420.0,
            player_right_offset: 25.0,
            player_lives: 3,
            falling_object_size: Size::new(32.0, 32.0),
            falling_object_spawn_row: -20.0,
            gravity: 10.0,
            spawn_interval: Duration::from_secs(1),
        }
    }
}

impl GameConfig {
    /// Returns a copy whose colliders match the natural size of the sprites drawn for them.
    #[must_use]
    pub fn with_sprite_sizes(self, player: Size, falling_object: Size) -> Self {
        Self {
            player_size: player,
            falling_object_size: falling_object,
            ..self
        }
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width.is_finite() && self.screen_width > 0.0)
            || !(self.screen_height.is_finite() && self.screen_height > 0.0)
        {
            return Err(ConfigError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        if self.ticks_per_second == 0 || self.ticks_per_second > PLAYER_DISTANCE_PER_SECOND {
            return Err(ConfigError::InvalidTickRate {
                ticks_per_second: self.ticks_per_second,
            });
        }

        for (entity, size) in [
            ("player", self.player_size),
            ("falling object", self.falling_object_size),
        ] {
            if !(size.width.is_finite() && size.width >= 0.0)
                || !(size.height.is_finite() && size.height >= 0.0)
            {
                return Err(ConfigError::InvalidSize {
                    entity,
                    width: size.width,
                    height: size.height,
                });
            }
        }

        if self.player_right_bound() < 0.0 {
            return Err(ConfigError::PlayerDoesNotFit {
                bound: self.player_right_bound(),
            });
        }

        if self.falling_object_size.width > self.screen_width {
            return Err(ConfigError::FallingObjectDoesNotFit {
                width: self.falling_object_size.width,
            });
        }

        if self.player_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(ConfigError::InvalidGravity {
                gravity: self.gravity,
            });
        }

        if duration_to_ticks(self.spawn_interval, self.ticks_per_second) == 0 {
            return Err(ConfigError::SpawnIntervalTooShort {
                interval: self.spawn_interval,
            });
        }

        Ok(())
    }

    /// Horizontal distance the player covers per tick.
    ///
    /// Computed with integer division, so rates that do not divide the
    /// per-second distance evenly round the speed down.
    #[must_use]
    pub fn player_speed(&self) -> f32 {
        if self.ticks_per_second == 0 {
            return 0.0;
        }
        (PLAYER_DISTANCE_PER_SECOND / self.ticks_per_second) as f32
    }

    /// Largest horizontal position the player may start a rightward move from.
    #[must_use]
    pub fn player_right_bound(&self) -> f32 {
        self.screen_width - self.player_size.width - self.player_right_offset
    }

    /// Position the player occupies at the start of a session.
    #[must_use]
    pub fn player_spawn(&self) -> Vector {
        Vector::new(
            self.screen_width / 2.0 - self.player_size.width / 2.0,
            self.player_row,
        )
    }

    /// Largest left edge a freshly spawned falling object may receive.
    #[must_use]
    pub fn falling_object_max_x(&self) -> f32 {
        (self.screen_width - self.falling_object_size.width).max(0.0)
    }

    /// Builds the timer that paces falling object spawns.
    #[must_use]
    pub fn spawn_timer(&self) -> Timer {
        Timer::from_duration(self.spawn_interval, self.ticks_per_second)
    }
}

/// Reasons a [`GameConfig`] may be rejected at start-up.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Screen dimensions must be positive and finite.
    #[error("screen dimensions must be positive (received {width}x{height})")]
    InvalidScreen {
        /// Provided screen width.
        width: f32,
        /// Provided screen height.
        height: f32,
    },
    /// Tick rate must be positive and no larger than the per-second player distance.
    #[error(
        "ticks per second must be within 1..={} (received {ticks_per_second})",
        PLAYER_DISTANCE_PER_SECOND
    )]
    InvalidTickRate {
        /// Provided tick rate.
        ticks_per_second: u32,
    },
    /// Entity sizes must be non-negative and finite.
    #[error("{entity} size must be non-negative (received {width}x{height})")]
    InvalidSize {
        /// Entity whose size failed validation.
        entity: &'static str,
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// The player plus its right offset must fit on screen.
    #[error("player does not fit on screen (right bound {bound})")]
    PlayerDoesNotFit {
        /// Computed right movement bound.
        bound: f32,
    },
    /// Falling objects must be narrower than the screen.
    #[error("falling object width {width} exceeds the screen width")]
    FallingObjectDoesNotFit {
        /// Provided falling object width.
        width: f32,
    },
    /// Sessions must start with at least one life.
    #[error("player must start with at least one life")]
    NoLives,
    /// Gravity must move objects downwards every tick.
    #[error("gravity must be positive (received {gravity})")]
    InvalidGravity {
        /// Provided gravity.
        gravity: f32,
    },
    /// Spawn interval must cover at least one tick.
    #[error("spawn interval {interval:?} is shorter than one tick")]
    SpawnIntervalTooShort {
        /// Provided spawn interval.
        interval: Duration,
    },
}
