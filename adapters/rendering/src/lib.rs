#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Catcher adapters.

use anyhow::Result as AnyResult;
use catcher_core::{MoveIntent, Vector};
use glam::Vec2;
use log::warn;
use std::time::Duration;
use thiserror::Error;

/// Largest number of simulation ticks a single frame may run before backlog is dropped.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Longest frame delta accepted by [`FixedTimestep`]; longer stalls are clamped.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Opaque red used by the lives counter.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Background colour of the playfield.
    pub const CORNFLOWER_BLUE: Self = Self::from_rgb_u8(100, 149, 237);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Identifies an image loaded by the backend from the asset manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Character steered by the player.
    Player,
    /// Object dropped from the top of the screen.
    FallingObject,
    /// Heart drawn next to the lives counter.
    HealthIcon,
}

impl SpriteKey {
    /// Every sprite the backend must load before the first frame.
    pub const ALL: [Self; 3] = [Self::Player, Self::FallingObject, Self::HealthIcon];
}

/// Identifies a font face and size loaded by the backend from the asset manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontKey {
    /// Large face used by the score counter.
    Score,
    /// Smaller face used by the lives counter.
    Health,
}

impl FontKey {
    /// Every font the backend must load before the first frame.
    pub const ALL: [Self; 2] = [Self::Score, Self::Health];
}

/// Placement applied to an image or text: scale about the origin, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Screen-space position of the drawn item's top-left corner.
    pub translation: Vec2,
    /// Scale applied to the item's natural size.
    pub scale: Vec2,
}

impl Transform {
    /// Transform that leaves items at the origin with their natural size.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        scale: Vec2::ONE,
    };

    /// Creates an unscaled transform positioned at the provided coordinates.
    #[must_use]
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translation: Vec2::new(x, y),
            scale: Vec2::ONE,
        }
    }

    /// Creates an unscaled transform positioned at a world vector.
    #[must_use]
    pub fn at(position: Vector) -> Self {
        Self::translate(position.x, position.y)
    }

    /// Returns a copy uniformly scaled by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    /// Size on screen of an item whose natural size is `natural`.
    #[must_use]
    pub fn scaled_size(&self, natural: Vec2) -> Vec2 {
        natural * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Single drawing instruction recorded into a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Draw a loaded image.
    Image {
        /// Image to draw.
        sprite: SpriteKey,
        /// Placement of the image.
        transform: Transform,
    },
    /// Draw a line of text.
    Text {
        /// Characters to draw.
        text: String,
        /// Font face and size.
        font: FontKey,
        /// Placement of the text's top-left corner.
        transform: Transform,
        /// Fill colour of the glyphs.
        color: Color,
    },
}

/// Draw target handed to [`Game::draw`]; backends replay it in recording order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    clear_color: Option<Color>,
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the whole target with `color`, discarding anything drawn before.
    pub fn fill(&mut self, color: Color) {
        self.clear_color = Some(color);
        self.commands.clear();
    }

    /// Queues an image draw.
    pub fn draw_image(&mut self, sprite: SpriteKey, transform: Transform) {
        self.commands.push(DrawCommand::Image { sprite, transform });
    }

    /// Queues a text draw.
    pub fn draw_text(
        &mut self,
        text: impl Into<String>,
        font: FontKey,
        transform: Transform,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            font,
            transform,
            color,
        });
    }

    /// Colour the frame was last filled with, if any.
    #[must_use]
    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    /// Recorded commands in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Empties the frame so it can be reused for the next render pass.
    pub fn reset(&mut self) {
        self.clear_color = None;
        self.commands.clear();
    }
}

/// Input snapshot gathered by adapters before updating the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the left arrow key is held.
    pub left: bool,
    /// Whether the right arrow key is held.
    pub right: bool,
}

impl FrameInput {
    /// Converts the key state into a movement request for the simulation.
    #[must_use]
    pub const fn move_intent(self) -> MoveIntent {
        MoveIntent {
            left: self.left,
            right: self.right,
        }
    }
}

/// Game driven by a rendering backend.
pub trait Game {
    /// Advances the game by exactly one simulation tick.
    fn update(&mut self, input: FrameInput) -> AnyResult<()>;

    /// Records the current state into `frame`.
    fn draw(&self, frame: &mut Frame);

    /// Returns the logical screen size for the given window size.
    fn layout(&self, outer_width: u32, outer_height: u32) -> (u32, u32) {
        (outer_width, outer_height)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear the window before the game draws.
    pub clear_color: Color,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Simulation rate the backend drives [`Game::update`] at.
    pub ticks_per_second: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        (width, height): (u32, u32),
        ticks_per_second: u32,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            width,
            height,
            ticks_per_second,
        }
    }
}

/// Rendering backend capable of presenting Catcher games.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The backend calls [`Game::update`] once per simulation tick at the
    /// presentation's tick rate and [`Game::draw`] once per displayed frame.
    fn run<G>(self, presentation: Presentation, game: G) -> AnyResult<()>
    where
        G: Game + 'static;
}

/// Converts variable frame deltas into a whole number of fixed simulation ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedTimestep {
    tick: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    /// Creates a timestep running `ticks_per_second` simulation ticks per second.
    pub fn new(ticks_per_second: u32) -> Result<Self, RenderingError> {
        if ticks_per_second == 0 {
            return Err(RenderingError::InvalidTickRate { ticks_per_second });
        }

        Ok(Self {
            tick: Duration::from_secs(1) / ticks_per_second,
            accumulator: Duration::ZERO,
        })
    }

    /// Duration of a single simulation tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Accumulates `frame_delta` and returns how many ticks should run now.
    pub fn advance(&mut self, frame_delta: Duration) -> u32 {
        self.accumulator += frame_delta.min(MAX_FRAME_DELTA);

        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.tick;
            ticks += 1;
        }

        if self.accumulator >= self.tick {
            let dropped = self.accumulator.as_nanos() / self.tick.as_nanos();
            warn!("simulation fell behind; dropping {dropped} pending ticks");
            self.accumulator = Duration::ZERO;
        }

        ticks
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// A timestep needs at least one tick per second.
    #[error("ticks_per_second must be positive (received {ticks_per_second})")]
    InvalidTickRate {
        /// Provided tick rate that failed validation.
        ticks_per_second: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_bytes_normalises_channels() {
        let color = Color::CORNFLOWER_BLUE;
        assert_eq!(color.red, 100.0 / 255.0);
        assert_eq!(color.green, 149.0 / 255.0);
        assert_eq!(color.blue, 237.0 / 255.0);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn transform_scales_before_translating() {
        let transform = Transform::translate(10.0, 20.0).scaled(1.5);

        assert_eq!(transform.translation, Vec2::new(10.0, 20.0));
        assert_eq!(transform.scale, Vec2::splat(1.5));
        assert_eq!(
            transform.scaled_size(Vec2::new(40.0, 40.0)),
            Vec2::new(60.0, 60.0)
        );
    }

    #[test]
    fn transform_at_uses_world_position() {
        let transform = Transform::at(Vector::new(300.0, 420.0));
        assert_eq!(transform.translation, Vec2::new(300.0, 420.0));
        assert_eq!(transform.scale, Vec2::ONE);
    }

    #[test]
    fn frame_records_commands_in_order() {
        let mut frame = Frame::new();
        frame.fill(Color::CORNFLOWER_BLUE);
        frame.draw_image(SpriteKey::Player, Transform::IDENTITY);
        frame.draw_text("03", FontKey::Health, Transform::IDENTITY, Color::RED);

        assert_eq!(frame.clear_color(), Some(Color::CORNFLOWER_BLUE));
        assert_eq!(
            frame.commands(),
            &[
                DrawCommand::Image {
                    sprite: SpriteKey::Player,
                    transform: Transform::IDENTITY,
                },
                DrawCommand::Text {
                    text: "03".to_owned(),
                    font: FontKey::Health,
                    transform: Transform::IDENTITY,
                    color: Color::RED,
                },
            ]
        );
    }

    #[test]
    fn fill_discards_earlier_draws() {
        let mut frame = Frame::new();
        frame.draw_image(SpriteKey::FallingObject, Transform::IDENTITY);
        frame.fill(Color::WHITE);

        assert!(frame.commands().is_empty());
        assert_eq!(frame.clear_color(), Some(Color::WHITE));

        frame.reset();
        assert_eq!(frame, Frame::new());
    }

    #[test]
    fn frame_input_maps_to_move_intent() {
        let input = FrameInput {
            left: true,
            right: false,
        };
        assert_eq!(input.move_intent(), MoveIntent::LEFT);
        assert_eq!(FrameInput::default().move_intent(), MoveIntent::IDLE);
    }

    #[test]
    fn default_layout_passes_window_size_through() {
        struct Blank;

        impl Game for Blank {
            fn update(&mut self, _input: FrameInput) -> AnyResult<()> {
                Ok(())
            }

            fn draw(&self, _frame: &mut Frame) {}
        }

        assert_eq!(Blank.layout(640, 480), (640, 480));
        assert_eq!(Blank.layout(1280, 720), (1280, 720));
    }

    #[test]
    fn timestep_rejects_zero_tick_rate() {
        let error = FixedTimestep::new(0).expect_err("zero tick rate must be rejected");
        assert_eq!(
            error,
            RenderingError::InvalidTickRate {
                ticks_per_second: 0
            }
        );
        assert_eq!(
            error.to_string(),
            "ticks_per_second must be positive (received 0)"
        );
    }

    #[test]
    fn timestep_carries_partial_ticks_between_frames() {
        let mut timestep = FixedTimestep::new(60).expect("valid tick rate");
        let tick = timestep.tick_duration();
        let half = tick / 2;

        assert_eq!(timestep.advance(half), 0);
        assert_eq!(timestep.advance(half + Duration::from_nanos(1)), 1);
        assert_eq!(timestep.advance(tick * 3), 3);
    }

    #[test]
    fn timestep_caps_ticks_and_drops_backlog() {
        let mut timestep = FixedTimestep::new(60).expect("valid tick rate");

        assert_eq!(
            timestep.advance(Duration::from_millis(100)),
            MAX_TICKS_PER_FRAME
        );
        assert_eq!(timestep.advance(Duration::ZERO), 0);
    }

    #[test]
    fn timestep_clamps_long_stalls() {
        let mut timestep = FixedTimestep::new(10).expect("valid tick rate");

        assert_eq!(timestep.advance(Duration::from_secs(5)), 1);
        assert_eq!(timestep.advance(Duration::from_millis(99)), 0);
        assert_eq!(timestep.advance(Duration::from_millis(1)), 1);
    }
}
