#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Catcher.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Assets are read and images decoded before the window is created, so a
//! missing or corrupt file fails fast; uploading textures and parsing fonts
//! happens once the graphics context exists.

mod assets;

use anyhow::{Context, Result};
use catcher_rendering::{
    DrawCommand, FixedTimestep, Frame, FrameInput, Game, Presentation, RenderingBackend,
    Transform,
};
use glam::Vec2;
use log::{debug, info};
use macroquad::{
    color::WHITE,
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
    text::{draw_text_ex, measure_text, TextParams},
    texture::{draw_texture_ex, DrawTextureParams},
};
use std::{sync::mpsc, time::Duration};

use self::assets::Assets;

pub use self::assets::AssetBundle;

/// Snapshot of the keys the game reacts to during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// Held arrow keys forwarded to the simulation.
    input: FrameInput,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            input: FrameInput {
                left: is_key_down(KeyCode::Left),
                right: is_key_down(KeyCode::Right),
            },
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    assets: AssetBundle,
}

impl MacroquadBackend {
    /// Creates a backend that presents games with the provided assets.
    #[must_use]
    pub fn new(assets: AssetBundle) -> Self {
        Self { assets }
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<G>(self, presentation: Presentation, mut game: G) -> Result<()>
    where
        G: Game + 'static,
    {
        let Self { assets: bundle } = self;
        let Presentation {
            window_title,
            clear_color,
            width,
            height,
            ticks_per_second,
        } = presentation;

        let mut timestep =
            FixedTimestep::new(ticks_per_second).context("invalid presentation tick rate")?;
        let config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).context("window width out of range")?,
            window_height: i32::try_from(height).context("window height out of range")?,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let assets = match Assets::upload(bundle).context("failed to upload game assets") {
                Ok(assets) => assets,
                Err(error) => {
                    let _ = outcome_sender.send(Err(error));
                    return;
                }
            };

            let background = to_macroquad_color(clear_color);
            let mut frame = Frame::new();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    info!("escape pressed; leaving the game loop");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let ticks = timestep.advance(frame_dt);
                for _ in 0..ticks {
                    if let Err(error) = game.update(keyboard.input) {
                        let _ = outcome_sender.send(Err(error.context("game update failed")));
                        return;
                    }
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let logical = game.layout(screen_width as u32, screen_height as u32);
                let viewport = Viewport::fit(logical, (screen_width, screen_height));

                frame.reset();
                game.draw(&mut frame);
                if let Err(error) = draw_frame(&frame, &assets, viewport) {
                    let _ = outcome_sender.send(Err(error));
                    return;
                }

                macroquad::window::next_frame().await;
            }

            let _ = outcome_sender.send(Ok(()));
        });

        outcome_receiver.try_recv().unwrap_or(Ok(()))
    }
}

/// Maps the game's logical coordinates onto the window, preserving aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    fn fit((logical_width, logical_height): (u32, u32), window: (f32, f32)) -> Self {
        if logical_width == 0 || logical_height == 0 {
            return Self {
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        }

        let logical = Vec2::new(logical_width as f32, logical_height as f32);
        let window = Vec2::new(window.0, window.1);
        let scale = (window.x / logical.x).min(window.y / logical.y);
        let offset = (window - logical * scale) * 0.5;

        Self { scale, offset }
    }

    fn project(&self, transform: Transform) -> Transform {
        Transform {
            translation: transform.translation * self.scale + self.offset,
            scale: transform.scale * self.scale,
        }
    }
}

fn draw_frame(frame: &Frame, assets: &Assets, viewport: Viewport) -> Result<()> {
    if let Some(color) = frame.clear_color() {
        macroquad::window::clear_background(to_macroquad_color(color));
    }

    for command in frame.commands() {
        match command {
            DrawCommand::Image { sprite, transform } => {
                let texture = assets.texture(*sprite)?;
                let placed = viewport.project(*transform);
                let size = placed.scaled_size(Vec2::new(texture.width(), texture.height()));

                draw_texture_ex(
                    texture,
                    placed.translation.x,
                    placed.translation.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(MacroquadVec2::new(size.x, size.y)),
                        ..DrawTextureParams::default()
                    },
                );
            }
            DrawCommand::Text {
                text,
                font,
                transform,
                color,
            } => {
                let loaded = assets.font(*font)?;
                let placed = viewport.project(*transform);
                let font_scale = placed.scale.y;
                // Macroquad positions text by its baseline; frames place the top edge.
                let dimensions = measure_text(text, Some(loaded.font), loaded.size, font_scale);

                draw_text_ex(
                    text,
                    placed.translation.x,
                    placed.translation.y + dimensions.offset_y,
                    TextParams {
                        font: loaded.font,
                        font_size: loaded.size,
                        font_scale,
                        font_scale_aspect: placed.scale.x / placed.scale.y,
                        color: to_macroquad_color(*color),
                        ..TextParams::default()
                    },
                );
            }
        }
    }

    debug!("drew {} commands", frame.commands().len());
    Ok(())
}

fn to_macroquad_color(color: catcher_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
