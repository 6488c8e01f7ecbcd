#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Catcher experience.

mod game;

use anyhow::{Context, Result};
use catcher_core::GameConfig;
use catcher_rendering::{Color, Presentation, RenderingBackend};
use catcher_rendering_macroquad::{AssetBundle, MacroquadBackend};
use catcher_world::{query, World};
use log::info;

use self::game::{sprite_sized_config, CatchGame};

/// Title of the game window.
const WINDOW_TITLE: &str = "Catcher";

/// Entry point for the Catcher command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let assets = AssetBundle::read(&AssetBundle::default_manifest_path())
        .context("failed to load game assets")?;
    let config = sprite_sized_config(GameConfig::default(), &assets)?;

    let seed = rand::random::<u64>();
    let world = World::new(config, seed).context("invalid game configuration")?;
    info!("{}", query::welcome_banner(&world));
    info!("spawner seeded with {seed:#018x}");

    let config = query::config(&world);
    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::CORNFLOWER_BLUE,
        (config.screen_width as u32, config.screen_height as u32),
        config.ticks_per_second,
    );

    MacroquadBackend::new(assets)
        .run(presentation, CatchGame::new(world))
        .context("catcher exited with an error")
}
