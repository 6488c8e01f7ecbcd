//! Glue between the simulation, the HUD and the rendering contracts.

use anyhow::{Context, Result};
use catcher_core::{Command, Event, GameConfig, Size};
use catcher_rendering::{Color, FontKey, Frame, FrameInput, Game, SpriteKey, Transform};
use catcher_rendering_macroquad::AssetBundle;
use catcher_system_hud::Hud;
use catcher_world::{self as world, query, World};

/// Sprites are drawn larger than their colliders.
const SPRITE_SCALE: f32 = 1.5;
const HEALTH_ICON_SCALE: f32 = 0.03;
const HEALTH_ICON_POSITION: (f32, f32) = (10.0, 20.0);
const LIVES_LABEL_POSITION: (f32, f32) = (50.0, 17.0);
/// Horizontal distance of the score label left of the screen centre.
const SCORE_LABEL_CENTRE_OFFSET: f32 = 100.0;
const SCORE_LABEL_Y: f32 = 20.0;

/// Sizes the player and falling-object colliders from the sprites drawn for them.
pub(crate) fn sprite_sized_config(base: GameConfig, assets: &AssetBundle) -> Result<GameConfig> {
    let player = sprite_size(assets, SpriteKey::Player)?;
    let falling_object = sprite_size(assets, SpriteKey::FallingObject)?;
    Ok(base.with_sprite_sizes(player, falling_object))
}

fn sprite_size(assets: &AssetBundle, key: SpriteKey) -> Result<Size> {
    let (width, height) = assets
        .image_size(key)
        .with_context(|| format!("sprite {key:?} missing from asset bundle"))?;
    Ok(Size::new(width as f32, height as f32))
}

/// Catch game driven by a rendering backend.
#[derive(Debug)]
pub(crate) struct CatchGame {
    world: World,
    hud: Hud,
    events: Vec<Event>,
}

impl CatchGame {
    /// Wraps a freshly created world.
    pub(crate) fn new(world: World) -> Self {
        let hud = Hud::new(query::lives(&world));
        Self {
            world,
            hud,
            events: Vec::new(),
        }
    }
}

impl Game for CatchGame {
    fn update(&mut self, input: FrameInput) -> Result<()> {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::Tick {
                input: input.move_intent(),
            },
            &mut self.events,
        );
        self.hud.handle(&self.events);
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        frame.fill(Color::CORNFLOWER_BLUE);

        for object in query::falling_object_view(&self.world).iter() {
            frame.draw_image(
                SpriteKey::FallingObject,
                Transform::at(object.position).scaled(SPRITE_SCALE),
            );
        }

        let player = query::player(&self.world);
        frame.draw_image(
            SpriteKey::Player,
            Transform::at(player.position).scaled(SPRITE_SCALE),
        );

        let screen_width = query::config(&self.world).screen_width;
        frame.draw_text(
            self.hud.score_label(),
            FontKey::Score,
            Transform::translate(
                screen_width / 2.0 - SCORE_LABEL_CENTRE_OFFSET,
                SCORE_LABEL_Y,
            ),
            Color::WHITE,
        );

        let (lives_x, lives_y) = LIVES_LABEL_POSITION;
        frame.draw_text(
            self.hud.lives_label(),
            FontKey::Health,
            Transform::translate(lives_x, lives_y),
            Color::RED,
        );

        let (icon_x, icon_y) = HEALTH_ICON_POSITION;
        frame.draw_image(
            SpriteKey::HealthIcon,
            Transform::translate(icon_x, icon_y).scaled(HEALTH_ICON_SCALE),
        );
    }
}
