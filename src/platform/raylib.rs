//! raylib window backend.
//!
//! raylib has no user shaders in this setup, so the renderer records each
//! quad's `view * model` matrix and, at the end of the frame, turns it back
//! into a screen rectangle plus rotation for `draw_texture_pro`. World space
//! is y-up with the origin bottom-left; screen space is y-down.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use glam::{Mat4, Vec2};
use log::{info, warn};
use ::raylib::prelude::*;

use super::{Color as Rgba, Platform, PlatformEvents, RenderBackend};
use crate::components::sprite::WORLD_TRANSFORM_UNIFORM;
use crate::error::{AssetError, GameError, RenderError};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{Key, KeyboardState};
use crate::resources::texturestore::{Texture, TextureId, TextureLoader};
use crate::world::VIEW_PROJECTION_UNIFORM;

/// Window state shared by the platform, its loader and its renderer.
struct Shared {
    // Textures must be unloaded before the window closes.
    textures: Vec<Option<Texture2D>>,
    thread: RaylibThread,
    rl: RaylibHandle,
}

fn keyboard_key(key: Key) -> KeyboardKey {
    match key {
        Key::W => KeyboardKey::KEY_W,
        Key::A => KeyboardKey::KEY_A,
        Key::S => KeyboardKey::KEY_S,
        Key::D => KeyboardKey::KEY_D,
        Key::Space => KeyboardKey::KEY_SPACE,
        Key::Escape => KeyboardKey::KEY_ESCAPE,
        Key::Enter => KeyboardKey::KEY_ENTER,
        Key::Up => KeyboardKey::KEY_UP,
        Key::Down => KeyboardKey::KEY_DOWN,
        Key::Left => KeyboardKey::KEY_LEFT,
        Key::Right => KeyboardKey::KEY_RIGHT,
    }
}

/// Screen placement of a unit quad transformed to clip space by `clip`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenQuad {
    pub center: Vec2,
    pub size: Vec2,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
}

pub fn screen_quad(clip: &Mat4, screen: Vec2) -> ScreenQuad {
    let half = screen / 2.0;
    let to_screen_vector = |v: Vec2| Vec2::new(v.x * half.x, -v.y * half.y);

    let center_ndc = clip.w_axis.truncate().truncate();
    let center = Vec2::new((center_ndc.x + 1.0) * half.x, (1.0 - center_ndc.y) * half.y);
    let x_axis = to_screen_vector(clip.x_axis.truncate().truncate());
    let y_axis = to_screen_vector(clip.y_axis.truncate().truncate());

    ScreenQuad {
        center,
        size: Vec2::new(x_axis.length(), y_axis.length()),
        rotation: x_axis.y.atan2(x_axis.x).to_degrees(),
    }
}

struct QuadCommand {
    texture: TextureId,
    clip: Mat4,
}

pub struct RaylibRenderer {
    shared: Rc<RefCell<Shared>>,
    screen: Vec2,
    clear_color: Rgba,
    view_projection: Mat4,
    model: Mat4,
    bound: Option<Texture>,
    commands: Vec<QuadCommand>,
}

impl RenderBackend for RaylibRenderer {
    fn begin_frame(&mut self, clear_color: Rgba) {
        self.clear_color = clear_color;
        self.commands.clear();
        self.bound = None;
    }

    fn set_active(&mut self) {}

    fn set_matrix_uniform(&mut self, name: &str, matrix: &Mat4) {
        match name {
            VIEW_PROJECTION_UNIFORM => self.view_projection = *matrix,
            WORLD_TRANSFORM_UNIFORM => self.model = *matrix,
            _ => warn!("Unknown uniform {}", name),
        }
    }

    fn bind_texture(&mut self, texture: Texture) {
        self.bound = Some(texture);
    }

    fn draw_quad(&mut self) -> Result<(), RenderError> {
        let texture = self
            .bound
            .ok_or_else(|| RenderError::Backend("no texture bound".to_string()))?;
        self.commands.push(QuadCommand {
            texture: texture.id,
            clip: self.view_projection * self.model,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut shared = self.shared.borrow_mut();
        let Shared {
            textures,
            thread,
            rl,
        } = &mut *shared;

        let [r, g, b, a] = self.clear_color;
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::new(r, g, b, a));

        let mut missing = None;
        for command in self.commands.drain(..) {
            let Some(Some(texture)) = textures.get(command.texture.0 as usize) else {
                missing = Some(command.texture);
                continue;
            };
            let quad = screen_quad(&command.clip, self.screen);
            let source = Rectangle::new(0.0, 0.0, texture.width as f32, texture.height as f32);
            let dest = Rectangle::new(quad.center.x, quad.center.y, quad.size.x, quad.size.y);
            let origin = Vector2::new(quad.size.x / 2.0, quad.size.y / 2.0);
            d.draw_texture_pro(texture, source, dest, origin, quad.rotation, Color::WHITE);
        }

        match missing {
            Some(id) => Err(RenderError::UnknownTexture(id)),
            None => Ok(()),
        }
    }
}

struct RaylibTextureLoader {
    shared: Rc<RefCell<Shared>>,
}

impl TextureLoader for RaylibTextureLoader {
    fn load(&mut self, path: &str) -> Result<Texture, AssetError> {
        if !Path::new(path).exists() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        let mut shared = self.shared.borrow_mut();
        let Shared {
            textures,
            thread,
            rl,
        } = &mut *shared;

        let texture = rl
            .load_texture(thread, path)
            .map_err(|e| AssetError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        let loaded = Texture {
            id: TextureId(textures.len() as u32),
            width: texture.width.max(0) as u32,
            height: texture.height.max(0) as u32,
        };
        textures.push(Some(texture));
        Ok(loaded)
    }

    fn release(&mut self, texture: Texture) {
        let mut shared = self.shared.borrow_mut();
        if let Some(slot) = shared.textures.get_mut(texture.id.0 as usize) {
            *slot = None;
        }
    }
}

pub struct RaylibPlatform {
    shared: Rc<RefCell<Shared>>,
    renderer: RaylibRenderer,
}

impl RaylibPlatform {
    /// Open the window described by `config`.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        let mut builder = ::raylib::init();
        builder
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.title);
        if config.vsync {
            builder.vsync();
        }
        let (mut rl, thread) = builder.build();
        if !rl.is_window_ready() {
            return Err(GameError::Platform("failed to create window".to_string()));
        }
        // Escape is handled by the game loop.
        rl.set_exit_key(None);
        info!(
            "Opened {}x{} window \"{}\"",
            config.window_width, config.window_height, config.title
        );

        let shared = Rc::new(RefCell::new(Shared {
            textures: Vec::new(),
            thread,
            rl,
        }));
        let renderer = RaylibRenderer {
            shared: shared.clone(),
            screen: Vec2::new(config.window_width as f32, config.window_height as f32),
            clear_color: [0, 0, 0, 255],
            view_projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            bound: None,
            commands: Vec::new(),
        };
        Ok(Self { shared, renderer })
    }
}

impl Platform for RaylibPlatform {
    fn poll_events(&mut self) -> PlatformEvents {
        PlatformEvents {
            quit_requested: self.shared.borrow().rl.window_should_close(),
        }
    }

    fn keyboard_state(&self) -> KeyboardState {
        let shared = self.shared.borrow();
        KeyboardState::sample(|key| shared.rl.is_key_down(keyboard_key(key)))
    }

    fn ticks(&self) -> Duration {
        Duration::from_secs_f64(self.shared.borrow().rl.get_time().max(0.0))
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn texture_loader(&self) -> Box<dyn TextureLoader> {
        Box::new(RaylibTextureLoader {
            shared: self.shared.clone(),
        })
    }

    fn renderer(&mut self) -> &mut dyn RenderBackend {
        &mut self.renderer
    }
}
