//! Textured quad drawn with the owner's world transform.
//!
//! The unit quad is scaled to the texture's pixel size, then placed by the
//! owner's world transform. The world registers every [`SpriteComponent`] in
//! its draw list when the component is attached and drops it on removal.

use glam::{Mat4, Vec3};

use super::Component;
use crate::actors::pose::Pose;
use crate::error::RenderError;
use crate::platform::RenderBackend;
use crate::resources::texturestore::Texture;

pub const DEFAULT_DRAW_ORDER: i32 = 100;

/// Uniform receiving the model matrix of the quad being drawn.
pub const WORLD_TRANSFORM_UNIFORM: &str = "uWorldTransform";

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    draw_order: i32,
    texture: Option<Texture>,
    width: u32,
    height: u32,
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self::new(DEFAULT_DRAW_ORDER)
    }
}

impl SpriteComponent {
    pub fn new(draw_order: i32) -> Self {
        Self {
            draw_order,
            texture: None,
            width: 0,
            height: 0,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.set_texture(texture);
        self
    }

    pub fn texture(&self) -> Option<Texture> {
        self.texture
    }

    /// Swap the texture; the quad is resized to the new texture.
    pub fn set_texture(&mut self, texture: Texture) {
        self.width = texture.width;
        self.height = texture.height;
        self.texture = Some(texture);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Model matrix: texture-sized quad placed by `owner`.
    pub fn model_transform(&self, owner: &Pose) -> Mat4 {
        owner.world_transform()
            * Mat4::from_scale(Vec3::new(self.width as f32, self.height as f32, 1.0))
    }
}

impl Component for SpriteComponent {
    fn draw_order(&self) -> Option<i32> {
        Some(self.draw_order)
    }

    fn draw(&self, owner: &Pose, renderer: &mut dyn RenderBackend) -> Result<(), RenderError> {
        // Nothing to draw until a texture is set.
        let Some(texture) = self.texture else {
            return Ok(());
        };
        renderer.set_matrix_uniform(WORLD_TRANSFORM_UNIFORM, &self.model_transform(owner));
        renderer.bind_texture(texture);
        renderer.draw_quad()
    }
}
