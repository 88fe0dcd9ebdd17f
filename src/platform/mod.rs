//! Window, input, clock and drawing collaborators.
//!
//! The game only talks to the outside world through [`Platform`] and the
//! [`RenderBackend`] it hands out. Two implementations exist:
//! - [`headless`] – simulated clock, scripted keyboard, recording renderer
//! - `raylib` (feature `raylib`) – a real window drawn with raylib

pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;

use std::time::Duration;

use glam::Mat4;

use crate::error::RenderError;
use crate::resources::input::KeyboardState;
use crate::resources::texturestore::{Texture, TextureLoader};

/// RGBA clear color, 0-255 per channel.
pub type Color = [u8; 4];

/// Discrete events drained once per input phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformEvents {
    pub quit_requested: bool,
}

/// Shader-and-quad style drawing: a shared unit quad is drawn with whatever
/// matrices and texture are currently bound.
pub trait RenderBackend {
    fn begin_frame(&mut self, clear_color: Color);

    /// Make the sprite program and quad mesh current.
    fn set_active(&mut self);

    fn set_matrix_uniform(&mut self, name: &str, matrix: &Mat4);

    fn bind_texture(&mut self, texture: Texture);

    /// Submit the bound quad: 6 indices, triangle list.
    fn draw_quad(&mut self) -> Result<(), RenderError>;

    fn end_frame(&mut self) -> Result<(), RenderError>;
}

pub trait Platform {
    fn poll_events(&mut self) -> PlatformEvents;

    fn keyboard_state(&self) -> KeyboardState;

    /// Monotonic time since the platform started.
    fn ticks(&self) -> Duration;

    /// Frame limiter sleep.
    fn delay(&mut self, duration: Duration);

    /// Loader handed to the world's texture cache.
    fn texture_loader(&self) -> Box<dyn TextureLoader>;

    fn renderer(&mut self) -> &mut dyn RenderBackend;
}
