//! Windowless platform for tests and `--headless` runs.
//!
//! - time only moves when [`Platform::delay`] is called, so a run is fully
//!   deterministic for a given seed
//! - the keyboard is scripted per frame
//! - textures are fake handles with configurable sizes and failures
//! - the renderer records every quad of the current frame

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::Mat4;
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{Color, Platform, PlatformEvents, RenderBackend};
use crate::components::sprite::WORLD_TRANSFORM_UNIFORM;
use crate::error::{AssetError, RenderError};
use crate::resources::input::KeyboardState;
use crate::resources::texturestore::{Texture, TextureId, TextureLoader};
use crate::world::VIEW_PROJECTION_UNIFORM;

pub const DEFAULT_TEXTURE_SIZE: (u32, u32) = (32, 32);

#[derive(Debug, Default)]
struct LoaderState {
    sizes: FxHashMap<String, (u32, u32)>,
    failing: FxHashSet<String>,
    next_id: u32,
    live: FxHashMap<TextureId, String>,
    load_calls: usize,
    released: Vec<TextureId>,
}

/// Fake texture loader. Clones share state, so the platform can keep a handle
/// on the loader it gave to the world.
#[derive(Debug, Clone, Default)]
pub struct HeadlessTextureLoader {
    state: Rc<RefCell<LoaderState>>,
}

fn matches_path(path: &str, pattern: &str) -> bool {
    path == pattern || path.ends_with(&format!("/{}", pattern))
}

impl HeadlessTextureLoader {
    /// Size reported for `path` (or any path ending in `/path`).
    pub fn set_size(&self, path: &str, width: u32, height: u32) {
        self.state
            .borrow_mut()
            .sizes
            .insert(path.to_string(), (width, height));
    }

    /// Make loads of `path` (or any path ending in `/path`) fail with `NotFound`.
    pub fn fail_on(&self, path: &str) {
        self.state.borrow_mut().failing.insert(path.to_string());
    }

    /// Textures loaded and not released yet.
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn load_calls(&self) -> usize {
        self.state.borrow().load_calls
    }

    pub fn released(&self) -> Vec<TextureId> {
        self.state.borrow().released.clone()
    }

    pub fn path_of(&self, id: TextureId) -> Option<String> {
        self.state.borrow().live.get(&id).cloned()
    }
}

impl TextureLoader for HeadlessTextureLoader {
    fn load(&mut self, path: &str) -> Result<Texture, AssetError> {
        let mut state = self.state.borrow_mut();
        state.load_calls += 1;
        if state.failing.iter().any(|p| matches_path(path, p)) {
            return Err(AssetError::NotFound(path.to_string()));
        }
        let (width, height) = state
            .sizes
            .iter()
            .find(|(p, _)| matches_path(path, p))
            .map(|(_, size)| *size)
            .unwrap_or(DEFAULT_TEXTURE_SIZE);

        state.next_id += 1;
        let id = TextureId(state.next_id);
        state.live.insert(id, path.to_string());
        Ok(Texture { id, width, height })
    }

    fn release(&mut self, texture: Texture) {
        let mut state = self.state.borrow_mut();
        state.live.remove(&texture.id);
        state.released.push(texture.id);
    }
}

/// One quad submitted through [`RenderBackend::draw_quad`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnQuad {
    pub texture: TextureId,
    pub model: Mat4,
    pub view_projection: Mat4,
}

/// Renderer that keeps the quads of the current (or last finished) frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    uniforms: FxHashMap<String, Mat4>,
    bound: Option<Texture>,
    quads: Vec<DrawnQuad>,
    failing: FxHashSet<TextureId>,
    clear_color: Option<Color>,
    frames_begun: u64,
    frames_ended: u64,
}

impl RecordingRenderer {
    pub fn quads(&self) -> &[DrawnQuad] {
        &self.quads
    }

    pub fn frames_begun(&self) -> u64 {
        self.frames_begun
    }

    pub fn frames_ended(&self) -> u64 {
        self.frames_ended
    }

    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    pub fn uniform(&self, name: &str) -> Option<Mat4> {
        self.uniforms.get(name).copied()
    }

    /// Make every draw with `texture` bound fail.
    pub fn fail_texture(&mut self, texture: TextureId) {
        self.failing.insert(texture);
    }
}

impl RenderBackend for RecordingRenderer {
    fn begin_frame(&mut self, clear_color: Color) {
        self.frames_begun += 1;
        self.clear_color = Some(clear_color);
        self.quads.clear();
        self.bound = None;
    }

    fn set_active(&mut self) {
        trace!("Sprite program active");
    }

    fn set_matrix_uniform(&mut self, name: &str, matrix: &Mat4) {
        self.uniforms.insert(name.to_string(), *matrix);
    }

    fn bind_texture(&mut self, texture: Texture) {
        self.bound = Some(texture);
    }

    fn draw_quad(&mut self) -> Result<(), RenderError> {
        let texture = self
            .bound
            .ok_or_else(|| RenderError::Backend("no texture bound".to_string()))?;
        if self.failing.contains(&texture.id) {
            return Err(RenderError::UnknownTexture(texture.id));
        }
        self.quads.push(DrawnQuad {
            texture: texture.id,
            model: self.uniform(WORLD_TRANSFORM_UNIFORM).unwrap_or(Mat4::IDENTITY),
            view_projection: self.uniform(VIEW_PROJECTION_UNIFORM).unwrap_or(Mat4::IDENTITY),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.frames_ended += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    clock: Duration,
    keyboard: KeyboardState,
    /// Keyboard states applied when the given poll number is reached.
    script: Vec<(u64, KeyboardState)>,
    quit: bool,
    frame_budget: Option<u64>,
    polls: u64,
    loader: HeadlessTextureLoader,
    renderer: RecordingRenderer,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request quit on the `frames`-th poll, so exactly `frames` frames run.
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// From poll `frame` (1-based) on, the keyboard reads as `keys`.
    pub fn press_at(mut self, frame: u64, keys: KeyboardState) -> Self {
        self.script.push((frame, keys));
        self
    }

    pub fn set_keyboard(&mut self, keys: KeyboardState) {
        self.keyboard = keys;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn frames_polled(&self) -> u64 {
        self.polls
    }

    pub fn loader(&self) -> &HeadlessTextureLoader {
        &self.loader
    }

    pub fn recorder(&self) -> &RecordingRenderer {
        &self.renderer
    }

    pub fn recorder_mut(&mut self) -> &mut RecordingRenderer {
        &mut self.renderer
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> PlatformEvents {
        self.polls += 1;
        let polls = self.polls;
        if let Some((_, keys)) = self.script.iter().rev().find(|(frame, _)| *frame == polls) {
            self.keyboard = *keys;
        }
        if self.frame_budget.is_some_and(|budget| polls >= budget) {
            debug!("Headless frame budget reached at frame {}", polls);
            self.quit = true;
        }
        PlatformEvents {
            quit_requested: self.quit,
        }
    }

    fn keyboard_state(&self) -> KeyboardState {
        self.keyboard
    }

    fn ticks(&self) -> Duration {
        self.clock
    }

    fn delay(&mut self, duration: Duration) {
        self.clock += duration;
    }

    fn texture_loader(&self) -> Box<dyn TextureLoader> {
        Box::new(self.loader.clone())
    }

    fn renderer(&mut self) -> &mut dyn RenderBackend {
        &mut self.renderer
    }
}
