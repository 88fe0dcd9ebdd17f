//! Actor placement and its cached world transform.
//!
//! Setters only mark the cache dirty. The owning [`Actor`](super::Actor)
//! rebuilds the matrix in
//! [`compute_world_transform`](super::Actor::compute_world_transform) and then
//! notifies its components, so the matrix is rebuilt once per dirty mark no
//! matter how many setters ran in between.

use glam::{Mat4, Vec2};

use crate::math::{forward_from_angle, scale_rotate_translate};

#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    position: Vec2,
    scale: f32,
    /// Radians.
    rotation: f32,
    world_transform: Mat4,
    dirty: bool,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
            world_transform: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Pose {
    pub fn new(position: Vec2, scale: f32, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Unit vector the actor is facing: `(cos(rotation), sin(rotation))`.
    pub fn forward(&self) -> Vec2 {
        forward_from_angle(self.rotation)
    }

    /// Last computed world transform. Stale while [`Pose::is_dirty`] is true.
    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the matrix if dirty. Returns whether anything was recomputed.
    pub(crate) fn recompute(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.world_transform = scale_rotate_translate(self.scale, self.rotation, self.position);
        true
    }
}
