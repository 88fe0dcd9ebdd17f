//! Bounding-circle collider.
//!
//! The circle is anchored at its owner's position and scaled with the owner's
//! scale. Both are cached from [`Component::on_owner_transform_changed`], so a
//! query never reads a stale pose.

use glam::Vec2;

use super::Component;
use crate::actors::pose::Pose;

#[derive(Debug, Clone, PartialEq)]
pub struct CircleComponent {
    radius: f32,
    center: Vec2,
    scale: f32,
}

impl CircleComponent {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            center: Vec2::ZERO,
            scale: 1.0,
        }
    }

    /// Radius in world units.
    pub fn radius(&self) -> f32 {
        self.radius * self.scale
    }

    pub fn local_radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// True when the two circles touch or overlap.
    pub fn intersects(&self, other: &CircleComponent) -> bool {
        intersect(self, other)
    }
}

impl Component for CircleComponent {
    fn on_owner_transform_changed(&mut self, owner: &Pose) {
        self.center = owner.position();
        self.scale = owner.scale();
    }
}

/// `|a - b|² <= (ra + rb)²`. Symmetric in its arguments.
pub fn intersect(a: &CircleComponent, b: &CircleComponent) -> bool {
    let radii = a.radius() + b.radius();
    a.center.distance_squared(b.center) <= radii * radii
}
