//! Keyboard-driven movement.
//!
//! [`InputMoveComponent`] wraps a [`MoveComponent`] and turns four key bindings
//! into per-frame commands:
//! - forward / back add `±forward_speed` along the owner's facing as a force
//! - clockwise / counter-clockwise set the rotation speed to `±max_rotation_speed`
//!
//! Rotation speed is rebuilt from zero on every input dispatch, clockwise added
//! first and counter-clockwise subtracted after, so holding both cancels out.

use glam::Vec2;

use super::Component;
use super::movement::{MOVE_UPDATE_ORDER, MoveComponent};
use crate::actors::pose::Pose;
use crate::error::ConfigError;
use crate::resources::input::{Key, KeyboardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveBindings {
    pub forward: Key,
    pub back: Key,
    pub clockwise: Key,
    pub counter_clockwise: Key,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputMoveComponent {
    movement: MoveComponent,
    bindings: MoveBindings,
    forward_speed: f32,
    max_rotation_speed: f32,
}

impl InputMoveComponent {
    pub fn builder() -> InputMoveBuilder {
        InputMoveBuilder::default()
    }

    pub fn movement(&self) -> &MoveComponent {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MoveComponent {
        &mut self.movement
    }

    pub fn bindings(&self) -> MoveBindings {
        self.bindings
    }

    pub fn forward_speed(&self) -> f32 {
        self.forward_speed
    }

    pub fn set_forward_speed(&mut self, speed: f32) {
        self.forward_speed = speed;
    }

    pub fn max_rotation_speed(&self) -> f32 {
        self.max_rotation_speed
    }

    pub fn set_max_rotation_speed(&mut self, speed: f32) {
        self.max_rotation_speed = speed;
    }
}

impl Component for InputMoveComponent {
    fn update_order(&self) -> i32 {
        MOVE_UPDATE_ORDER
    }

    fn update(&mut self, owner: &mut Pose, dt: f32) {
        self.movement.integrate(owner, dt);
    }

    fn handle_input(&mut self, owner: &mut Pose, keys: &KeyboardState) {
        let mut force = Vec2::ZERO;
        if keys.is_down(self.bindings.forward) {
            force += owner.forward() * self.forward_speed;
        }
        if keys.is_down(self.bindings.back) {
            force += owner.forward() * -self.forward_speed;
        }
        self.movement.add_force(force);

        let mut rotation_speed = 0.0;
        if keys.is_down(self.bindings.clockwise) {
            rotation_speed += self.max_rotation_speed;
        }
        if keys.is_down(self.bindings.counter_clockwise) {
            rotation_speed -= self.max_rotation_speed;
        }
        self.movement.set_rotation_speed(rotation_speed);
    }
}

/// Collects bindings and tuning; `build` fails on a missing key or bad mass.
#[derive(Debug, Clone, Default)]
pub struct InputMoveBuilder {
    forward: Option<Key>,
    back: Option<Key>,
    clockwise: Option<Key>,
    counter_clockwise: Option<Key>,
    forward_speed: f32,
    max_rotation_speed: f32,
    mass: Option<f32>,
    wrap: Option<Vec2>,
}

impl InputMoveBuilder {
    pub fn forward_key(mut self, key: Key) -> Self {
        self.forward = Some(key);
        self
    }

    pub fn back_key(mut self, key: Key) -> Self {
        self.back = Some(key);
        self
    }

    pub fn clockwise_key(mut self, key: Key) -> Self {
        self.clockwise = Some(key);
        self
    }

    pub fn counter_clockwise_key(mut self, key: Key) -> Self {
        self.counter_clockwise = Some(key);
        self
    }

    pub fn forward_speed(mut self, speed: f32) -> Self {
        self.forward_speed = speed;
        self
    }

    pub fn max_rotation_speed(mut self, speed: f32) -> Self {
        self.max_rotation_speed = speed;
        self
    }

    /// Defaults to 1.0 when not set.
    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn wrap(mut self, bounds: Vec2) -> Self {
        self.wrap = Some(bounds);
        self
    }

    pub fn build(self) -> Result<InputMoveComponent, ConfigError> {
        let bindings = MoveBindings {
            forward: self.forward.ok_or(ConfigError::MissingKeyBinding("forward"))?,
            back: self.back.ok_or(ConfigError::MissingKeyBinding("back"))?,
            clockwise: self
                .clockwise
                .ok_or(ConfigError::MissingKeyBinding("clockwise"))?,
            counter_clockwise: self
                .counter_clockwise
                .ok_or(ConfigError::MissingKeyBinding("counter_clockwise"))?,
        };

        let mut movement = MoveComponent::new(self.mass.unwrap_or(1.0))?;
        if let Some(bounds) = self.wrap {
            movement = movement.with_wrap(bounds);
        }

        Ok(InputMoveComponent {
            movement,
            bindings,
            forward_speed: self.forward_speed,
            max_rotation_speed: self.max_rotation_speed,
        })
    }
}
