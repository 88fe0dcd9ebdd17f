//! Force/velocity integrator.
//!
//! [`MoveComponent`] accumulates forces applied during a frame and integrates
//! them with explicit Euler on its next update:
//!
//! ```text
//! velocity += force / mass * dt
//! position += velocity * dt
//! rotation += rotation_speed * dt
//! force     = 0
//! ```
//!
//! Forces are impulses for a single tick. Whoever wants a steady push (input,
//! thrusters) re-applies it every frame.

use glam::Vec2;

use super::Component;
use crate::actors::pose::Pose;
use crate::error::ConfigError;

/// Movement runs before everything else that reads the owner's position.
pub const MOVE_UPDATE_ORDER: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MoveComponent {
    mass: f32,
    velocity: Vec2,
    force: Vec2,
    /// Radians per second.
    rotation_speed: f32,
    /// Arena size to wrap positions into, if any.
    wrap: Option<Vec2>,
}

fn check_mass(mass: f32) -> Result<f32, ConfigError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(ConfigError::InvalidMass(mass))
    }
}

impl MoveComponent {
    pub fn new(mass: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            mass: check_mass(mass)?,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            rotation_speed: 0.0,
            wrap: None,
        })
    }

    /// Keep the owner inside `[0, bounds.x) x [0, bounds.y)`, re-entering on the opposite edge.
    pub fn with_wrap(mut self, bounds: Vec2) -> Self {
        self.wrap = Some(bounds);
        self
    }

    pub fn with_rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<(), ConfigError> {
        self.mass = check_mass(mass)?;
        Ok(())
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Force accumulated since the last update.
    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        self.rotation_speed = rotation_speed;
    }

    pub fn wrap_bounds(&self) -> Option<Vec2> {
        self.wrap
    }

    /// One integration step on `owner`.
    pub fn integrate(&mut self, owner: &mut Pose, dt: f32) {
        self.velocity += self.force / self.mass * dt;

        if self.velocity != Vec2::ZERO {
            let mut position = owner.position() + self.velocity * dt;
            if let Some(bounds) = self.wrap {
                position = wrap_position(position, bounds);
            }
            owner.set_position(position);
        }

        if self.rotation_speed != 0.0 {
            owner.set_rotation(owner.rotation() + self.rotation_speed * dt);
        }

        self.force = Vec2::ZERO;
    }
}

impl Component for MoveComponent {
    fn update_order(&self) -> i32 {
        MOVE_UPDATE_ORDER
    }

    fn update(&mut self, owner: &mut Pose, dt: f32) {
        self.integrate(owner, dt);
    }
}

fn wrap_position(position: Vec2, bounds: Vec2) -> Vec2 {
    let wrap_axis = |v: f32, size: f32| {
        if size <= 0.0 {
            return v;
        }
        let wrapped = v.rem_euclid(size);
        // rem_euclid rounds tiny negatives up to `size`
        if wrapped >= size { 0.0 } else { wrapped }
    };
    Vec2::new(wrap_axis(position.x, bounds.x), wrap_axis(position.y, bounds.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI_OVER_TWO;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        assert_eq!(MoveComponent::new(0.0), Err(ConfigError::InvalidMass(0.0)));
        assert_eq!(MoveComponent::new(-2.0), Err(ConfigError::InvalidMass(-2.0)));
        assert!(MoveComponent::new(f32::NAN).is_err());
        assert!(MoveComponent::new(f32::INFINITY).is_err());
        assert!(MoveComponent::new(0.1).is_ok());
    }

    #[test]
    fn test_set_mass_keeps_old_value_on_error() {
        let mut movement = MoveComponent::new(2.0).unwrap();
        assert!(movement.set_mass(0.0).is_err());
        assert_eq!(movement.mass(), 2.0);
        movement.set_mass(4.0).unwrap();
        assert_eq!(movement.mass(), 4.0);
    }

    #[test]
    fn test_euler_step() {
        let mut movement = MoveComponent::new(2.0).unwrap();
        let mut pose = Pose::default();
        movement.add_force(Vec2::new(100.0, 0.0));
        movement.update(&mut pose, 0.5);

        // v = 100 / 2 * 0.5 = 25, p = 25 * 0.5 = 12.5
        assert!(approx_eq(movement.velocity().x, 25.0));
        assert!(approx_eq(pose.position().x, 12.5));
        assert!(approx_eq(pose.position().y, 0.0));
    }

    #[test]
    fn test_force_resets_every_tick() {
        let mut movement = MoveComponent::new(1.0).unwrap();
        let mut pose = Pose::default();
        movement.add_force(Vec2::new(10.0, 0.0));
        movement.add_force(Vec2::new(0.0, 10.0));
        assert_eq!(movement.force(), Vec2::new(10.0, 10.0));

        movement.update(&mut pose, 0.1);
        assert_eq!(movement.force(), Vec2::ZERO);

        // Velocity persists without a new force.
        let velocity = movement.velocity();
        movement.update(&mut pose, 0.1);
        assert_eq!(movement.velocity(), velocity);
    }

    #[test]
    fn test_rotation_speed_advances_rotation() {
        let mut movement = MoveComponent::new(1.0).unwrap().with_rotation_speed(PI_OVER_TWO);
        let mut pose = Pose::default();
        movement.update(&mut pose, 1.0);
        assert!(approx_eq(pose.rotation(), PI_OVER_TWO));
    }

    #[test]
    fn test_slow_rotation_still_advances() {
        let mut movement = MoveComponent::new(1.0).unwrap().with_rotation_speed(0.0005);
        let mut pose = Pose::default();
        movement.update(&mut pose, 2.0);
        assert!((pose.rotation() - 0.001).abs() < 1e-7);
    }

    #[test]
    fn test_idle_component_leaves_pose_clean() {
        let mut movement = MoveComponent::new(1.0).unwrap();
        let mut pose = Pose::default();
        pose.recompute();
        movement.update(&mut pose, 0.016);
        assert!(!pose.is_dirty());
    }

    #[test]
    fn test_wrap_into_arena() {
        let bounds = Vec2::new(1024.0, 768.0);
        let mut movement = MoveComponent::new(1.0).unwrap().with_wrap(bounds);
        let mut pose = Pose::new(Vec2::new(1020.0, 5.0), 1.0, 0.0);
        movement.set_velocity(Vec2::new(100.0, -100.0));
        movement.update(&mut pose, 0.1);

        assert!(approx_eq(pose.position().x, 6.0));
        assert!(approx_eq(pose.position().y, 763.0));
    }

    #[test]
    fn test_no_wrap_by_default() {
        let mut movement = MoveComponent::new(1.0).unwrap();
        let mut pose = Pose::default();
        movement.set_velocity(Vec2::new(-10.0, 0.0));
        movement.update(&mut pose, 1.0);
        assert!(approx_eq(pose.position().x, -10.0));
    }
}
