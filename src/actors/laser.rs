//! Laser projectile.
//!
//! Flies straight from where it was fired, lives for [`LASER_LIFETIME`]
//! seconds and destroys the first asteroid it touches, dying with it.

use glam::Vec2;
use log::debug;

use super::asteroid::ASTEROIDS_GROUP;
use super::{Actor, ActorId, ActorState, Behavior};
use crate::components::circle::{CircleComponent, intersect};
use crate::components::movement::MoveComponent;
use crate::components::sprite::SpriteComponent;
use crate::error::GameError;
use crate::resources::texturestore::Texture;
use crate::world::World;

pub const LASER_TEXTURE: &str = "laser.png";
pub const LASER_LIFETIME: f32 = 1.0;
pub const LASER_MASS: f32 = 0.1;
pub const LASER_RADIUS: f32 = 11.0;
/// Force applied on the first tick only.
pub const LASER_LAUNCH_FORCE: f32 = 5000.0;
pub const LASER_DRAW_ORDER: i32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    death_timer: f32,
}

impl Laser {
    pub fn spawn(
        world: &mut World,
        position: Vec2,
        rotation: f32,
        texture: Texture,
    ) -> Result<ActorId, GameError> {
        let mut actor = Actor::with_behavior(Laser {
            death_timer: LASER_LIFETIME,
        });
        actor.set_position(position);
        actor.set_rotation(rotation);

        let mut movement = MoveComponent::new(LASER_MASS)?;
        movement.add_force(actor.forward() * LASER_LAUNCH_FORCE);
        actor.add_component(movement);
        actor.add_component(CircleComponent::new(LASER_RADIUS));
        actor.add_component(SpriteComponent::new(LASER_DRAW_ORDER).with_texture(texture));

        Ok(world.add_actor(actor))
    }

    /// Seconds left before the laser expires.
    pub fn death_timer(&self) -> f32 {
        self.death_timer
    }
}

impl Behavior for Laser {
    fn name(&self) -> &'static str {
        "laser"
    }

    fn update_actor(&mut self, actor: &mut Actor, world: &mut World, dt: f32) {
        self.death_timer -= dt;
        if self.death_timer <= 0.0 {
            actor.set_state(ActorState::Dead);
            return;
        }

        // Movement ran this tick; bring the circle up to date before testing.
        actor.compute_world_transform();
        let Some(circle) = actor.component::<CircleComponent>() else {
            return;
        };

        let hit = world.group(ASTEROIDS_GROUP).iter().copied().find(|id| {
            world
                .actor(*id)
                .filter(|asteroid| asteroid.state() != ActorState::Dead)
                .and_then(|asteroid| asteroid.component::<CircleComponent>())
                .is_some_and(|other| intersect(circle, other))
        });

        if let Some(asteroid) = hit {
            debug!("Laser {:?} hit asteroid {:?}", actor.id(), asteroid);
            actor.set_state(ActorState::Dead);
            if let Some(asteroid) = world.actor_mut(asteroid) {
                asteroid.set_state(ActorState::Dead);
            }
        }
    }
}
