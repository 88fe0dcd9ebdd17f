//! Drifting asteroid.
//!
//! Spawned at a random point of the arena, facing a random direction, with a
//! single launch impulse and a random spin. Asteroids wrap around the arena
//! edges and are indexed in the [`ASTEROIDS_GROUP`] group for laser hits.

use glam::Vec2;

use super::{Actor, ActorId, Behavior};
use crate::components::circle::CircleComponent;
use crate::components::movement::MoveComponent;
use crate::components::sprite::SpriteComponent;
use crate::error::GameError;
use crate::math::{PI_OVER_TWO, TWO_PI};
use crate::resources::gameconfig::GameConfig;
use crate::world::World;

pub const ASTEROIDS_GROUP: &str = "asteroids";
pub const ASTEROID_TEXTURE: &str = "asteroid.png";
pub const ASTEROID_MASS: f32 = 1.0;
pub const ASTEROID_RADIUS: f32 = 40.0;
pub const ASTEROID_LAUNCH_FORCE: f32 = 3000.0;
pub const ASTEROID_DRAW_ORDER: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Asteroid;

impl Asteroid {
    pub fn spawn(world: &mut World, config: &GameConfig) -> Result<ActorId, GameError> {
        let texture = world.get_texture(&config.asset_path(ASTEROID_TEXTURE))?;
        let arena = world.arena();

        let rng = world.rng();
        let position = rng.vector(Vec2::ZERO, arena);
        let rotation = rng.float_range(0.0, TWO_PI);
        let spin = rng.float_range(0.0, PI_OVER_TWO);

        let mut actor = Actor::with_behavior(Asteroid);
        actor.set_position(position);
        actor.set_rotation(rotation);

        let mut movement = MoveComponent::new(ASTEROID_MASS)?
            .with_wrap(arena)
            .with_rotation_speed(spin);
        movement.add_force(actor.forward() * ASTEROID_LAUNCH_FORCE);
        actor.add_component(movement);
        actor.add_component(CircleComponent::new(ASTEROID_RADIUS));
        actor.add_component(SpriteComponent::new(ASTEROID_DRAW_ORDER).with_texture(texture));

        let id = world.add_actor(actor);
        world.add_to_group(ASTEROIDS_GROUP, id);
        Ok(id)
    }
}

impl Behavior for Asteroid {
    fn name(&self) -> &'static str {
        "asteroid"
    }
}
