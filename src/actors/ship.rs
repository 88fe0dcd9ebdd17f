//! Player ship.
//!
//! Keyboard movement comes from an [`InputMoveComponent`]; the [`Ship`]
//! behavior adds firing with a cooldown and shows the thrust sprite while the
//! forward key is held.

use log::{debug, error};

use super::laser::{LASER_TEXTURE, Laser};
use super::{Actor, ActorId, Behavior};
use crate::components::inputmove::InputMoveComponent;
use crate::components::sprite::SpriteComponent;
use crate::error::GameError;
use crate::math::{PI, PI_OVER_TWO};
use crate::resources::gameconfig::{Controls, GameConfig};
use crate::resources::input::KeyboardState;
use crate::resources::texturestore::Texture;
use crate::world::World;

pub const SHIP_TEXTURE: &str = "ship.png";
pub const SHIP_THRUST_TEXTURE: &str = "ship_with_thrust.png";
pub const SHIP_DRAW_ORDER: i32 = 150;
pub const SHIP_MASS: f32 = 2.0;
pub const SHIP_FORWARD_SPEED: f32 = 500.0;
pub const SHIP_MAX_ROTATION_SPEED: f32 = PI;
/// Seconds between two shots.
pub const LASER_COOLDOWN: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    controls: Controls,
    cooldown: f32,
    idle_texture: Texture,
    thrust_texture: Texture,
    laser_texture: Texture,
    thrusting: bool,
}

impl Ship {
    /// Spawn the ship in the middle of the arena, nose up.
    pub fn spawn(world: &mut World, config: &GameConfig) -> Result<ActorId, GameError> {
        let idle_texture = world.get_texture(&config.asset_path(SHIP_TEXTURE))?;
        let thrust_texture = world.get_texture(&config.asset_path(SHIP_THRUST_TEXTURE))?;
        let laser_texture = world.get_texture(&config.asset_path(LASER_TEXTURE))?;
        let controls = config.controls;

        let movement = InputMoveComponent::builder()
            .forward_key(controls.forward)
            .back_key(controls.back)
            .clockwise_key(controls.clockwise)
            .counter_clockwise_key(controls.counter_clockwise)
            .forward_speed(SHIP_FORWARD_SPEED)
            .max_rotation_speed(SHIP_MAX_ROTATION_SPEED)
            .mass(SHIP_MASS)
            .wrap(world.arena())
            .build()?;

        let mut actor = Actor::with_behavior(Ship {
            controls,
            cooldown: 0.0,
            idle_texture,
            thrust_texture,
            laser_texture,
            thrusting: false,
        });
        actor.set_position(world.arena() / 2.0);
        actor.set_rotation(PI_OVER_TWO);
        actor.add_component(movement);
        actor.add_component(SpriteComponent::new(SHIP_DRAW_ORDER).with_texture(idle_texture));

        Ok(world.add_actor(actor))
    }

    /// Seconds until the ship may fire again; `<= 0` means ready.
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    fn fire(&mut self, actor: &Actor, world: &mut World) {
        match Laser::spawn(world, actor.position(), actor.rotation(), self.laser_texture) {
            Ok(laser) => {
                debug!("Ship fired laser {:?}", laser);
                self.cooldown = LASER_COOLDOWN;
            }
            Err(e) => error!("Failed to spawn laser: {}", e),
        }
    }
}

impl Behavior for Ship {
    fn name(&self) -> &'static str {
        "ship"
    }

    fn update_actor(&mut self, _actor: &mut Actor, _world: &mut World, dt: f32) {
        self.cooldown -= dt;
    }

    fn input_actor(&mut self, actor: &mut Actor, world: &mut World, keys: &KeyboardState) {
        if keys.is_down(self.controls.fire) && self.cooldown <= 0.0 {
            self.fire(actor, world);
        }

        let thrusting = keys.is_down(self.controls.forward);
        if thrusting != self.thrusting {
            self.thrusting = thrusting;
            let texture = if thrusting {
                self.thrust_texture
            } else {
                self.idle_texture
            };
            if let Some(sprite) = actor.component_mut::<SpriteComponent>() {
                sprite.set_texture(texture);
            }
        }
    }
}
