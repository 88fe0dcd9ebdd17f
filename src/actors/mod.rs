//! Actors: positioned entities built from components.
//!
//! An [`Actor`] owns its [`Pose`], an ordered list of components and an
//! optional [`Behavior`] holding the logic specific to one kind of actor (ship,
//! laser, asteroid). The [`World`] owns every actor and lends one out for the
//! length of its own `update`/`handle_input` call, which is how a behavior gets
//! `&mut Actor` for itself and `&mut World` for everything else at once.
//!
//! Per-frame order inside [`Actor::update`]:
//! 1. recompute the world transform if dirty
//! 2. update components in ascending update order
//! 3. run the behavior's `update_actor` hook
//! 4. recompute the world transform again, so the renderer sees the new pose
//!
//! Submodules overview:
//! - [`asteroid`] – drifting rock, member of the `asteroids` group
//! - [`laser`] – short-lived projectile that destroys asteroids on contact
//! - [`pose`] – position/scale/rotation with a lazily rebuilt world transform
//! - [`ship`] – player ship: keyboard movement, firing, thrust sprite

pub mod asteroid;
pub mod laser;
pub mod pose;
pub mod ship;

use glam::{Mat4, Vec2};
use log::trace;
use smallvec::SmallVec;

use crate::components::{AsAny, Component, ComponentEntry, ComponentId};
use crate::resources::input::KeyboardState;
use crate::world::World;

pub use pose::Pose;

slotmap::new_key_type! {
    /// Handle of an actor registered with a [`World`].
    pub struct ActorId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorState {
    #[default]
    Alive,
    Paused,
    /// Removed by the world at the end of the current update phase.
    Dead,
}

/// Actor-specific logic run after the components.
///
/// While a hook runs, the behavior is detached from `actor`, and `actor` is
/// detached from `world`; `world.actor(actor_id)` returns `None` for it.
pub trait Behavior: AsAny {
    fn name(&self) -> &'static str;

    fn update_actor(&mut self, _actor: &mut Actor, _world: &mut World, _dt: f32) {}

    fn input_actor(&mut self, _actor: &mut Actor, _world: &mut World, _keys: &KeyboardState) {}
}

/// A drawable attached to or detached from an actor, not yet seen by the world's draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpriteChange {
    Attached {
        component: ComponentId,
        draw_order: i32,
    },
    Detached(ComponentId),
}

pub struct Actor {
    id: Option<ActorId>,
    state: ActorState,
    pose: Pose,
    components: SmallVec<[ComponentEntry; 4]>,
    next_component_id: u32,
    behavior: Option<Box<dyn Behavior>>,
    sprite_changes: SmallVec<[SpriteChange; 2]>,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    pub fn new() -> Self {
        Self {
            id: None,
            state: ActorState::Alive,
            pose: Pose::default(),
            components: SmallVec::new(),
            next_component_id: 0,
            behavior: None,
            sprite_changes: SmallVec::new(),
        }
    }

    pub fn with_behavior(behavior: impl Behavior) -> Self {
        let mut actor = Self::new();
        actor.behavior = Some(Box::new(behavior));
        actor
    }

    /// Handle assigned by [`World::add_actor`]; `None` before registration.
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ActorId) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &'static str {
        self.behavior.as_ref().map_or("actor", |b| b.name())
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn set_state(&mut self, state: ActorState) {
        self.state = state;
    }

    pub fn is_alive(&self) -> bool {
        self.state == ActorState::Alive
    }

    // ---------------- transform ----------------

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> Vec2 {
        self.pose.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.pose.set_position(position);
    }

    pub fn scale(&self) -> f32 {
        self.pose.scale()
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.pose.set_scale(scale);
    }

    pub fn rotation(&self) -> f32 {
        self.pose.rotation()
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.pose.set_rotation(rotation);
    }

    pub fn forward(&self) -> Vec2 {
        self.pose.forward()
    }

    /// Current world transform, rebuilt first if any setter ran since the last build.
    pub fn world_transform(&mut self) -> Mat4 {
        self.compute_world_transform();
        self.pose.world_transform()
    }

    /// Rebuild the world transform if dirty and tell every component about it.
    /// Returns whether a rebuild happened.
    pub fn compute_world_transform(&mut self) -> bool {
        if !self.pose.recompute() {
            return false;
        }
        for entry in self.components.iter_mut() {
            entry.component.on_owner_transform_changed(&self.pose);
        }
        true
    }

    // ---------------- components ----------------

    pub fn add_component(&mut self, component: impl Component) -> ComponentId {
        self.add_boxed_component(Box::new(component))
    }

    /// Insert keeping ascending update order; equal orders keep insertion order.
    ///
    /// Drawables reach the world's draw list at its next sync: right away for
    /// [`World::add_component`], when the hook returns for the running actor,
    /// and at the end of every update pass otherwise.
    pub fn add_boxed_component(&mut self, mut component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;

        if let Some(draw_order) = component.draw_order() {
            self.sprite_changes.push(SpriteChange::Attached {
                component: id,
                draw_order,
            });
        }
        let order = component.update_order();
        component.on_owner_transform_changed(&self.pose);
        let index = self.components.partition_point(|e| e.order <= order);
        self.components.insert(
            index,
            ComponentEntry {
                id,
                order,
                component,
            },
        );
        id
    }

    /// Detach a component by identity. `None` if it is not attached.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let index = self.components.iter().position(|e| e.id == id)?;
        let component = self.components.remove(index).component;
        if component.draw_order().is_some() {
            self.sprite_changes.push(SpriteChange::Detached(id));
        }
        Some(component)
    }

    pub(crate) fn take_sprite_changes(&mut self) -> SmallVec<[SpriteChange; 2]> {
        std::mem::take(&mut self.sprite_changes)
    }

    /// Detach every component, one at a time, from a snapshot of the ids.
    pub fn remove_all_components(&mut self) -> usize {
        let ids: SmallVec<[ComponentId; 4]> = self.components.iter().map(|e| e.id).collect();
        let mut removed = 0;
        for id in ids {
            if self.remove_component(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.components.iter()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn component_by_id(&self, id: ComponentId) -> Option<&ComponentEntry> {
        self.components.iter().find(|e| e.id == id)
    }

    pub fn component_by_id_mut(&mut self, id: ComponentId) -> Option<&mut ComponentEntry> {
        self.components.iter_mut().find(|e| e.id == id)
    }

    /// First attached component of type `T`.
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|e| e.downcast_ref::<T>())
    }

    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(|e| e.downcast_mut::<T>())
    }

    pub fn behavior<T: Behavior>(&self) -> Option<&T> {
        let behavior: &(dyn Behavior + 'static) = self.behavior.as_deref()?;
        behavior.as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        let behavior: &mut (dyn Behavior + 'static) = self.behavior.as_deref_mut()?;
        behavior.as_any_mut().downcast_mut::<T>()
    }

    // ---------------- frame hooks ----------------

    pub fn update(&mut self, world: &mut World, dt: f32) {
        if self.state != ActorState::Alive {
            return;
        }
        self.compute_world_transform();

        for entry in self.components.iter_mut() {
            entry.component.update(&mut self.pose, dt);
        }

        if let Some(mut behavior) = self.behavior.take() {
            behavior.update_actor(self, world, dt);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
        }

        self.compute_world_transform();
        trace!("Updated {} at {:?}", self.name(), self.pose.position());
    }

    pub fn handle_input(&mut self, world: &mut World, keys: &KeyboardState) {
        if self.state != ActorState::Alive {
            return;
        }
        for entry in self.components.iter_mut() {
            entry.component.handle_input(&mut self.pose, keys);
        }

        if let Some(mut behavior) = self.behavior.take() {
            behavior.input_actor(self, world, keys);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
        }
    }
}
