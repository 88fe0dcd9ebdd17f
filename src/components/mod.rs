//! Actor components.
//!
//! A component is a unit of behavior or data owned by exactly one
//! [`Actor`](crate::actors::Actor). The actor keeps its components sorted by
//! [`Component::update_order`] and calls their hooks every frame:
//!
//! - [`Component::handle_input`] – once per input phase, in update order
//! - [`Component::update`] – once per update phase, in update order
//! - [`Component::on_owner_transform_changed`] – after the owner recomputes its
//!   world transform
//!
//! Components that can be drawn report a draw order from
//! [`Component::draw_order`]; the world registers those in its draw list.
//!
//! Submodules overview:
//! - [`circle`] – bounding-circle collider
//! - [`inputmove`] – keyboard-driven movement on top of [`movement`]
//! - [`movement`] – force/velocity integrator
//! - [`sprite`] – textured quad drawn with the owner's world transform

pub mod circle;
pub mod inputmove;
pub mod movement;
pub mod sprite;

use std::any::Any;

use crate::actors::pose::Pose;
use crate::error::RenderError;
use crate::platform::RenderBackend;
use crate::resources::input::KeyboardState;

/// Update order used when a component does not ask for another one.
pub const DEFAULT_UPDATE_ORDER: i32 = 100;

/// Identity of a component within its owning actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

/// Downcasting support for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub trait Component: AsAny {
    /// Lower runs first.
    fn update_order(&self) -> i32 {
        DEFAULT_UPDATE_ORDER
    }

    fn update(&mut self, _owner: &mut Pose, _dt: f32) {}

    fn handle_input(&mut self, _owner: &mut Pose, _keys: &KeyboardState) {}

    /// The owner's world transform was just recomputed; refresh derived data here.
    fn on_owner_transform_changed(&mut self, _owner: &Pose) {}

    /// `Some(order)` for components that draw themselves.
    fn draw_order(&self) -> Option<i32> {
        None
    }

    fn draw(&self, _owner: &Pose, _renderer: &mut dyn RenderBackend) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A component stored in an actor's ordered list.
pub struct ComponentEntry {
    pub(crate) id: ComponentId,
    pub(crate) order: i32,
    pub(crate) component: Box<dyn Component>,
}

impl ComponentEntry {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn update_order(&self) -> i32 {
        self.order
    }

    pub fn component(&self) -> &(dyn Component + 'static) {
        &*self.component
    }

    pub fn component_mut(&mut self) -> &mut (dyn Component + 'static) {
        &mut *self.component
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.component().as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component_mut().as_any_mut().downcast_mut::<T>()
    }
}
