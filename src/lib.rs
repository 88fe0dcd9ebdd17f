//! Astroblast library.
//!
//! A small 2D asteroids game on top of an actor/component runtime. Exposed as
//! a library so the integration tests can drive whole games headless.

pub mod actors;
pub mod components;
pub mod error;
pub mod game;
pub mod math;
pub mod platform;
pub mod resources;
pub mod world;
