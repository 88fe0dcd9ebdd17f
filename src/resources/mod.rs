//! Long-lived data owned by the world and the game loop.
//!
//! Overview
//! - `gameconfig` – settings loaded from `config.ini`
//! - `group` – named actor lists used for broad-phase queries
//! - `input` – per-frame keyboard snapshot and the key-code space
//! - `random` – seedable random generator threaded through spawn code
//! - `texturestore` – path-keyed texture cache over the platform loader
//! - `worldtime` – simulation time, delta clamping
pub mod gameconfig;
pub mod group;
pub mod input;
pub mod random;
pub mod texturestore;
pub mod worldtime;
