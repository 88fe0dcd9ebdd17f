//! Error types.
//!
//! Failures fall in three families:
//! - [`ConfigError`] – bad setup values (mass, key bindings, config file); fatal at
//!   construction time.
//! - [`AssetError`] / [`RenderError`] – resource problems reported by the platform
//!   collaborators. Initialization aborts on them; the frame loop logs and continues.
//! - removal of something that is not there – not an error at all; those
//!   operations return `Option` or do nothing.

use thiserror::Error;

use crate::resources::texturestore::TextureId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("mass must be a positive finite number, got {0}")]
    InvalidMass(f32),
    #[error("missing key binding for `{0}`")]
    MissingKeyBinding(&'static str),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
    #[error("failed to load config file: {0}")]
    Load(String),
    #[error("invalid value `{value}` for [{section}] {key}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("texture file not found: {0}")]
    NotFound(String),
    #[error("failed to decode texture {path}: {reason}")]
    Decode { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("texture {0:?} is not loaded")]
    UnknownTexture(TextureId),
    #[error("render backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("platform error: {0}")]
    Platform(String),
}
