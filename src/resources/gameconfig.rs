//! Game configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults are safe to start
//! with, so a missing file only costs a warning.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1024
//! height = 768
//! title = Asteroids
//! vsync = true
//!
//! [game]
//! seed = 4
//! asteroid_count = 20
//! frame_delay_ms = 16
//! max_delta = 0.05
//! assets_dir = assets
//!
//! [controls]
//! forward = W
//! back = S
//! clockwise = D
//! counter_clockwise = A
//! fire = Space
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::resources::input::Key;
use crate::resources::worldtime::DEFAULT_MAX_DELTA;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TITLE: &str = "Asteroids";
const DEFAULT_VSYNC: bool = true;
const DEFAULT_SEED: u64 = 4;
const DEFAULT_ASTEROID_COUNT: u32 = 20;
const DEFAULT_FRAME_DELAY_MS: u64 = 16;
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Keys driving the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub forward: Key,
    pub back: Key,
    pub clockwise: Key,
    pub counter_clockwise: Key,
    pub fire: Key,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            forward: Key::W,
            back: Key::S,
            clockwise: Key::D,
            counter_clockwise: Key::A,
            fire: Key::Space,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window (and arena) width in pixels.
    pub window_width: u32,
    /// Window (and arena) height in pixels.
    pub window_height: u32,
    pub title: String,
    pub vsync: bool,
    /// Seed for the world's random generator.
    pub seed: u64,
    pub asteroid_count: u32,
    /// Fixed sleep at the start of every update phase.
    pub frame_delay_ms: u64,
    /// Upper bound for a single simulation step, in seconds.
    pub max_delta: f32,
    pub assets_dir: PathBuf,
    pub controls: Controls,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            vsync: DEFAULT_VSYNC,
            seed: DEFAULT_SEED,
            asteroid_count: DEFAULT_ASTEROID_COUNT,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            max_delta: DEFAULT_MAX_DELTA,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            controls: Controls::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. On error nothing changes.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&ini)?;
        info!(
            "Loaded config from {:?}: {}x{} window, seed={}, asteroids={}, frame_delay={}ms",
            self.config_path,
            self.window_width,
            self.window_height,
            self.seed,
            self.asteroid_count,
            self.frame_delay_ms
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        let mut next = self.clone();
        next.apply_values(ini)?;
        *self = next;
        Ok(())
    }

    fn apply_values(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        // [window] section
        if let Some(width) = get_u32(ini, "window", "width")? {
            self.window_width = width;
        }
        if let Some(height) = get_u32(ini, "window", "height")? {
            self.window_height = height;
        }
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }
        if let Some(vsync) = get_bool(ini, "window", "vsync")? {
            self.vsync = vsync;
        }

        // [game] section
        if let Some(seed) = get_uint(ini, "game", "seed")? {
            self.seed = seed;
        }
        if let Some(count) = get_u32(ini, "game", "asteroid_count")? {
            self.asteroid_count = count;
        }
        if let Some(delay) = get_uint(ini, "game", "frame_delay_ms")? {
            self.frame_delay_ms = delay;
        }
        if let Some(max_delta) = get_float(ini, "game", "max_delta")? {
            if !(max_delta.is_finite() && max_delta > 0.0) {
                return Err(ConfigError::InvalidValue {
                    section: "game",
                    key: "max_delta",
                    value: max_delta.to_string(),
                });
            }
            self.max_delta = max_delta as f32;
        }
        if let Some(dir) = ini.get("game", "assets_dir") {
            self.assets_dir = PathBuf::from(dir);
        }

        // [controls] section
        let controls = &mut self.controls;
        for (name, slot) in [
            ("forward", &mut controls.forward),
            ("back", &mut controls.back),
            ("clockwise", &mut controls.clockwise),
            ("counter_clockwise", &mut controls.counter_clockwise),
            ("fire", &mut controls.fire),
        ] {
            if let Some(value) = ini.get("controls", name) {
                *slot = value.parse()?;
            }
        }

        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                section: "window",
                key: "width/height",
                value: format!("{}x{}", self.window_width, self.window_height),
            });
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        ini.set("window", "width", Some(self.window_width.to_string()));
        ini.set("window", "height", Some(self.window_height.to_string()));
        ini.set("window", "title", Some(self.title.clone()));
        ini.set("window", "vsync", Some(self.vsync.to_string()));

        ini.set("game", "seed", Some(self.seed.to_string()));
        ini.set("game", "asteroid_count", Some(self.asteroid_count.to_string()));
        ini.set("game", "frame_delay_ms", Some(self.frame_delay_ms.to_string()));
        ini.set("game", "max_delta", Some(self.max_delta.to_string()));
        ini.set(
            "game",
            "assets_dir",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );

        let c = &self.controls;
        ini.set("controls", "forward", Some(c.forward.to_string()));
        ini.set("controls", "back", Some(c.back.to_string()));
        ini.set("controls", "clockwise", Some(c.clockwise.to_string()));
        ini.set(
            "controls",
            "counter_clockwise",
            Some(c.counter_clockwise.to_string()),
        );
        ini.set("controls", "fire", Some(c.fire.to_string()));

        ini.write(&self.config_path)
            .map_err(|e| ConfigError::Load(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Arena size in world units (same as the window in pixels).
    pub fn arena_size(&self) -> (f32, f32) {
        (self.window_width as f32, self.window_height as f32)
    }

    /// Path of an asset file under `assets_dir`, as the texture cache key.
    pub fn asset_path(&self, file: &str) -> String {
        self.assets_dir.join(file).to_string_lossy().into_owned()
    }
}

fn get_uint(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<u64>, ConfigError> {
    ini.getuint(section, key)
        .map_err(|_| invalid(ini, section, key))
}

fn get_u32(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<u32>, ConfigError> {
    get_uint(ini, section, key)?
        .map(|value| u32::try_from(value).map_err(|_| invalid(ini, section, key)))
        .transpose()
}

fn get_float(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<f64>, ConfigError> {
    ini.getfloat(section, key)
        .map_err(|_| invalid(ini, section, key))
}

fn get_bool(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<bool>, ConfigError> {
    ini.getbool(section, key)
        .map_err(|_| invalid(ini, section, key))
}

fn invalid(ini: &Ini, section: &'static str, key: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        section,
        key,
        value: ini.get(section, key).unwrap_or_default(),
    }
}
