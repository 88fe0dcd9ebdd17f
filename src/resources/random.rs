//! Seedable random source.
//!
//! One [`GameRng`] lives in the [`World`](crate::world::World); spawn code borrows
//! it from there. Same seed, same asteroid field.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct GameRng {
    rng: fastrand::Rng,
}

impl GameRng {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn float(&mut self) -> f32 {
        self.rng.f32()
    }

    /// Uniform float in `[min, max)`.
    pub fn float_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.float()
    }

    /// Uniform integer in `[min, max]`.
    pub fn int_range(&mut self, min: i32, max: i32) -> i32 {
        self.rng.i32(min..=max)
    }

    /// Uniform point in the box spanned by `min` and `max`.
    pub fn vector(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        let t = Vec2::new(self.float(), self.float());
        min + (max - min) * t
    }
}
