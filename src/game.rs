//! Game loop.
//!
//! [`Game`] ties a [`Platform`] to a [`World`] and pumps frames until the
//! platform asks to quit or Escape is pressed:
//!
//! 1. **input** – drain platform events, sample the keyboard, dispatch to actors
//! 2. **update** – frame-limiter sleep, measure and clamp `dt`, update the world
//! 3. **output** – draw every sprite in draw order
//!
//! A frame that fails to draw is logged and the loop goes on.

use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};

use crate::actors::ActorId;
use crate::actors::asteroid::{ASTEROIDS_GROUP, Asteroid};
use crate::actors::ship::Ship;
use crate::error::GameError;
use crate::platform::Platform;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::Key;
use crate::resources::worldtime::WorldTime;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

pub struct Game<P: Platform> {
    platform: P,
    world: World,
    config: GameConfig,
    time: WorldTime,
    last_ticks: Duration,
    state: RunState,
    ship: Option<ActorId>,
}

impl<P: Platform> Game<P> {
    pub fn new(platform: P, config: GameConfig) -> Self {
        let (width, height) = config.arena_size();
        let world = World::new(
            platform.texture_loader(),
            config.seed,
            Vec2::new(width, height),
        );
        let time = WorldTime::default().with_max_delta(config.max_delta);
        Self {
            platform,
            world,
            config,
            time,
            last_ticks: Duration::ZERO,
            state: RunState::Running,
            ship: None,
        }
    }

    /// Spawn the ship and the asteroid field. Any failure aborts the run.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        self.load_data()?;
        self.last_ticks = self.platform.ticks();
        info!(
            "Game initialized: {} actors, {} textures",
            self.world.actor_count(),
            self.world.textures().len()
        );
        Ok(())
    }

    fn load_data(&mut self) -> Result<(), GameError> {
        self.ship = Some(Ship::spawn(&mut self.world, &self.config)?);
        for _ in 0..self.config.asteroid_count {
            Asteroid::spawn(&mut self.world, &self.config)?;
        }
        Ok(())
    }

    pub fn run_loop(&mut self) {
        info!("Entering game loop");
        while self.state == RunState::Running {
            self.run_frame();
        }
        info!("Game loop stopped after {} frames", self.time.frame_count);
    }

    /// One input, update and output pass.
    pub fn run_frame(&mut self) {
        self.process_input();
        self.update_game();
        self.generate_output();
    }

    fn process_input(&mut self) {
        let events = self.platform.poll_events();
        if events.quit_requested {
            debug!("Quit requested by platform");
            self.state = RunState::Stopped;
        }

        let keys = self.platform.keyboard_state();
        if keys.is_down(Key::Escape) {
            debug!("Escape pressed");
            self.state = RunState::Stopped;
        }

        self.world.process_input(&keys);
    }

    fn update_game(&mut self) {
        self.platform
            .delay(Duration::from_millis(self.config.frame_delay_ms));

        let now = self.platform.ticks();
        let raw = now.saturating_sub(self.last_ticks).as_secs_f32();
        self.last_ticks = now;

        let dt = self.time.advance(raw);
        self.world.update(dt);
    }

    fn generate_output(&mut self) {
        if let Err(e) = self.world.draw(self.platform.renderer()) {
            warn!("Frame {} not presented: {}", self.time.frame_count, e);
        }
    }

    /// Delete every actor and release every texture, then drop the platform.
    pub fn shutdown(mut self) {
        self.world.clear();
        self.world.unload_textures();
        self.ship = None;
        info!("Game shut down");
    }

    pub fn request_stop(&mut self) {
        self.state = RunState::Stopped;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    /// The player ship, while it exists.
    pub fn ship(&self) -> Option<ActorId> {
        self.ship.filter(|id| self.world.contains(*id))
    }

    pub fn asteroids_remaining(&self) -> usize {
        self.world.group(ASTEROIDS_GROUP).len()
    }
}
