//! Fixed-timestep frame loop.
//!
//! The loop measures the real time between frames and hands it to
//! [`World::tick`]. A frame that took more than two frame budgets (a stall or
//! a debugger pause) is ticked with one budget instead so the simulation
//! does not jump.

use std::time::{Duration, Instant};

use ecs_world::World;
use tracing::{debug, info};

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target frames per second.
    pub tick_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 300,
        }
    }
}

impl TickConfig {
    /// Time budget of one frame.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }
}

/// Replaces `measured` with `frame` when it exceeds two frames.
#[must_use]
pub fn clamp_delta(measured: f32, frame: f32) -> f32 {
    if measured > frame * 2.0 { frame } else { measured }
}

/// The demo's frame loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Frames run so far.
    tick_id: u64,
    config: TickConfig,
    world: World,
}

impl TickLoop {
    /// Create a loop that drives `world`.
    #[must_use]
    pub fn new(config: TickConfig, world: World) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
        }
    }

    /// Returns the number of frames run so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Runs one frame with the given measured delta.
    pub fn tick(&mut self, measured: f32) {
        let frame = self.config.frame_time().as_secs_f32();
        let dt = clamp_delta(measured, frame);
        if dt != measured {
            debug!(tick_id = self.tick_id, measured, dt, "clamped frame delta");
        }

        self.world.tick(dt);

        // Once per second of frames.
        let every = self.config.tick_rate.round().max(1.0) as u64;
        if self.tick_id % every == 0 {
            info!(
                frame = self.tick_id,
                entities = self.world.living_entity_count(),
                "frame"
            );
        }
        self.tick_id += 1;
    }

    /// Runs frames at the configured rate until `max_ticks` is reached, or
    /// forever if it is 0.
    pub fn run(&mut self) {
        let frame = self.config.frame_time();
        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting frame loop"
        );

        let mut last = Instant::now();
        loop {
            if self.config.max_ticks > 0 && self.tick_id >= self.config.max_ticks {
                break;
            }

            let now = Instant::now();
            let measured = now.duration_since(last).as_secs_f32();
            last = now;
            self.tick(measured);

            let elapsed = now.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }

        info!(
            frames = self.tick_id,
            entities = self.world.living_entity_count(),
            "frame loop complete"
        );
    }

    /// Consumes the loop and returns the world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delta() {
        let frame = 1.0 / 60.0;
        assert_eq!(clamp_delta(0.02, frame), 0.02);
        assert_eq!(clamp_delta(frame * 2.0, frame), frame * 2.0);
        assert_eq!(clamp_delta(0.5, frame), frame);
    }

    #[test]
    fn test_default_config() {
        let config = TickConfig::default();
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.max_ticks, 300);
        assert_eq!(config.frame_time(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), World::new());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(1.0 / 60.0);
        tick_loop.tick(1.0 / 60.0);
        assert_eq!(tick_loop.tick_id(), 2);
        assert_eq!(tick_loop.into_world().ticks(), 2);
    }

    #[test]
    fn test_run_limited_ticks() {
        let config = TickConfig {
            tick_rate: 1000.0,
            max_ticks: 5,
        };
        let mut tick_loop = TickLoop::new(config, World::new());
        tick_loop.run();
        assert_eq!(tick_loop.tick_id(), 5);
        assert_eq!(tick_loop.into_world().ticks(), 5);
    }
}
