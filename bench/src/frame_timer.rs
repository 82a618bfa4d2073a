//! Per-frame timing of `World::update`.
//!
//! Frames are timed one at a time so the end-of-frame flush shows up in the slow tail, which an
//! average over many frames would hide.

use std::{
    fmt,
    time::{Duration, Instant},
};

use sol_ecs::ecs::World;

/// Frame times collected by [`measure_world`].
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Frame times, fastest first.
    times: Vec<Duration>,
    /// Active entities after the last measured frame.
    pub entities: usize,
}

impl FrameStats {
    fn new(mut times: Vec<Duration>, entities: usize) -> Self {
        times.sort_unstable();
        Self { times, entities }
    }

    /// The number of frames measured.
    pub fn frame_count(&self) -> usize {
        self.times.len()
    }

    /// The time spent in all measured frames.
    pub fn total(&self) -> Duration {
        self.times.iter().sum()
    }

    pub fn average(&self) -> Duration {
        match self.times.len() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    /// Frames per second at the average frame time.
    pub fn fps(&self) -> f64 {
        let average = self.average();
        if average.is_zero() {
            0.0
        } else {
            1.0 / average.as_secs_f64()
        }
    }

    /// The time under which 99% of frames finished.
    pub fn p99(&self) -> Duration {
        let last = self.times.len().saturating_sub(1);
        let index = (self.times.len() * 99 / 100).min(last);
        self.times.get(index).copied().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.times.first().copied().unwrap_or(Duration::ZERO)
    }

    pub fn max(&self) -> Duration {
        self.times.last().copied().unwrap_or(Duration::ZERO)
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        write!(
            f,
            "{} frames, {} entities, avg: {:.2}ms ({:.1} fps), p99: {:.2}ms, min: {:.2}ms, max: {:.2}ms",
            self.frame_count(),
            self.entities,
            ms(self.average()),
            self.fps(),
            ms(self.p99()),
            ms(self.min()),
            ms(self.max()),
        )
    }
}

/// Drive a world for `frame_count` frames, or until a system requests termination, and time
/// each call to `World::update`.
pub fn measure_world(world: &mut World, frame_count: usize) -> FrameStats {
    let mut times = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        if world.is_termination_requested() {
            break;
        }
        let start = Instant::now();
        world.update();
        times.push(start.elapsed());
    }
    FrameStats::new(times, world.entity_count())
}
