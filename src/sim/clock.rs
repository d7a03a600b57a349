//! Frame counter and session time

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Simulation frames advanced so far
    pub frames: u64,
    pub fps: u32,
}

impl Clock {
    pub fn new(fps: u32) -> Self {
        Self {
            frames: 0,
            fps: fps.max(1),
        }
    }

    pub fn tick(&mut self) {
        self.frames += 1;
    }

    /// Whole seconds elapsed (session time advances once per `fps` frames)
    pub fn elapsed_secs(&self) -> u32 {
        (self.frames / self.fps as u64) as u32
    }

    /// True on frames that are a multiple of `interval`
    #[inline]
    pub fn every(&self, interval: u64) -> bool {
        interval > 0 && self.frames.is_multiple_of(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_secs_whole_seconds() {
        let mut clock = Clock::new(60);
        for _ in 0..59 {
            clock.tick();
        }
        assert_eq!(clock.elapsed_secs(), 0);
        clock.tick();
        assert_eq!(clock.elapsed_secs(), 1);
    }

    #[test]
    fn test_every() {
        let mut clock = Clock::new(60);
        clock.frames = 30;
        assert!(clock.every(10));
        assert!(clock.every(30));
        assert!(!clock.every(20));
        assert!(!clock.every(0));
    }
}
