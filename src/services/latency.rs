use std::time::Duration;

use rand::Rng;

/// A simulated delay: fixed base plus uniform random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub base: Duration,
    pub jitter: Duration,
}

impl LatencyProfile {
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(jitter_ms))
    }

    /// No jitter; every sample equals `base`.
    pub const fn fixed(base: Duration) -> Self {
        Self::new(base, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }

    /// Upper bound of `sample()`.
    pub fn max(&self) -> Duration {
        self.base + self.jitter
    }
}

/// Pacing of scripted playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    /// Wait between appending a user turn and revealing its response.
    pub reveal: LatencyProfile,
    /// Pause after a response before the next turn starts.
    pub advance: Duration,
}

impl PlaybackTiming {
    /// Longest possible wall time to play `turns` turns.
    pub fn worst_case(&self, turns: usize) -> Duration {
        let turns = turns as u32;
        self.reveal.max() * turns + self.advance * turns.saturating_sub(1)
    }
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            reveal: LatencyProfile::from_millis(1500, 1000),
            advance: Duration::from_millis(1000),
        }
    }
}
