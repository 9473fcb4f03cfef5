pub mod latency;
pub mod transcript;

// Re-export for convenience
pub use latency::{LatencyProfile, PlaybackTiming};
pub use transcript::{Transcript, TranscriptEvent};
