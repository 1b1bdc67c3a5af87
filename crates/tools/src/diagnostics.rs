use std::time::Instant;

use crate::stats::FrameRateStats;

/// Sink for frame statistics events. Every method defaults to a no-op.
pub trait Diagnostics {
    /// Fired by the frame controller each time the statistics interval elapses.
    fn periodic(&mut self) {}

    /// Fired once per presented frame.
    fn frame_presented(&mut self) {}

    /// Fired once after the frame loop stops.
    fn finish(&mut self) {}
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {}

/// Measures wall-clock frame times and reports them through `tracing`.
#[derive(Debug)]
pub struct TracingDiagnostics {
    stats: FrameRateStats,
    /// Unset until the first presented frame, so setup time is never sampled.
    last_frame: Option<Instant>,
}

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self {
            stats: FrameRateStats::new(),
            last_frame: None,
        }
    }

    pub fn stats(&self) -> &FrameRateStats {
        &self.stats
    }

    fn log_average(&self) {
        if let Some(avg) = self.stats.average_fps() {
            tracing::info!("average frame rate: ~{avg:.2} fps");
        }
    }
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics for TracingDiagnostics {
    fn periodic(&mut self) {
        tracing::info!(
            frames = self.stats.frames(),
            "current frame rate: ~{:.2} fps",
            self.stats.current_fps().unwrap_or(0.0)
        );
        self.log_average();
    }

    fn frame_presented(&mut self) {
        let now = Instant::now();
        match self.last_frame {
            Some(last) => self.stats.record(now - last),
            None => self.stats.count(),
        }
        self.last_frame = Some(now);
    }

    fn finish(&mut self) {
        tracing::info!(frames = self.stats.frames(), "frame loop finished");
        self.log_average();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_diagnostics_accepts_everything() {
        let mut d = NullDiagnostics;
        d.periodic();
        d.frame_presented();
        d.finish();
    }

    #[test]
    fn tracing_diagnostics_counts_frames() {
        let mut d = TracingDiagnostics::new();
        for _ in 0..6 {
            d.frame_presented();
        }
        d.periodic();
        d.finish();
        assert_eq!(d.stats().frames(), 6);
    }

    #[test]
    fn first_frame_only_starts_the_clock() {
        let mut d = TracingDiagnostics::new();
        std::thread::sleep(std::time::Duration::from_millis(200));
        d.frame_presented();
        assert_eq!(d.stats().frames(), 1);
        assert!(d.stats().average_fps().is_none());

        std::thread::sleep(std::time::Duration::from_millis(5));
        d.frame_presented();
        assert_eq!(d.stats().frames(), 2);
        // The sleep before the first frame is not part of any sample.
        assert!(d.stats().average_fps().is_some_and(|fps| fps > 10.0));
    }
}
