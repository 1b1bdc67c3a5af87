use std::time::Duration;

/// Frame counter with an instantaneous and a running-average frame rate.
///
/// The average is folded per frame as `avg = (avg + fps) / 2`, seeded by the
/// first sample, so it tracks recent frames far more than old ones.
#[derive(Debug, Clone, Default)]
pub struct FrameRateStats {
    frames: u64,
    current_fps: Option<f32>,
    average_fps: Option<f32>,
}

impl FrameRateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a presented frame that has no frame time to sample.
    pub fn count(&mut self) {
        self.frames += 1;
    }

    /// Record one presented frame that took `frame_time`.
    pub fn record(&mut self, frame_time: Duration) {
        self.count();
        let secs = frame_time.as_secs_f32();
        if secs <= 0.0 {
            return;
        }
        let fps = 1.0 / secs;
        self.current_fps = Some(fps);
        self.average_fps = Some(match self.average_fps {
            Some(avg) => (avg + fps) * 0.5,
            None => fps,
        });
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn current_fps(&self) -> Option<f32> {
        self.current_fps
    }

    pub fn average_fps(&self) -> Option<f32> {
        self.average_fps
    }
}
