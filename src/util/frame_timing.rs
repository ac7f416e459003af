use web_time::{Duration, Instant};

/// Frame pacing for the redraw loop.
///
/// The viewer only redraws on demand, so the limiter caps bursts of input
/// (a fast drag can request hundreds of redraws a second) rather than a
/// steady animation.
pub struct FrameTiming {
    min_frame: Duration,
    last_frame: Instant,
    smoothed_fps: f32,
    frames: u64,
}

/// Weight of the newest sample in the FPS moving average.
const SMOOTHING: f32 = 0.05;

impl FrameTiming {
    /// Limiter for `target_fps` (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            min_frame,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            frames: 0,
        }
    }

    /// Whether enough time has passed since the last frame.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.last_frame.elapsed() >= self.min_frame
    }

    /// Record a presented frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;
        if dt > 0.0 {
            self.smoothed_fps =
                self.smoothed_fps * (1.0 - SMOOTHING) + SMOOTHING / dt;
        }
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
