//! Fixed-rate frame pacing and FPS measurement

use std::time::{Duration, Instant};

/// Frames averaged for the FPS counter
const FPS_WINDOW: usize = 60;

/// Sleeps out the remainder of each frame and tracks the achieved rate
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    frame_start: Instant,
    /// Ring of recent frame start times
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / target_fps.max(1),
            frame_start: Instant::now(),
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Mark the start of a frame
    pub fn begin(&mut self) {
        let now = Instant::now();
        self.frame_start = now;

        // Rate from the oldest to the newest sample
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        if let Some(oldest) = oldest {
            let elapsed = now.duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 / elapsed).round() as u32;
            }
        }
    }

    /// Sleep until the frame's time slice is used up
    pub fn wait(&self) {
        if let Some(remaining) = self.frame.checked_sub(self.frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Measured frames per second (0 until a full window has passed)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let pacer = FramePacer::new(60);
        let micros = pacer.frame_duration().as_micros();
        assert!((16_600..=16_700).contains(&micros));
    }

    #[test]
    fn test_fps_needs_full_window() {
        let mut pacer = FramePacer::new(1000);
        for _ in 0..FPS_WINDOW {
            pacer.begin();
        }
        assert_eq!(pacer.fps(), 0);

        pacer.begin();
        assert!(pacer.fps() > 0);
    }

    #[test]
    fn test_wait_paces_frame() {
        let mut pacer = FramePacer::new(100);
        let start = Instant::now();
        pacer.begin();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
