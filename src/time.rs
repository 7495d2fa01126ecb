//! Frame counting for the FPS readout.
//!
//! The counter reports the number of frames rendered during the previous
//! full one-second window, so the value changes at most once per second.
//!
//! ```ignore
//! let mut fps = FpsCounter::new();
//!
//! // once per rendered frame:
//! if let Some(rate) = fps.frame(Instant::now()) {
//!     window.set_title(&format!("gravsim - {rate} fps"));
//! }
//! ```

use std::time::{Duration, Instant};

/// Rolling frames-per-second counter.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    window: Duration,
    frames: u32,
    last: Option<u32>,
    total_frames: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window_start: None,
            window,
            frames: 0,
            last: None,
            total_frames: 0,
        }
    }

    /// Count one frame at `now`.
    ///
    /// Returns the new rate when a window has just closed.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.total_frames += 1;

        let rolled = match self.window_start {
            None => {
                self.window_start = Some(now);
                false
            }
            Some(start) if now.saturating_duration_since(start) >= self.window => {
                self.last = Some(self.frames);
                self.window_start = Some(now);
                self.frames = 0;
                true
            }
            Some(_) => false,
        };
        self.frames += 1;

        if rolled {
            self.last
        } else {
            None
        }
    }

    /// Frames counted in the last completed window, if one has closed yet.
    #[inline]
    pub fn fps(&self) -> Option<u32> {
        self.last
    }

    /// Frames counted since creation.
    #[inline]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
