use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Target ~60fps
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Cloneable cancellation flag for a running frame loop
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
    Stopped,
}

/// Paces frames and owns the start/stop lifecycle.
///
/// NotStarted -> Running -> Stopped. Stopping is final; a new loop is needed to
/// animate again.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    handle: CancelHandle,
    frame_duration: Duration,
    last_frame: Option<Instant>,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(FRAME_DURATION)
    }
}

impl FrameLoop {
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            state: LoopState::NotStarted,
            handle: CancelHandle::default(),
            frame_duration,
            last_frame: None,
            frames: 0,
        }
    }

    /// Begin running. Calling it again while running is a no-op; a stopped loop
    /// stays stopped.
    pub fn start(&mut self) -> CancelHandle {
        if self.state == LoopState::NotStarted {
            self.state = LoopState::Running;
            tracing::info!(frame_ms = self.frame_duration.as_millis() as u64, "frame loop started");
        }
        self.handle.clone()
    }

    /// Stop the loop. Idempotent.
    pub fn stop(&mut self) {
        self.handle.cancel();
        self.sync_cancelled();
    }

    /// Current state, picking up a cancellation made through any handle
    pub fn state(&mut self) -> LoopState {
        self.sync_cancelled();
        self.state
    }

    pub fn is_running(&mut self) -> bool {
        self.state() == LoopState::Running
    }

    fn sync_cancelled(&mut self) {
        if self.handle.is_cancelled() && self.state != LoopState::Stopped {
            if self.state == LoopState::Running {
                tracing::info!(frames = self.frames, "frame loop stopped");
            }
            self.state = LoopState::Stopped;
        }
    }

    /// How long to wait for input before the next frame is due
    pub fn time_until_next_frame(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self.frame_duration.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Claim the next frame if one is due. At most one frame is granted per
    /// frame duration, so input bursts can't speed the animation up.
    pub fn frame_due(&mut self, now: Instant) -> bool {
        if !self.is_running() || !self.time_until_next_frame(now).is_zero() {
            return false;
        }
        self.last_frame = Some(now);
        self.frames += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut frame_loop = FrameLoop::default();
        assert_eq!(frame_loop.state(), LoopState::NotStarted);
        assert!(!frame_loop.frame_due(Instant::now()));

        frame_loop.start();
        assert_eq!(frame_loop.state(), LoopState::Running);

        frame_loop.stop();
        assert_eq!(frame_loop.state(), LoopState::Stopped);

        frame_loop.stop();
        frame_loop.start();
        assert_eq!(frame_loop.state(), LoopState::Stopped, "stopped loops stay stopped");
    }

    #[test]
    fn test_cancel_through_handle() {
        let mut frame_loop = FrameLoop::default();
        let handle = frame_loop.start();
        let other = handle.clone();

        other.cancel();
        assert!(handle.is_cancelled());
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.frame_due(Instant::now()));
    }

    #[test]
    fn test_frame_pacing() {
        let mut frame_loop = FrameLoop::new(Duration::from_millis(16));
        frame_loop.start();

        let t0 = Instant::now();
        assert!(frame_loop.frame_due(t0), "first frame is due immediately");
        assert!(!frame_loop.frame_due(t0 + Duration::from_millis(5)));
        assert_eq!(
            frame_loop.time_until_next_frame(t0 + Duration::from_millis(5)),
            Duration::from_millis(11)
        );
        assert!(frame_loop.frame_due(t0 + Duration::from_millis(16)));
        assert!(!frame_loop.frame_due(t0 + Duration::from_millis(17)));
        assert_eq!(frame_loop.frames, 2);
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let mut frame_loop = FrameLoop::default();
        let handle = frame_loop.start();
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }
}
