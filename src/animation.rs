//! Frame loop state machine.

use crate::error::BackgroundResult;

/// Requests and cancels the host's per-frame callback.
///
/// At most one frame is outstanding per scheduler; requesting while one is
/// pending replaces it.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> BackgroundResult<()>;
    fn cancel_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Drives one background's frames through a [`FrameScheduler`].
///
/// `Stopped` is both the initial and the terminal state: once stopped after
/// running, the loop never restarts.
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    finished: bool,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Stopped,
            finished: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// `Stopped → Running`, scheduling the first frame. No-op when already
    /// running or after teardown.
    pub fn start(&mut self) -> BackgroundResult<()> {
        if self.finished || self.state == LoopState::Running {
            return Ok(());
        }
        self.scheduler.request_frame()?;
        self.state = LoopState::Running;
        Ok(())
    }

    /// Schedule the frame after the current one.
    pub fn schedule_next(&mut self) -> BackgroundResult<()> {
        if self.state != LoopState::Running {
            return Ok(());
        }
        if let Err(err) = self.scheduler.request_frame() {
            self.stop();
            return Err(err);
        }
        Ok(())
    }

    /// `Running → Stopped`, cancelling the pending callback. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.scheduler.cancel_frame();
        }
        self.state = LoopState::Stopped;
        self.finished = true;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
