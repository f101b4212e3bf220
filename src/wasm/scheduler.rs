use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use super::describe;
use crate::animation::FrameScheduler;
use crate::error::{BackgroundError, BackgroundResult};

/// `requestAnimationFrame` scheduler owning its frame callback.
pub struct RafScheduler {
    window: Window,
    callback: Closure<dyn FnMut()>,
    handle: Option<i32>,
}

impl RafScheduler {
    pub fn new(window: Window, callback: Closure<dyn FnMut()>) -> Self {
        Self {
            window,
            callback,
            handle: None,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> BackgroundResult<()> {
        let id = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| BackgroundError::scheduler(describe(&e)))?;
        self.handle = Some(id);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.handle.take() {
            // Cancelling a frame that already fired is a no-op in the browser.
            self.window.cancel_animation_frame(id).ok();
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}
