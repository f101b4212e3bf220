//! JavaScript surface of the crate.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{Document, PointerEvent, Window};

use super::clock::PerformanceClock;
use super::gl::WebGlBackend;
use super::listeners::EventListener;
use super::scheduler::RafScheduler;
use crate::background::AnimatedShaderBackground;
use crate::config::BackgroundConfig;
use crate::pointer::{PointerHub, PointerPosition, PointerReader};
use crate::scroll::progress_from_offsets;
use crate::surface::Viewport;

type WebBackground = AnimatedShaderBackground<WebGlBackend, RafScheduler, PerformanceClock>;

thread_local! {
    // One pointermove listener for the whole page, shared by every background.
    static POINTER: RefCell<Option<(PointerHub, EventListener)>> = const { RefCell::new(None) };
}

fn viewport(window: &Window) -> Viewport {
    let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

fn pointer_reader(window: &Window) -> Result<PointerReader, JsValue> {
    POINTER.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some((hub, _)) = slot.as_ref() {
            return Ok(hub.reader());
        }
        let hub = PointerHub::new();
        let publisher = hub.clone();
        let source = window.clone();
        let listener = EventListener::new(window, "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                let view = viewport(&source);
                publisher.publish(PointerPosition::from_client(
                    event.client_x() as f64,
                    event.client_y() as f64,
                    view.width,
                    view.height,
                ));
            }
        })?;
        let reader = hub.reader();
        *slot = Some((hub, listener));
        Ok(reader)
    })
}

/// Scroll progress of the whole document in [0, 1].
#[wasm_bindgen(js_name = documentScrollProgress)]
pub fn document_scroll_progress() -> f32 {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return 0.0;
    };
    progress_from_offsets(
        root.scroll_top() as f64,
        root.scroll_height() as f64,
        root.client_height() as f64,
    )
}

/// An animated shader background mounted under a page element.
#[wasm_bindgen]
pub struct ShaderBackground {
    inner: Rc<RefCell<WebBackground>>,
    listeners: Vec<EventListener>,
    page_scroll: Option<EventListener>,
    window: Window,
}

#[wasm_bindgen]
impl ShaderBackground {
    /// Mount under the element with id `mount_id`. `config_json` is a
    /// JSON-encoded configuration; invalid JSON falls back to defaults.
    ///
    /// Only a missing `window` throws. Graphics failures are logged and
    /// leave a background that draws nothing.
    #[wasm_bindgen(constructor)]
    pub fn new(mount_id: &str, config_json: Option<String>) -> Result<ShaderBackground, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let config = match config_json.as_deref() {
            None | Some("") => BackgroundConfig::default(),
            Some(json) => BackgroundConfig::from_json(json).unwrap_or_else(|err| {
                log::warn!("{}; using defaults", err);
                BackgroundConfig::default()
            }),
        };
        if config.debug {
            log::set_max_level(log::LevelFilter::Debug);
        }
        let parallax = config.parallax.enabled;

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<WebBackground>>| {
            let target = weak.clone();
            let on_frame = Closure::wrap(Box::new(move || {
                if let Some(background) = target.upgrade() {
                    if let Ok(mut background) = background.try_borrow_mut() {
                        background.frame();
                    }
                }
            }) as Box<dyn FnMut()>);

            RefCell::new(AnimatedShaderBackground::mount(
                WebGlBackend::new(document.clone(), mount_id),
                RafScheduler::new(window.clone(), on_frame),
                PerformanceClock::new(&window),
                config,
                viewport(&window),
            ))
        });

        if parallax {
            inner.borrow_mut().attach_pointer(pointer_reader(&window)?);
        }
        let listeners = lifecycle_listeners(&window, &document, &inner)?;

        Ok(ShaderBackground {
            inner,
            listeners,
            page_scroll: None,
            window,
        })
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, name: &str) {
        self.inner.borrow_mut().set_theme_by_name(name);
    }

    #[wasm_bindgen(js_name = setScrollProgress)]
    pub fn set_scroll_progress(&self, progress: f32) {
        self.inner.borrow_mut().set_scroll_progress(progress);
    }

    /// Follow the document's own scroll position. Attaching again, or after
    /// unmount, does nothing.
    #[wasm_bindgen(js_name = attachPageScroll)]
    pub fn attach_page_scroll(&mut self) -> Result<(), JsValue> {
        if self.page_scroll.is_some() || !self.inner.borrow().is_mounted() {
            return Ok(());
        }
        let feed = self.inner.borrow().scroll_feed();
        feed.set(document_scroll_progress());
        let listener = EventListener::new(&self.window, "scroll", move |_| {
            feed.set(document_scroll_progress());
        })?;
        self.page_scroll = Some(listener);
        Ok(())
    }

    #[wasm_bindgen(js_name = isFollowingPageScroll)]
    pub fn is_following_page_scroll(&self) -> bool {
        self.page_scroll.is_some()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().is_running()
    }

    /// Stop animating, release the context and remove the canvas.
    pub fn unmount(&mut self) {
        self.page_scroll = None;
        self.listeners.clear();
        self.inner.borrow_mut().unmount();
    }
}

fn lifecycle_listeners(
    window: &Window,
    document: &Document,
    inner: &Rc<RefCell<WebBackground>>,
) -> Result<Vec<EventListener>, JsValue> {
    let on_resize = {
        let target = Rc::downgrade(inner);
        let source = window.clone();
        EventListener::new(window, "resize", move |_| {
            if let Some(background) = target.upgrade() {
                background.borrow_mut().resize(viewport(&source));
            }
        })?
    };

    let on_visibility = {
        let target = Rc::downgrade(inner);
        let source = document.clone();
        EventListener::new(document, "visibilitychange", move |_| {
            if let Some(background) = target.upgrade() {
                background.borrow_mut().on_visibility_change(!source.hidden());
            }
        })?
    };

    Ok(vec![on_resize, on_visibility])
}
