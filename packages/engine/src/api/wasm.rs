use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MediaQueryList, Window};

use crate::core::logging::init_logging;
use crate::core::EngineResult;
use crate::domain::{ClearMode, FieldConfig};
use crate::driver::FrameLoop;
use crate::render::backend::CanvasProvider;
use crate::render::{open_surface, Backend, Surface};
use crate::simulation::{FieldCore, FrameStats};

use super::dom::{self, Listener};
use super::raf::RafScheduler;

type Loop = FrameLoop<Backend, RafScheduler>;

/// Everything a mounted field owns. Listener closures only hold `Weak` references to it.
struct Mounted {
    frame_loop: Loop,
    canvas: HtmlCanvasElement,
    listeners: Vec<Listener>,
}

impl Mounted {
    fn teardown(&mut self) {
        self.frame_loop.destroy();
        for listener in &self.listeners {
            listener.detach();
        }
        self.canvas.remove();
    }
}

/// Run `f` against the mounted state unless it is gone or already borrowed
fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    if let Some(shared) = weak.upgrade() {
        if let Ok(mut mounted) = shared.try_borrow_mut() {
            f(&mut mounted);
        }
    }
}

/// Handle for one background field. Created explicitly by the page, torn down by
/// `destroy()`, `pagehide` or freeing the handle.
#[wasm_bindgen]
pub struct ParticleField {
    mounted: Option<Rc<RefCell<Mounted>>>,
}

#[wasm_bindgen]
impl ParticleField {
    /// Mount a field configured by a JSON object (camelCase keys, all optional)
    pub fn mount(config_json: &str) -> Result<ParticleField, JsValue> {
        let config = FieldConfig::from_json(config_json)?;
        Ok(mount_config(config)?)
    }

    /// Mount one of the named presets
    #[wasm_bindgen(js_name = mountPreset)]
    pub fn mount_preset(name: &str) -> Result<ParticleField, JsValue> {
        let config = FieldConfig::preset(name)?;
        Ok(mount_config(config)?)
    }

    pub fn pause(&self) {
        self.with_loop(|lp| lp.pause());
    }

    pub fn resume(&self) {
        self.with_loop(|lp| lp.resume());
    }

    /// Random velocity kick for every particle
    pub fn boost(&self) {
        self.with_loop(|lp| lp.boost());
    }

    /// Stop the loop, detach listeners and remove the canvas. Later calls do nothing.
    pub fn destroy(&self) {
        if let Some(mounted) = &self.mounted {
            if let Ok(mut m) = mounted.try_borrow_mut() {
                m.teardown();
            }
        }
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.read_loop(|lp| lp.core().particle_count() as u32).unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 {
        self.read_loop(|lp| lp.core().frame() as f64).unwrap_or(0.0)
    }

    /// `"2d"`, `"webgl"`, or `"none"` when the field is inert
    #[wasm_bindgen(getter)]
    pub fn backend(&self) -> String {
        self.read_loop(|lp| lp.surface().kind().as_str().to_string())
            .unwrap_or_else(|| "none".to_string())
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.read_loop(|lp| lp.is_active()).unwrap_or(false)
    }

    pub fn stats(&self) -> FrameStats {
        self.read_loop(|lp| lp.core().stats()).unwrap_or_default()
    }
}

impl ParticleField {
    /// Handle that renders nothing (surface could not be created)
    fn inert() -> Self {
        Self { mounted: None }
    }

    fn with_loop(&self, f: impl FnOnce(&mut Loop)) {
        if let Some(mounted) = &self.mounted {
            if let Ok(mut m) = mounted.try_borrow_mut() {
                f(&mut m.frame_loop);
            }
        }
    }

    fn read_loop<T>(&self, f: impl FnOnce(&Loop) -> T) -> Option<T> {
        let mounted = self.mounted.as_ref()?;
        let m = mounted.try_borrow().ok()?;
        Some(f(&m.frame_loop))
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn mount_config(config: FieldConfig) -> EngineResult<ParticleField> {
    if config.debug {
        init_logging(log::Level::Debug);
    }
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let query = dom::reduced_motion_query(&window);
    let env = dom::read_environment(&window, &document, query.as_ref());

    let core = FieldCore::new(config.clone(), &env)?;
    let canvas = dom::create_overlay_canvas(&document, &config)?;

    let preserve = matches!(config.clear, ClearMode::Trail { .. });
    let mut provider = CanvasProvider::new(canvas.clone(), preserve);
    let surface = match open_surface(&mut provider, config.backend) {
        Ok(surface) => surface,
        Err(err) => {
            log::error!("particle field disabled: {}", err);
            canvas.remove();
            return Ok(ParticleField::inert());
        }
    };

    let mut frame_loop = FrameLoop::new(core, surface, RafScheduler::new(window.clone()));
    frame_loop.set_scroll(window.scroll_y().unwrap_or(0.0) as f32);

    let shared = Rc::new(RefCell::new(Mounted { frame_loop, canvas, listeners: Vec::new() }));
    let weak = Rc::downgrade(&shared);

    let on_frame = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move |ts: f64| {
            with_mounted(&weak, |m| m.frame_loop.on_frame(ts));
        }) as Box<dyn FnMut(f64)>)
    };

    {
        let mut mounted = shared.borrow_mut();
        mounted.frame_loop.scheduler_mut().attach(on_frame);
        mounted.listeners = attach_listeners(&window, &document, query.as_ref(), &weak)?;
        mounted.frame_loop.start(env.hidden)?;
        log::info!(
            "particle field mounted: {} particles, {} backend",
            mounted.frame_loop.core().particle_count(),
            mounted.frame_loop.surface().kind().as_str()
        );
    }

    Ok(ParticleField { mounted: Some(shared) })
}

fn attach_listeners(
    window: &Window,
    document: &Document,
    reduced_motion: Option<&MediaQueryList>,
    weak: &Weak<RefCell<Mounted>>,
) -> EngineResult<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(10);

    let w = weak.clone();
    listeners.push(Listener::attach(window, "mousemove", true, move |e| {
        let pointer = dom::pointer_position(&e);
        with_mounted(&w, |m| m.frame_loop.set_pointer(pointer));
    })?);

    let w = weak.clone();
    listeners.push(Listener::attach(window, "touchmove", true, move |e| {
        let pointer = dom::pointer_position(&e);
        with_mounted(&w, |m| m.frame_loop.set_pointer(pointer));
    })?);

    for event in ["mouseleave", "touchend"] {
        let w = weak.clone();
        listeners.push(Listener::attach(document, event, true, move |_| {
            with_mounted(&w, |m| m.frame_loop.set_pointer(None));
        })?);
    }

    let w = weak.clone();
    let win = window.clone();
    listeners.push(Listener::attach(window, "scroll", true, move |_| {
        let y = win.scroll_y().unwrap_or(0.0) as f32;
        with_mounted(&w, |m| m.frame_loop.set_scroll(y));
    })?);

    let w = weak.clone();
    let win = window.clone();
    listeners.push(Listener::attach(window, "resize", true, move |_| {
        let viewport = dom::read_viewport(&win);
        let now = dom::now_ms(&win);
        with_mounted(&w, |m| m.frame_loop.handle_resize(viewport, now));
    })?);

    let w = weak.clone();
    let doc = document.clone();
    listeners.push(Listener::attach(document, "visibilitychange", false, move |_| {
        let hidden = doc.hidden();
        with_mounted(&w, |m| m.frame_loop.set_hidden(hidden));
    })?);

    if let Some(query) = reduced_motion {
        let w = weak.clone();
        let q = query.clone();
        listeners.push(Listener::attach(query, "change", false, move |_| {
            let reduced = q.matches();
            with_mounted(&w, |m| m.frame_loop.set_reduced_motion(reduced));
        })?);
    }

    let w = weak.clone();
    listeners.push(Listener::attach(window, "pagehide", false, move |_| {
        with_mounted(&w, |m| m.teardown());
    })?);

    Ok(listeners)
}
