//! DOM plumbing: overlay canvas, environment reads, event listener bookkeeping

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlCanvasElement, MediaQueryList, Window};

use crate::core::{EngineError, EngineResult, Vec2};
use crate::domain::FieldConfig;
use crate::env::{EnvironmentSnapshot, Viewport};

pub(crate) const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub(crate) fn window() -> EngineResult<Window> {
    web_sys::window().ok_or_else(|| EngineError::Dom("no window".into()))
}

pub(crate) fn document(window: &Window) -> EngineResult<Document> {
    window.document().ok_or_else(|| EngineError::Dom("no document".into()))
}

pub(crate) fn read_viewport(window: &Window) -> Viewport {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    Viewport::new(width as f32, height as f32, window.device_pixel_ratio() as f32)
}

pub(crate) fn reduced_motion_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

pub(crate) fn read_environment(window: &Window, document: &Document, query: Option<&MediaQueryList>) -> EnvironmentSnapshot {
    let mut env = EnvironmentSnapshot::new(read_viewport(window))
        .with_reduced_motion(query.map_or(false, |q| q.matches()));
    env.hidden = document.hidden();
    let cores = window.navigator().hardware_concurrency();
    if cores >= 1.0 {
        env = env.with_hardware_concurrency(cores as u32);
    }
    env
}

pub(crate) fn now_ms(window: &Window) -> f64 {
    window.performance().map_or_else(js_sys::Date::now, |p| p.now())
}

/// Fixed, click-through canvas inserted as the first child of `<body>`
pub(crate) fn create_overlay_canvas(document: &Document, config: &FieldConfig) -> EngineResult<HtmlCanvasElement> {
    let body = document.body().ok_or_else(|| EngineError::Dom("no <body>".into()))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| EngineError::Dom("created element is not a canvas".into()))?;

    canvas.set_class_name(&config.class_name);
    canvas.set_attribute("aria-hidden", "true")?;
    canvas.style().set_css_text(&format!(
        "position:fixed;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:{};opacity:{}",
        config.z_index, config.opacity
    ));
    body.insert_before(&canvas, body.first_child().as_ref())?;
    Ok(canvas)
}

/// Client coordinates of a mouse or first-touch event
pub(crate) fn pointer_position(event: &Event) -> Option<Vec2> {
    if let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() {
        return Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32));
    }
    let touch = event.dyn_ref::<web_sys::TouchEvent>()?.touches().get(0)?;
    Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
}

/// An attached DOM listener. Detaching leaves the closure alive; it is freed with the handle.
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn attach(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> EngineResult<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        }
        Ok(Self { target: target.clone(), event, callback })
    }

    pub(crate) fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
