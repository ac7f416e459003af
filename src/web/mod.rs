//! Browser host: renders into a canvas and keeps the DOM overlays (header,
//! name tag, info panel) in sync with the engine.
//!
//! ```js
//! import init, { launch } from "./anatomy_lens.js";
//! await init();
//! launch("lens-canvas", null);
//! ```

use std::cell::RefCell;
use std::fmt::Display;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Document, Element, EventTarget, HtmlCanvasElement,
    KeyboardEvent, MouseEvent, WheelEvent,
};

use crate::catalog::Catalog;
use crate::engine::LensEngine;
use crate::gpu::render_context::RenderContext;
use crate::input::{InputEvent, MouseButton};
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::shell::{html, ShellView};

/// Wheel `deltaY` pixels per zoom step.
const WHEEL_STEP: f64 = 100.0;

fn js_error(e: &dyn Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

// ── Overlays ─────────────────────────────────────────────────────────────

struct Overlay {
    name_tag: Element,
    panel: Element,
}

impl Overlay {
    fn mount(document: &Document, view: &ShellView) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let header = document.create_element("div")?;
        header.set_inner_html(&html::header(&view.header));
        body.prepend_with_node_1(&header)?;

        let name_tag = document.create_element("div")?;
        name_tag.set_class_name("name-tag");
        let _ = body.append_child(&name_tag)?;

        let panel = document.create_element("div")?;
        panel.set_class_name("right-panel");
        let _ = body.append_child(&panel)?;

        Ok(Self { name_tag, panel })
    }

    /// Re-render overlays. Engine coordinates are physical pixels; CSS
    /// wants them divided by the device pixel ratio.
    fn update(&self, view: &ShellView, dpr: f32) -> Result<(), JsValue> {
        match &view.name_tag {
            Some(tag) => {
                let mut css = tag.clone();
                css.screen = tag.screen.map(|[x, y]| [x / dpr, y / dpr]);
                self.name_tag.set_inner_html(&html::name_tag(&css));
                self.name_tag
                    .set_attribute("style", &html::name_tag_style(&css))?;
            }
            None => self.name_tag.set_attribute("style", "display:none")?,
        }
        self.panel.set_inner_html(&html::info_panel(&view.info_panel));
        Ok(())
    }
}

// ── App state ────────────────────────────────────────────────────────────

struct WebApp {
    engine: LensEngine,
    context: RenderContext,
    renderer: SceneRenderer,
    canvas: HtmlCanvasElement,
    overlay: Overlay,
    last_view: Option<ShellView>,
}

thread_local! {
    static APP: RefCell<Option<WebApp>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut WebApp)) {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().as_mut() {
            f(app);
        }
    });
}

impl WebApp {
    fn dpr() -> f32 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio() as f32)
    }

    fn upload(&mut self) {
        match self.engine.scene_and_materials() {
            Some((scene, materials)) => {
                self.renderer
                    .upload_scene(&self.context.device, scene, materials);
            }
            None => self.renderer.clear_scene(),
        }
    }

    fn resize(&mut self) {
        let (width, height) = fit_canvas(&self.canvas);
        self.engine.resize(width, height);
        self.context.resize(width, height);
        self.renderer.resize(&self.context.device, width, height);
    }

    fn redraw(&mut self) {
        if let Some((scene, materials)) = self.engine.scene_and_materials() {
            self.renderer.sync(&self.context.queue, scene, materials);
        }
        match self.renderer.render(&self.context, &self.engine.camera().camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.resize();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        let view = self.engine.shell_view();
        if self.last_view.as_ref() != Some(&view) {
            if let Err(e) = self.overlay.update(&view, Self::dpr()) {
                log::warn!("overlay update failed: {e:?}");
            }
            self.last_view = Some(view);
        }
    }

    /// Feed a DOM mouse event position plus shift state, then `event`.
    fn pointer(&mut self, ev: &MouseEvent, event: Option<InputEvent>) {
        let dpr = Self::dpr();
        let mut redraw = self.engine.handle_input(InputEvent::ModifiersChanged {
            shift: ev.shift_key(),
        });
        redraw |= self.engine.handle_input(InputEvent::CursorMoved {
            x: ev.offset_x() as f32 * dpr,
            y: ev.offset_y() as f32 * dpr,
        });
        if let Some(event) = event {
            redraw |= self.engine.handle_input(event);
        }
        if redraw {
            self.redraw();
        }
    }
}

/// Match the canvas backing store to its CSS size. Returns physical size.
fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let width = (f64::from(canvas.client_width().max(1)) * dpr) as u32;
    let height = (f64::from(canvas.client_height().max(1)) * dpr) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

// ── Entry points ─────────────────────────────────────────────────────────

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mount the viewer on the canvas with id `canvas_id`.
///
/// `options_toml` overrides the default options. The model is fetched in
/// the background; until it arrives only the background is drawn.
#[wasm_bindgen]
pub fn launch(canvas_id: String, options_toml: Option<String>) {
    spawn_local(async move {
        if let Err(e) = launch_inner(&canvas_id, options_toml.as_deref()).await {
            log::error!("failed to start viewer: {e:?}");
        }
    });
}

async fn launch_inner(
    canvas_id: &str,
    options_toml: Option<&str>,
) -> Result<(), JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into()?;

    let options = match options_toml {
        Some(text) => Options::from_toml_str(text).map_err(|e| js_error(&e))?,
        None => Options::default(),
    };
    let catalog = match &options.catalog.path {
        Some(path) => {
            let text = fetch_text(&options.assets.resolve(path)).await?;
            Catalog::from_toml_str(&text).map_err(|e| js_error(&e))?
        }
        None => Catalog::builtin(),
    };
    let model_url = options.assets.resolve(&options.model.asset);

    let size = fit_canvas(&canvas);
    let engine = LensEngine::new(options, catalog, size).map_err(|e| js_error(&e))?;
    let context =
        RenderContext::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), size)
            .await
            .map_err(|e| js_error(&e))?;
    let renderer = SceneRenderer::new(&context, &engine.options().lighting)
        .map_err(|e| js_error(&e))?;
    let overlay = Overlay::mount(&document, &engine.shell_view())?;

    install_listeners(&window, &canvas)?;
    APP.with(|app| {
        *app.borrow_mut() = Some(WebApp {
            engine,
            context,
            renderer,
            canvas,
            overlay,
            last_view: None,
        });
    });
    with_app(WebApp::redraw);

    match fetch_bytes(&model_url).await {
        Ok(bytes) => with_app(|app| {
            match app.engine.load_model_bytes(&bytes) {
                Ok(()) => app.upload(),
                Err(e) => log::error!("failed to load '{model_url}': {e}"),
            }
            app.redraw();
        }),
        Err(e) => log::error!("failed to fetch '{model_url}': {e:?}"),
    }
    Ok(())
}

// ── DOM events ───────────────────────────────────────────────────────────

fn listen<E: FromWasmAbi + 'static>(
    target: &EventTarget,
    event: &str,
    passive: bool,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    let opts = AddEventListenerOptions::new();
    opts.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    )?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn button_event(ev: &MouseEvent, pressed: bool) -> InputEvent {
    InputEvent::MouseButton {
        button: MouseButton::from_dom(ev.button()),
        pressed,
    }
}

fn install_listeners(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    listen(canvas, "mousedown", true, |ev: MouseEvent| {
        with_app(|app| app.pointer(&ev, Some(button_event(&ev, true))));
    })?;
    listen(canvas, "mousemove", true, |ev: MouseEvent| {
        with_app(|app| app.pointer(&ev, None));
    })?;
    listen(canvas, "mouseup", true, |ev: MouseEvent| {
        with_app(|app| app.pointer(&ev, Some(button_event(&ev, false))));
    })?;
    // Right-drag pans; keep the context menu out of the way.
    listen(canvas, "contextmenu", false, |ev: MouseEvent| {
        ev.prevent_default();
    })?;
    listen(canvas, "wheel", false, |ev: WheelEvent| {
        ev.prevent_default();
        let delta = (-ev.delta_y() / WHEEL_STEP) as f32;
        with_app(|app| {
            if app.engine.handle_input(InputEvent::Scroll { delta }) {
                app.redraw();
            }
        });
    })?;
    listen(window, "keydown", true, |ev: KeyboardEvent| {
        with_app(|app| {
            // OpenModel has no browser counterpart
            if app.engine.handle_key(&ev.code()).is_some() {
                app.redraw();
            }
        });
    })?;
    listen(window, "resize", true, |_: web_sys::Event| {
        with_app(|app| {
            app.resize();
            app.redraw();
        });
    })?;
    // Panel buttons carry `data-action`; the panel is re-rendered on every
    // change so listen on the document and delegate.
    if let Some(document) = window.document() {
        listen(&document, "click", true, |ev: MouseEvent| {
            let Some(action) = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .and_then(|el| el.get_attribute("data-action"))
            else {
                return;
            };
            with_app(|app| {
                if app.engine.panel_action(&action) {
                    app.redraw();
                }
            });
        })?;
    }
    Ok(())
}

// ── Fetch ────────────────────────────────────────────────────────────────

async fn fetch_response(url: &str) -> Result<web_sys::Response, JsValue> {
    let resp: web_sys::Response =
        JsFuture::from(window()?.fetch_with_str(url)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "HTTP {} for {url}",
            resp.status()
        )));
    }
    Ok(resp)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    let resp = fetch_response(url).await?;
    let buf = JsFuture::from(resp.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = fetch_response(url).await?;
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response is not text"))
}
