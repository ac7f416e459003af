//! Standalone viewer window backed by winit.
//!
//! With the `gui` feature a wry webview along the right edge shows the
//! header and the info panel.
//!
//! ```no_run
//! # use anatomy_lens::Viewer;
//! Viewer::builder()
//!     .with_model_path("public/human.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::catalog::Catalog;
use crate::engine::LensEngine;
use crate::error::LensError;
use crate::gpu::render_context::RenderContext;
use crate::input::{InputEvent, KeyAction, MouseButton};
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::util::frame_timing::FrameTiming;

/// Redraw cap while dragging.
const TARGET_FPS: u32 = 120;

#[cfg(all(feature = "gui", target_os = "linux"))]
const GTK_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(16);

/// Where the model comes from.
enum ModelSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model: Option<ModelSource>,
    options: Options,
    catalog: Catalog,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            model: None,
            options: Options::default(),
            catalog: Catalog::builtin(),
            title: None,
        }
    }

    /// Load the model from a `.glb` / `.gltf` file. Without a model the
    /// viewer falls back to `[model] asset` under the asset base path.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model = Some(ModelSource::Path(path.into()));
        self
    }

    /// Load the model from bytes already in memory (a download).
    #[must_use]
    pub fn with_model_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.model = Some(ModelSource::Bytes(bytes));
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Override the built-in catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the window title. Defaults to `[shell] title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let title = self
            .title
            .unwrap_or_else(|| self.options.shell.title.clone());
        let model = self.model.unwrap_or_else(|| {
            let asset = self.options.assets.resolve(&self.options.model.asset);
            ModelSource::Path(PathBuf::from(asset))
        });
        Viewer {
            model,
            options: self.options,
            catalog: self.catalog,
            title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing the anatomy model.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run).
pub struct Viewer {
    model: ModelSource,
    options: Options,
    catalog: Catalog,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Viewer`] if the event loop fails, or
    /// [`LensError::Catalog`] if strict validation rejects the catalog.
    pub fn run(self) -> Result<(), LensError> {
        let engine = LensEngine::new(self.options, self.catalog, (1, 1))?;
        let event_loop =
            EventLoop::new().map_err(|e| LensError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            gpu: None,
            engine,
            model: Some(self.model),
            title: self.title,
            frame_timing: FrameTiming::new(TARGET_FPS),
            #[cfg(feature = "gui")]
            webview: None,
            #[cfg(feature = "gui")]
            name_tag: None,
            #[cfg(feature = "gui")]
            action_rx: None,
            #[cfg(feature = "gui")]
            last_pushed: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| LensError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct Gpu {
    context: RenderContext,
    renderer: SceneRenderer,
}

impl Gpu {
    /// Replace GPU meshes with the engine's current scene.
    fn upload(&mut self, engine: &mut LensEngine) {
        match engine.scene_and_materials() {
            Some((scene, materials)) => {
                self.renderer
                    .upload_scene(&self.context.device, scene, materials);
            }
            None => self.renderer.clear_scene(),
        }
    }

    fn resize(&mut self, (width, height): (u32, u32)) {
        self.context.resize(width, height);
        self.renderer.resize(&self.context.device, width, height);
    }
}

struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    engine: LensEngine,
    model: Option<ModelSource>,
    title: String,
    frame_timing: FrameTiming,
    #[cfg(feature = "gui")]
    webview: Option<wry::WebView>,
    /// Transparent webview floating the name tag over the 3D view.
    #[cfg(feature = "gui")]
    name_tag: Option<wry::WebView>,
    #[cfg(feature = "gui")]
    action_rx: Option<std::sync::mpsc::Receiver<crate::gui::webview::UiAction>>,
    /// Last shell view sent to the webview, to skip redundant pushes.
    #[cfg(feature = "gui")]
    last_pushed: Option<crate::shell::ShellView>,
}

/// The wgpu surface covers the whole window; the webview overlays it.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn load_initial_model(&mut self) {
        let result = match self.model.take() {
            Some(ModelSource::Path(path)) => self.engine.load_model_file(&path),
            Some(ModelSource::Bytes(bytes)) => self.engine.load_model_bytes(&bytes),
            None => return,
        };
        if let Err(e) = result {
            log::error!("failed to load model: {e}");
        }
    }

    /// Native file dialog for `KeyAction::OpenModel`.
    fn open_model_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("glTF model", &["glb", "gltf"])
            .pick_file()
        else {
            return;
        };
        match self.engine.load_model_file(&path) {
            Ok(()) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.upload(&mut self.engine);
                }
            }
            Err(e) => log::error!("failed to open '{}': {e}", path.display()),
        }
    }

    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn redraw(&mut self) {
        #[cfg(feature = "gui")]
        self.drain_ui_actions();

        if !self.frame_timing.should_render() {
            self.request_redraw();
            return;
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if let Some((scene, materials)) = self.engine.scene_and_materials() {
            gpu.renderer.sync(&gpu.context.queue, scene, materials);
        }
        match gpu.renderer.render(&gpu.context, &self.engine.camera().camera) {
            Ok(()) => self.frame_timing.end_frame(),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let size = gpu.context.size();
                gpu.resize(size);
                self.request_redraw();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        #[cfg(feature = "gui")]
        self.push_shell();
    }
}

#[cfg(feature = "gui")]
impl ViewerApp {
    fn create_webview(&mut self, window: &Window) {
        #[cfg(target_os = "linux")]
        if let Err(e) = gtk::init() {
            log::error!("failed to initialize GTK: {e}");
            return;
        }
        let inner = window.inner_size();
        let panel_width = self.engine.options().shell.panel_width;
        match crate::gui::webview::create_webview(
            window,
            inner.width,
            inner.height,
            panel_width,
        ) {
            Ok((webview, rx)) => {
                self.webview = Some(webview);
                self.action_rx = Some(rx);
            }
            // Continue without the panel
            Err(e) => log::error!("failed to create webview: {e}"),
        }
        match crate::gui::webview::create_name_tag(window) {
            Ok(tag) => self.name_tag = Some(tag),
            Err(e) => log::error!("failed to create name tag webview: {e}"),
        }
    }

    fn layout_webview(&self) {
        let (Some(window), Some(webview)) = (&self.window, &self.webview) else {
            return;
        };
        let inner = window.inner_size();
        let bounds = crate::gui::webview::panel_bounds(
            inner.width,
            inner.height,
            self.engine.options().shell.panel_width,
        );
        if let Err(e) = webview.set_bounds(bounds) {
            log::warn!("failed to resize webview: {e}");
        }
    }

    fn drain_ui_actions(&mut self) {
        use crate::gui::webview::UiAction;

        let Some(rx) = &self.action_rx else {
            return;
        };
        let actions: Vec<UiAction> = rx.try_iter().collect();
        for action in actions {
            match action {
                UiAction::Panel { id } => {
                    let _ = self.engine.panel_action(&id);
                }
                UiAction::OpenModel => self.open_model_dialog(),
            }
        }
    }

    fn push_shell(&mut self) {
        if self.webview.is_none() && self.name_tag.is_none() {
            return;
        }
        let view = self.engine.shell_view();
        if self.last_pushed.as_ref() == Some(&view) {
            return;
        }
        if let Some(webview) = &self.webview {
            crate::gui::webview::push_shell(webview, &view);
        }
        if let Some(tag) = &self.name_tag {
            crate::gui::webview::push_name_tag(tag, view.name_tag.as_ref());
        }
        self.last_pushed = Some(view);
    }
}

impl ApplicationHandler for ViewerApp {
    /// Pump GTK so the webview stays responsive alongside winit.
    #[cfg(all(feature = "gui", target_os = "linux"))]
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.webview.is_none() {
            return;
        }
        while gtk::events_pending() {
            let _ = gtk::main_iteration_do(false);
        }
        // winit would otherwise sleep through webview events
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            std::time::Instant::now() + GTK_POLL_INTERVAL,
        ));
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let gpu = pollster::block_on(RenderContext::new(window.clone(), size))
            .map_err(LensError::from)
            .and_then(|context| {
                let renderer =
                    SceneRenderer::new(&context, &self.engine.options().lighting)?;
                Ok(Gpu { context, renderer })
            });
        let mut gpu = match gpu {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };

        self.engine.resize(size.0, size.1);
        self.load_initial_model();
        gpu.upload(&mut self.engine);
        self.gpu = Some(gpu);

        #[cfg(feature = "gui")]
        self.create_webview(&window);

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        let redraw = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                false
            }
            WindowEvent::Resized(inner) => {
                let size = viewport_size(inner);
                self.engine.resize(size.0, size.1);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                #[cfg(feature = "gui")]
                self.layout_webview();
                true
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                false
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.engine.handle_input(InputEvent::Scroll { delta })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.engine.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match self.engine.handle_key(&format!("{code:?}")) {
                    Some(KeyAction::OpenModel) => {
                        self.open_model_dialog();
                        true
                    }
                    Some(_) => true,
                    None => false,
                }
            }
            _ => false,
        };
        if redraw {
            self.request_redraw();
        }
    }
}
