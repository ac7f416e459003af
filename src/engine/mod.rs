//! The interaction core shared by the native and browser hosts.
//!
//! [`LensEngine`] owns the catalog, the loaded scene, the selection, the
//! orbit camera and input state. It has no GPU resources of its own: hosts
//! pair it with a [`SceneRenderer`](crate::renderer::SceneRenderer) and
//! feed it events, so the whole click → select → highlight → panel flow
//! runs (and is tested) headless.

pub mod command;

use std::path::Path;

use glam::{Mat4, Quat, Vec3};

pub use self::command::LensCommand;
use crate::camera::OrbitCamera;
use crate::catalog::Catalog;
use crate::error::LensError;
use crate::input::{InputEvent, InputProcessor, KeyAction};
use crate::options::Options;
use crate::picking::click_hit;
use crate::presenter::ModelPresenter;
use crate::scene::{loader, MaterialLibrary, Scene};
use crate::selection::{SelectionController, SelectionState};
use crate::shell::ShellView;

/// Panel button id that closes the info panel.
pub const CLOSE_ACTION: &str = "close";

/// Headless viewer state machine.
pub struct LensEngine {
    options: Options,
    catalog: Catalog,
    scene: Option<Scene>,
    materials: MaterialLibrary,
    presenter: ModelPresenter,
    selection: SelectionController,
    camera: OrbitCamera,
    input: InputProcessor,
    viewport: (u32, u32),
}

impl LensEngine {
    /// Engine with no model loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Catalog`] if `options.catalog.strict` is set and
    /// the catalog has duplicate ids or dangling disease references.
    pub fn new(
        options: Options,
        catalog: Catalog,
        viewport: (u32, u32),
    ) -> Result<Self, LensError> {
        catalog.validate(options.catalog.strict)?;
        Ok(Self {
            presenter: ModelPresenter::new(options.highlight.clone()),
            camera: OrbitCamera::new(&options.camera, viewport),
            input: InputProcessor::new(&options.input, options.keybindings.clone()),
            options,
            catalog,
            scene: None,
            materials: MaterialLibrary::new(),
            selection: SelectionController::new(),
            viewport,
        })
    }

    // ── Model ───────────────────────────────────────────────────────

    /// Load a `.glb` / `.gltf` file and attach it.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::AssetLoad`] if the file cannot be imported, or
    /// [`LensError::Catalog`] in strict mode when catalog mesh names are
    /// missing from the model.
    pub fn load_model_file(&mut self, path: &Path) -> Result<(), LensError> {
        let mut materials = MaterialLibrary::new();
        let scene = loader::load_file(path, &mut materials)?;
        log::info!("loaded model '{}'", path.display());
        self.attach_scene(scene, materials)
    }

    /// Load a model from bytes (a fetched or downloaded GLB) and attach it.
    ///
    /// # Errors
    ///
    /// Same as [`load_model_file`](Self::load_model_file).
    pub fn load_model_bytes(&mut self, bytes: &[u8]) -> Result<(), LensError> {
        let mut materials = MaterialLibrary::new();
        let scene = loader::load_slice(bytes, &mut materials)?;
        self.attach_scene(scene, materials)
    }

    /// Replace the current model. The selection is cleared, the model is
    /// placed per `[model]` options and presenter setup runs once.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Catalog`] in strict mode when catalog mesh names
    /// are missing from `scene`. The previous model stays attached.
    pub fn attach_scene(
        &mut self,
        mut scene: Scene,
        materials: MaterialLibrary,
    ) -> Result<(), LensError> {
        let model = &self.options.model;
        scene.set_model_transform(Mat4::from_scale_rotation_translation(
            Vec3::splat(model.scale),
            Quat::IDENTITY,
            Vec3::from(model.position),
        ));

        let mut presenter = ModelPresenter::new(self.options.highlight.clone());
        presenter.setup(&scene, &self.catalog, self.options.catalog.strict)?;

        self.presenter = presenter;
        self.materials = materials;
        self.scene = Some(scene);
        self.selection.clear_all();
        self.refresh_highlight();
        Ok(())
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Run one command. Returns `true` when the frame needs redrawing.
    pub fn execute(&mut self, command: LensCommand) -> bool {
        match command {
            LensCommand::Click { x, y } => self.click(x, y),
            LensCommand::SelectPart { part_id, point } => {
                self.selection.select(part_id, point, &self.catalog);
                self.refresh_highlight();
            }
            LensCommand::ClearSelection => {
                self.selection.clear_all();
                self.refresh_highlight();
            }
            LensCommand::RotateCamera { delta } => self.camera.rotate(delta),
            LensCommand::PanCamera { delta } => {
                self.camera.pan(delta, self.viewport.1);
            }
            LensCommand::Zoom { delta } => self.camera.zoom(delta),
            LensCommand::ResetCamera => self.camera.reset(),
        }
        true
    }

    fn click(&mut self, x: f32, y: f32) {
        let ray = self.camera.screen_ray(x, y, self.viewport);
        let click = self.scene.as_ref().map_or_else(Default::default, |scene| {
            ModelPresenter::resolve_click(&self.catalog, &click_hit(scene, &ray))
        });
        self.selection.select(click.part_id, click.point, &self.catalog);
        self.refresh_highlight();
    }

    fn refresh_highlight(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let active = self.selection.state().active_part_id.as_deref();
        let highlighted =
            self.presenter
                .apply(scene, &mut self.materials, &self.catalog, active);
        log::debug!("{highlighted} meshes highlighted");
    }

    /// Feed a pointer event. Returns `true` when the frame needs redrawing.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.input
            .handle_event(event)
            .is_some_and(|command| self.execute(command))
    }

    /// Feed a key press. Bound actions with an engine command run
    /// immediately; the action is returned so hosts can handle the rest
    /// (opening a file).
    pub fn handle_key(&mut self, key: &str) -> Option<KeyAction> {
        let action = self.input.handle_key_press(key)?;
        if let Some(command) = action.command() {
            let _ = self.execute(command);
        }
        Some(action)
    }

    /// A button in the info panel was pressed. Returns `true` when the
    /// frame needs redrawing.
    pub fn panel_action(&mut self, id: &str) -> bool {
        match id {
            CLOSE_ACTION => self.execute(LensCommand::ClearSelection),
            other => {
                let disease = self.selection.state().active_disease_id.as_deref();
                log::info!("panel action '{other}' for {disease:?}");
                false
            }
        }
    }

    // ── Viewport ────────────────────────────────────────────────────

    /// Track a viewport resize. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
            self.camera.resize(width, height);
        }
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Overlay projection of the current state.
    #[must_use]
    pub fn shell_view(&self) -> ShellView {
        ShellView::project(
            self.selection.state(),
            &self.catalog,
            &self.options,
            &self.camera,
            self.viewport,
        )
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The loaded scene, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Scene and material library together, for renderer uploads.
    pub fn scene_and_materials(&mut self) -> Option<(&mut Scene, &MaterialLibrary)> {
        self.scene.as_mut().map(|scene| (scene, &self.materials))
    }

    /// Material library of the loaded scene.
    #[must_use]
    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::input::MouseButton;
    use crate::scene::tests::quad;
    use crate::scene::{Material, MeshId};
    use crate::shell::InfoPanel;

    const VIEWPORT: (u32, u32) = (800, 600);

    /// Heart quad at the model origin, skin quad off to the side.
    fn engine() -> LensEngine {
        let mut engine =
            LensEngine::new(Options::default(), Catalog::builtin(), VIEWPORT).unwrap();
        let mut materials = MaterialLibrary::new();
        let skin = materials.add(Material::default());
        let heart = materials.add(Material::default());
        let mut scene = Scene::new();
        let _ = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), heart);
        let _ = scene.add_mesh(
            "Body_Skin",
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            quad(),
            skin,
        );
        engine.attach_scene(scene, materials).unwrap();
        engine
    }

    /// Screen position of a world point.
    fn screen_of(engine: &LensEngine, world: Vec3) -> Vec2 {
        engine.camera().project(world, VIEWPORT).unwrap()
    }

    fn heart_center(engine: &LensEngine) -> Vec2 {
        // default model position is (0, -1, 0)
        screen_of(engine, Vec3::new(0.0, -1.0, 0.0))
    }

    fn click_at(engine: &mut LensEngine, at: Vec2) {
        let _ = engine.execute(LensCommand::Click { x: at.x, y: at.y });
    }

    #[test]
    fn clicking_heart_shows_heart_attack() {
        let mut e = engine();
        let at = heart_center(&e);
        click_at(&mut e, at);

        let state = e.selection();
        assert_eq!(state.active_part_id.as_deref(), Some("heart_3d"));
        assert_eq!(state.active_disease_id.as_deref(), Some("heart_attack"));
        let point = state.active_click_point.unwrap();
        assert!((point - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-3);

        let view = e.shell_view();
        let InfoPanel::Disease(panel) = view.info_panel else {
            panic!("expected disease panel");
        };
        assert_eq!(panel.title, "Heart Attack Information");
        assert_eq!(panel.symptoms.len(), 4);
        assert_eq!(view.name_tag.unwrap().label, "Heart");

        let scene = e.scene().unwrap();
        let heart = scene.mesh(MeshId(0)).unwrap();
        let m = e.materials().get(heart.material).unwrap();
        assert_eq!(m.label, "highlight:VH_M_heart");
    }

    #[test]
    fn clicking_heart_twice_clears() {
        let mut e = engine();
        let at = heart_center(&e);
        click_at(&mut e, at);
        click_at(&mut e, at);
        assert!(e.selection().is_empty());
        let scene = e.scene().unwrap();
        let m = e.materials().get(scene.mesh(MeshId(0)).unwrap().material).unwrap();
        assert_eq!(m.label, "default");
    }

    #[test]
    fn background_click_clears() {
        let mut e = engine();
        let at = heart_center(&e);
        click_at(&mut e, at);
        click_at(&mut e, Vec2::new(2.0, 2.0));
        assert!(e.selection().is_empty());
        assert!(matches!(e.shell_view().info_panel, InfoPanel::Placeholder { .. }));
    }

    #[test]
    fn clicking_unmapped_mesh_clears() {
        let mut e = engine();
        let heart = heart_center(&e);
        click_at(&mut e, heart);
        let skin = screen_of(&e, Vec3::new(2.0, -1.0, 0.0));
        click_at(&mut e, skin);
        assert!(e.selection().is_empty());
    }

    #[test]
    fn pointer_click_goes_through_input_processor() {
        let mut e = engine();
        let at = heart_center(&e);
        let _ = e.handle_input(InputEvent::CursorMoved { x: at.x, y: at.y });
        let _ = e.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(e.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        }));
        assert_eq!(e.selection().active_part_id.as_deref(), Some("heart_3d"));
    }

    #[test]
    fn escape_and_close_button_clear() {
        let mut e = engine();
        let _ = e.execute(LensCommand::SelectPart {
            part_id: Some("kidney_3d".into()),
            point: None,
        });
        assert_eq!(e.handle_key("Escape"), Some(KeyAction::ClearSelection));
        assert!(e.selection().is_empty());

        let _ = e.execute(LensCommand::SelectPart {
            part_id: Some("kidney_3d".into()),
            point: None,
        });
        assert!(e.panel_action(CLOSE_ACTION));
        assert!(e.selection().is_empty());
        assert!(!e.panel_action("consult"));
    }

    #[test]
    fn open_model_key_is_left_to_the_host() {
        let mut e = engine();
        assert_eq!(e.handle_key("KeyO"), Some(KeyAction::OpenModel));
        assert_eq!(e.handle_key("KeyZ"), None);
    }

    #[test]
    fn reset_camera_restores_distance() {
        let mut e = engine();
        let start = e.camera().distance();
        let _ = e.execute(LensCommand::Zoom { delta: 3.0 });
        assert!(e.camera().distance() < start);
        let _ = e.handle_key("KeyR");
        assert!((e.camera().distance() - start).abs() < 1e-4);
    }

    #[test]
    fn strict_catalog_rejects_model_missing_meshes() {
        let mut options = Options::default();
        options.catalog.strict = true;
        let mut e = LensEngine::new(options, Catalog::builtin(), VIEWPORT).unwrap();
        let mut materials = MaterialLibrary::new();
        let m = materials.add(Material::default());
        let mut scene = Scene::new();
        let _ = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), m);
        assert!(matches!(
            e.attach_scene(scene, materials),
            Err(LensError::Catalog(_))
        ));
        assert!(e.scene().is_none());
    }

    #[test]
    fn clicks_without_model_clear() {
        let mut e =
            LensEngine::new(Options::default(), Catalog::builtin(), VIEWPORT).unwrap();
        let _ = e.execute(LensCommand::SelectPart {
            part_id: Some("head".into()),
            point: None,
        });
        click_at(&mut e, Vec2::new(400.0, 300.0));
        assert!(e.selection().is_empty());
    }
}
