use std::borrow::Cow;
use std::fmt;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

/// A shader failed to register or compose.
#[derive(Debug)]
pub struct ShaderError {
    /// Shader file path, for the message.
    pub file_path: String,
    /// Composer diagnostic.
    pub source: Box<ComposerError>,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader '{}': {}", self.file_path, self.source)
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Wraps `naga_oil::compose::Composer` for `#import lens::...` support.
///
/// Shared modules are registered once at construction. Composed shaders are
/// handed to wgpu as naga IR so the WGSL is parsed only once.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared modules in dependency order.
const MODULES: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/modules/camera.wgsl"),
        "modules/camera.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/lighting.wgsl"),
        "modules/lighting.wgsl",
    ),
];

/// Mesh shader for the anatomy model.
pub const ANATOMY_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/raster/mesh/anatomy.wgsl"),
    "raster/mesh/anatomy.wgsl",
);

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a shared module fails to parse.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();
        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| ShaderError {
                    file_path: file_path.to_owned(),
                    source: Box::new(e),
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `source` into a `naga::Module` without touching the GPU.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, ShaderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| ShaderError {
                file_path: file_path.to_owned(),
                source: Box::new(e),
            })
    }

    /// Compose `source` into a shader module ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        (source, file_path): (&str, &str),
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anatomy_shader_composes() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = ANATOMY_SHADER;
        let module = composer.compose_naga(source, path).unwrap();
        let entry_points: Vec<&str> =
            module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entry_points.contains(&"vs_main"));
        assert!(entry_points.contains(&"fs_main"));
    }

    #[test]
    fn malformed_shader_reports_its_path() {
        let mut composer = ShaderComposer::new().unwrap();
        let source = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0;\n}\n";
        let err = composer.compose_naga(source, "broken.wgsl").unwrap_err();
        assert_eq!(err.file_path, "broken.wgsl");
        assert!(err.to_string().contains("broken.wgsl"));
    }

    #[test]
    fn shared_modules_resolve_for_user_shaders() {
        let mut composer = ShaderComposer::new().unwrap();
        let source = "#import lens::camera::CameraUniform\n\
            @group(0) @binding(0) var<uniform> camera: CameraUniform;\n\
            @vertex\nfn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {\n\
                return camera.view_proj * vec4<f32>(p, 1.0);\n}\n";
        let module = composer.compose_naga(source, "user.wgsl").unwrap();
        assert_eq!(module.entry_points.len(), 1);
    }
}
