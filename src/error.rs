//! Crate-level error types.

use std::fmt;

use crate::catalog::CatalogError;
use crate::gpu::render_context::RenderContextError;
use crate::gpu::shader_composer::ShaderError;

/// Errors produced by the anatomy-lens crate.
#[derive(Debug)]
pub enum LensError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load or parse the anatomy model.
    AssetLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// TOML catalog parsing/serialization failure.
    CatalogParse(String),
    /// Catalog integrity check failed in strict mode.
    Catalog(CatalogError),
    /// Viewer event-loop or host failure.
    Viewer(String),
}

impl fmt::Display for LensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::AssetLoad(msg) => write!(f, "asset load error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::CatalogParse(msg) => {
                write!(f, "catalog parse error: {msg}")
            }
            Self::Catalog(e) => write!(f, "catalog error: {e}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for LensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for LensError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ShaderError> for LensError {
    fn from(e: ShaderError) -> Self {
        Self::Gpu(RenderContextError::Shader(e))
    }
}

impl From<std::io::Error> for LensError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CatalogError> for LensError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<gltf::Error> for LensError {
    fn from(e: gltf::Error) -> Self {
        Self::AssetLoad(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn io_errors_keep_their_source() {
        let err = LensError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "human.glb",
        ));
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn asset_errors_have_no_source() {
        let err = LensError::AssetLoad("no meshes".into());
        assert_eq!(err.to_string(), "asset load error: no meshes");
        assert!(err.source().is_none());
    }
}
