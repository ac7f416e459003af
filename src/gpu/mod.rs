//! GPU resource management.
//!
//! wgpu device and surface initialization, the lighting uniform, the depth
//! attachment and shader composition.

/// Lighting uniform and bind group.
pub mod lighting;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth attachment.
pub mod texture;
