use crate::options::HighlightOptions;

/// Stable reference to a [`Material`] inside a [`MaterialLibrary`].
///
/// Handles are never reused within a library, so comparing two handles
/// compares material identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(u32);

impl MaterialHandle {
    /// Position of the material in its library.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Surface parameters for the forward shader.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Debug label (glTF material name or `"highlight:<mesh>"`).
    pub label: String,
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
    /// Linear RGB emissive color.
    pub emissive: [f32; 3],
    /// Multiplier on `emissive`.
    pub emissive_intensity: f32,
    /// Surface opacity, used only when `transparent` is set.
    pub opacity: f32,
    /// Draw in the alpha-blended pass.
    pub transparent: bool,
    /// Write depth while drawing.
    pub depth_write: bool,
    /// Skip back-face culling.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            label: "default".into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            emissive: [0.0; 3],
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            double_sided: false,
        }
    }
}

impl Material {
    /// The selection highlight for `mesh_name`, built from options.
    #[must_use]
    pub fn highlight(mesh_name: &str, opts: &HighlightOptions) -> Self {
        Self {
            label: format!("highlight:{mesh_name}"),
            base_color: [opts.color[0], opts.color[1], opts.color[2], 1.0],
            emissive: opts.emissive,
            emissive_intensity: opts.emissive_intensity,
            opacity: opts.opacity.clamp(0.0, 1.0),
            transparent: opts.transparent,
            depth_write: opts.depth_write,
            double_sided: false,
        }
    }

    /// Alpha the shader outputs for this material.
    #[must_use]
    pub fn effective_alpha(&self) -> f32 {
        if self.transparent {
            self.base_color[3] * self.opacity
        } else {
            1.0
        }
    }
}

/// Append-only arena of materials addressed by [`MaterialHandle`].
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    /// Empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn add(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(material);
        handle
    }

    /// Look up a material.
    #[must_use]
    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.index())
    }

    /// Number of stored materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// All materials with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialHandle, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialHandle(i as u32), m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_distinct_and_resolve() {
        let mut lib = MaterialLibrary::new();
        let a = lib.add(Material::default());
        let b = lib.add(Material::default());
        assert_ne!(a, b);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.get(b).map(|m| m.label.as_str()), Some("default"));
    }

    #[test]
    fn highlight_follows_options() {
        let m = Material::highlight("VH_M_heart", &HighlightOptions::default());
        assert_eq!(m.label, "highlight:VH_M_heart");
        assert_eq!(m.base_color, [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(m.emissive_intensity, 0.3);
        assert!(m.transparent && m.depth_write);
        assert!((m.effective_alpha() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn opaque_material_ignores_opacity() {
        let m = Material {
            opacity: 0.2,
            ..Material::default()
        };
        assert_eq!(m.effective_alpha(), 1.0);
    }
}
