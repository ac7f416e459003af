use serde::{Deserialize, Serialize};

/// The anatomy model and where it sits in the world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelOptions {
    /// Model file, relative to [`AssetOptions::base_path`] unless absolute
    /// or a URL.
    pub asset: String,
    /// Uniform scale applied to the whole model.
    pub scale: f32,
    /// Translation applied to the whole model.
    pub position: [f32; 3],
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            asset: "human.glb".into(),
            scale: 1.0,
            position: [0.0, -1.0, 0.0],
        }
    }
}

/// Location of static assets (model, organ icons, logo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssetOptions {
    /// Prefix joined onto every relative asset path. A directory natively, a
    /// URL prefix in the browser.
    pub base_path: String,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            base_path: "public".into(),
        }
    }
}

impl AssetOptions {
    /// Resolve `relative` against the base path.
    ///
    /// Absolute paths and URLs pass through untouched; an empty base path
    /// leaves the relative path as is.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> String {
        let passthrough = relative.starts_with('/')
            || relative.contains("://")
            || self.base_path.is_empty();
        if passthrough {
            return relative.to_owned();
        }
        format!("{}/{relative}", self.base_path.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_with_a_single_slash() {
        let assets = AssetOptions {
            base_path: "https://cdn.example.org/lens/".into(),
        };
        assert_eq!(
            assets.resolve("organ_heart.svg"),
            "https://cdn.example.org/lens/organ_heart.svg"
        );
        assert_eq!(
            AssetOptions::default().resolve("human.glb"),
            "public/human.glb"
        );
    }

    #[test]
    fn resolve_passes_through_absolute_and_urls() {
        let assets = AssetOptions::default();
        assert_eq!(assets.resolve("/data/body.glb"), "/data/body.glb");
        assert_eq!(
            assets.resolve("http://host/body.glb"),
            "http://host/body.glb"
        );
        let empty = AssetOptions {
            base_path: String::new(),
        };
        assert_eq!(empty.resolve("logo.png"), "logo.png");
    }
}
