//! `anatomy-lens [MODEL] [--options FILE | --preset NAME] [--catalog FILE]`
//!
//! MODEL is a `.glb` / `.gltf` path or an http(s) URL. Without it the
//! viewer opens `[model] asset` under the asset base path. A preset is
//! `<presets-dir>/<NAME>.toml`.

use std::path::{Path, PathBuf};

use anatomy_lens::catalog::Catalog;
use anatomy_lens::{Options, Viewer};
use clap::Parser;

/// Largest model download accepted.
const MAX_DOWNLOAD: u64 = 512 * 1024 * 1024;

/// Interactive 3D anatomy viewer.
#[derive(Debug, Parser)]
#[command(name = "anatomy-lens", version, about)]
struct Args {
    /// `.glb` / `.gltf` path or http(s) URL of the model.
    model: Option<String>,
    /// Options TOML.
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    options: Option<PathBuf>,
    /// Named options preset from the presets directory.
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,
    /// Directory holding options presets.
    #[arg(long, value_name = "DIR", default_value = "presets")]
    presets_dir: PathBuf,
    /// Catalog TOML overriding the built-in parts, organs and diseases.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn download(url: &str) -> Result<Vec<u8>, String> {
    log::info!("downloading {url}");
    ureq::get(url)
        .call()
        .map_err(|e| format!("failed to download {url}: {e}"))?
        .into_body()
        .with_config()
        .limit(MAX_DOWNLOAD)
        .read_to_vec()
        .map_err(|e| format!("failed to read response: {e}"))
}

fn preset_path(dir: &Path, name: &str) -> Result<PathBuf, String> {
    let available = Options::list_presets(dir);
    if available.iter().any(|p| p == name) {
        return Ok(dir.join(format!("{name}.toml")));
    }
    Err(format!(
        "unknown preset '{name}' in {} (available: {})",
        dir.display(),
        if available.is_empty() { "none".to_owned() } else { available.join(", ") }
    ))
}

fn load_catalog(args: &Args, options: &Options) -> Result<Catalog, String> {
    let path = match (&args.catalog, &options.catalog.path) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => PathBuf::from(options.assets.resolve(path)),
        (None, None) => return Ok(Catalog::builtin()),
    };
    Catalog::load(&path).map_err(|e| e.to_string())
}

fn run(args: &Args) -> Result<(), String> {
    let options_path = match (&args.options, &args.preset) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(name)) => Some(preset_path(&args.presets_dir, name)?),
        (None, None) => None,
    };
    let options = match options_path {
        Some(path) => Options::load(&path).map_err(|e| e.to_string())?,
        None => Options::default(),
    };
    let catalog = load_catalog(args, &options)?;

    let mut builder = Viewer::builder().with_catalog(catalog);
    match args.model.as_deref() {
        Some(url) if is_url(url) => {
            builder = builder.with_model_bytes(download(url)?);
        }
        Some(path) => {
            if !Path::new(path).exists() {
                return Err(format!("model not found: {path}"));
            }
            builder = builder.with_model_path(path);
        }
        None => {}
    }
    builder
        .with_options(options)
        .build()
        .run()
        .map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_and_flags_in_any_order() {
        let args = Args::try_parse_from([
            "anatomy-lens",
            "--catalog",
            "c.toml",
            "body.glb",
            "--options",
            "o.toml",
        ])
        .unwrap();
        assert_eq!(args.model.as_deref(), Some("body.glb"));
        assert_eq!(args.options, Some(PathBuf::from("o.toml")));
        assert_eq!(args.catalog, Some(PathBuf::from("c.toml")));

        let bare = Args::try_parse_from(["anatomy-lens"]).unwrap();
        assert!(bare.model.is_none() && bare.options.is_none() && bare.catalog.is_none());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Args::try_parse_from(["anatomy-lens", "--options"]).is_err());
        assert!(Args::try_parse_from(["anatomy-lens", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["anatomy-lens", "a.glb", "b.glb"]).is_err());
        assert!(Args::try_parse_from([
            "anatomy-lens",
            "--options",
            "o.toml",
            "--preset",
            "clinic",
        ])
        .is_err());
    }

    #[test]
    fn presets_resolve_by_file_stem() {
        let dir = std::env::temp_dir()
            .join(format!("anatomy-lens-presets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("clinic.toml"), "").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();

        assert_eq!(preset_path(&dir, "clinic").unwrap(), dir.join("clinic.toml"));
        let err = preset_path(&dir, "notes").unwrap_err();
        assert!(err.contains("available: clinic"), "{err}");

        let args = Args::try_parse_from(["anatomy-lens", "--preset", "clinic"]).unwrap();
        assert_eq!(args.preset.as_deref(), Some("clinic"));
        assert_eq!(args.presets_dir, PathBuf::from("presets"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn recognises_urls() {
        assert!(is_url("https://example.org/human.glb"));
        assert!(!is_url("public/human.glb"));
    }
}
