//! Workspace tasks: `cargo xtask build-ui`, `cargo xtask check-catalog`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anatomy_lens::catalog::{enforce, Catalog};
use anatomy_lens::scene::{loader, MaterialLibrary};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "anatomy-lens workspace tasks")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the lens-ui bundle embedded by the `gui` feature.
    BuildUi {
        /// Debug build (faster, larger).
        #[arg(long)]
        debug: bool,
    },
    /// Check catalog integrity, and mesh names against a model.
    CheckCatalog {
        /// Catalog TOML; the built-in catalog when omitted.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// `.glb` / `.gltf` whose mesh names the parts must match.
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn build_ui(debug: bool) -> Result<()> {
    let ui_dir = workspace_root().join("crates/lens-ui");
    let mut cmd = Command::new("trunk");
    let _ = cmd.arg("build").current_dir(&ui_dir);
    if !debug {
        let _ = cmd.arg("--release");
    }
    let status = cmd
        .status()
        .context("failed to run trunk (cargo install trunk)")?;
    if !status.success() {
        bail!("trunk build failed with {status}");
    }
    println!("lens-ui built into {}", ui_dir.join("dist").display());
    Ok(())
}

fn check_catalog(catalog: Option<&Path>, model: Option<&Path>) -> Result<()> {
    let catalog = match catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Catalog::builtin(),
    };
    let mut issues = catalog.integrity_issues();
    if let Some(path) = model {
        let mut materials = MaterialLibrary::new();
        let scene = loader::load_file(path, &mut materials)
            .with_context(|| format!("failed to load {}", path.display()))?;
        issues.extend(catalog.mesh_issues(scene.mesh_names()));
    }

    for issue in &issues {
        println!("{issue}");
    }
    println!(
        "{} parts, {} organs, {} diseases",
        catalog.parts().len(),
        catalog.organs().len(),
        catalog.diseases().len()
    );
    enforce(issues, true).map_err(anyhow::Error::from)
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Task::BuildUi { debug } => build_ui(debug),
        Task::CheckCatalog { catalog, model } => {
            check_catalog(catalog.as_deref(), model.as_deref())
        }
    }
}
