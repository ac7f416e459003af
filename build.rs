//! Build script: writes a placeholder lens-ui page when the `gui` feature is on.

use std::path::Path;

fn main() {
    // Only needed when the gui feature is enabled.
    if std::env::var("CARGO_FEATURE_GUI").is_err() {
        return;
    }

    // rust-embed needs the lens-ui dist directory to exist even before
    // `cargo xtask build-ui` has run, so write a placeholder page.
    let dist = Path::new("crates/lens-ui/dist");
    let index = dist.join("index.html");
    if !index.exists() {
        if let Err(e) = std::fs::create_dir_all(dist).and_then(|()| {
            std::fs::write(
                &index,
                "<!DOCTYPE html><html><body>lens-ui not built</body></html>",
            )
        }) {
            println!("cargo:warning=failed to write lens-ui placeholder: {e}");
        }
    }

    println!("cargo:rerun-if-changed=crates/lens-ui/dist");
}
