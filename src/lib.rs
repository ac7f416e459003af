// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D human-anatomy viewer with disease information overlays.
//!
//! A glTF body model is rendered with wgpu. Clicking a region highlights
//! its meshes, pins a floating name tag at the click point and opens an
//! info panel for the first disease associated with that region.
//!
//! # Key entry points
//!
//! - [`catalog::Catalog`] - parts, organs and diseases, built in or loaded
//!   from TOML
//! - [`engine::LensEngine`] - the headless interaction core
//! - [`renderer::SceneRenderer`] - draws a [`scene::Scene`]
//! - [`shell::ShellView`] - everything drawn over the viewport
//! - [`options::Options`] - runtime configuration
//!
//! # Flow
//!
//! A pointer click becomes a [`LensCommand::Click`]. The engine casts a ray
//! through the [`camera::OrbitCamera`], resolves the hit mesh to a part via
//! the [`presenter::ModelPresenter`], runs the
//! [`selection::SelectionController`] transition and re-derives every mesh
//! material. Hosts then draw the frame and re-project the shell.

pub mod camera;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod presenter;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod shell;
pub mod util;

#[cfg(feature = "gui")]
pub mod gui;
#[cfg(feature = "viewer")]
mod viewer;
#[cfg(feature = "web")]
pub mod web;

pub use engine::{LensCommand, LensEngine};
pub use error::LensError;
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
