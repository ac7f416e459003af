//! Native-side GUI layer: a wry webview hosting the lens-ui WASM bundle.
//!
//! The webview is a child of the winit window and shows the header and the
//! info panel. It talks to the engine through a small JSON IPC bridge.

/// Wry webview creation, IPC handler, and shell push helper.
pub mod webview;
