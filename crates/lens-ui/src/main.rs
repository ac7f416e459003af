//! Dioxus web app for the anatomy-lens info panel.
//!
//! Compiled to WASM and loaded into a wry webview by the native viewer.
//! The viewer pushes its shell view as JSON; panel buttons go back over
//! the IPC bridge.

mod bridge;
mod panel;

use dioxus::prelude::*;
use serde_json::Value;

fn main() {
    launch(app);
}

fn app() -> Element {
    let shell: Signal<Option<Value>> = use_signal(|| None);

    // Register the IPC listener once on mount.
    let _ = use_effect(move || bridge::register_shell_listener(shell));

    let shell_val = shell.read();
    match &*shell_val {
        Some(view) => rsx! {
            panel::Shell { view: view.clone() }
        },
        None => rsx! {
            div {
                style: "padding: 16px; color: #585b70;",
                "Waiting for viewer..."
            }
        },
    }
}
