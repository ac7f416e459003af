//! IPC bridge between the wry webview (native) and the Dioxus WASM app.
//!
//! **Inbound** (native → WASM): the viewer calls
//! `window.__lens_push_shell(json)`, which dispatches a `lens-shell`
//! `CustomEvent` that we listen to here.
//!
//! **Outbound** (WASM → native): `window.ipc.postMessage(json)` carries
//! panel button presses and open-model requests.

use dioxus::signals::{Signal, Writable};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Push every shell view the viewer sends into `shell_sig`. Call once at
/// app startup.
pub fn register_shell_listener(mut shell_sig: Signal<Option<Value>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_shell = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(
        move |evt: web_sys::CustomEvent| {
            if let Some(json_str) = evt.detail().as_string() {
                if let Ok(val) = serde_json::from_str::<Value>(&json_str) {
                    shell_sig.set(Some(val));
                }
            }
        },
    );
    if window
        .add_event_listener_with_callback(
            "lens-shell",
            on_shell.as_ref().unchecked_ref(),
        )
        .is_ok()
    {
        on_shell.forget();
    }
}

/// Send a panel button press (`close`, `consult`, `more_info`).
pub fn send_panel_action(id: &str) {
    let msg = serde_json::json!({ "action": "panel", "id": id });
    post_message(&msg.to_string());
}

/// Ask the viewer to show its open-model dialog.
pub fn send_open_model() {
    let msg = serde_json::json!({ "action": "open_model" });
    post_message(&msg.to_string());
}

/// Call `window.ipc.postMessage(json)` on the wry IPC handler.
fn post_message(json: &str) {
    let js = format!(
        "window.ipc.postMessage('{}')",
        json.replace('\\', "\\\\").replace('\'', "\\'")
    );
    let _ = js_sys::eval(&js);
}
