//! Wry webview child of the winit window.
//!
//! Creates a [`wry::WebView`] along the right edge of the window, serves
//! the lens-ui WASM bundle through a custom `lens://` protocol, and bridges
//! the info panel's buttons back to the native engine. A second, transparent
//! webview floats over the 3D view as the name tag.

use std::borrow::Cow;
use std::sync::mpsc;

use rust_embed::RustEmbed;
use wry::http::{header::CONTENT_TYPE, Response};
use wry::{dpi, Rect, WebView, WebViewBuilder};

use crate::shell::{html, NameTagView, ShellView};

/// Embedded lens-ui dist output (built by `cargo xtask build-ui`).
#[derive(RustEmbed)]
#[folder = "crates/lens-ui/dist/"]
struct UiAssets;

/// Actions sent from the webview WASM app to the native engine.
#[derive(Debug, PartialEq, Eq)]
pub enum UiAction {
    /// A panel button was pressed (`close`, `consult`, `more_info`).
    Panel {
        /// Button id.
        id: String,
    },
    /// The user asked to open another model file.
    OpenModel,
}

/// Create the wry webview as a child of the given window.
///
/// Returns `(webview, action_rx)`; the receiver yields [`UiAction`]s
/// from the WASM app.
///
/// # Errors
///
/// Returns [`wry::Error`] if the platform webview cannot be created.
pub fn create_webview<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Result<(WebView, mpsc::Receiver<UiAction>), wry::Error> {
    let (tx, rx) = mpsc::channel();

    let webview = WebViewBuilder::new()
        .with_bounds(panel_bounds(window_width, window_height, panel_width))
        .with_custom_protocol("lens".into(), |_id, request| {
            let path = request_path(request.uri().path());
            serve_asset(&path)
        })
        .with_url("lens://localhost/")
        .with_initialization_script(BRIDGE_JS)
        .with_ipc_handler(move |req| {
            let Ok(msg) = serde_json::from_str::<serde_json::Value>(req.body())
            else {
                return;
            };
            if let Some(action) = parse_action(&msg) {
                let _ = tx.send(action);
            }
        })
        .build_as_child(window)?;

    Ok((webview, rx))
}

/// Asset path for a `lens://` request path. Percent escapes are decoded so
/// file names with spaces resolve; undecodable paths are served as-is.
fn request_path(uri_path: &str) -> String {
    let path = uri_path.strip_prefix('/').unwrap_or(uri_path);
    if path.is_empty() {
        return "index.html".to_owned();
    }
    urlencoding::decode(path).map_or_else(|_| path.to_owned(), Cow::into_owned)
}

/// Embedded UI files first, then catalog assets (logo, organ icons) from
/// the working directory.
fn serve_asset(path: &str) -> Response<Cow<'static, [u8]>> {
    let empty = || Response::new(Cow::from(Vec::new()));
    let data = UiAssets::get(path)
        .map(|asset| asset.data.into_owned())
        .or_else(|| is_local_asset(path).then(|| std::fs::read(path).ok()).flatten());
    match data {
        Some(data) => {
            let mime = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            Response::builder()
                .header(CONTENT_TYPE, mime)
                .body(Cow::from(data))
                .unwrap_or_else(|_| empty())
        }
        None => {
            log::debug!("lens-ui asset not found: {path}");
            Response::builder()
                .status(404)
                .body(Cow::from(Vec::new()))
                .unwrap_or_else(|_| empty())
        }
    }
}

/// Relative paths that stay inside the working directory.
fn is_local_asset(path: &str) -> bool {
    let path = std::path::Path::new(path);
    path.is_relative()
        && path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

/// The panel's [`Rect`] at the right edge of the window.
#[must_use]
pub fn panel_bounds(window_width: u32, window_height: u32, panel_width: u32) -> Rect {
    let width = panel_width.min(window_width);
    let x = window_width - width;
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(x as i32, 0)),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(width, window_height)),
    }
}

/// Push the current shell projection to the webview.
pub fn push_shell(webview: &WebView, view: &ShellView) {
    let json = view.to_json();
    let escaped = json.replace('\\', "\\\\").replace('\'', "\\'");
    if let Err(e) =
        webview.evaluate_script(&format!("window.__lens_push_shell('{escaped}')"))
    {
        log::warn!("failed to push shell view: {e}");
    }
}

/// Physical size of the name tag webview. The label is centered inside and
/// scaled by CSS, so the box only has to fit the largest tag.
pub const NAME_TAG_SIZE: (u32, u32) = (320, 96);

/// Create the hidden, transparent name tag webview.
///
/// # Errors
///
/// Returns [`wry::Error`] if the platform webview cannot be created.
pub fn create_name_tag<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
) -> Result<WebView, wry::Error> {
    WebViewBuilder::new()
        .with_transparent(true)
        .with_visible(false)
        .with_bounds(tag_rect(0, 0))
        .with_html(NAME_TAG_PAGE)
        .build_as_child(window)
}

/// Bounds centering the name tag box on its screen anchor, or `None` when
/// there is no tag or its anchor is behind the camera.
#[must_use]
pub fn name_tag_bounds(view: Option<&NameTagView>) -> Option<Rect> {
    let [x, y] = view?.screen?;
    let (w, h) = NAME_TAG_SIZE;
    Some(tag_rect(x as i32 - (w / 2) as i32, y as i32 - (h / 2) as i32))
}

/// Move, refill and show the name tag, or hide it.
pub fn push_name_tag(webview: &WebView, view: Option<&NameTagView>) {
    let result = match (view, name_tag_bounds(view)) {
        (Some(view), Some(bounds)) => {
            let content = serde_json::json!(html::name_tag(view)).to_string();
            webview
                .set_bounds(bounds)
                .and_then(|()| {
                    webview.evaluate_script(&format!(
                        "window.__lens_tag({content}, {:.4})",
                        view.scale
                    ))
                })
                .and_then(|()| webview.set_visible(true))
        }
        _ => webview.set_visible(false),
    };
    if let Err(e) = result {
        log::warn!("failed to update name tag: {e}");
    }
}

// ── Internals ────────────────────────────────────────────────────────────

/// Injected before page load. Buffers the latest shell view so a push
/// that lands before the WASM app subscribes is replayed on subscription.
const BRIDGE_JS: &str = r#"
(function() {
    var pending = null;

    function dispatch(json) {
        window.dispatchEvent(new CustomEvent('lens-shell', { detail: json }));
    }

    window.__lens_push_shell = function(json) {
        pending = json;
        dispatch(json);
    };

    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        if (this === window && type === 'lens-shell' && pending) {
            dispatch(pending);
        }
    };
})();
"#;

fn tag_rect(x: i32, y: i32) -> Rect {
    let (w, h) = NAME_TAG_SIZE;
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(x, y)),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(w, h)),
    }
}

/// Page of the name tag webview; `__lens_tag` swaps in the label markup.
const NAME_TAG_PAGE: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><style>
html, body { margin: 0; height: 100%; background: transparent; overflow: hidden; }
body { display: flex; align-items: center; justify-content: center; }
#tag { font: 600 18px sans-serif; color: #fff; transform-origin: center; }
.name-tag-content { background: rgba(20, 24, 32, 0.85); padding: 6px 14px; border-radius: 6px; white-space: nowrap; }
.name-tag-line { display: none; }
</style></head>
<body><div id="tag"></div>
<script>
window.__lens_tag = function(html, scale) {
    var tag = document.getElementById('tag');
    tag.innerHTML = html;
    tag.style.transform = 'scale(' + Math.min(Math.max(scale, 0.25), 2) + ')';
};
</script></body></html>"#;

/// Parse an IPC message from the WASM side into a [`UiAction`].
fn parse_action(msg: &serde_json::Value) -> Option<UiAction> {
    match msg.get("action")?.as_str()? {
        "panel" => {
            let id = msg.get("id")?.as_str()?.to_owned();
            Some(UiAction::Panel { id })
        }
        "open_model" => Some(UiAction::OpenModel),
        other => {
            log::debug!("unknown ui action '{other}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_panel_and_open_actions() {
        assert_eq!(
            parse_action(&json!({ "action": "panel", "id": "close" })),
            Some(UiAction::Panel { id: "close".into() })
        );
        assert_eq!(
            parse_action(&json!({ "action": "open_model" })),
            Some(UiAction::OpenModel)
        );
        assert_eq!(parse_action(&json!({ "action": "panel" })), None);
        assert_eq!(parse_action(&json!({ "action": "nope" })), None);
    }

    #[test]
    fn local_assets_cannot_escape_working_dir() {
        assert!(is_local_asset("public/organ_heart.svg"));
        assert!(!is_local_asset("../secret.txt"));
        assert!(!is_local_asset("/etc/passwd"));
    }

    #[test]
    fn request_paths_are_percent_decoded() {
        assert_eq!(request_path("/"), "index.html");
        assert_eq!(request_path("/guardian-logo%20color.png"), "guardian-logo color.png");
        assert_eq!(request_path("/public/organ_heart.svg"), "public/organ_heart.svg");
        // Encoded traversal is still rejected once decoded
        let sneaky = request_path("/%2E%2E/secret.txt");
        assert_eq!(sneaky, "../secret.txt");
        assert!(!is_local_asset(&sneaky));
    }

    #[test]
    fn name_tag_box_centers_on_its_anchor() {
        let mut tag = NameTagView {
            label: "Heart".into(),
            world: [0.0, 1.2, 0.1],
            screen: Some([400.0, 300.0]),
            scale: 1.0,
        };
        let Rect { position, size } = name_tag_bounds(Some(&tag)).unwrap();
        assert_eq!(
            position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(240, 252))
        );
        assert_eq!(size, dpi::Size::Physical(dpi::PhysicalSize::new(320, 96)));

        tag.screen = None;
        assert!(name_tag_bounds(Some(&tag)).is_none());
        assert!(name_tag_bounds(None).is_none());
    }

    #[test]
    fn panel_hugs_right_edge_and_never_exceeds_window() {
        let Rect { position, size } = panel_bounds(1280, 720, 360);
        assert_eq!(
            position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(920, 0))
        );
        assert_eq!(size, dpi::Size::Physical(dpi::PhysicalSize::new(360, 720)));

        let Rect { position, .. } = panel_bounds(200, 720, 360);
        assert_eq!(
            position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(0, 0))
        );
    }
}
