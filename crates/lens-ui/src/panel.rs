//! Header and info panel, rendered from the viewer's shell view JSON.

// `rsx!` expands `onclick: move |_| bridge::...` such that rustc reports a
// spurious unnecessary-qualification lint on the handler closures.
#![allow(unused_qualifications)]

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;

fn text<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

fn strings(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Whole panel: header and info body. The name tag floats in its own
/// webview over the 3D view.
#[component]
pub fn Shell(view: Value) -> Element {
    let info = view.get("info_panel").cloned().unwrap_or(Value::Null);

    rsx! {
        div { class: "side-panel",
            Header { header: view.get("header").cloned().unwrap_or(Value::Null) }
            div { class: "right-panel",
                h2 { "Info:" }
                InfoBody { info: info }
            }
            button {
                class: "open-model-btn",
                onclick: move |_| bridge::send_open_model(),
                "Open model..."
            }
        }
    }
}

#[component]
fn Header(header: Value) -> Element {
    let logo = text(&header, "/logo_url").to_owned();
    let title = text(&header, "/title").to_owned();
    let details = text(&header, "/patient_details").to_owned();
    rsx! {
        div { class: "app-header",
            img { class: "logo", src: "{logo}", alt: "Logo" }
            div { class: "header-text",
                h1 { "{title}" }
                p { class: "patient-details", "{details}" }
            }
        }
    }
}

#[component]
fn InfoBody(info: Value) -> Element {
    if text(&info, "/kind") != "disease" {
        let prompt = text(&info, "/prompt").to_owned();
        return rsx! { p { class: "placeholder", "{prompt}" } };
    }

    let title = text(&info, "/title").to_owned();
    let description = info.get("description").and_then(Value::as_str).map(str::to_owned);
    let consult = info.get("consult").and_then(Value::as_str).map(str::to_owned);
    let symptoms = strings(&info, "symptoms");
    let treatments = strings(&info, "treatments");
    let icon = info.get("icon").filter(|v| !v.is_null()).cloned();
    let actions: Vec<(String, String)> = info
        .get("actions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|a| (text(a, "/id").to_owned(), text(a, "/label").to_owned()))
                .collect()
        })
        .unwrap_or_default();

    rsx! {
        div { class: "disease-info",
            button {
                class: "close-btn",
                onclick: move |_| bridge::send_panel_action("close"),
                "×"
            }
            h3 { "{title}" }
            {icon.map(|icon| rsx! {
                OrganIcon { icon: icon }
            })}
            {description.map(|description| rsx! {
                p { "{description}" }
            })}
            if !symptoms.is_empty() {
                h4 { "Symptoms:" }
                ul {
                    for symptom in symptoms {
                        li { "{symptom}" }
                    }
                }
            }
            if !treatments.is_empty() {
                h4 { "Treatments:" }
                ul {
                    for treatment in treatments {
                        li { "{treatment}" }
                    }
                }
            }
            {consult.map(|consult| rsx! {
                h4 { "When to Consult:" }
                p { "{consult}" }
            })}
            div { class: "action-buttons",
                for (id, label) in actions {
                    button {
                        class: "action-btn",
                        onclick: move |_| bridge::send_panel_action(&id),
                        "{label}"
                    }
                }
            }
        }
    }
}

#[component]
fn OrganIcon(icon: Value) -> Element {
    let url = text(&icon, "/url").to_owned();
    let alt = text(&icon, "/alt").to_owned();
    let width = icon.get("width").and_then(Value::as_u64).map(|w| w.to_string());
    let height = icon.get("height").and_then(Value::as_u64).map(|h| h.to_string());
    rsx! {
        img {
            class: "organ-icon",
            src: "{url}",
            alt: "{alt}",
            width: width,
            height: height,
        }
    }
}
