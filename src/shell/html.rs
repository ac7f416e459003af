//! HTML fragments for the browser overlay.
//!
//! Every piece of catalog or option text passes through [`escape`]. Class
//! names match the stylesheet shipped with the web host.

use std::fmt::Write;

use super::{DiseaseView, HeaderView, InfoPanel, NameTagView};

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<header class="app-header">` with logo, title and patient line.
#[must_use]
pub fn header(view: &HeaderView) -> String {
    format!(
        "<header class=\"app-header\"><img src=\"{}\" class=\"logo\" alt=\"Logo\"/>\
         <div><h1>{}</h1><p class=\"patient-details\">{}</p></div></header>",
        escape(&view.logo_url),
        escape(&view.title),
        escape(&view.patient_details),
    )
}

/// Name tag content. Positioning is left to the caller's inline style, see
/// [`name_tag_style`].
#[must_use]
pub fn name_tag(view: &NameTagView) -> String {
    format!(
        "<div class=\"name-tag-content\">{}<div class=\"name-tag-line\"></div></div>",
        escape(&view.label)
    )
}

/// Inline style centering the tag on its anchor, or hiding it when the
/// anchor is off screen.
#[must_use]
pub fn name_tag_style(view: &NameTagView) -> String {
    match view.screen {
        Some([x, y]) => format!(
            "display:block;left:{x:.1}px;top:{y:.1}px;\
             transform:translate(-50%,-50%) scale({:.4})",
            view.scale
        ),
        None => "display:none".to_owned(),
    }
}

/// Inner HTML of `.right-panel`.
#[must_use]
pub fn info_panel(panel: &InfoPanel) -> String {
    let mut html = String::from("<h2>Info:</h2>");
    match panel {
        InfoPanel::Placeholder { prompt } => {
            let _ = write!(html, "<p>{}</p>", escape(prompt));
        }
        InfoPanel::Disease(view) => disease(&mut html, view),
    }
    html
}

fn disease(html: &mut String, view: &DiseaseView) {
    html.push_str("<button class=\"close-btn\" data-action=\"close\">X</button>");
    let _ = write!(html, "<h3>{}</h3>", escape(&view.title));

    if let Some(icon) = &view.icon {
        let mut size = String::new();
        if let Some(w) = icon.width {
            let _ = write!(size, " width=\"{w}\"");
        }
        if let Some(h) = icon.height {
            let _ = write!(size, " height=\"{h}\"");
        }
        let _ = write!(
            html,
            "<img src=\"{}\" alt=\"{}\" class=\"organ-icon\"{size}/>",
            escape(&icon.url),
            escape(&icon.alt),
        );
    }

    if let Some(description) = &view.description {
        let _ = write!(html, "<h4>Description:</h4><p>{}</p>", escape(description));
    }
    list(html, "Symptoms:", &view.symptoms);
    list(html, "Treatments:", &view.treatments);
    if let Some(consult) = &view.consult {
        let _ = write!(html, "<h4>When to Consult:</h4><p>{}</p>", escape(consult));
    }

    html.push_str("<div class=\"action-buttons\">");
    for action in &view.actions {
        let _ = write!(
            html,
            "<button data-action=\"{}\">{}</button>",
            escape(&action.id),
            escape(&action.label),
        );
    }
    html.push_str("</div>");
}

fn list(html: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(html, "<h4>{heading}</h4><ul>");
    for item in items {
        let _ = write!(html, "<li>{}</li>", escape(item));
    }
    html.push_str("</ul>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{IconView, PanelAction};

    fn heart_view() -> DiseaseView {
        DiseaseView {
            disease_id: "heart_attack".into(),
            title: "Heart Attack Information".into(),
            icon: Some(IconView {
                url: "public/organ_heart.svg".into(),
                alt: "Heart Organ".into(),
                width: Some(70),
                height: Some(70),
            }),
            description: Some("Blocked blood flow.".into()),
            symptoms: vec!["Chest pain".into(), "Nausea".into()],
            treatments: Vec::new(),
            consult: None,
            actions: vec![PanelAction {
                id: "consult".into(),
                label: "Consultation".into(),
            }],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn placeholder_panel() {
        let html = info_panel(&InfoPanel::Placeholder {
            prompt: "Pick <one>".into(),
        });
        assert_eq!(html, "<h2>Info:</h2><p>Pick &lt;one&gt;</p>");
    }

    #[test]
    fn disease_panel_sections() {
        let html = info_panel(&InfoPanel::Disease(heart_view()));
        assert!(html.contains("class=\"close-btn\""));
        assert!(html.contains("<h3>Heart Attack Information</h3>"));
        assert!(html.contains(
            "<img src=\"public/organ_heart.svg\" alt=\"Heart Organ\" \
             class=\"organ-icon\" width=\"70\" height=\"70\"/>"
        ));
        assert!(html.contains("<li>Chest pain</li><li>Nausea</li>"));
        assert!(!html.contains("Treatments:"));
        assert!(!html.contains("When to Consult:"));
        assert!(html.contains("<button data-action=\"consult\">Consultation</button>"));
    }

    #[test]
    fn name_tag_hidden_behind_camera() {
        let mut tag = NameTagView {
            label: "Heart & Lungs".into(),
            world: [0.0; 3],
            screen: None,
            scale: 1.0,
        };
        assert_eq!(name_tag_style(&tag), "display:none");
        assert!(name_tag(&tag).contains("Heart &amp; Lungs"));
        tag.screen = Some([10.0, 20.0]);
        assert!(name_tag_style(&tag).starts_with("display:block;left:10.0px;top:20.0px"));
    }

    #[test]
    fn header_fragment() {
        let html = header(&HeaderView {
            logo_url: "public/logo.png".into(),
            title: "The Patient's Lens".into(),
            patient_details: "Doe, J".into(),
        });
        assert!(html.starts_with("<header class=\"app-header\">"));
        assert!(html.contains("<h1>The Patient&#39;s Lens</h1>"));
        assert!(html.contains("<p class=\"patient-details\">Doe, J</p>"));
    }
}
