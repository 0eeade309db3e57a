//! Plain-text outline of the visible part of a document.

use std::fmt::Write as _;

use super::document::{Document, ListNode, Panel, PanelId, Row};

fn panel_label(id: PanelId) -> &'static str {
    match id {
        PanelId::Notice => "notice",
        PanelId::Settings => "settings",
        PanelId::Pages => "pages",
        PanelId::PageEditor => "page",
        PanelId::ButtonForm => "button form",
        PanelId::Buttons => "buttons",
        PanelId::Groups => "groups",
        PanelId::Uploader => "uploader",
    }
}

/// Heading, menu, and the panels of every visible section.
pub fn outline(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", document.heading());

    let nav: Vec<String> = document
        .nav()
        .iter()
        .map(|item| {
            if item.active {
                format!("*{}*", item.label)
            } else {
                item.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "nav: {}", nav.join(" · "));

    for handle in document.visible_sections() {
        let Some(section) = document.section(handle) else {
            continue;
        };
        for (id, panel) in section.panels() {
            let _ = writeln!(out, "[{}]", panel_label(id));
            write_panel(&mut out, panel);
        }
    }
    out
}

fn write_panel(out: &mut String, panel: &Panel) {
    match panel {
        Panel::Loading(text) | Panel::Empty(text) | Panel::Text(text) => {
            let _ = writeln!(out, "  {text}");
        }
        Panel::Unavailable(text) => {
            let _ = writeln!(out, "  ! {text}");
        }
        Panel::Rows(rows) => write_rows(out, rows),
        Panel::List(list) => write_list(out, list),
        Panel::Settings(form) => {
            let _ = writeln!(out, "  organisation: {}", display_or_dash(&form.org_name));
            let _ = writeln!(
                out,
                "  logo: {}",
                form.logo_path.as_deref().unwrap_or("-")
            );
            let weather = match (&form.weather_city, form.show_weather) {
                (Some(city), true) => format!("{city} (shown)"),
                (Some(city), false) => format!("{city} (hidden)"),
                (None, _) => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "  weather: {weather} of {} cities",
                form.weather_options.len()
            );
            let password = match form.exit_password_set {
                Some(true) => "set",
                Some(false) => "not set",
                None => "unknown",
            };
            let _ = writeln!(out, "  exit password: {password}");
        }
        Panel::ButtonForm(form) => {
            let _ = writeln!(
                out,
                "  {} colours, {} target pages, {} group options",
                form.palette.len(),
                form.target_options.len(),
                form.group_options.len()
            );
        }
        Panel::PageEditor(editor) => {
            let _ = writeln!(out, "  {}", editor.heading);
            if let Some(info) = &editor.info {
                let _ = writeln!(out, "  {info}");
            }
            write_rows(out, &editor.blocks);
        }
        Panel::Uploader(uploader) => {
            let _ = writeln!(out, "  kinds: {}", uploader.kinds.join(", "));
            if let Some(path) = &uploader.last_uploaded {
                let _ = writeln!(out, "  last upload: {path}");
            }
        }
    }
}

fn write_rows(out: &mut String, rows: &[Row]) {
    for row in rows {
        let mut line = format!("  {:>4}  {}", row.id, row.title);
        for badge in &row.badges {
            let _ = write!(line, " [{badge}]");
        }
        if let Some(detail) = &row.detail {
            let _ = write!(line, "  {detail}");
        }
        let _ = writeln!(out, "{line}");
    }
}

fn write_list(out: &mut String, list: &ListNode) {
    for item in list.items() {
        let grip = if item.dragging {
            '>'
        } else if item.draggable {
            '='
        } else {
            ' '
        };
        let mut line = format!("  {grip} {:>4}  {} {}", item.id, item.badge, item.title);
        if let Some(detail) = &item.detail {
            let _ = write!(line, "  {detail}");
        }
        let _ = writeln!(out, "{line}");
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
