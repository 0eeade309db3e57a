//! Content rules shared by the page, block and button editors.

use std::cell::RefCell;
use std::rc::Rc;

use kiosk_admin_api_types::{Block, BlockKind};
use lol_html::{RewriteStrSettings, doc_text, element, rewrite_str};
use time::OffsetDateTime;
use tracing::warn;

/// Characters of tag-stripped text shown in a block summary.
pub const SNIPPET_CHARS: usize = 160;
const MAX_SLUG_LEN: usize = 80;

pub const DEFAULT_BUTTON_BG: &str = "#2563eb";
pub const DEFAULT_BUTTON_FG: &str = "#ffffff";

/// Swatches offered by the button editor.
pub const PALETTE: [&str; 16] = [
    "#2563eb", "#1d4ed8", "#0ea5e9", "#22c55e", "#16a34a", "#f59e0b", "#ef4444", "#f97316",
    "#a855f7", "#6b7280", "#111827", "#0ea5e9", "#f43f5e", "#10b981", "#eab308", "#8b5cf6",
];

/// Cities the kiosk weather widget can be pointed at.
pub const WEATHER_CITIES: [&str; 6] = ["Minsk", "Brest", "Vitebsk", "Gomel", "Grodno", "Mogilev"];

const ALIGNMENTS: [(&str, &str); 4] = [
    ("ql-align-center", "center"),
    ("ql-align-right", "right"),
    ("ql-align-justify", "justify"),
    ("ql-align-left", "left"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Foreground {
    #[default]
    Light,
    Dark,
}

impl Foreground {
    pub fn hex(self) -> &'static str {
        match self {
            Foreground::Light => DEFAULT_BUTTON_FG,
            Foreground::Dark => "#111827",
        }
    }
}

/// Position of `color` in the palette, compared case-insensitively.
pub fn palette_index(color: &str) -> Option<usize> {
    PALETTE
        .iter()
        .position(|swatch| swatch.eq_ignore_ascii_case(color.trim()))
}

/// Slug for a page created from the editor: `p-` plus the creation time in
/// base-36 milliseconds.
pub fn generated_page_slug(now: OffsetDateTime) -> String {
    let millis = u128::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
    let mut slug = format!("p-{}", to_base36(millis));
    slug.truncate(MAX_SLUG_LEN);
    slug
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Replace editor alignment classes with inline `text-align` styles so that
/// renderers without the editor stylesheet keep the layout. Malformed input
/// is returned untouched.
pub fn normalize_alignment(html: &str) -> String {
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[class]", |el| {
                let Some(class) = el.get_attribute("class") else {
                    return Ok(());
                };
                let align = ALIGNMENTS
                    .iter()
                    .find(|(name, _)| class.split_whitespace().any(|c| c == *name))
                    .map(|(_, align)| *align);
                if let Some(align) = align {
                    let style = match el.get_attribute("style") {
                        Some(existing) if !existing.trim().is_empty() => {
                            format!("{}; text-align: {align}", existing.trim_end_matches(';'))
                        }
                        _ => format!("text-align: {align}"),
                    };
                    el.set_attribute("style", &style)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match result {
        Ok(rewritten) => rewritten,
        Err(err) => {
            warn!(error = %err, "failed to normalise block html; keeping original");
            html.to_string()
        }
    }
}

/// Text content of `html` with tags removed and whitespace trimmed.
pub fn strip_tags(html: &str) -> String {
    let collected = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&collected);
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!(move |chunk| {
                sink.borrow_mut().push_str(chunk.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );
    if let Err(err) = result {
        warn!(error = %err, "failed to strip block html");
    }
    let text = collected.borrow().trim().to_string();
    text
}

/// One-line description of a block for list rendering.
pub fn block_summary(block: &Block) -> String {
    match block.kind {
        BlockKind::Text => {
            let text = strip_tags(block.content.html.as_deref().unwrap_or_default());
            if text.is_empty() {
                return "Empty text".to_string();
            }
            let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
            if text.chars().count() > SNIPPET_CHARS {
                snippet.push('…');
            }
            snippet
        }
        _ => block
            .content
            .path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or("No path set")
            .to_string(),
    }
}
