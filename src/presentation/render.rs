//! Builders that turn backend payloads into document panels.

use std::collections::HashMap;

use kiosk_admin_api_types::{Button, ButtonGroup, EntityId, MenuNode, Page, SiteConfig};

use super::document::{
    ButtonForm, Choice, ListItem, ListNode, Panel, PageEditor, Row, SettingsForm, Uploader,
};
use crate::domain::{
    content::{PALETTE, WEATHER_CITIES, block_summary},
    ordering::{ItemId, ListKind, Orderable, sort_by_position},
};

pub const LOADING: &str = "Loading…";

pub fn unavailable(what: &str) -> Panel {
    Panel::Unavailable(format!("Failed to load {what}"))
}

/// Settings form as set up on the first dashboard visit, before any data.
pub fn blank_settings_form() -> SettingsForm {
    SettingsForm {
        weather_options: WEATHER_CITIES.iter().map(ToString::to_string).collect(),
        ..SettingsForm::default()
    }
}

/// Fill `form` from the public site configuration. A separately fetched
/// exit-password status wins over the one embedded in the configuration.
pub fn fill_settings_form(
    form: &mut SettingsForm,
    config: &SiteConfig,
    exit_password_set: Option<bool>,
) {
    form.org_name = config.org_name.clone();
    form.logo_path = config
        .theme
        .logo_path
        .clone()
        .filter(|path| !path.trim().is_empty());
    form.weather_city = config
        .weather_city
        .clone()
        .filter(|city| !city.trim().is_empty());
    form.show_weather = config.show_weather.unwrap_or(false);
    form.exit_password_set = exit_password_set.or(config.exit_password_set);
}

pub fn blank_button_form() -> ButtonForm {
    ButtonForm {
        palette: PALETTE.iter().map(ToString::to_string).collect(),
        target_options: Vec::new(),
        group_options: Vec::new(),
    }
}

pub fn target_choices(pages: &[Page]) -> Vec<Choice> {
    pages
        .iter()
        .map(|page| Choice {
            value: page.slug.clone(),
            label: page.title.clone(),
        })
        .collect()
}

/// Group select options; the first entry detaches a button from its group.
pub fn group_choices(groups: &[ButtonGroup]) -> Vec<Choice> {
    std::iter::once(Choice {
        value: String::new(),
        label: "No group".to_string(),
    })
    .chain(groups.iter().map(|group| Choice {
        value: group.id.to_string(),
        label: group.title.clone(),
    }))
    .collect()
}

pub fn page_rows(pages: &[Page]) -> Panel {
    if pages.is_empty() {
        return Panel::Empty("No pages yet".to_string());
    }
    Panel::Rows(
        pages
            .iter()
            .map(|page| Row {
                id: page.id,
                title: page.title.clone(),
                detail: Some(format!("/{}", page.slug)),
                badges: page
                    .is_home
                    .then(|| "home".to_string())
                    .into_iter()
                    .collect(),
            })
            .collect(),
    )
}

pub fn no_page_selected() -> Panel {
    Panel::PageEditor(PageEditor {
        heading: "Select a page".to_string(),
        info: None,
        blocks: Vec::new(),
    })
}

pub fn page_editor(page: &Page) -> Panel {
    let info = format!(
        "/{}{} · {} blocks",
        page.slug,
        if page.is_home { " · home" } else { "" },
        page.blocks.len()
    );
    Panel::PageEditor(PageEditor {
        heading: page.title.clone(),
        info: Some(info),
        blocks: page
            .blocks
            .iter()
            .map(|block| Row {
                id: block.id,
                title: block.kind.as_str().to_string(),
                detail: Some(block_summary(block)),
                badges: Vec::new(),
            })
            .collect(),
    })
}

fn position_badge(position: i64) -> String {
    format!("#{position}")
}

/// Reorderable button list in stored order.
pub fn buttons_list(buttons: &[Button], row_height: f64) -> Panel {
    if buttons.is_empty() {
        return Panel::Empty("No buttons yet".to_string());
    }
    let mut sorted = buttons.to_vec();
    sort_by_position(&mut sorted);
    let items = sorted
        .iter()
        .map(|button| {
            ListItem::new(
                button.item_id(),
                button.label(),
                position_badge(button.position()),
            )
            .with_icon(
                button
                    .icon_path
                    .clone()
                    .filter(|path| !path.trim().is_empty()),
            )
            .with_detail(
                (!button.target_slug.is_empty()).then(|| format!("→ /{}", button.target_slug)),
            )
        })
        .collect();
    Panel::List(ListNode::new(ListKind::Buttons, items, row_height))
}

/// Reorderable group list; each entry lists the titles of its member buttons.
pub fn groups_list(groups: &[ButtonGroup], menu: &[MenuNode], row_height: f64) -> Panel {
    if groups.is_empty() {
        return Panel::Empty("No groups yet".to_string());
    }
    let members: HashMap<EntityId, Vec<&str>> = menu
        .iter()
        .filter(|node| node.is_group())
        .filter_map(|node| {
            node.id
                .map(|id| (id, node.items.iter().map(|b| b.title.as_str()).collect()))
        })
        .collect();

    let mut sorted = groups.to_vec();
    sort_by_position(&mut sorted);
    let items = sorted
        .iter()
        .map(|group| {
            let detail = match members.get(&group.id) {
                Some(titles) if !titles.is_empty() => titles.join(", "),
                _ => "No buttons in group".to_string(),
            };
            ListItem::new(
                ItemId(group.id),
                group.label(),
                position_badge(group.position()),
            )
            .with_detail(Some(detail))
        })
        .collect();
    Panel::List(ListNode::new(ListKind::Groups, items, row_height))
}

pub fn uploader() -> Uploader {
    Uploader {
        kinds: ["image", "video", "pdf"].map(String::from).to_vec(),
        last_uploaded: None,
    }
}

#[cfg(test)]
mod tests {
    use kiosk_admin_api_types::{Block, BlockContent, BlockKind, MenuButton, ThemeConfig};

    use super::*;

    fn button(id: EntityId, title: &str, order_index: i64) -> Button {
        Button {
            id,
            title: title.to_string(),
            target_slug: "about".to_string(),
            order_index,
            bg_color: None,
            text_color: None,
            icon_path: Some("  ".to_string()),
            group_id: None,
        }
    }

    #[test]
    fn buttons_are_rendered_in_stored_order_with_ids() {
        let panel = buttons_list(&[button(7, "B", 2), button(3, "A", 1)], 40.0);
        let Panel::List(list) = panel else {
            panic!("expected list");
        };
        assert_eq!(list.ids(), vec![ItemId(3), ItemId(7)]);
        let first = &list.items()[0];
        assert_eq!(first.badge, "#1");
        assert_eq!(first.icon, None);
        assert_eq!(first.detail.as_deref(), Some("→ /about"));
        assert!(!first.draggable);
    }

    #[test]
    fn empty_lists_render_placeholders() {
        assert_eq!(
            buttons_list(&[], 40.0),
            Panel::Empty("No buttons yet".into())
        );
        assert_eq!(
            groups_list(&[], &[], 40.0),
            Panel::Empty("No groups yet".into())
        );
        assert_eq!(page_rows(&[]), Panel::Empty("No pages yet".into()));
    }

    #[test]
    fn groups_show_member_titles() {
        let groups = vec![
            ButtonGroup {
                id: 1,
                title: "Info".into(),
                order_index: 1,
                bg_color: None,
                text_color: None,
            },
            ButtonGroup {
                id: 2,
                title: "Empty".into(),
                order_index: 2,
                bg_color: None,
                text_color: None,
            },
        ];
        let menu = vec![MenuNode {
            kind: "group".into(),
            id: Some(1),
            title: "Info".into(),
            order_index: Some(1),
            items: vec![
                MenuButton {
                    id: 10,
                    title: "Hours".into(),
                },
                MenuButton {
                    id: 11,
                    title: "Map".into(),
                },
            ],
        }];
        let Panel::List(list) = groups_list(&groups, &menu, 40.0) else {
            panic!("expected list");
        };
        let details: Vec<_> = list
            .items()
            .iter()
            .map(|item| item.detail.clone().unwrap_or_default())
            .collect();
        assert_eq!(details, vec!["Hours, Map", "No buttons in group"]);
    }

    #[test]
    fn status_endpoint_overrides_config_flag() {
        let config = SiteConfig {
            org_name: "Museum".into(),
            theme: ThemeConfig {
                logo_path: Some(String::new()),
            },
            show_weather: Some(true),
            weather_city: Some("Brest".into()),
            exit_password_set: Some(false),
        };
        let mut form = blank_settings_form();
        fill_settings_form(&mut form, &config, Some(true));
        assert_eq!(form.org_name, "Museum");
        assert_eq!(form.logo_path, None);
        assert_eq!(form.exit_password_set, Some(true));
        assert_eq!(form.weather_options.len(), WEATHER_CITIES.len());

        fill_settings_form(&mut form, &config, None);
        assert_eq!(form.exit_password_set, Some(false));
    }

    #[test]
    fn page_editor_summarises_blocks() {
        let page = Page {
            id: 4,
            slug: "visit".into(),
            title: "Visit".into(),
            is_home: true,
            blocks: vec![Block {
                id: 9,
                page_id: 4,
                kind: BlockKind::Video,
                content: BlockContent::default(),
            }],
        };
        let Panel::PageEditor(editor) = page_editor(&page) else {
            panic!("expected editor");
        };
        assert_eq!(editor.info.as_deref(), Some("/visit · home · 1 blocks"));
        assert_eq!(editor.blocks[0].detail.as_deref(), Some("No path set"));
    }
}
