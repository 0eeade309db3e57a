//! Per-route setup and refresh routines.
//!
//! Setup runs once per route and wires the section's controls; refresh runs
//! on every visit and re-renders live data. Fetching and applying are split
//! so the caller can drop data that arrives after its route was left.

use kiosk_admin_api_types::{
    Button, ButtonGroup, ExitPasswordStatus, MenuNode, Page, SiteConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{
    fetch::cancellable,
    ports::{AdminApi, ApiError},
};
use crate::{
    domain::{ordering::ListKind, routes::Route},
    presentation::{
        document::{Panel, PanelId, SectionNode},
        render,
    },
};

/// Sections with dedicated behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Dashboard,
    Pages,
    Buttons,
    Media,
    Theme,
    Other,
}

impl SectionKind {
    pub fn of(route: &Route) -> Self {
        match route.as_str() {
            "dashboard" => SectionKind::Dashboard,
            "pages" => SectionKind::Pages,
            "buttons" => SectionKind::Buttons,
            "media" => SectionKind::Media,
            "theme" => SectionKind::Theme,
            _ => SectionKind::Other,
        }
    }
}

/// Asynchronous follow-up work requested by a setup routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupTask {
    /// Fill the button form's target page select.
    PreloadTargets,
    /// Fill the button form's group select.
    PreloadGroups,
}

/// Wire the controls of a section. Must run at most once per section.
pub fn setup_section(route: &Route, section: &mut SectionNode) -> Vec<SetupTask> {
    match SectionKind::of(route) {
        SectionKind::Dashboard => {
            section.bind("settings-form");
            section.bind("logo-upload");
            section.bind("exit-password");
            section.set_panel(
                PanelId::Settings,
                Panel::Settings(render::blank_settings_form()),
            );
            Vec::new()
        }
        SectionKind::Pages => {
            section.bind("page-form");
            section.bind("block-editor");
            section.set_panel(PanelId::Pages, Panel::Loading(render::LOADING.to_string()));
            section.set_panel(PanelId::PageEditor, render::no_page_selected());
            Vec::new()
        }
        SectionKind::Buttons => {
            section.bind("button-form");
            section.bind("palette");
            section.bind("group-form");
            section.set_panel(
                PanelId::ButtonForm,
                Panel::ButtonForm(render::blank_button_form()),
            );
            section.set_panel(PanelId::Buttons, Panel::Loading(render::LOADING.to_string()));
            section.set_panel(PanelId::Groups, Panel::Loading(render::LOADING.to_string()));
            vec![SetupTask::PreloadTargets, SetupTask::PreloadGroups]
        }
        SectionKind::Media => {
            section.bind("uploader");
            section.set_panel(PanelId::Uploader, Panel::Uploader(render::uploader()));
            Vec::new()
        }
        SectionKind::Theme | SectionKind::Other => Vec::new(),
    }
}

/// Result of a setup task, ready to be applied to the button form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preloaded {
    Targets(Vec<Page>),
    Groups(Vec<ButtonGroup>),
}

/// Run a setup task. A failed preload leaves the select empty.
pub async fn run_setup_task(api: &dyn AdminApi, task: SetupTask) -> Preloaded {
    match task {
        SetupTask::PreloadTargets => match api.list_pages().await {
            Ok(pages) => Preloaded::Targets(pages),
            Err(err) => {
                warn!(error = %err, "failed to preload pages for the button form");
                Preloaded::Targets(Vec::new())
            }
        },
        SetupTask::PreloadGroups => match api.list_groups().await {
            Ok(groups) => Preloaded::Groups(groups),
            Err(err) => {
                warn!(error = %err, "failed to preload groups for the button form");
                Preloaded::Groups(Vec::new())
            }
        },
    }
}

/// Fill the button form's selects. Group options already rendered by a
/// refresh are newer than the preload and are kept.
pub fn apply_preloaded(section: &mut SectionNode, preloaded: &Preloaded) {
    let Some(Panel::ButtonForm(form)) = section.panel_mut(PanelId::ButtonForm) else {
        return;
    };
    match preloaded {
        Preloaded::Targets(pages) => form.target_options = render::target_choices(pages),
        Preloaded::Groups(groups) if form.group_options.is_empty() => {
            form.group_options = render::group_choices(groups);
        }
        Preloaded::Groups(_) => {
            debug!("group options already rendered; preload ignored");
        }
    }
}

/// Live data fetched for one refresh. Each part fails independently.
#[derive(Debug)]
pub enum RefreshData {
    Dashboard {
        config: Result<SiteConfig, ApiError>,
        status: Result<ExitPasswordStatus, ApiError>,
    },
    Pages {
        pages: Result<Vec<Page>, ApiError>,
        selected: Option<Result<Page, ApiError>>,
    },
    Buttons {
        buttons: Result<Vec<Button>, ApiError>,
        groups: Result<Vec<ButtonGroup>, ApiError>,
        menu: Result<Vec<MenuNode>, ApiError>,
    },
    Static,
}

impl RefreshData {
    fn errors(&self) -> Vec<&ApiError> {
        match self {
            RefreshData::Dashboard { config, status } => {
                [config.as_ref().err(), status.as_ref().err()].into_iter().flatten().collect()
            }
            RefreshData::Pages { pages, selected } => [
                pages.as_ref().err(),
                selected.as_ref().and_then(|page| page.as_ref().err()),
            ]
            .into_iter()
            .flatten()
            .collect(),
            RefreshData::Buttons {
                buttons,
                groups,
                menu,
            } => [
                buttons.as_ref().err(),
                groups.as_ref().err(),
                menu.as_ref().err(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            RefreshData::Static => Vec::new(),
        }
    }

    /// Whether the fetch was superseded before it completed.
    pub fn is_cancelled(&self) -> bool {
        self.errors().iter().any(|err| err.is_cancelled())
    }

    /// Failures other than cancellation.
    pub fn failures(&self) -> Vec<&ApiError> {
        self.errors()
            .into_iter()
            .filter(|err| !err.is_cancelled())
            .collect()
    }
}

/// Fetch everything the route's section displays.
pub async fn fetch(
    api: &dyn AdminApi,
    route: &Route,
    selected_page: Option<&str>,
    token: &CancellationToken,
) -> RefreshData {
    match SectionKind::of(route) {
        SectionKind::Dashboard => {
            let (config, status) = tokio::join!(
                cancellable(token, api.site_config()),
                cancellable(token, api.exit_password_status()),
            );
            RefreshData::Dashboard { config, status }
        }
        SectionKind::Pages => {
            let pages = cancellable(token, api.list_pages()).await;
            let selected = match selected_page {
                Some(slug) => Some(cancellable(token, api.page(slug)).await),
                None => None,
            };
            RefreshData::Pages { pages, selected }
        }
        SectionKind::Buttons => {
            let (buttons, groups, menu) = tokio::join!(
                cancellable(token, api.list_buttons()),
                cancellable(token, api.list_groups()),
                cancellable(token, api.menu()),
            );
            RefreshData::Buttons {
                buttons,
                groups,
                menu,
            }
        }
        SectionKind::Media | SectionKind::Theme | SectionKind::Other => RefreshData::Static,
    }
}

/// What applying a refresh changed beyond the panels themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Reorderable lists that were re-rendered and need fresh handlers.
    pub lists: Vec<ListKind>,
    /// The selected page no longer exists.
    pub selection_lost: bool,
}

/// Render fetched data into `section`. Failed parts become inline
/// placeholders; the rest of the section still updates.
pub fn apply(section: &mut SectionNode, data: RefreshData, row_height: f64) -> Applied {
    let mut applied = Applied::default();
    match data {
        RefreshData::Dashboard { config, status } => {
            let status = status.ok().map(|status| status.exit_password_set);
            match config {
                Ok(config) => {
                    section.remove_panel(PanelId::Notice);
                    if !matches!(section.panel(PanelId::Settings), Some(Panel::Settings(_))) {
                        section.set_panel(
                            PanelId::Settings,
                            Panel::Settings(render::blank_settings_form()),
                        );
                    }
                    if let Some(Panel::Settings(form)) = section.panel_mut(PanelId::Settings) {
                        render::fill_settings_form(form, &config, status);
                    }
                }
                Err(_) => section.set_panel(PanelId::Notice, render::unavailable("settings")),
            }
        }
        RefreshData::Pages { pages, selected } => {
            let panel = match &pages {
                Ok(pages) => render::page_rows(pages),
                Err(_) => render::unavailable("pages"),
            };
            section.set_panel(PanelId::Pages, panel);

            let editor = match selected {
                None => render::no_page_selected(),
                Some(Ok(page)) => render::page_editor(&page),
                Some(Err(ApiError::NotFound(_))) => {
                    applied.selection_lost = true;
                    render::no_page_selected()
                }
                Some(Err(_)) => render::unavailable("page"),
            };
            section.set_panel(PanelId::PageEditor, editor);
        }
        RefreshData::Buttons {
            buttons,
            groups,
            menu,
        } => {
            match buttons {
                Ok(buttons) => {
                    let panel = render::buttons_list(&buttons, row_height);
                    if matches!(panel, Panel::List(_)) {
                        applied.lists.push(ListKind::Buttons);
                    }
                    section.set_panel(PanelId::Buttons, panel);
                }
                Err(_) => section.set_panel(PanelId::Buttons, render::unavailable("buttons")),
            }

            match groups {
                Ok(groups) => {
                    let menu = menu.unwrap_or_default();
                    if let Some(Panel::ButtonForm(form)) = section.panel_mut(PanelId::ButtonForm) {
                        form.group_options = render::group_choices(&groups);
                    }
                    let panel = render::groups_list(&groups, &menu, row_height);
                    if matches!(panel, Panel::List(_)) {
                        applied.lists.push(ListKind::Groups);
                    }
                    section.set_panel(PanelId::Groups, panel);
                }
                Err(_) => section.set_panel(PanelId::Groups, render::unavailable("groups")),
            }
        }
        RefreshData::Static => {}
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str) -> Route {
        Route::new(name).expect("route")
    }

    #[test]
    fn buttons_setup_builds_form_and_requests_preloads() {
        let mut section = SectionNode::in_view("buttons");
        let tasks = setup_section(&route("buttons"), &mut section);
        assert_eq!(
            tasks,
            vec![SetupTask::PreloadTargets, SetupTask::PreloadGroups]
        );
        assert_eq!(section.binding_count("palette"), 1);
        assert!(matches!(
            section.panel(PanelId::Buttons),
            Some(Panel::Loading(_))
        ));

        apply_preloaded(&mut section, &Preloaded::Groups(Vec::new()));
        let Some(Panel::ButtonForm(form)) = section.panel(PanelId::ButtonForm) else {
            panic!("expected button form");
        };
        assert_eq!(form.group_options.len(), 1);
        assert_eq!(form.palette.len(), 16);
    }

    #[test]
    fn late_group_preload_keeps_refreshed_options() {
        let mut section = SectionNode::in_view("buttons");
        setup_section(&route("buttons"), &mut section);
        let fresh = ButtonGroup {
            id: 7,
            title: "Halls".into(),
            order_index: 1,
            bg_color: None,
            text_color: None,
        };
        apply(
            &mut section,
            RefreshData::Buttons {
                buttons: Ok(Vec::new()),
                groups: Ok(vec![fresh]),
                menu: Ok(Vec::new()),
            },
            40.0,
        );

        apply_preloaded(&mut section, &Preloaded::Groups(Vec::new()));

        let Some(Panel::ButtonForm(form)) = section.panel(PanelId::ButtonForm) else {
            panic!("expected button form");
        };
        let labels: Vec<_> = form.group_options.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["No group", "Halls"]);
    }

    #[test]
    fn failed_parts_render_inline_placeholders() {
        let mut section = SectionNode::in_view("buttons");
        setup_section(&route("buttons"), &mut section);
        let applied = apply(
            &mut section,
            RefreshData::Buttons {
                buttons: Err(ApiError::Transport("connection refused".into())),
                groups: Ok(Vec::new()),
                menu: Err(ApiError::Transport("connection refused".into())),
            },
            40.0,
        );
        assert!(applied.lists.is_empty());
        assert_eq!(
            section.panel(PanelId::Buttons),
            Some(&Panel::Unavailable("Failed to load buttons".into()))
        );
        assert_eq!(
            section.panel(PanelId::Groups),
            Some(&Panel::Empty("No groups yet".into()))
        );
    }

    #[test]
    fn missing_selected_page_is_reported() {
        let mut section = SectionNode::in_view("pages");
        setup_section(&route("pages"), &mut section);
        let applied = apply(
            &mut section,
            RefreshData::Pages {
                pages: Ok(Vec::new()),
                selected: Some(Err(ApiError::NotFound("pages/gone".into()))),
            },
            40.0,
        );
        assert!(applied.selection_lost);
    }

    #[test]
    fn cancellation_is_not_a_failure() {
        let data = RefreshData::Dashboard {
            config: Err(ApiError::Cancelled),
            status: Ok(ExitPasswordStatus::default()),
        };
        assert!(data.is_cancelled());
        assert!(data.failures().is_empty());
    }
}
