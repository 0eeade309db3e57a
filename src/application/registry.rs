//! Static mapping from route names to document sections and titles.

use thiserror::Error;

use crate::{
    domain::{ordering::ListKind, routes::Route},
    presentation::document::{Document, SectionHandle, SectionNode},
};

/// Heading shown for routes without a dedicated title.
pub const DEFAULT_TITLE: &str = "Admin panel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub name: &'static str,
    pub title: &'static str,
    /// Reorderable lists rendered inside the route's section.
    pub lists: &'static [ListKind],
}

const STANDARD_ROUTES: [RouteSpec; 5] = [
    RouteSpec {
        name: "dashboard",
        title: "Admin panel",
        lists: &[],
    },
    RouteSpec {
        name: "pages",
        title: "Pages",
        lists: &[],
    },
    RouteSpec {
        name: "buttons",
        title: "Buttons",
        lists: &[ListKind::Buttons, ListKind::Groups],
    },
    RouteSpec {
        name: "media",
        title: "Media",
        lists: &[],
    },
    RouteSpec {
        name: "theme",
        title: "Styles",
        lists: &[],
    },
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no section found for route `{route}`")]
pub struct SectionNotFound {
    pub route: String,
}

#[derive(Debug, Clone)]
pub struct SectionRegistry {
    routes: Vec<RouteSpec>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SectionRegistry {
    pub fn new(routes: Vec<RouteSpec>) -> Self {
        Self { routes }
    }

    /// Registry of the admin console's built-in routes.
    pub fn standard() -> Self {
        Self::new(STANDARD_ROUTES.to_vec())
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    pub fn spec(&self, route: &Route) -> Option<&RouteSpec> {
        self.routes.iter().find(|spec| spec.name == route.as_str())
    }

    pub fn title_for(&self, route: &Route) -> &'static str {
        self.spec(route).map_or(DEFAULT_TITLE, |spec| spec.title)
    }

    pub fn lists_for(&self, route: &Route) -> &'static [ListKind] {
        self.spec(route).map_or(&[], |spec| spec.lists)
    }

    /// Route whose section renders `list`.
    pub fn route_of_list(&self, list: ListKind) -> Option<Route> {
        self.routes
            .iter()
            .find(|spec| spec.lists.contains(&list))
            .and_then(|spec| Route::new(spec.name).ok())
    }

    /// Locate the section for `route`: the route-keyed child of the view
    /// container first, then `#section-<route>`, then any element carrying
    /// `data-route="<route>"`.
    pub fn resolve_section(
        &self,
        document: &Document,
        route: &Route,
    ) -> Result<SectionHandle, SectionNotFound> {
        let name = route.as_str();
        document
            .find_in_view(name)
            .or_else(|| document.find_by_element_id(&format!("section-{name}")))
            .or_else(|| document.find_by_data_route(name))
            .ok_or_else(|| SectionNotFound {
                route: name.to_string(),
            })
    }

    /// Document with one hidden section and one menu item per route.
    pub fn build_document(&self) -> Document {
        let mut document = Document::new();
        for spec in &self.routes {
            document.add_section(SectionNode::in_view(spec.name));
            document.add_nav_item(format!("#/{}", spec.name), spec.title);
        }
        document
    }
}
