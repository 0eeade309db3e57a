//! Route identifiers derived from the navigation fragment (`#/<route>`).

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Route shown when no navigation signal and no remembered route exist.
pub const DEFAULT_ROUTE: &str = "dashboard";

const FRAGMENT_PREFIX: &str = "#/";

/// Opaque name of a navigable view. Whether it is known is decided by the
/// section registry, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(String);

impl Route {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("route name must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn default_route() -> Self {
        Self(DEFAULT_ROUTE.to_string())
    }

    /// Resolve a navigation signal. `#/pages`, `pages` and ` pages ` all name
    /// the same route; an absent or empty signal yields the default route.
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        let Some(raw) = fragment else {
            return Self::default_route();
        };
        let raw = raw.trim();
        let name = raw.strip_prefix(FRAGMENT_PREFIX).unwrap_or(raw);
        Self::new(name).unwrap_or_else(|_| Self::default_route())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment that navigates to this route, e.g. `#/buttons`.
    pub fn fragment(&self) -> String {
        format!("{FRAGMENT_PREFIX}{}", self.0)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Route {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_prefix_is_stripped() {
        assert_eq!(Route::from_fragment(Some("#/buttons")).as_str(), "buttons");
        assert_eq!(Route::from_fragment(Some("media")).as_str(), "media");
    }

    #[test]
    fn missing_or_blank_fragment_falls_back_to_default() {
        assert_eq!(Route::from_fragment(None).as_str(), DEFAULT_ROUTE);
        assert_eq!(Route::from_fragment(Some("#/")).as_str(), DEFAULT_ROUTE);
        assert_eq!(Route::from_fragment(Some("   ")).as_str(), DEFAULT_ROUTE);
    }

    #[test]
    fn fragment_round_trips_through_route() {
        let route = Route::new("pages").expect("route");
        assert_eq!(route.fragment(), "#/pages");
        assert_eq!(Route::from_fragment(Some(&route.fragment())), route);
    }

    #[test]
    fn empty_route_is_rejected() {
        assert!(Route::new("").is_err());
    }
}
