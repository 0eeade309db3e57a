//! Metric names emitted by the console.

pub const NAVIGATIONS_TOTAL: &str = "kiosk_admin_navigations_total";
pub const UNRESOLVED_ROUTES_TOTAL: &str = "kiosk_admin_unresolved_routes_total";
pub const STALE_RESPONSES_TOTAL: &str = "kiosk_admin_stale_responses_total";
pub const REFRESH_FAILURES_TOTAL: &str = "kiosk_admin_refresh_failures_total";
pub const REORDER_COMMITS_TOTAL: &str = "kiosk_admin_reorder_commits_total";
pub const REORDER_FAILURES_TOTAL: &str = "kiosk_admin_reorder_failures_total";
pub const REFRESH_MS: &str = "kiosk_admin_refresh_ms";
