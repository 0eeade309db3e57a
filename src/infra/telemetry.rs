use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    application::metrics::{
        NAVIGATIONS_TOTAL, REFRESH_FAILURES_TOTAL, REFRESH_MS, REORDER_COMMITS_TOTAL,
        REORDER_FAILURES_TOTAL, STALE_RESPONSES_TOTAL, UNRESOLVED_ROUTES_TOTAL,
    },
    config::{LogFormat, LoggingSettings},
};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            NAVIGATIONS_TOTAL,
            Unit::Count,
            "Total number of navigation signals handled."
        );
        describe_counter!(
            UNRESOLVED_ROUTES_TOTAL,
            Unit::Count,
            "Total number of navigations whose route had no section."
        );
        describe_counter!(
            STALE_RESPONSES_TOTAL,
            Unit::Count,
            "Total number of refresh responses dropped because the route was left or revisited."
        );
        describe_counter!(
            REFRESH_FAILURES_TOTAL,
            Unit::Count,
            "Total number of section data requests that failed during refresh."
        );
        describe_counter!(
            REORDER_COMMITS_TOTAL,
            Unit::Count,
            "Total number of list orders persisted to the backend."
        );
        describe_counter!(
            REORDER_FAILURES_TOTAL,
            Unit::Count,
            "Total number of list orders the backend did not accept."
        );
        describe_histogram!(
            REFRESH_MS,
            Unit::Milliseconds,
            "Latency of section data refreshes in milliseconds."
        );
    });
}
