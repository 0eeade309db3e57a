mod support;

use kiosk_admin::{
    application::{
        console::NavigationReport,
        metrics::{NAVIGATIONS_TOTAL, UNRESOLVED_ROUTES_TOTAL},
    },
    infra::store::MemoryRouteStore,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use support::{RecordingNotifier, harness, harness_with, stocked_api};

fn counter(snapshotter: &Snapshotter, name: &str) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(composite_key, _, _, _)| composite_key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            _ => 0,
        })
        .sum()
}

#[tokio::test]
async fn each_unknown_route_is_counted_once() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let browsing = harness(stocked_api());
    browsing.console.navigate(Some("#/buttons")).await;
    let report = browsing.console.navigate(Some("#/reports")).await;
    assert!(matches!(report, NavigationReport::Unresolved { .. }));

    let launching = harness_with(
        stocked_api(),
        MemoryRouteStore::with_route("pages"),
        RecordingNotifier::default(),
    );
    let report = launching.console.open("typo").await.expect("open");
    assert!(matches!(report, NavigationReport::Entered { .. }));

    assert_eq!(counter(&snapshotter, UNRESOLVED_ROUTES_TOTAL), 2);
    assert_eq!(counter(&snapshotter, NAVIGATIONS_TOTAL), 4);
}
