//! End-to-end: raw notifications through the bus to a rendered status line.

use lsp_progress::{
    ClientId, ClientInfo, ProgressBus, ProgressTracker, StatusConfig, Theme, TraceSink,
    UpdateCallback,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn progress(token: &str, value: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "$/progress",
        "params": { "token": token, "value": value }
    })
}

#[tokio::test(start_paused = true)]
async fn test_status_line_follows_progress() {
    let config = StatusConfig::default()
        .with_interval(Duration::from_millis(500))
        .with_theme(Theme::default().with_ramp("01234").with_idle("-").with_show_name(true));

    let bus = ProgressBus::new();
    let _log = bus.subscribe(Arc::new(TraceSink));
    let (tracker, _subscription) = ProgressTracker::attach(&bus, &config);

    let clients = vec![
        ClientInfo::new("tsserver", "tsserver"),
        ClientInfo::new(1u64, "rust-analyzer"),
    ];
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let callback: UpdateCallback = {
        let lines = Arc::clone(&lines);
        let reader = tracker.reader();
        let theme = config.theme.clone();
        let clients = clients.clone();
        Arc::new(move || lines.lock().push(reader.format(&clients, &theme)))
    };
    tracker.configure(Some(callback), config.interval());

    let ra = ClientId::from(1u64);
    let ts = ClientId::from("tsserver");

    // Leading call.
    bus.publish_notification(
        ra.clone(),
        &progress("index", json!({ "kind": "begin", "title": "Indexing", "percentage": 0 })),
    )
    .unwrap();

    // Burst inside the window.
    sleep(Duration::from_millis(100)).await;
    bus.publish_notification(
        ra.clone(),
        &progress("index", json!({ "kind": "report", "percentage": 75 })),
    )
    .unwrap();
    bus.publish_notification(
        ts.clone(),
        &progress("load", json!({ "kind": "begin", "title": "Loading", "percentage": 50 })),
    )
    .unwrap();
    bus.publish_notification(
        ra.clone(),
        &progress("check", json!({ "kind": "begin", "title": "Checking", "percentage": 25 })),
    )
    .unwrap();

    sleep(Duration::from_millis(500)).await;

    // Everything finishes, one more trailing call.
    for (client, token) in [(&ra, "index"), (&ra, "check"), (&ts, "load")] {
        bus.publish_notification(client.clone(), &progress(token, json!({ "kind": "end" })))
            .unwrap();
    }
    sleep(Duration::from_millis(500)).await;

    assert_eq!(
        *lines.lock(),
        vec![
            "0 rust-analyzer - tsserver",
            "1 rust-analyzer 2 tsserver",
            "- rust-analyzer - tsserver",
        ]
    );
    assert_eq!(tracker.min_percentage(&ra), None);
    assert!(!tracker.has_pending_update());
}
