use super::*;
use std::sync::Mutex;

use serde_json::json;

use crate::astro::source::FixedInstants;
use crate::foundation::diag::Severity;
use crate::foundation::error::LuxError;

#[derive(Default)]
struct Collector {
    emits: Mutex<Vec<(String, Value)>>,
    statuses: Mutex<Vec<(String, Severity, Option<String>)>>,
}

impl OutputSink for Collector {
    fn emit(&self, topic: &str, message: Value) {
        self.emits.lock().unwrap().push((topic.to_string(), message));
    }

    fn status(&self, topic: &str, severity: Severity, message: Option<&str>) {
        self.statuses
            .lock()
            .unwrap()
            .push((topic.to_string(), severity, message.map(String::from)));
    }
}

fn engine(sink: Arc<Collector>) -> Engine {
    // A long period keeps background ticks out of the assertions.
    Engine::with_period(
        Arc::new(FixedInstants::default()),
        sink,
        StdDuration::from_secs(3600),
    )
}

fn turn_on(topic: &str) -> Value {
    json!({
        "topic": topic,
        "payload": {"service": "turn_on"},
        "location": {"latitude": 51.5, "longitude": -0.1},
        "fades": [
            {"time": "06:00", "brightness": 100},
            {"time": "18:00", "brightness": 200},
        ],
    })
}

#[test]
fn records_without_a_service_pass_through() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    let mut diag = Diagnostics::new();
    let disposition = engine.handle(&json!({"topic": "hall"}), &mut diag).unwrap();

    assert_eq!(disposition, Disposition::PassThrough);
    assert!(!engine.scheduler().is_active("hall"));
    assert!(sink.emits.lock().unwrap().is_empty());
    // A clean record clears the status line.
    assert_eq!(
        sink.statuses.lock().unwrap().as_slice(),
        [("hall".to_string(), Severity::Info, None)]
    );
}

#[test]
fn turn_on_activates_and_emits() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    let mut diag = Diagnostics::new();
    let disposition = engine.handle(&turn_on("hall"), &mut diag).unwrap();

    assert_eq!(disposition, Disposition::Activated);
    assert!(diag.is_empty());
    assert!(engine.scheduler().is_active("hall"));

    let emits = sink.emits.lock().unwrap();
    assert_eq!(emits.len(), 1);
    assert_eq!(emits[0].0, "hall");
    assert_eq!(emits[0].1["fade_active"], json!(true));
}

#[test]
fn turn_off_deactivates() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    engine.handle(&turn_on("hall"), &mut Diagnostics::new()).unwrap();

    let off = json!({"topic": "hall", "payload": {"service": "turn_off"}});
    let disposition = engine.handle(&off, &mut Diagnostics::new()).unwrap();

    assert_eq!(disposition, Disposition::Deactivated);
    assert!(!engine.scheduler().is_active("hall"));
}

#[test]
fn fatal_setup_leaves_the_running_channel_alone() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    engine.handle(&turn_on("hall"), &mut Diagnostics::new()).unwrap();

    let mut broken = turn_on("hall");
    broken.as_object_mut().unwrap().remove("location");
    let mut diag = Diagnostics::new();
    let err = engine.handle(&broken, &mut diag).unwrap_err();

    assert!(matches!(err, LuxError::Location(_)));
    assert_eq!(diag.status(), Some("location error!"));
    assert!(engine.scheduler().is_active("hall"));
    assert_eq!(sink.emits.lock().unwrap().len(), 1);

    let statuses = sink.statuses.lock().unwrap();
    assert_eq!(
        statuses.last(),
        Some(&("hall".to_string(), Severity::Error, Some("location error!".to_string())))
    );
}

#[test]
fn enabled_flag_applies_across_records() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    // Disable through a pass-through record before activation.
    let disable = json!({"topic": "hall", "fade_enabled": false});
    let disposition = engine.handle(&disable, &mut Diagnostics::new()).unwrap();
    assert_eq!(disposition, Disposition::PassThrough);

    engine.handle(&turn_on("hall"), &mut Diagnostics::new()).unwrap();
    assert!(engine.scheduler().is_active("hall"));
    // Disabled channels tick without emitting.
    assert!(sink.emits.lock().unwrap().is_empty());

    let enable = json!({"topic": "hall", "fade_enabled": "yes"});
    engine.handle(&enable, &mut Diagnostics::new()).unwrap();
    assert!(engine.scheduler().enabled_or_default("hall"));
}

#[test]
fn channels_dispatch_by_topic() {
    let sink = Arc::new(Collector::default());
    let mut engine = engine(Arc::clone(&sink));

    engine.handle(&turn_on("hall"), &mut Diagnostics::new()).unwrap();
    engine.handle(&turn_on("porch"), &mut Diagnostics::new()).unwrap();

    let off = json!({"topic": "hall", "payload": {"service": "turn_off"}});
    engine.handle(&off, &mut Diagnostics::new()).unwrap();

    assert!(!engine.scheduler().is_active("hall"));
    assert!(engine.scheduler().is_active("porch"));
}
