//! Structured logging emitted by the panel controller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use popover_core::animation::SpringAnimators;
use popover_core::gesture::{GestureEvent, PanEvent, TapEvent};
use popover_panel::{GestureCoordinator, PanelConfig, PanelStateMachine, RecordingSink};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

type Coordinator = GestureCoordinator<SpringAnimators, RecordingSink>;

fn coordinator() -> Coordinator {
    GestureCoordinator::new(PanelStateMachine::new(
        PanelConfig::default(),
        SpringAnimators,
        RecordingSink::new(),
    ))
}

fn settle(c: &mut Coordinator) {
    for _ in 0..1_000 {
        if c.tick(Duration::from_millis(16)).is_some() {
            return;
        }
    }
    panic!("transition never completed");
}

fn panel_events(events: &[CapturedEvent], message: &str) -> Vec<CapturedEvent> {
    events
        .iter()
        .filter(|e| e.target == "popover.panel" && e.message() == message)
        .cloned()
        .collect()
}

#[test]
fn tap_logs_start_and_commit() {
    let events = with_captured_tracing(|| {
        let mut c = coordinator();
        c.handle(&GestureEvent::Tap(TapEvent));
        settle(&mut c);
    });

    let started = panel_events(&events, "transition started");
    assert_eq!(started.len(), 1, "{events:?}");
    assert_eq!(started[0].level, tracing::Level::DEBUG);
    assert_eq!(started[0].fields.get("from").map(String::as_str), Some("closed"));
    assert_eq!(started[0].fields.get("to").map(String::as_str), Some("open"));

    let committed = panel_events(&events, "state committed");
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].level, tracing::Level::DEBUG);
    assert_eq!(committed[0].fields.get("state").map(String::as_str), Some("open"));
    assert_eq!(committed[0].fields.get("position").map(String::as_str), Some("End"));
}

#[test]
fn release_logs_decision() {
    let events = with_captured_tracing(|| {
        let mut c = coordinator();
        c.handle(&GestureEvent::Pan(PanEvent::began()));
        c.handle(&GestureEvent::Pan(PanEvent::changed(-50.0)));
        c.handle(&GestureEvent::Pan(PanEvent::ended(-50.0, 80.0)));
        settle(&mut c);
    });

    let released = panel_events(&events, "pan released");
    assert_eq!(released.len(), 1, "{events:?}");
    assert_eq!(
        released[0].fields.get("should_close").map(String::as_str),
        Some("true")
    );
    assert_eq!(
        released[0].fields.get("direction").map(String::as_str),
        Some("TowardOrigin")
    );

    let committed = panel_events(&events, "state committed");
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].fields.get("state").map(String::as_str), Some("closed"));
    assert_eq!(committed[0].fields.get("position").map(String::as_str), Some("Start"));
}

#[test]
fn ignored_tap_is_logged() {
    let events = with_captured_tracing(|| {
        let mut c = coordinator();
        c.handle(&GestureEvent::Tap(TapEvent));
        c.handle(&GestureEvent::Tap(TapEvent));
    });

    assert_eq!(panel_events(&events, "transition started").len(), 1);
    assert_eq!(panel_events(&events, "tap ignored during transition").len(), 1);
}
