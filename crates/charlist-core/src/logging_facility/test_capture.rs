//! In-memory event capture for tests
//!
//! `init_test_capture` installs a process-wide subscriber that keeps every
//! event, so a test can assert that a repository call emitted its boundary
//! events. The subscriber is shared by all tests in a binary; filter on the
//! op name or on fields unique to the test.

use crate::core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event with its fields rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Module path of the boundary macro call site
    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error` for boundary events
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct FieldRecorder<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Shared = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that appends every event to a shared buffer
pub struct TestCaptureLayer {
    sink: Shared,
}

impl TestCaptureLayer {
    /// Layer plus the handle that reads what it records
    pub fn new() -> (Self, TestCapture) {
        let sink = Shared::default();
        (Self { sink: sink.clone() }, TestCapture { sink })
    }
}

impl<S: Subscriber> Layer<S> for TestCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldRecorder(&mut fields));

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        };
        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    sink: Shared,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event has this op and event name.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {}/{} event among {} captured",
            op,
            event,
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.sink.lock() {
            events.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once per process and return its handle
///
/// # Example
///
/// ```
/// use charlist_core::log_op_start;
/// use charlist_core::logging_facility::test_capture::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example");
/// capture.assert_event_exists("doc_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_boundary_fields() {
        let capture = init_test_capture();
        crate::log_op_start!("capture_self_test", character_id = 991_i64);

        let matching = capture.count_events(|e| {
            e.is("capture_self_test", "start") && e.field("character_id") == Some("991")
        });
        assert_eq!(matching, 1);
    }

    #[test]
    fn test_error_boundary_carries_every_canonical_field() {
        use crate::core_types::schema::{
            EVENT_END_ERROR, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
        };
        use crate::errors::{ExError, ExErrorKind};

        let capture = init_test_capture();
        let err = ExError::new(ExErrorKind::PackageInUse).with_message("linked");
        crate::log_op_error!("capture_error_test", err, duration_ms = 3_u64);

        let events = capture.events();
        let event = events
            .iter()
            .find(|e| e.is("capture_error_test", EVENT_END_ERROR))
            .unwrap();
        assert_eq!(event.level, Level::ERROR);
        assert_eq!(
            event.component(),
            Some("charlist_core::logging_facility::test_capture::tests")
        );
        assert_eq!(event.field(FIELD_DURATION_MS), Some("3"));
        assert_eq!(event.field(FIELD_ERR_KIND), Some("PackageInUse"));
        assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_PACKAGE_IN_USE"));
    }

    #[test]
    fn test_captured_event_keeps_target() {
        let capture = init_test_capture();
        tracing::debug!(op = "capture_target_test", "detail");

        let events = capture.events();
        let event = events
            .iter()
            .find(|e| e.op() == Some("capture_target_test"))
            .unwrap();
        assert_eq!(event.level, Level::DEBUG);
        assert!(event.target.starts_with("charlist_core"));
        assert_eq!(event.event(), None);
    }
}
