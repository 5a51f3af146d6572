#![forbid(unsafe_code)]

//! Tracing capture for tests.
//!
//! [`TraceCapture`] is a `tracing_subscriber` layer that records span
//! openings and events with their fields, so tests can assert on what the
//! scanner and coordinator logged.
//!
//! ```ignore
//! let (layer, handle) = TraceCapture::new();
//! let subscriber = tracing_subscriber::registry().with(layer);
//! tracing::subscriber::with_default(subscriber, || run_refresh());
//! assert!(handle.span_named("refresh").is_some());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::registry::LookupSpan;

/// A span as it was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSpan {
    pub name: String,
    pub fields: HashMap<String, String>,
    pub parent: Option<String>,
}

/// An event with its message and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub message: String,
    pub fields: HashMap<String, String>,
    /// Name of the innermost span the event fired in.
    pub span: Option<String>,
}

#[derive(Debug, Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

/// Layer recording spans and events.
pub struct TraceCapture {
    inner: Arc<Mutex<Captured>>,
}

/// Read side of a [`TraceCapture`].
#[derive(Clone)]
pub struct CaptureHandle {
    inner: Arc<Mutex<Captured>>,
}

impl TraceCapture {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, CaptureHandle) {
        let inner = Arc::new(Mutex::new(Captured::default()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            CaptureHandle { inner },
        )
    }
}

impl CaptureHandle {
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.inner
            .lock()
            .map(|c| c.spans.clone())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.inner
            .lock()
            .map(|c| c.events.clone())
            .unwrap_or_default()
    }

    /// First span opened with `name`.
    pub fn span_named(&self, name: &str) -> Option<CapturedSpan> {
        self.spans().into_iter().find(|s| s.name == name)
    }

    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    /// Events whose message equals `message`.
    pub fn events_with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.insert(field.name().to_owned(), value.to_owned());
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for TraceCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        let parent = ctx.lookup_current().map(|s| s.name().to_owned());
        if let Ok(mut captured) = self.inner.lock() {
            captured.spans.push(CapturedSpan {
                name: attrs.metadata().name().to_owned(),
                fields: visitor.fields,
                parent,
            });
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let span = ctx.lookup_current().map(|s| s.name().to_owned());
        if let Ok(mut captured) = self.inner.lock() {
            captured.events.push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.message.unwrap_or_default(),
                fields: visitor.fields,
                span,
            });
        }
    }
}
