//! Tracing layer that redacts PII before anything is written.
//!
//! The message and every string or debug-formatted field of an event pass
//! through a shared [`RedactionFilter`]. Numeric and boolean fields are
//! written as-is. Output goes to stderr by default, keeping stdout clean for
//! command payloads.

use std::cell::Cell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use lr_redact::{RedactionFilter, DIAGNOSTICS_TARGET};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::config::LogFormat;
use crate::events::{Level, LogEvent};

thread_local! {
    static REDACTION_DEPTH: Cell<u8> = const { Cell::new(0) };
}

/// Nesting allowed for events raised while redacting: the filter's own
/// diagnostics get one level, anything deeper is dropped.
const MAX_DEPTH: u8 = 2;

/// Tracks how deeply the current thread is nested inside the layer.
struct ReentrancyGuard {
    depth: u8,
}

impl ReentrancyGuard {
    /// `None` when this thread is already nested [`MAX_DEPTH`] levels deep.
    fn enter() -> Option<Self> {
        REDACTION_DEPTH.with(|cell| {
            let depth = cell.get();
            if depth >= MAX_DEPTH {
                None
            } else {
                cell.set(depth + 1);
                Some(ReentrancyGuard { depth })
            }
        })
    }

    fn is_nested(&self) -> bool {
        self.depth > 0
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        REDACTION_DEPTH.with(|cell| cell.set(self.depth));
    }
}

/// Collects event fields, redacting every text value.
struct RedactingVisitor<'a> {
    filter: &'a RedactionFilter,
    message: Option<String>,
    fields: Vec<(String, serde_json::Value)>,
}

impl<'a> RedactingVisitor<'a> {
    fn new(filter: &'a RedactionFilter) -> Self {
        RedactingVisitor {
            filter,
            message: None,
            fields: Vec::new(),
        }
    }

    fn record_text(&mut self, field: &Field, value: &str) {
        let text = self.filter.process(value);
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.fields
                .push((field.name().to_string(), serde_json::Value::String(text)));
        }
    }
}

impl Visit for RedactingVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_text(field, &format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .push((field.name().to_string(), serde_json::Value::Number(value.into())));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .push((field.name().to_string(), serde_json::Value::Number(value.into())));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.fields
                .push((field.name().to_string(), serde_json::Value::Number(n)));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .push((field.name().to_string(), serde_json::Value::Bool(value)));
    }
}

/// Redacting tracing layer.
///
/// Every event is redacted, whatever its target. Events raised while this
/// thread is already redacting are dropped, except diagnostics from the
/// filter, which are redacted one level deeper.
pub struct RedactingLayer<W = io::Stderr> {
    filter: Arc<RedactionFilter>,
    format: LogFormat,
    timestamps: bool,
    writer: Mutex<W>,
}

impl RedactingLayer<io::Stderr> {
    /// Create a layer writing to stderr.
    pub fn stderr(filter: Arc<RedactionFilter>, format: LogFormat) -> Self {
        Self::new(filter, format, io::stderr())
    }
}

impl<W: Write> RedactingLayer<W> {
    /// Create a layer with a custom writer.
    pub fn new(filter: Arc<RedactionFilter>, format: LogFormat, writer: W) -> Self {
        RedactingLayer {
            filter,
            format,
            timestamps: true,
            writer: Mutex::new(writer),
        }
    }

    /// Include timestamps in human output.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    fn build_event(&self, event: &Event<'_>) -> LogEvent {
        let mut visitor = RedactingVisitor::new(&self.filter);
        event.record(&mut visitor);

        let metadata = event.metadata();
        let level: Level = (*metadata.level()).into();
        let mut log_event = LogEvent::new(
            level,
            metadata.target(),
            visitor.message.unwrap_or_default(),
        );
        log_event.fields.extend(visitor.fields);
        log_event
    }

    fn write_event(&self, log_event: &LogEvent) {
        let line = match self.format {
            LogFormat::Jsonl => log_event.to_jsonl(),
            LogFormat::Human => log_event.to_human(self.timestamps),
        };
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "{}", line);
    }
}

impl<S, W> Layer<S> for RedactingLayer<W>
where
    S: Subscriber,
    W: Write + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(guard) = ReentrancyGuard::enter() else {
            return;
        };
        if guard.is_nested() && event.metadata().target() != DIAGNOSTICS_TARGET {
            return;
        }

        let log_event = self.build_event(event);
        self.write_event(&log_event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_redact::{
        DiagnosticEvent, DiagnosticSink, FallbackCause, Locale, RecognizerFailure, RegistryConfig,
        TracingSink,
    };
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone)]
    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn make_layer(format: LogFormat) -> (Arc<Mutex<Vec<u8>>>, RedactingLayer<BufWriter>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let filter =
            RedactionFilter::from_config(&RegistryConfig::default().locale(Locale::EnUs)).unwrap();
        let layer = RedactingLayer::new(Arc::new(filter), format, BufWriter(buffer.clone()));
        (buffer, layer)
    }

    fn output(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&buffer.lock().unwrap()).to_string()
    }

    #[test]
    fn test_reentrancy_guard() {
        let outer = ReentrancyGuard::enter().unwrap();
        assert!(!outer.is_nested());
        let inner = ReentrancyGuard::enter().unwrap();
        assert!(inner.is_nested());
        assert!(ReentrancyGuard::enter().is_none());
        drop(inner);
        assert!(ReentrancyGuard::enter().is_some());
        drop(outer);
        assert!(!ReentrancyGuard::enter().unwrap().is_nested());
    }

    #[test]
    fn layer_redacts_message() {
        let (buffer, layer) = make_layer(LogFormat::Jsonl);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app::signup", "new user John Doe <john.doe@example.com>");
        });

        let out = output(&buffer);
        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed["message"], "new user <PERSON> <<EMAIL_ADDRESS>>");
        assert_eq!(parsed["event"], "app::signup");
        assert_eq!(parsed["level"], "info");
        assert!(parsed["ts"].is_string());
    }

    #[test]
    fn layer_redacts_fields() {
        let (buffer, layer) = make_layer(LogFormat::Jsonl);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let phone = "555-123-4567".to_string();
            tracing::warn!(
                target: "app::sms",
                to = %phone,
                contact = ?"Sarah Connor",
                attempts = 3,
                delivered = false,
                "sms delivery failed"
            );
        });

        let out = output(&buffer);
        assert!(!out.contains("555-123-4567"));
        assert!(!out.contains("Connor"));
        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed["fields"]["to"], "<PHONE_NUMBER>");
        assert_eq!(parsed["fields"]["attempts"], 3);
        assert_eq!(parsed["fields"]["delivered"], false);
        assert_eq!(parsed["message"], "sms delivery failed");
    }

    #[test]
    fn layer_human_format() {
        let (buffer, layer) = make_layer(LogFormat::Human);
        let layer = layer.with_timestamps(false);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "app", user = "jane@example.org", "login failed");
        });

        assert_eq!(
            output(&buffer),
            "ERROR app: login failed user=\"<EMAIL_ADDRESS>\"\n"
        );
    }

    #[test]
    fn diagnostics_target_is_redacted() {
        let (buffer, layer) = make_layer(LogFormat::Jsonl);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(
                target: "lr_redact::diagnostics",
                ssn = "123-45-6789",
                "user john.doe@example.com"
            );
        });

        let out = output(&buffer);
        assert!(!out.contains("123-45-6789"));
        assert!(!out.contains("john.doe@example.com"));
        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed["message"], "user <EMAIL_ADDRESS>");
        assert_eq!(parsed["fields"]["ssn"], "<NATIONAL_ID>");
    }

    #[test]
    fn fallback_diagnostic_survives_redaction() {
        let (buffer, layer) = make_layer(LogFormat::Jsonl);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.report(&DiagnosticEvent::Fallback {
                cause: FallbackCause::RecognizerFailures(vec![RecognizerFailure::new(
                    "person_us",
                    "model unavailable",
                )]),
                input_bytes: 42,
            });
        });

        let parsed: serde_json::Value = serde_json::from_str(output(&buffer).trim()).unwrap();
        assert_eq!(parsed["event"], DIAGNOSTICS_TARGET);
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["fields"]["event"], "redaction.fallback");
        assert_eq!(parsed["fields"]["cause"], "recognizer failures: person_us");
        assert_eq!(parsed["fields"]["input_bytes"], 42);
    }

    #[test]
    fn layer_output_is_one_line_per_event() {
        let (buffer, layer) = make_layer(LogFormat::Jsonl);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first\nwith newline");
            tracing::info!("second");
        });

        let out = output(&buffer);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }
}
