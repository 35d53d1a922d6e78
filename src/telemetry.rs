use crate::error::Result;
use chrono::{SecondsFormat, Utc};
use std::fmt::{self as stdfmt};
use tracing::field::{Field, Visit};
use tracing::Event;
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::{MakeWriterExt, OrElse, WithMaxLevel};
use tracing_subscriber::fmt::{
    self as fmt_subscriber, format::Writer, FmtContext, FormatEvent, FormatFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub const SERVICE_NAME: &str = "muniai";
const DEFAULT_FILTER: &str = "muniai=info,info";

/// Installs the global subscriber: WARN and ERROR on stderr, everything else on stdout,
/// one `key=value` line per event. `RUST_LOG` overrides the default filter.
pub fn init_tracing() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .event_format(KeyValueFormatter::new(SERVICE_NAME))
        .fmt_fields(fmt_subscriber::format::DefaultFields::new())
        .with_writer(split_by_severity(std::io::stderr, std::io::stdout))
        .try_init()
        .map_err(|err| crate::err!("failed to initialise tracing subscriber: {err}"))
}

/// WARN and ERROR go to `errors`, more verbose events to `rest`. Verbosity is what
/// `with_max_level` bounds, so a WARN ceiling admits only WARN and ERROR.
fn split_by_severity<E, EW, R, RW>(errors: E, rest: R) -> OrElse<WithMaxLevel<E>, R>
where
    E: Fn() -> EW,
    EW: std::io::Write,
    R: Fn() -> RW,
    RW: std::io::Write,
{
    errors.with_max_level(tracing::Level::WARN).or_else(rest)
}

pub struct KeyValueFormatter {
    service: &'static str,
}

impl KeyValueFormatter {
    pub const fn new(service: &'static str) -> Self {
        Self { service }
    }
}

impl<S, N> FormatEvent<S, N> for KeyValueFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let metadata = event.metadata();

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);
        let message = visitor
            .message
            .take()
            .unwrap_or_else(|| metadata.name().to_string());
        let mut fields = visitor.fields;
        fields.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

        let mut line = LogLine::default();
        line.push("ts", &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        line.push("level", metadata.level().as_str());
        line.push("service", self.service);
        line.push("component", metadata.target());
        line.push("pid", &std::process::id().to_string());
        if let Some(span) = span_path(ctx) {
            line.push("span", &span);
        }
        line.push("msg", &message);
        for (key, value) in &fields {
            line.push(key, value);
        }

        writer.write_str(line.as_str())?;
        writer.write_char('\n')
    }
}

fn span_path<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    let span = ctx.lookup_current()?;
    let names: Vec<&str> = span.scope().from_root().map(|s| s.name()).collect();
    (!names.is_empty()).then(|| names.join("."))
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn collect(&mut self, field: &Field, value: String) {
        match field.name() {
            "" => {}
            "message" => self.message = Some(value),
            name => self.fields.push((name.to_string(), value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.collect(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn stdfmt::Debug) {
        self.collect(field, format!("{value:?}"));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.collect(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.collect(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.collect(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.collect(field, value.to_string());
    }
}

/// A single `key=value` log line; values containing separators are quoted.
#[derive(Default)]
struct LogLine {
    buffer: String,
}

impl LogLine {
    fn push(&mut self, key: &str, value: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(key);
        self.buffer.push('=');
        quote_into(&mut self.buffer, value);
    }

    fn as_str(&self) -> &str {
        &self.buffer
    }
}

fn quote_into(buffer: &mut String, value: &str) {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | '=' | ',' | '{' | '}'));
    if bare {
        buffer.push_str(value);
        return;
    }

    buffer.push('"');
    for ch in value.chars() {
        match ch {
            '"' => buffer.push_str("\\\""),
            '\\' => buffer.push_str("\\\\"),
            '\n' => buffer.push_str("\\n"),
            '\r' => buffer.push_str("\\r"),
            '\t' => buffer.push_str("\\t"),
            _ => buffer.push(ch),
        }
    }
    buffer.push('"');
}
