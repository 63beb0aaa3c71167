//! Plain progress-transcript event format.
//!
//! Writes the event message as-is, one event per line. Messages that open
//! with the progress marker get a local `[YYYY-mm-dd HH:MM:SS]` prefix.
//! Warnings and errors are tagged with their level, and structured fields
//! follow the message as `key=value`.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Prefix that marks a progress line.
pub const PROGRESS_MARKER: &str = ">>>>>";

/// Event formatter for the `plain` log format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressFormat;

impl<S, N> FormatEvent<S, N> for ProgressFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = render_line(
            *event.metadata().level(),
            &visitor.message,
            &visitor.fields,
            Local::now(),
        );
        writeln!(writer, "{line}")
    }
}

/// Build one output line.
pub fn render_line(
    level: Level,
    message: &str,
    fields: &[(String, String)],
    now: DateTime<Local>,
) -> String {
    let mut line = String::with_capacity(message.len() + 32);

    if level <= Level::WARN {
        let _ = write!(line, "{level}: ");
    }

    let body = message.trim_start_matches('\n');
    if body.starts_with(PROGRESS_MARKER) {
        line.push_str(&message[..message.len() - body.len()]);
        let _ = write!(line, "[{}] ", now.format("%Y-%m-%d %H:%M:%S"));
        line.push_str(body);
    } else {
        line.push_str(message);
    }

    for (name, value) in fields {
        let _ = write!(line, " {name}={value}");
    }
    line
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }
}
