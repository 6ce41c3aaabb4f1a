//! Line formatting.
//!
//! Every emitted line has the shape
//! `YYYY/MM/DD HH:MM:SS.ffffff [SEVERITY] message\n`. Untagged lines
//! (see [`crate::Logger::log`]) omit the bracketed severity.

use chrono::{DateTime, TimeZone};

use crate::severity::Severity;

/// Timestamp layout: local date and time with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Formats one log line, including the trailing newline.
#[must_use]
pub fn format_line<Tz>(timestamp: &DateTime<Tz>, severity: Option<Severity>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut line = String::with_capacity(message.len() + 40);
    line.push_str(&timestamp.format(TIMESTAMP_FORMAT).to_string());
    line.push(' ');
    if let Some(severity) = severity {
        line.push('[');
        line.push_str(severity.label());
        line.push_str("] ");
    }
    line.push_str(message);
    if !message.ends_with('\n') {
        line.push('\n');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .map(|t| t + chrono::Duration::microseconds(42))
            .unwrap_or_default()
    }

    #[test]
    fn format_tagged_line() {
        let line = format_line(&fixed_time(), Some(Severity::Notice), "disk almost full");
        assert_eq!(line, "2024/03/09 07:05:01.000042 [NOTICE] disk almost full\n");
    }

    #[test]
    fn format_untagged_line() {
        let line = format_line(&fixed_time(), None, "new access.");
        assert_eq!(line, "2024/03/09 07:05:01.000042 new access.\n");
    }

    #[test]
    fn format_does_not_double_newline() {
        let line = format_line(&fixed_time(), Some(Severity::Info), "already terminated\n");
        assert!(line.ends_with("terminated\n"));
        assert!(!line.ends_with("\n\n"));
    }

    #[test]
    fn format_timestamp_is_fixed_width() {
        let a = format_line(&fixed_time(), Some(Severity::Info), "x");
        let b = format_line(&Utc::now(), Some(Severity::Info), "x");
        assert_eq!(a.len(), b.len());
    }
}
