//! Timestamp formats for the line header written by the bundled backends

use super::error::{DispatchError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

const CLASSIC: &str = "%Y/%m/%d %H:%M:%S%.3f";
const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// How a backend renders the message timestamp
///
/// # Examples
///
/// ```
/// use rust_log_dispatcher::core::TimestampFormat;
/// use chrono::{Local, TimeZone};
///
/// let when = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(TimestampFormat::Classic.format(&when).unwrap(), "2024/03/09 07:05:01.000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2024/03/09 07:05:01.123`
    #[default]
    Classic,

    /// `2024-03-09T07:05:01.123+01:00`
    Iso8601,

    /// `2024-03-09T07:05:01.123456789+01:00`
    Rfc3339,

    /// Milliseconds since the Unix epoch
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    /// Reject custom format strings chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(DispatchError::config(
                    "timestamp",
                    format!("invalid strftime format '{}'", format_str),
                ));
            }
        }
        Ok(())
    }

    pub fn format(&self, when: &DateTime<Local>) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        match self {
            TimestampFormat::Classic => write!(out, "{}", when.format(CLASSIC))?,
            TimestampFormat::Iso8601 => write!(out, "{}", when.format(ISO8601))?,
            TimestampFormat::Rfc3339 => out.push_str(&when.to_rfc3339()),
            TimestampFormat::UnixMillis => write!(out, "{}", when.timestamp_millis())?,
            TimestampFormat::Custom(format_str) => write!(out, "{}", when.format(format_str))?,
        }
        Ok(out)
    }
}
