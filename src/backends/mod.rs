//! Bundled backend implementations

pub mod console;
pub mod file;

pub use console::{ConsoleBackend, ConsoleConfig};
pub use file::{FileBackend, FileConfig};

pub use crate::core::Backend;

use crate::core::{DispatchError, Registry, Result, Severity, TimestampFormat};
use chrono::{DateTime, Local};
use colored::Colorize;

/// Registry name of [`ConsoleBackend`]
pub const CONSOLE: &str = "console";

/// Registry name of [`FileBackend`]
pub const FILE: &str = "file";

/// Register `console` and `file` with `registry`
pub fn register_builtins(registry: &Registry) -> Result<()> {
    registry.register(CONSOLE, || Box::new(ConsoleBackend::new()))?;
    registry.register(FILE, || Box::new(FileBackend::new()))?;
    Ok(())
}

/// `<timestamp> <msg>\n`, with the level marker coloured when asked
pub(crate) fn render_line(
    component: &str,
    timestamp_format: &TimestampFormat,
    when: &DateTime<Local>,
    msg: &str,
    level: Severity,
    color: bool,
) -> Result<String> {
    let timestamp = timestamp_format
        .format(when)
        .map_err(|_| DispatchError::write(component, "cannot render timestamp"))?;
    let marker = level.marker();

    let line = match msg.strip_prefix(marker) {
        Some(rest) if color => {
            let painted = marker.color(level.color_code()).bold();
            format!("{} {}{}\n", timestamp, painted, rest)
        }
        _ => format!("{} {}\n", timestamp, msg),
    };
    Ok(line)
}

/// Parse a JSON config blob; empty means `T::default()`
pub(crate) fn parse_config<T>(component: &str, config: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if config.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(config).map_err(|e| DispatchError::config(component, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_line_plain() {
        let when = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let line =
            render_line("t", &TimestampFormat::Classic, &when, "[I] x=5", Severity::Info, false)
                .unwrap();
        assert_eq!(line, "2024/01/02 03:04:05.000 [I] x=5\n");
    }

    #[test]
    fn test_render_line_colored_keeps_body() {
        let when = Local::now();
        let line =
            render_line("t", &TimestampFormat::Classic, &when, "[E] boom", Severity::Error, true)
                .unwrap();
        assert!(line.ends_with(" boom\n"));
        assert!(line.contains("[E]"));
    }

    #[test]
    fn test_parse_config_empty_is_default() {
        let config: ConsoleConfig = parse_config("console", "  ").unwrap();
        assert_eq!(config.level, Severity::Debug);
        assert!(config.color);
    }

    #[test]
    fn test_parse_config_malformed() {
        let err = parse_config::<ConsoleConfig>("console", "{level:").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidConfig { .. }));
    }

    #[test]
    fn test_render_line_bad_timestamp_is_write_error() {
        let format = TimestampFormat::Custom("%Q".to_string());
        let err = render_line("file", &format, &Local::now(), "[I] x", Severity::Info, false)
            .unwrap_err();
        assert!(matches!(err, DispatchError::Write { .. }));
    }
}
