//! Severity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message severity. Lower value means higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SeverityRepr", into = "&'static str")]
#[derive(Default)]
pub enum Severity {
    Error = 0,
    Warning = 1,
    Info = 2,
    #[default]
    Debug = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Marker prepended to every rendered message
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Error => "[E]",
            Severity::Warning => "[W]",
            Severity::Info => "[I]",
            Severity::Debug => "[D]",
        }
    }

    /// Whether a message at this level gets through `threshold`
    #[inline]
    pub fn passes(self, threshold: Severity) -> bool {
        self <= threshold
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::Error),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Info),
            3 => Some(Severity::Debug),
            _ => None,
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Error => Red,
            Severity::Warning => Yellow,
            Severity::Info => Green,
            Severity::Debug => White,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" | "0" => Ok(Severity::Error),
            "WARN" | "WARNING" | "1" => Ok(Severity::Warning),
            "INFO" | "2" => Ok(Severity::Info),
            "DEBUG" | "3" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

impl From<Severity> for &'static str {
    fn from(level: Severity) -> Self {
        level.to_str()
    }
}

/// Backend configs carry the level either as a number or as a name
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Number(u8),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = String;

    // `Self::Error` would clash with the `Error` variant
    fn try_from(repr: SeverityRepr) -> Result<Self, String> {
        match repr {
            SeverityRepr::Number(n) => {
                Severity::from_u8(n).ok_or_else(|| format!("Invalid severity: {}", n))
            }
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
        assert!(Severity::Info < Severity::Debug);
        assert_eq!(Severity::default(), Severity::Debug);
    }

    #[test]
    fn test_passes() {
        assert!(Severity::Error.passes(Severity::Error));
        assert!(Severity::Info.passes(Severity::Debug));
        assert!(!Severity::Info.passes(Severity::Warning));
        assert!(!Severity::Debug.passes(Severity::Info));
    }

    #[test]
    fn test_markers() {
        let markers: Vec<_> = Severity::ALL.iter().map(|l| l.marker()).collect();
        assert_eq!(markers, vec!["[E]", "[W]", "[I]", "[D]"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("2".parse::<Severity>(), Ok(Severity::Info));
        assert!("trace".parse::<Severity>().is_err());
    }

    #[test]
    fn test_deserialize_number_or_name() {
        let level: Severity = serde_json::from_str("0").unwrap();
        assert_eq!(level, Severity::Error);

        let level: Severity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(level, Severity::Info);

        assert!(serde_json::from_str::<Severity>("7").is_err());
        assert_eq!(serde_json::to_string(&Severity::Debug).unwrap(), "\"DEBUG\"");
    }
}
