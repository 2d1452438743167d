//! ANSI background colours for HTTP access lines
//!
//! Small helpers for request logging: pick a colour from a status code or a
//! method, and reset afterwards.
//!
//! The codes set foreground and background together and are handed out as
//! `&'static str` prefixes, which `colored` does not offer, so they are
//! spelled out here.
//!
//! ```
//! use rust_log_dispatcher::color::{color_by_status, reset_color};
//!
//! let line = format!("{} 404 {}", color_by_status(404), reset_color());
//! assert!(line.starts_with('\u{1b}'));
//! ```

const GREEN: &str = "\x1b[97;42m";
const WHITE: &str = "\x1b[90;47m";
const YELLOW: &str = "\x1b[97;43m";
const RED: &str = "\x1b[97;41m";
const BLUE: &str = "\x1b[97;44m";
const MAGENTA: &str = "\x1b[97;45m";
const CYAN: &str = "\x1b[97;46m";

// Legacy Windows consoles only understand the background code
const W32_GREEN: &str = "\x1b[42m";
const W32_WHITE: &str = "\x1b[47m";
const W32_YELLOW: &str = "\x1b[43m";
const W32_RED: &str = "\x1b[41m";
const W32_BLUE: &str = "\x1b[44m";
const W32_MAGENTA: &str = "\x1b[45m";
const W32_CYAN: &str = "\x1b[46m";

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Green,
    White,
    Yellow,
    Red,
    Blue,
    Magenta,
    Cyan,
}

impl Paint {
    fn code(self) -> &'static str {
        if cfg!(windows) {
            self.w32_code()
        } else {
            self.ansi_code()
        }
    }

    fn ansi_code(self) -> &'static str {
        match self {
            Paint::Green => GREEN,
            Paint::White => WHITE,
            Paint::Yellow => YELLOW,
            Paint::Red => RED,
            Paint::Blue => BLUE,
            Paint::Magenta => MAGENTA,
            Paint::Cyan => CYAN,
        }
    }

    fn w32_code(self) -> &'static str {
        match self {
            Paint::Green => W32_GREEN,
            Paint::White => W32_WHITE,
            Paint::Yellow => W32_YELLOW,
            Paint::Red => W32_RED,
            Paint::Blue => W32_BLUE,
            Paint::Magenta => W32_MAGENTA,
            Paint::Cyan => W32_CYAN,
        }
    }
}

/// 2xx green, 3xx white, 4xx yellow, anything else red
pub fn color_by_status(code: u16) -> &'static str {
    let paint = match code {
        200..=299 => Paint::Green,
        300..=399 => Paint::White,
        400..=499 => Paint::Yellow,
        _ => Paint::Red,
    };
    paint.code()
}

/// Colour for an HTTP method; unknown methods get the reset sequence
pub fn color_by_method(method: &str) -> &'static str {
    let paint = match method {
        "GET" => Paint::Blue,
        "POST" => Paint::Cyan,
        "PUT" => Paint::Yellow,
        "DELETE" => Paint::Red,
        "PATCH" => Paint::Green,
        "HEAD" => Paint::Magenta,
        "OPTIONS" => Paint::White,
        _ => return RESET,
    };
    paint.code()
}

pub fn reset_color() -> &'static str {
    RESET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_by_status() {
        assert_eq!(color_by_status(204), Paint::Green.code());
        assert_eq!(color_by_status(301), Paint::White.code());
        assert_eq!(color_by_status(404), Paint::Yellow.code());
        assert_eq!(color_by_status(503), Paint::Red.code());
        assert_eq!(color_by_status(101), Paint::Red.code());
    }

    #[test]
    fn test_color_by_method() {
        assert_eq!(color_by_method("GET"), Paint::Blue.code());
        assert_eq!(color_by_method("DELETE"), Paint::Red.code());
        assert_eq!(color_by_method("BREW"), reset_color());
    }

    #[test]
    fn test_codes_are_escape_sequences() {
        for code in [color_by_status(200), color_by_method("HEAD"), reset_color()] {
            assert!(code.starts_with("\x1b["));
            assert!(code.ends_with('m'));
        }
    }
}
