// packages/engine/src/effects/keystrokes.rs
//! Textual keystroke log
//!
//! Each key press appends its printable character, a bracketed name for
//! known control and navigation keys, or a bracketed hex code. Shift presses
//! are left out since the shifted character that follows already shows them.

use serde::Serialize;

pub const XK_SHIFT_L: u32 = 0xffe1;
pub const XK_SHIFT_R: u32 = 0xffe2;
pub const XK_RETURN: u32 = 0xff0d;
pub const XK_KP_ENTER: u32 = 0xff8d;

/// Name of a non-printable keysym the log knows about
pub fn key_name(code: u32) -> Option<&'static str> {
    let name = match code {
        0xff08 => "BackSpace",
        0xff09 => "Tab",
        0xfe20 => "Tab",
        XK_RETURN => "Return",
        0xff13 => "Pause",
        0xff14 => "Scroll_Lock",
        0xff1b => "Escape",
        0xff50 => "Home",
        0xff51 => "Left",
        0xff52 => "Up",
        0xff53 => "Right",
        0xff54 => "Down",
        0xff55 => "Page_Up",
        0xff56 => "Page_Down",
        0xff57 => "End",
        0xff61 => "Print",
        0xff63 => "Insert",
        0xff67 => "Menu",
        0xff7f => "Num_Lock",
        XK_KP_ENTER => "KP_Enter",
        0xffbe..=0xffc9 => {
            const FUNCTION_KEYS: [&str; 12] = [
                "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
            ];
            FUNCTION_KEYS[(code - 0xffbe) as usize]
        }
        0xffe3 => "Control_L",
        0xffe4 => "Control_R",
        0xffe5 => "Caps_Lock",
        0xffe7 => "Meta_L",
        0xffe8 => "Meta_R",
        0xffe9 => "Alt_L",
        0xffea => "Alt_R",
        0xffeb => "Super_L",
        0xffec => "Super_R",
        0xffff => "Delete",
        _ => return None,
    };
    Some(name)
}

pub fn is_shift(code: u32) -> bool {
    code == XK_SHIFT_L || code == XK_SHIFT_R
}

/// Text appended to the log for a key press, `None` for suppressed keys
pub fn describe_key(code: u32) -> Option<String> {
    if is_shift(code) {
        return None;
    }

    let mut text = match code {
        0x20..=0x7e => char::from_u32(code).map(String::from).unwrap_or_default(),
        _ => match key_name(code) {
            Some(name) => format!("[{}]", name),
            None => format!("[{:#06x}]", code),
        },
    };

    if code == XK_RETURN || code == XK_KP_ENTER {
        text.push('\n');
    }
    Some(text)
}

/// Append-only log of typed keys, cleared by reset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeystrokeLog {
    text: String,
}

impl KeystrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key press; returns the text that was added
    pub fn record(&mut self, code: u32) -> Option<String> {
        let text = describe_key(code)?;
        self.text.push_str(&text);
        Some(text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii() {
        assert_eq!(describe_key(0x61).as_deref(), Some("a"));
        assert_eq!(describe_key(0x41).as_deref(), Some("A"));
        assert_eq!(describe_key(0x20).as_deref(), Some(" "));
        assert_eq!(describe_key(0x7e).as_deref(), Some("~"));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(describe_key(0xff08).as_deref(), Some("[BackSpace]"));
        assert_eq!(describe_key(0xff1b).as_deref(), Some("[Escape]"));
        assert_eq!(describe_key(0xffbe).as_deref(), Some("[F1]"));
        assert_eq!(describe_key(0xffc9).as_deref(), Some("[F12]"));
        assert_eq!(describe_key(0xffe3).as_deref(), Some("[Control_L]"));
    }

    #[test]
    fn test_enter_keys_break_lines() {
        assert_eq!(describe_key(XK_RETURN).as_deref(), Some("[Return]\n"));
        assert_eq!(describe_key(XK_KP_ENTER).as_deref(), Some("[KP_Enter]\n"));
    }

    #[test]
    fn test_hex_fallback() {
        assert_eq!(describe_key(0x1234).as_deref(), Some("[0x1234]"));
        assert_eq!(describe_key(0x05).as_deref(), Some("[0x0005]"));
    }

    #[test]
    fn test_shift_is_suppressed() {
        let mut log = KeystrokeLog::new();
        assert_eq!(log.record(XK_SHIFT_L), None);
        assert_eq!(log.record(XK_SHIFT_R), None);
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_accumulates_and_clears() {
        let mut log = KeystrokeLog::new();
        for code in [0xffe1, 0x48, 0x69, XK_RETURN, 0xff08] {
            log.record(code);
        }
        assert_eq!(log.as_str(), "Hi[Return]\n[BackSpace]");

        log.clear();
        assert!(log.is_empty());
    }
}
