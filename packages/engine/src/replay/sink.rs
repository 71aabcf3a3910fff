// packages/engine/src/replay/sink.rs
//! Presentation commands and the sink that consumes them
//!
//! The engine never draws. Every visible effect is expressed as a
//! [`Command`] handed to a [`PresentationSink`]; the cumulative effect of
//! the commands issued so far *is* the current snapshot.

use crate::effects::keyboard::IndicatorId;
use crate::effects::pointer::{ButtonState, PointerSkin};
use crate::recording::event::EventType;
use serde::Serialize;
use std::fmt;

/// A side effect for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Blank screen, pointer off-canvas with the default glyph, empty keystroke log
    ClearToBaseline,

    /// Draw a resolved framebuffer image over the whole screen
    DrawFramebuffer { id: String },

    MovePointer {
        x: f64,
        y: f64,
        buttons: ButtonState,
    },

    SetPointerSkin { skin: PointerSkin },

    SetKeyIndicator {
        indicator: IndicatorId,
        pressed: bool,
    },

    /// Release every key indicator
    ResetKeyIndicators,

    AppendKeystrokes { text: String },
}

/// Non-fatal problems found while replaying
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An image identifier could not be resolved; the draw was skipped
    MissingResource {
        index: usize,
        time: f64,
        event_type: EventType,
        id: String,
    },

    /// The event type is not understood; the event was skipped
    UnknownEventType {
        index: usize,
        time: f64,
        type_name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingResource {
                index,
                time,
                event_type,
                id,
            } => write!(
                f,
                "event #{} ({} at {}ms) references missing image '{}'",
                index, event_type, time, id
            ),
            Diagnostic::UnknownEventType {
                index,
                time,
                type_name,
            } => write!(
                f,
                "event #{} at {}ms has unknown type '{}'",
                index, time, type_name
            ),
        }
    }
}

/// Consumer of presentation commands
pub trait PresentationSink {
    /// Carry out one command
    fn execute(&mut self, command: Command);

    /// Receive a non-fatal diagnostic
    fn report(&mut self, diagnostic: Diagnostic) {
        let _ = diagnostic;
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn execute(&mut self, command: Command) {
        (**self).execute(command)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn execute(&mut self, command: Command) {
        (**self).execute(command)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Sink that keeps every command and diagnostic, for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<Command>,
    diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the commands recorded so far
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.diagnostics.clear();
    }
}

impl PresentationSink for RecordingSink {
    fn execute(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_take() {
        let mut sink = RecordingSink::new();
        sink.execute(Command::ClearToBaseline);
        sink.execute(Command::DrawFramebuffer {
            id: "img1".to_string(),
        });

        assert_eq!(sink.commands().len(), 2);
        let taken = sink.take();
        assert_eq!(taken[0], Command::ClearToBaseline);
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_sink_through_mut_ref() {
        fn emit(mut sink: impl PresentationSink) {
            sink.execute(Command::ResetKeyIndicators);
            sink.report(Diagnostic::UnknownEventType {
                index: 0,
                time: 1.0,
                type_name: "bell".to_string(),
            });
        }

        let mut sink = RecordingSink::new();
        emit(&mut sink);
        assert_eq!(sink.commands(), &[Command::ResetKeyIndicators]);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn test_command_json_shape() {
        let value = serde_json::to_value(Command::DrawFramebuffer {
            id: "img1".to_string(),
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "command": "draw_framebuffer", "id": "img1" })
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::MissingResource {
            index: 3,
            time: 40.0,
            event_type: EventType::Framebuffer,
            id: "img9".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "event #3 (framebuffer at 40ms) references missing image 'img9'"
        );
    }
}
