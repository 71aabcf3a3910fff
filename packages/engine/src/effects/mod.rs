// packages/engine/src/effects/mod.rs
//! Derived presentation state
//!
//! Everything here is rebuilt from the applied events plus the current time:
//!
//! - **Pointer**: position, buttons and glyph of the remote pointer
//! - **Ripple**: time-windowed click markers
//! - **Keyboard**: indicator state keyed by virtual key code
//! - **Keystrokes**: append-only textual log of typed keys
//!
//! None of it is undoable; a backward seek clears it through `reset` and
//! replays from the start.

pub mod keyboard;
pub mod keystrokes;
pub mod pointer;
pub mod ripple;

// Re-export commonly used types
pub use keyboard::{IndicatorId, KeyboardIndicators, KeyboardLayout};
pub use keystrokes::{describe_key, KeystrokeLog};
pub use pointer::{ButtonState, PointerSkin, PointerState};
pub use ripple::{ClickMarker, RippleConfig, RippleFrame, RippleTrail, RIPPLE_DURATION_MS};

use crate::recording::event::PointerUpdate;
use crate::replay::sink::Command;

/// All derived effect state owned by the replay engine
#[derive(Debug, Clone)]
pub struct EffectTracker {
    pointer: PointerState,
    ripples: RippleTrail,
    keyboard: KeyboardIndicators,
    keystrokes: KeystrokeLog,
}

impl Default for EffectTracker {
    fn default() -> Self {
        Self::new(RippleConfig::default(), KeyboardLayout::standard())
    }
}

impl EffectTracker {
    pub fn new(ripple: RippleConfig, layout: KeyboardLayout) -> Self {
        Self {
            pointer: PointerState::new(),
            ripples: RippleTrail::new(ripple),
            keyboard: KeyboardIndicators::new(layout),
            keystrokes: KeystrokeLog::new(),
        }
    }

    /// Return every effect to baseline
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.pointer.reset();
        self.ripples.clear();
        self.keystrokes.clear();
        self.keyboard.reset(out);
    }

    pub fn apply_pointer(&mut self, update: &PointerUpdate, time: f64, out: &mut Vec<Command>) {
        let change = self.pointer.apply(update);
        out.push(Command::MovePointer {
            x: change.x,
            y: change.y,
            buttons: change.buttons,
        });

        if change.primary_pressed {
            self.ripples.register(ClickMarker {
                x: change.x,
                y: change.y,
                time,
            });
        }
    }

    pub fn apply_skin(&mut self, skin: PointerSkin, out: &mut Vec<Command>) {
        self.pointer.set_skin(skin.clone());
        out.push(Command::SetPointerSkin { skin });
    }

    pub fn apply_key(&mut self, code: u32, pressed: bool, out: &mut Vec<Command>) {
        self.keyboard.set_key(code, pressed, out);

        if pressed {
            if let Some(text) = self.keystrokes.record(code) {
                out.push(Command::AppendKeystrokes { text });
            }
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn ripples(&self) -> &RippleTrail {
        &self.ripples
    }

    pub fn keyboard(&self) -> &KeyboardIndicators {
        &self.keyboard
    }

    pub fn keystrokes(&self) -> &KeystrokeLog {
        &self.keystrokes
    }
}
