// packages/engine/src/effects/pointer.rs
//! Remote pointer position, buttons and glyph

use crate::recording::event::{PointerSkinUpdate, PointerUpdate};
use serde::Serialize;

/// Tracked mouse button and wheel states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
    pub scroll_up: bool,
    pub scroll_down: bool,
}

impl ButtonState {
    /// Overwrite only the buttons present in the update
    fn merge(&mut self, update: &PointerUpdate) {
        let apply = |slot: &mut bool, value: Option<u8>| {
            if let Some(v) = value {
                *slot = v != 0;
            }
        };
        apply(&mut self.left, update.lmb);
        apply(&mut self.middle, update.mmb);
        apply(&mut self.right, update.rmb);
        apply(&mut self.scroll_up, update.scroll_up);
        apply(&mut self.scroll_down, update.scroll_down);
    }
}

/// Glyph drawn at the pointer position
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum PointerSkin {
    #[default]
    Default,
    Custom {
        id: String,
        offset_x: f64,
        offset_y: f64,
    },
}

impl From<&PointerSkinUpdate> for PointerSkin {
    fn from(update: &PointerSkinUpdate) -> Self {
        match (&update.id, update.is_default()) {
            (Some(id), false) => PointerSkin::Custom {
                id: id.clone(),
                offset_x: update.x.unwrap_or(0.0),
                offset_y: update.y.unwrap_or(0.0),
            },
            _ => PointerSkin::Default,
        }
    }
}

/// Result of folding one pointer update into the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerChange {
    pub x: f64,
    pub y: f64,
    pub buttons: ButtonState,

    /// Primary button went from released to pressed
    pub primary_pressed: bool,
}

/// Pointer as seen by the remote display
///
/// Baseline is off-canvas with no buttons held and the default glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    position: Option<(f64, f64)>,
    buttons: ButtonState,
    skin: PointerSkin,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, update: &PointerUpdate) -> PointerChange {
        let was_down = self.buttons.left;
        self.buttons.merge(update);
        self.position = Some((update.x, update.y));

        PointerChange {
            x: update.x,
            y: update.y,
            buttons: self.buttons,
            primary_pressed: !was_down && self.buttons.left,
        }
    }

    pub fn set_skin(&mut self, skin: PointerSkin) {
        self.skin = skin;
    }

    /// `None` while the pointer is off-canvas
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    pub fn skin(&self) -> &PointerSkin {
        &self.skin
    }
}
