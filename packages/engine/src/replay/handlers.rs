// packages/engine/src/replay/handlers.rs
//! Per-event handlers
//!
//! `apply_event` folds one event into the effect state and writes the
//! resulting commands to `out`. It depends only on its inputs, so replaying
//! from baseline is a plain loop over the log.

use crate::effects::pointer::PointerSkin;
use crate::effects::EffectTracker;
use crate::recording::event::{Event, EventKind, EventType};
use crate::replay::images::ImageProvider;
use crate::replay::sink::{Command, Diagnostic};
use tracing::trace;

/// Apply event number `index`; returns a diagnostic when it was skipped
pub fn apply_event(
    effects: &mut EffectTracker,
    images: &dyn ImageProvider,
    index: usize,
    event: &Event,
    out: &mut Vec<Command>,
) -> Option<Diagnostic> {
    trace!(index, time = event.time, kind = event.kind.type_name(), "apply");

    match &event.kind {
        EventKind::Framebuffer(fb) => {
            if !images.resolves(&fb.id) {
                return Some(missing(index, event, EventType::Framebuffer, &fb.id));
            }
            out.push(Command::DrawFramebuffer { id: fb.id.clone() });
        }
        EventKind::PointerUpdate(update) => {
            effects.apply_pointer(update, event.time, out);
        }
        EventKind::PointerSkin(update) => {
            let skin = PointerSkin::from(update);
            if let PointerSkin::Custom { id, .. } = &skin {
                if !images.resolves(id) {
                    return Some(missing(index, event, EventType::PointerSkin, id));
                }
            }
            effects.apply_skin(skin, out);
        }
        EventKind::KeyPress(key) => effects.apply_key(key.key, true, out),
        EventKind::KeyRelease(key) => effects.apply_key(key.key, false, out),
        EventKind::Unknown { type_name, .. } => {
            return Some(Diagnostic::UnknownEventType {
                index,
                time: event.time,
                type_name: type_name.clone(),
            });
        }
    }

    None
}

fn missing(index: usize, event: &Event, event_type: EventType, id: &str) -> Diagnostic {
    Diagnostic::MissingResource {
        index,
        time: event.time,
        event_type,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::event::{PointerSkinUpdate, PointerUpdate};
    use crate::replay::images::AnyImage;
    use std::collections::HashSet;

    #[test]
    fn test_framebuffer_draws_when_resolved() {
        let mut effects = EffectTracker::default();
        let mut out = Vec::new();
        let diagnostic = apply_event(
            &mut effects,
            &AnyImage,
            0,
            &Event::framebuffer(0.0, "img1"),
            &mut out,
        );
        assert!(diagnostic.is_none());
        assert_eq!(out, vec![Command::DrawFramebuffer { id: "img1".to_string() }]);
    }

    #[test]
    fn test_missing_framebuffer_is_skipped() {
        let mut effects = EffectTracker::default();
        let mut out = Vec::new();
        let images: HashSet<String> = HashSet::new();

        let diagnostic = apply_event(
            &mut effects,
            &images,
            4,
            &Event::framebuffer(10.0, "gone"),
            &mut out,
        );
        assert!(out.is_empty());
        assert!(matches!(
            diagnostic,
            Some(Diagnostic::MissingResource { index: 4, ref id, .. }) if id == "gone"
        ));
    }

    #[test]
    fn test_missing_skin_keeps_previous_glyph() {
        let mut effects = EffectTracker::default();
        let mut out = Vec::new();
        let images: HashSet<String> = HashSet::new();

        let event = Event::pointer_skin(5.0, PointerSkinUpdate::custom("pointer_1", 1.0, 1.0));
        let diagnostic = apply_event(&mut effects, &images, 0, &event, &mut out);
        assert!(diagnostic.is_some());
        assert!(out.is_empty());
        assert_eq!(effects.pointer().skin(), &PointerSkin::Default);

        // going back to the default glyph never needs an image
        let event = Event::pointer_skin(6.0, PointerSkinUpdate::reset_to_default());
        assert!(apply_event(&mut effects, &images, 1, &event, &mut out).is_none());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_unknown_event_reported() {
        let mut effects = EffectTracker::default();
        let mut out = Vec::new();
        let event = Event::new(
            7.0,
            EventKind::Unknown {
                type_name: "bell".to_string(),
                payload: serde_json::Value::Null,
            },
        );

        let diagnostic = apply_event(&mut effects, &AnyImage, 2, &event, &mut out);
        assert!(out.is_empty());
        assert_eq!(
            diagnostic,
            Some(Diagnostic::UnknownEventType {
                index: 2,
                time: 7.0,
                type_name: "bell".to_string()
            })
        );
    }

    #[test]
    fn test_pointer_update_emits_move() {
        let mut effects = EffectTracker::default();
        let mut out = Vec::new();
        let event = Event::pointer(100.0, PointerUpdate::at(5.0, 5.0).with_lmb(true));

        apply_event(&mut effects, &AnyImage, 1, &event, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(effects.ripples().markers().len(), 1);
        assert_eq!(effects.ripples().markers()[0].time, 100.0);
    }
}
