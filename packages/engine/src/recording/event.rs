// packages/engine/src/recording/event.rs
//! Timestamped session events
//!
//! An [`Event`] is one immutable record from the capture: a time in
//! milliseconds since session start and a typed payload. Events round-trip
//! through JSON either as `{ "type", "time", "payload" }` objects or as the
//! `[type, time, payload]` triples the capture tool emits.

use crate::utils::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of event types understood by the replay engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "framebuffer")]
    Framebuffer,
    #[serde(rename = "pointerupdate")]
    PointerUpdate,
    #[serde(rename = "pointer-skin")]
    PointerSkin,
    #[serde(rename = "keypress")]
    KeyPress,
    #[serde(rename = "keyrelease")]
    KeyRelease,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Framebuffer,
        EventType::PointerUpdate,
        EventType::PointerSkin,
        EventType::KeyPress,
        EventType::KeyRelease,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Framebuffer => "framebuffer",
            EventType::PointerUpdate => "pointerupdate",
            EventType::PointerSkin => "pointer-skin",
            EventType::KeyPress => "keypress",
            EventType::KeyRelease => "keyrelease",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full-screen framebuffer image, resolved through an image provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramebufferUpdate {
    #[serde(alias = "Id")]
    pub id: String,
}

/// Absolute pointer position plus a sparse set of button states
///
/// Buttons absent from the payload keep their previous state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerUpdate {
    #[serde(alias = "X")]
    pub x: f64,
    #[serde(alias = "Y")]
    pub y: f64,
    #[serde(rename = "Lmb", alias = "lmb", default, skip_serializing_if = "Option::is_none")]
    pub lmb: Option<u8>,
    #[serde(rename = "Mmb", alias = "mmb", default, skip_serializing_if = "Option::is_none")]
    pub mmb: Option<u8>,
    #[serde(rename = "Rmb", alias = "rmb", default, skip_serializing_if = "Option::is_none")]
    pub rmb: Option<u8>,
    #[serde(rename = "Su", alias = "su", default, skip_serializing_if = "Option::is_none")]
    pub scroll_up: Option<u8>,
    #[serde(rename = "Sd", alias = "sd", default, skip_serializing_if = "Option::is_none")]
    pub scroll_down: Option<u8>,
}

impl PointerUpdate {
    /// A bare move with no button information
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_lmb(mut self, pressed: bool) -> Self {
        self.lmb = Some(pressed as u8);
        self
    }

    pub fn with_mmb(mut self, pressed: bool) -> Self {
        self.mmb = Some(pressed as u8);
        self
    }

    pub fn with_rmb(mut self, pressed: bool) -> Self {
        self.rmb = Some(pressed as u8);
        self
    }
}

/// Custom pointer glyph, or a request to go back to the default one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSkinUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl PointerSkinUpdate {
    pub fn custom(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            default: None,
            id: Some(id.into()),
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn reset_to_default() -> Self {
        Self {
            default: Some(1),
            ..Default::default()
        }
    }

    /// True when this update restores the default glyph
    pub fn is_default(&self) -> bool {
        self.default.unwrap_or(0) != 0 || self.id.is_none()
    }
}

/// A virtual key code from the platform-independent keysym space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    #[serde(alias = "Key")]
    pub key: u32,
}

/// Typed event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Framebuffer(FramebufferUpdate),
    PointerUpdate(PointerUpdate),
    PointerSkin(PointerSkinUpdate),
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    /// A type this engine does not know; kept so replay can report and skip it
    Unknown {
        type_name: String,
        payload: serde_json::Value,
    },
}

impl EventKind {
    /// The known event type, or `None` for unknown payloads
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            EventKind::Framebuffer(_) => Some(EventType::Framebuffer),
            EventKind::PointerUpdate(_) => Some(EventType::PointerUpdate),
            EventKind::PointerSkin(_) => Some(EventType::PointerSkin),
            EventKind::KeyPress(_) => Some(EventType::KeyPress),
            EventKind::KeyRelease(_) => Some(EventType::KeyRelease),
            EventKind::Unknown { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            EventKind::Unknown { type_name, .. } => type_name,
            other => other.event_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }
}

/// One timestamped session event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    /// Milliseconds since session start
    pub time: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn framebuffer(time: f64, id: impl Into<String>) -> Self {
        Self::new(time, EventKind::Framebuffer(FramebufferUpdate { id: id.into() }))
    }

    pub fn pointer(time: f64, update: PointerUpdate) -> Self {
        Self::new(time, EventKind::PointerUpdate(update))
    }

    pub fn pointer_skin(time: f64, update: PointerSkinUpdate) -> Self {
        Self::new(time, EventKind::PointerSkin(update))
    }

    pub fn key_press(time: f64, key: u32) -> Self {
        Self::new(time, EventKind::KeyPress(KeyEvent { key }))
    }

    pub fn key_release(time: f64, key: u32) -> Self {
        Self::new(time, EventKind::KeyRelease(KeyEvent { key }))
    }

    pub fn event_type(&self) -> Option<EventType> {
        self.kind.event_type()
    }
}

/// Wire shape of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Object {
        #[serde(rename = "type")]
        type_name: String,
        time: f64,
        #[serde(default)]
        payload: serde_json::Value,
    },
    Triple(String, f64, serde_json::Value),
}

impl TryFrom<RawEvent> for Event {
    type Error = EngineError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let (type_name, time, payload) = match raw {
            RawEvent::Object {
                type_name,
                time,
                payload,
            } => (type_name, time, payload),
            RawEvent::Triple(type_name, time, payload) => (type_name, time, payload),
        };

        if !time.is_finite() || time < 0.0 {
            return Err(EngineError::InvalidEvent {
                kind: type_name,
                time,
                reason: "time must be a non-negative number".to_string(),
            });
        }

        let invalid = |type_name: &str, err: serde_json::Error| EngineError::InvalidEvent {
            kind: type_name.to_string(),
            time,
            reason: err.to_string(),
        };

        let kind = match EventType::parse(&type_name) {
            Some(EventType::Framebuffer) => EventKind::Framebuffer(
                serde_json::from_value(payload).map_err(|e| invalid(&type_name, e))?,
            ),
            Some(EventType::PointerUpdate) => EventKind::PointerUpdate(
                serde_json::from_value(payload).map_err(|e| invalid(&type_name, e))?,
            ),
            Some(EventType::PointerSkin) => {
                let payload = if payload.is_null() {
                    serde_json::Value::Object(Default::default())
                } else {
                    payload
                };
                EventKind::PointerSkin(
                    serde_json::from_value(payload).map_err(|e| invalid(&type_name, e))?,
                )
            }
            Some(EventType::KeyPress) => EventKind::KeyPress(
                serde_json::from_value(payload).map_err(|e| invalid(&type_name, e))?,
            ),
            Some(EventType::KeyRelease) => EventKind::KeyRelease(
                serde_json::from_value(payload).map_err(|e| invalid(&type_name, e))?,
            ),
            None => EventKind::Unknown { type_name, payload },
        };

        Ok(Event { time, kind })
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let type_name = event.kind.type_name().to_string();
        let payload = match event.kind {
            EventKind::Framebuffer(p) => serde_json::to_value(p),
            EventKind::PointerUpdate(p) => serde_json::to_value(p),
            EventKind::PointerSkin(p) => serde_json::to_value(p),
            EventKind::KeyPress(p) | EventKind::KeyRelease(p) => serde_json::to_value(p),
            EventKind::Unknown { payload, .. } => Ok(payload),
        }
        .unwrap_or(serde_json::Value::Null);

        RawEvent::Object {
            type_name,
            time: event.time,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_names() {
        for t in EventType::ALL {
            assert_eq!(EventType::parse(t.as_str()), Some(t));
        }
        assert_eq!(EventType::parse("bell"), None);
    }

    #[test]
    fn test_parse_object_form() {
        let event: Event = serde_json::from_value(json!({
            "type": "pointerupdate",
            "time": 100.0,
            "payload": { "x": 5, "y": 7, "Lmb": 1 }
        }))
        .unwrap();

        assert_eq!(event.time, 100.0);
        match event.kind {
            EventKind::PointerUpdate(p) => {
                assert_eq!((p.x, p.y), (5.0, 7.0));
                assert_eq!(p.lmb, Some(1));
                assert_eq!(p.rmb, None);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_parse_capture_triples_with_aliases() {
        let events: Vec<Event> = serde_json::from_value(json!([
            ["framebuffer", 0.0, { "Id": "framebuffer_00000010" }],
            ["keypress", 12.3, { "Key": 97 }],
            ["pointerupdate", 20.0, { "X": 1, "Y": 2, "Lmb": 0, "Rmb": 1, "Mmb": 0, "Su": 0, "Sd": 0 }],
            ["pointer-skin", 30.0, { "id": null, "default": 1 }]
        ]))
        .unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], Event::framebuffer(0.0, "framebuffer_00000010"));
        assert_eq!(events[1], Event::key_press(12.3, 97));
        match &events[3].kind {
            EventKind::PointerSkin(skin) => assert!(skin.is_default()),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let event: Event =
            serde_json::from_value(json!(["bell", 5.0, { "volume": 3 }])).unwrap();
        assert_eq!(event.event_type(), None);
        assert_eq!(event.kind.type_name(), "bell");
    }

    #[test]
    fn test_rejects_negative_time() {
        let result: Result<Event, _> =
            serde_json::from_value(json!(["framebuffer", -1.0, { "id": "a" }]));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_mismatched_payload() {
        let result: Result<Event, _> =
            serde_json::from_value(json!({ "type": "keypress", "time": 1.0, "payload": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_object() {
        let value = serde_json::to_value(Event::key_release(4.0, 0xff0d)).unwrap();
        assert_eq!(
            value,
            json!({ "type": "keyrelease", "time": 4.0, "payload": { "key": 0xff0d } })
        );
    }
}
