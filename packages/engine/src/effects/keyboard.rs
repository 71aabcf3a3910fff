// packages/engine/src/effects/keyboard.rs
//! On-screen keyboard indicators
//!
//! A physical indicator can be reached through two virtual key codes (the
//! plain keysym and its shifted variant). [`KeyboardLayout`] stores that as a
//! multimap from code to indicators, built once at setup.

use crate::replay::sink::Command;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identifier of one physical key indicator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndicatorId(String);

impl IndicatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IndicatorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for IndicatorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from key code to the indicators it lights
#[derive(Debug, Clone, Default)]
pub struct KeyboardLayout {
    by_code: HashMap<u32, Vec<IndicatorId>>,
    indicators: BTreeSet<IndicatorId>,
}

static STANDARD_LAYOUT: Lazy<KeyboardLayout> = Lazy::new(build_standard_layout);

impl KeyboardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// US keyboard: letters, digits and punctuation with their shifted keysyms,
    /// plus editing, navigation, modifier and function keys
    pub fn standard() -> Self {
        STANDARD_LAYOUT.clone()
    }

    /// Register an indicator reached by `normal` and optionally `shifted`
    pub fn add(&mut self, indicator: impl Into<IndicatorId>, normal: u32, shifted: Option<u32>) {
        let indicator = indicator.into();
        for code in std::iter::once(normal).chain(shifted) {
            let targets = self.by_code.entry(code).or_default();
            if !targets.contains(&indicator) {
                targets.push(indicator.clone());
            }
        }
        self.indicators.insert(indicator);
    }

    pub fn with(mut self, indicator: impl Into<IndicatorId>, normal: u32, shifted: Option<u32>) -> Self {
        self.add(indicator, normal, shifted);
        self
    }

    /// Indicators affected by a key code (empty for unmapped codes)
    pub fn indicators_for(&self, code: u32) -> &[IndicatorId] {
        self.by_code.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn indicators(&self) -> impl Iterator<Item = &IndicatorId> {
        self.indicators.iter()
    }
}

fn build_standard_layout() -> KeyboardLayout {
    let mut layout = KeyboardLayout::new();

    for c in b'a'..=b'z' {
        let upper = c.to_ascii_uppercase();
        layout.add((upper as char).to_string(), c as u32, Some(upper as u32));
    }

    const SHIFTED_PAIRS: &[(u8, u8)] = &[
        (b'1', b'!'),
        (b'2', b'@'),
        (b'3', b'#'),
        (b'4', b'$'),
        (b'5', b'%'),
        (b'6', b'^'),
        (b'7', b'&'),
        (b'8', b'*'),
        (b'9', b'('),
        (b'0', b')'),
        (b'-', b'_'),
        (b'=', b'+'),
        (b'[', b'{'),
        (b']', b'}'),
        (b'\\', b'|'),
        (b';', b':'),
        (b'\'', b'"'),
        (b',', b'<'),
        (b'.', b'>'),
        (b'/', b'?'),
        (b'`', b'~'),
    ];
    for &(normal, shifted) in SHIFTED_PAIRS {
        layout.add((normal as char).to_string(), normal as u32, Some(shifted as u32));
    }

    const SPECIAL_KEYS: &[(&str, u32, Option<u32>)] = &[
        ("Space", 0x0020, None),
        ("Backspace", 0xff08, None),
        ("Tab", 0xff09, Some(0xfe20)),
        ("Enter", 0xff0d, Some(0xff8d)),
        ("Escape", 0xff1b, None),
        ("Home", 0xff50, None),
        ("Left", 0xff51, None),
        ("Up", 0xff52, None),
        ("Right", 0xff53, None),
        ("Down", 0xff54, None),
        ("PageUp", 0xff55, None),
        ("PageDown", 0xff56, None),
        ("End", 0xff57, None),
        ("Insert", 0xff63, None),
        ("Delete", 0xffff, None),
        ("ShiftLeft", 0xffe1, None),
        ("ShiftRight", 0xffe2, None),
        ("ControlLeft", 0xffe3, None),
        ("ControlRight", 0xffe4, None),
        ("CapsLock", 0xffe5, None),
        ("AltLeft", 0xffe9, None),
        ("AltRight", 0xffea, None),
        ("SuperLeft", 0xffeb, None),
        ("SuperRight", 0xffec, None),
    ];
    for &(name, normal, shifted) in SPECIAL_KEYS {
        layout.add(name, normal, shifted);
    }

    for n in 1..=12u32 {
        layout.add(format!("F{}", n), 0xffbd + n, None);
    }

    layout
}

/// Press/release state per key code and the indicators it drives
#[derive(Debug, Clone, Default)]
pub struct KeyboardIndicators {
    layout: KeyboardLayout,
    pressed_codes: BTreeSet<u32>,
    lit: BTreeMap<IndicatorId, bool>,
}

impl KeyboardIndicators {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            pressed_codes: BTreeSet::new(),
            lit: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Record a key transition, emitting one command per affected indicator
    pub fn set_key(&mut self, code: u32, pressed: bool, out: &mut Vec<Command>) {
        if pressed {
            self.pressed_codes.insert(code);
        } else {
            self.pressed_codes.remove(&code);
        }

        for indicator in self.layout.indicators_for(code) {
            self.lit.insert(indicator.clone(), pressed);
            out.push(Command::SetKeyIndicator {
                indicator: indicator.clone(),
                pressed,
            });
        }
    }

    /// Release everything
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.pressed_codes.clear();
        self.lit.clear();
        out.push(Command::ResetKeyIndicators);
    }

    pub fn is_code_pressed(&self, code: u32) -> bool {
        self.pressed_codes.contains(&code)
    }

    pub fn is_lit(&self, indicator: &IndicatorId) -> bool {
        self.lit.get(indicator).copied().unwrap_or(false)
    }

    /// Indicators currently shown as pressed
    pub fn lit_indicators(&self) -> impl Iterator<Item = &IndicatorId> {
        self.lit.iter().filter(|(_, on)| **on).map(|(id, _)| id)
    }
}
