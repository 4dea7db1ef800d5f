//! Presentation primitives and their theme-driven style selection.

pub mod theme;

pub use theme::{style_for, Component, Style};

use std::collections::BTreeMap;

use crate::settings::Settings;

/// Resolves the styles for the primitives a page renders, keyed by slot name.
pub fn page_styles(settings: &Settings, slots: &[(&str, Component)]) -> BTreeMap<String, Style> {
    slots
        .iter()
        .map(|(slot, component)| (slot.to_string(), style_for(*component, settings)))
        .collect()
}
