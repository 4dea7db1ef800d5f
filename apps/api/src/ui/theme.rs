//! Style selection for the reusable primitives.
//!
//! Theme picks the palette, contrast tightens foreground and borders, font
//! size picks the base pixel size. Nothing outside presentation reads these.

use serde::Serialize;

use crate::settings::{Contrast, FontSize, Settings, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    Primary,
    Secondary,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "variant", rename_all = "snake_case")]
pub enum Component {
    Button(ButtonVariant),
    Card,
    Modal,
    Spinner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Style {
    pub theme: Theme,
    pub background: &'static str,
    pub foreground: &'static str,
    pub border: &'static str,
    pub border_width_px: u8,
    pub font_px: u8,
}

struct Palette {
    surface: &'static str,
    overlay: &'static str,
    text: &'static str,
    strong_text: &'static str,
    border: &'static str,
    primary: &'static str,
    on_primary: &'static str,
    danger: &'static str,
}

const LIGHT: Palette = Palette {
    surface: "#ffffff",
    overlay: "#f3f4f6",
    text: "#1f2937",
    strong_text: "#000000",
    border: "#d1d5db",
    primary: "#2563eb",
    on_primary: "#ffffff",
    danger: "#dc2626",
};

const DARK: Palette = Palette {
    surface: "#111827",
    overlay: "#1f2937",
    text: "#e5e7eb",
    strong_text: "#ffffff",
    border: "#374151",
    primary: "#3b82f6",
    on_primary: "#0b1120",
    danger: "#f87171",
};

fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

fn font_px(size: FontSize) -> u8 {
    match size {
        FontSize::Small => 14,
        FontSize::Medium => 16,
        FontSize::Large => 18,
        FontSize::Xlarge => 20,
    }
}

pub fn style_for(component: Component, settings: &Settings) -> Style {
    let p = palette(settings.theme);
    let text = match settings.contrast {
        Contrast::Normal => p.text,
        Contrast::High | Contrast::Higher => p.strong_text,
    };
    let (border, border_width_px) = match settings.contrast {
        Contrast::Normal => (p.border, 1),
        Contrast::High => (text, 1),
        Contrast::Higher => (text, 2),
    };

    let (background, foreground) = match component {
        Component::Button(ButtonVariant::Primary) => (p.primary, p.on_primary),
        Component::Button(ButtonVariant::Danger) => (p.danger, p.on_primary),
        Component::Button(ButtonVariant::Secondary) | Component::Card => (p.surface, text),
        Component::Modal => (p.overlay, text),
        Component::Spinner => (p.surface, p.primary),
    };

    Style {
        theme: settings.theme,
        background,
        foreground,
        border,
        border_width_px,
        font_px: font_px(settings.font_size),
    }
}
