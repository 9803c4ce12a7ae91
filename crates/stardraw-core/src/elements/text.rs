//! Text elements.

use super::{ElementId, ElementStyle, Layer, now_millis};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// Handwritten style font (default).
    #[default]
    HandDrawn,
    /// Clean sans-serif font.
    Normal,
    Monospace,
}

impl FontFamily {
    /// Name used by the persisted form.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::HandDrawn => "hand-drawn",
            FontFamily::Normal => "normal",
            FontFamily::Monospace => "monospace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hand-drawn" => Some(FontFamily::HandDrawn),
            "normal" => Some(FontFamily::Normal),
            "monospace" => Some(FontFamily::Monospace),
            _ => None,
        }
    }

    pub fn all() -> &'static [FontFamily] {
        &[FontFamily::HandDrawn, FontFamily::Normal, FontFamily::Monospace]
    }
}

/// Horizontal alignment. Determines which edge the anchor `x` sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }

    /// Fraction of the box width between the left edge and the anchor.
    pub fn anchor_fraction(self) -> f64 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right => 1.0,
        }
    }
}

/// Named font sizes offered by the style panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizePreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSizePreset {
    /// Font size in viewbox units.
    pub fn size(self) -> f64 {
        match self {
            FontSizePreset::Small => 2.0,
            FontSizePreset::Medium => 3.0,
            FontSizePreset::Large => 4.5,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "small" => Some(FontSizePreset::Small),
            "medium" => Some(FontSizePreset::Medium),
            "large" => Some(FontSizePreset::Large),
            _ => None,
        }
    }
}

/// A text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ElementId,
    /// Anchor: `x` is the edge implied by `text_align`, `y` is the top.
    pub position: Point,
    pub content: String,
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Wrap width (None = only explicit newlines break lines).
    #[serde(default)]
    pub wrap_width: Option<f64>,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub layer: Layer,
    pub style: ElementStyle,
    #[serde(default)]
    pub created_at: u64,
}

impl Text {
    /// Default font size (medium preset).
    pub const DEFAULT_FONT_SIZE: f64 = 3.0;

    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            text_align: TextAlign::default(),
            wrap_width: None,
            rotation: 0.0,
            layer: Layer::default(),
            style: ElementStyle::default(),
            created_at: now_millis(),
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_wrap_width(mut self, width: f64) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn set_font_size_preset(&mut self, preset: FontSizePreset) {
        self.font_size = preset.size();
    }
}

impl_element_common!(Text, |this, delta| {
    this.position += delta;
});
