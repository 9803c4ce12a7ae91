//! Element definitions for the drawing surface.

/// Implements [`ElementTrait`] for a variant struct with the common fields.
macro_rules! impl_element_common {
    ($ty:ty, |$this:ident, $delta:ident| $translate:block) => {
        impl $crate::elements::ElementTrait for $ty {
            fn id(&self) -> $crate::elements::ElementId {
                self.id
            }

            fn layer(&self) -> $crate::elements::Layer {
                self.layer
            }

            fn style(&self) -> &$crate::elements::ElementStyle {
                &self.style
            }

            fn style_mut(&mut self) -> &mut $crate::elements::ElementStyle {
                &mut self.style
            }

            fn rotation(&self) -> f64 {
                self.rotation
            }

            fn set_rotation(&mut self, degrees: f64) {
                self.rotation = degrees;
            }

            fn translate(&mut self, $delta: kurbo::Vec2) {
                let $this = self;
                $translate
            }
        }
    };
}

mod line;
mod path;
mod shape;
mod text;

pub use line::{Arrowhead, Line, LineKind};
pub use path::{Path, PathKind};
pub use shape::{Shape, ShapeKind};
pub use text::{FontFamily, FontSizePreset, Text, TextAlign};

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements. Stable for the lifetime of an element.
pub type ElementId = Uuid;

/// Default stroke color (near-black).
pub const DEFAULT_STROKE_COLOR: &str = "#1e1e1e";
/// Default stroke width in viewbox units.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Z/visibility group. Layers paint in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Background,
    #[default]
    Default,
    Foreground,
}

impl Layer {
    /// Parse a layer name, as used by the persisted form.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "background" => Some(Layer::Background),
            "default" => Some(Layer::Default),
            "foreground" => Some(Layer::Foreground),
            _ => None,
        }
    }
}

/// Dash presets offered by the style panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashPreset {
    Solid,
    Dashed,
    Dotted,
}

impl DashPreset {
    /// Dash length and gap for this preset.
    pub fn dash(self) -> (f64, f64) {
        match self {
            DashPreset::Solid => (0.0, 0.0),
            DashPreset::Dashed => (6.0, 4.0),
            DashPreset::Dotted => (0.0, 4.0),
        }
    }

    /// Classify raw dash values. A dash length of at least one unit reads as
    /// dashed; a gap without length reads as dotted.
    pub fn classify(dash_length: f64, dash_gap: f64) -> Self {
        if dash_length >= 1.0 {
            DashPreset::Dashed
        } else if dash_gap > 0.0 {
            DashPreset::Dotted
        } else {
            DashPreset::Solid
        }
    }
}

/// Style properties shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Literal color or palette token.
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Raw dash length, before any visual scaling by stroke width.
    #[serde(default)]
    pub dash_length: f64,
    #[serde(default)]
    pub dash_gap: f64,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            dash_length: 0.0,
            dash_gap: 0.0,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

impl ElementStyle {
    /// Whether the element paints its interior.
    pub fn is_filled(&self) -> bool {
        self.fill_color.is_some()
    }

    /// Apply a dash preset.
    pub fn set_dash_preset(&mut self, preset: DashPreset) {
        let (length, gap) = preset.dash();
        self.dash_length = length;
        self.dash_gap = gap;
    }

    /// The preset matching the current dash values.
    pub fn dash_preset(&self) -> DashPreset {
        DashPreset::classify(self.dash_length, self.dash_gap)
    }
}

/// A live reference from a line endpoint to a point on another element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub element_id: ElementId,
    /// Normalized position in the target's unrotated bounding box.
    pub anchor: Point,
}

impl Binding {
    pub fn new(element_id: ElementId, anchor: Point) -> Self {
        Self { element_id, anchor }
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is unavailable.
pub(crate) fn now_millis() -> u64 {
    // Use web_time for WASM compatibility
    #[cfg(target_arch = "wasm32")]
    use web_time::{SystemTime, UNIX_EPOCH};
    #[cfg(not(target_arch = "wasm32"))]
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Common behaviour of all element variants.
pub trait ElementTrait {
    fn id(&self) -> ElementId;

    fn layer(&self) -> Layer;

    fn style(&self) -> &ElementStyle;

    fn style_mut(&mut self) -> &mut ElementStyle;

    /// Rotation in degrees around the element's own center.
    fn rotation(&self) -> f64;

    fn set_rotation(&mut self, degrees: f64);

    /// Move the element by a delta.
    fn translate(&mut self, delta: Vec2);
}

/// A drawing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Path(Path),
    Line(Line),
    Shape(Shape),
    Text(Text),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Path(e) => e.id(),
            Element::Line(e) => e.id(),
            Element::Shape(e) => e.id(),
            Element::Text(e) => e.id(),
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            Element::Path(e) => e.layer(),
            Element::Line(e) => e.layer(),
            Element::Shape(e) => e.layer(),
            Element::Text(e) => e.layer(),
        }
    }

    pub fn set_layer(&mut self, layer: Layer) {
        match self {
            Element::Path(e) => e.layer = layer,
            Element::Line(e) => e.layer = layer,
            Element::Shape(e) => e.layer = layer,
            Element::Text(e) => e.layer = layer,
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Path(e) => e.style(),
            Element::Line(e) => e.style(),
            Element::Shape(e) => e.style(),
            Element::Text(e) => e.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Path(e) => e.style_mut(),
            Element::Line(e) => e.style_mut(),
            Element::Shape(e) => e.style_mut(),
            Element::Text(e) => e.style_mut(),
        }
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            Element::Path(e) => e.rotation(),
            Element::Line(e) => e.rotation(),
            Element::Shape(e) => e.rotation(),
            Element::Text(e) => e.rotation(),
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            Element::Path(e) => e.set_rotation(degrees),
            Element::Line(e) => e.set_rotation(degrees),
            Element::Shape(e) => e.set_rotation(degrees),
            Element::Text(e) => e.set_rotation(degrees),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Path(e) => e.translate(delta),
            Element::Line(e) => e.translate(delta),
            Element::Shape(e) => e.translate(delta),
            Element::Text(e) => e.translate(delta),
        }
    }

    pub fn created_at(&self) -> u64 {
        match self {
            Element::Path(e) => e.created_at,
            Element::Line(e) => e.created_at,
            Element::Shape(e) => e.created_at,
            Element::Text(e) => e.created_at,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Element::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut Line> {
        match self {
            Element::Line(l) => Some(l),
            _ => None,
        }
    }

    /// Give this element a fresh identifier (used when duplicating).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Path(e) => e.id = new_id,
            Element::Line(e) => e.id = new_id,
            Element::Shape(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
        }
    }
}

impl From<Path> for Element {
    fn from(path: Path) -> Self {
        Element::Path(path)
    }
}

impl From<Line> for Element {
    fn from(line: Line) -> Self {
        Element::Line(line)
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}
