//! Line and arrow elements.

use super::{Binding, ElementId, ElementStyle, Layer, now_millis};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a line is drawn plain or as an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Line,
    Arrow,
}

/// Marker drawn at a line endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    #[default]
    None,
    Arrow,
    Circle,
    Bar,
    Diamond,
}

impl Arrowhead {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Arrowhead::None),
            "arrow" => Some(Arrowhead::Arrow),
            "circle" => Some(Arrowhead::Circle),
            "bar" => Some(Arrowhead::Bar),
            "diamond" => Some(Arrowhead::Diamond),
            _ => None,
        }
    }
}

/// A straight or quadratic-curved line between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ElementId,
    #[serde(default)]
    pub kind: LineKind,
    pub start: Point,
    pub end: Point,
    /// Quadratic bezier control point (None = straight line).
    #[serde(default)]
    pub midpoint: Option<Point>,
    #[serde(default)]
    pub start_binding: Option<Binding>,
    #[serde(default)]
    pub end_binding: Option<Binding>,
    #[serde(default)]
    pub start_arrowhead: Arrowhead,
    #[serde(default)]
    pub end_arrowhead: Arrowhead,
    /// Kept at zero by the rotation gesture; rotation is baked into the points.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub layer: Layer,
    pub style: ElementStyle,
    #[serde(default)]
    pub created_at: u64,
}

impl Line {
    /// Create a new straight line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: LineKind::Line,
            start,
            end,
            midpoint: None,
            start_binding: None,
            end_binding: None,
            start_arrowhead: Arrowhead::None,
            end_arrowhead: Arrowhead::None,
            rotation: 0.0,
            layer: Layer::default(),
            style: ElementStyle::default(),
            created_at: now_millis(),
        }
    }

    /// Create an arrow with an arrowhead at the end.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self {
            kind: LineKind::Arrow,
            end_arrowhead: Arrowhead::Arrow,
            ..Self::new(start, end)
        }
    }

    pub fn with_midpoint(mut self, midpoint: Point) -> Self {
        self.midpoint = Some(midpoint);
        self
    }

    /// Endpoints plus the control point when present.
    pub fn control_points(&self) -> Vec<Point> {
        let mut pts = vec![self.start, self.end];
        if let Some(mid) = self.midpoint {
            pts.push(mid);
        }
        pts
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Whether either endpoint is bound to an element.
    pub fn is_bound(&self) -> bool {
        self.start_binding.is_some() || self.end_binding.is_some()
    }

    /// Whether an endpoint is bound to the given element.
    pub fn is_bound_to(&self, id: ElementId) -> bool {
        self.start_binding.is_some_and(|b| b.element_id == id)
            || self.end_binding.is_some_and(|b| b.element_id == id)
    }

    /// Apply `f` to both endpoints and the control point.
    pub fn map_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        self.start = f(self.start);
        self.end = f(self.end);
        if let Some(mid) = self.midpoint.as_mut() {
            *mid = f(*mid);
        }
    }
}

impl_element_common!(Line, |this, delta| {
    this.map_points(|p| p + delta);
});
