//! Rectangle, ellipse and diamond shapes.

use super::{ElementId, ElementStyle, Layer, now_millis};
use crate::geometry::BoundingBox;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which outline a box shape draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Ellipse,
    Diamond,
}

/// A box-defined shape. Rotation is applied around the box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ElementId,
    pub kind: ShapeKind,
    /// Left edge in local (unrotated) space.
    pub x: f64,
    /// Top edge in local (unrotated) space.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub layer: Layer,
    pub style: ElementStyle,
    #[serde(default)]
    pub created_at: u64,
}

impl Shape {
    /// Create a new shape.
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            layer: Layer::default(),
            style: ElementStyle::default(),
            created_at: now_millis(),
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Rect, x, y, width, height)
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Ellipse, x, y, width, height)
    }

    pub fn diamond(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Diamond, x, y, width, height)
    }

    /// Create a shape from two drag corners, in any order.
    pub fn from_corners(kind: ShapeKind, p1: Point, p2: Point) -> Self {
        Self::new(
            kind,
            p1.x.min(p2.x),
            p1.y.min(p2.y),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.style.fill_color = Some(color.into());
        self
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Outline vertices in local space: corners for rects (clockwise from
    /// top-left), top/right/bottom/left for diamonds. Empty for ellipses.
    pub fn polygon(&self) -> Vec<Point> {
        let b = self.bounds();
        match self.kind {
            ShapeKind::Rect => b.corners().to_vec(),
            ShapeKind::Diamond => {
                let c = b.center();
                vec![
                    Point::new(c.x, b.y),
                    Point::new(b.x + b.width, c.y),
                    Point::new(c.x, b.y + b.height),
                    Point::new(b.x, c.y),
                ]
            }
            ShapeKind::Ellipse => Vec::new(),
        }
    }
}

impl_element_common!(Shape, |this, delta| {
    this.x += delta.x;
    this.y += delta.y;
});
