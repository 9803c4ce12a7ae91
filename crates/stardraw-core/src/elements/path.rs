//! Freehand pen and highlighter strokes.

use super::{ElementId, ElementStyle, Layer, now_millis};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tool that produced the stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    #[default]
    Pen,
    Highlighter,
}

/// A freehand drawing (polyline through its points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: ElementId,
    #[serde(default)]
    pub kind: PathKind,
    #[serde(default)]
    pub points: Vec<Point>,
    /// Kept at zero by the rotation gesture; rotation is baked into the points.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub layer: Layer,
    pub style: ElementStyle,
    #[serde(default)]
    pub created_at: u64,
}

impl Path {
    /// Create an empty stroke.
    pub fn new(kind: PathKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: Vec::new(),
            rotation: 0.0,
            layer: Layer::default(),
            style: ElementStyle::default(),
            created_at: now_millis(),
        }
    }

    /// Create a pen stroke from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::new(PathKind::Pen)
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl_element_common!(Path, |this, delta| {
    for p in &mut this.points {
        *p += delta;
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementTrait;
    use kurbo::Vec2;

    #[test]
    fn test_path_creation() {
        let mut path = Path::new(PathKind::Highlighter);
        assert!(path.is_empty());
        path.add_point(Point::new(1.0, 1.0));
        path.add_point(Point::new(2.0, 3.0));
        assert_eq!(path.len(), 2);
        assert_eq!(path.kind, PathKind::Highlighter);
    }

    #[test]
    fn test_translate() {
        let mut path = Path::from_points(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        path.translate(Vec2::new(2.0, 3.0));
        assert_eq!(path.points, vec![Point::new(2.0, 3.0), Point::new(3.0, 4.0)]);
    }
}
