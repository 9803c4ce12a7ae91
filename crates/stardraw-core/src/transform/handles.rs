//! Selection handle placement and handle hit-testing.

use super::resize::ResizeHandle;
use crate::config::GeometryConfig;
use crate::elements::Element;
use crate::geometry::{BoundingBox, bounding_box, rotate_point};
use crate::text_metrics::TextLayout;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    /// Rotation handle above the top edge.
    Rotate,
}

/// A selection handle with its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Inclusive circular hit test.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// Resize handles (corners first, then edges) and the rotation handle for a
/// box rotated around its center.
pub fn box_handles(bounds: &BoundingBox, rotation: f64, rotate_offset: f64) -> Vec<Handle> {
    let center = bounds.center();
    let corners = [ResizeHandle::NW, ResizeHandle::NE, ResizeHandle::SE, ResizeHandle::SW];
    let edges = [ResizeHandle::N, ResizeHandle::E, ResizeHandle::S, ResizeHandle::W];

    let mut handles: Vec<Handle> = corners
        .into_iter()
        .chain(edges)
        .map(|h| {
            let local = bounds.point_at(h.anchor());
            Handle::new(rotate_point(local, center, rotation), HandleKind::Resize(h))
        })
        .collect();

    let rotate_local = Point::new(center.x, bounds.y - rotate_offset);
    handles.push(Handle::new(
        rotate_point(rotate_local, center, rotation),
        HandleKind::Rotate,
    ));
    handles
}

/// Handles of a single selected element.
pub fn element_handles(element: &Element, layout: &TextLayout<'_>, config: &GeometryConfig) -> Vec<Handle> {
    box_handles(
        &bounding_box(element, layout),
        element.rotation(),
        config.rotate_handle_offset,
    )
}

/// First handle within `radius` of `point`.
pub fn hit_test_handles(handles: &[Handle], point: Point, radius: f64) -> Option<HandleKind> {
    handles
        .iter()
        .find(|h| h.hit_test(point, radius))
        .map(|h| h.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Shape;
    use crate::text_metrics::ApproximateMeasurer;

    #[test]
    fn test_box_handles_unrotated() {
        let bounds = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        let handles = box_handles(&bounds, 0.0, 3.0);
        assert_eq!(handles.len(), 9);
        assert_eq!(handles[0], Handle::new(Point::new(0.0, 0.0), HandleKind::Resize(ResizeHandle::NW)));
        assert_eq!(handles[2].position, Point::new(10.0, 20.0));
        assert_eq!(handles[5].position, Point::new(10.0, 10.0));
        assert_eq!(handles[8], Handle::new(Point::new(5.0, -3.0), HandleKind::Rotate));
    }

    #[test]
    fn test_rotate_handle_follows_rotation() {
        let bounds = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let handles = box_handles(&bounds, 90.0, 3.0);
        let rotate = handles[8].position;
        // Above the top edge turns into right of the right edge
        assert!((rotate.x - 13.0).abs() < 1e-9);
        assert!((rotate.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_handles() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let config = GeometryConfig::default();
        let shape: Element = Shape::rect(10.0, 10.0, 20.0, 10.0).into();
        let handles = element_handles(&shape, &layout, &config);

        assert_eq!(
            hit_test_handles(&handles, Point::new(30.5, 20.5), config.handle_hit_radius),
            Some(HandleKind::Resize(ResizeHandle::SE))
        );
        assert_eq!(
            hit_test_handles(&handles, Point::new(20.0, 7.0), config.handle_hit_radius),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&handles, Point::new(20.0, 15.0), config.handle_hit_radius), None);
    }
}
