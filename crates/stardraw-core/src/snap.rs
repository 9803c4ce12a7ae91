//! Endpoint snapping and shape bindings.

use crate::elements::{Binding, Element, ElementId, Shape};
use crate::geometry::{bounding_box, rotate_point};
use crate::text_metrics::TextLayout;
use kurbo::Point;
use std::collections::HashMap;

/// Normalized anchors of the top, right, bottom and left edge midpoints.
pub const EDGE_MIDPOINT_ANCHORS: [Point; 4] = [
    Point::new(0.5, 0.0),
    Point::new(1.0, 0.5),
    Point::new(0.5, 1.0),
    Point::new(0.0, 0.5),
];

/// A point that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// World position.
    pub point: Point,
    /// Binding created when snapping here (shape edges only).
    pub binding: Option<Binding>,
}

/// Result of a snap search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Binding to persist if the caller keeps the snap.
    pub binding: Option<Binding>,
}

impl SnapResult {
    /// Whether the snap attaches to a shape.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

/// Edge midpoints of a shape in world space, each carrying its anchor.
pub fn shape_snap_targets(shape: &Shape) -> [SnapTarget; 4] {
    let bounds = shape.bounds();
    let center = bounds.center();
    EDGE_MIDPOINT_ANCHORS.map(|anchor| SnapTarget {
        point: rotate_point(bounds.point_at(anchor), center, shape.rotation),
        binding: Some(Binding::new(shape.id, anchor)),
    })
}

/// Snap targets offered by an element.
///
/// Lines offer both raw endpoints without a binding, so lines snap to lines
/// but never bind to them. Shapes offer their edge midpoints.
pub fn snap_targets(element: &Element) -> Vec<SnapTarget> {
    match element {
        Element::Line(line) => vec![
            SnapTarget {
                point: line.start,
                binding: None,
            },
            SnapTarget {
                point: line.end,
                binding: None,
            },
        ],
        Element::Shape(shape) => shape_snap_targets(shape).to_vec(),
        Element::Path(_) | Element::Text(_) => Vec::new(),
    }
}

/// Nearest target strictly closer than `threshold`. Ties keep the first seen.
pub fn snap_to_targets(
    point: Point,
    targets: impl IntoIterator<Item = SnapTarget>,
    threshold: f64,
) -> Option<SnapResult> {
    let mut best: Option<SnapTarget> = None;
    let mut best_dist = threshold;

    for target in targets {
        let dist = point.distance(target.point);
        if dist < best_dist {
            best_dist = dist;
            best = Some(target);
        }
    }

    best.map(|t| SnapResult {
        point: t.point,
        binding: t.binding,
    })
}

/// Find the closest line endpoint or shape edge midpoint within `threshold`,
/// skipping the element being edited.
pub fn find_snap_point<'a>(
    point: Point,
    elements: impl IntoIterator<Item = &'a Element>,
    threshold: f64,
    exclude: Option<ElementId>,
) -> Option<SnapResult> {
    let targets = elements
        .into_iter()
        .filter(|e| Some(e.id()) != exclude)
        .flat_map(snap_targets);
    snap_to_targets(point, targets, threshold)
}

/// World position of a binding's anchor on `target`.
pub fn binding_point_on(target: &Element, anchor: Point, layout: &TextLayout<'_>) -> Point {
    let bbox = bounding_box(target, layout);
    rotate_point(bbox.point_at(anchor), bbox.center(), target.rotation())
}

/// Resolve a binding against the current elements.
///
/// Returns `None` when the target no longer exists; callers drop the binding.
pub fn resolve_binding_point(
    binding: &Binding,
    elements: &HashMap<ElementId, Element>,
    layout: &TextLayout<'_>,
) -> Option<Point> {
    elements
        .get(&binding.element_id)
        .map(|target| binding_point_on(target, binding.anchor, layout))
}

/// Capture a binding on `target` at a world point.
///
/// Inverse of resolution. A zero-size axis anchors at its middle.
pub fn capture_binding(target: &Element, world_point: Point, layout: &TextLayout<'_>) -> Binding {
    let bbox = bounding_box(target, layout);
    let local = rotate_point(world_point, bbox.center(), -target.rotation());
    let normalize = |value: f64, origin: f64, size: f64| {
        if size.abs() < f64::EPSILON {
            0.5
        } else {
            (value - origin) / size
        }
    };
    Binding::new(
        target.id(),
        Point::new(
            normalize(local.x, bbox.x, bbox.width),
            normalize(local.y, bbox.y, bbox.height),
        ),
    )
}

/// Snap an angle to the nearest increment, normalized to `[0, 360)`.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return angle_degrees;
    }
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Line;
    use crate::text_metrics::ApproximateMeasurer;

    fn scene(elements: Vec<Element>) -> HashMap<ElementId, Element> {
        elements.into_iter().map(|e| (e.id(), e)).collect()
    }

    #[test]
    fn test_snap_picks_closest() {
        let far: Element = Line::new(Point::new(1.0, 0.0), Point::new(50.0, 50.0)).into();
        let near: Element = Line::new(Point::new(0.0, 0.5), Point::new(60.0, 60.0)).into();
        let elements = [far, near];
        let result = find_snap_point(Point::ZERO, &elements, 1.5, None).unwrap();
        assert_eq!(result.point, Point::new(0.0, 0.5));
        assert!(result.binding.is_none());
    }

    #[test]
    fn test_snap_ties_keep_first() {
        let first: Element = Line::new(Point::new(1.0, 0.0), Point::new(50.0, 50.0)).into();
        let second: Element = Line::new(Point::new(0.0, 1.0), Point::new(60.0, 60.0)).into();
        let elements = [first, second];
        let result = find_snap_point(Point::ZERO, &elements, 1.5, None).unwrap();
        assert_eq!(result.point, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_snap_threshold_is_strict() {
        let line: Element = Line::new(Point::new(1.5, 0.0), Point::new(50.0, 50.0)).into();
        assert!(find_snap_point(Point::ZERO, [&line], 1.5, None).is_none());
    }

    #[test]
    fn test_snap_excludes_element() {
        let line: Element = Line::new(Point::new(0.5, 0.0), Point::new(50.0, 50.0)).into();
        let id = line.id();
        assert!(find_snap_point(Point::ZERO, [&line], 1.5, Some(id)).is_none());
    }

    #[test]
    fn test_snap_to_shape_edge_creates_binding() {
        let rect = Shape::rect(10.0, -2.0, 4.0, 4.0);
        let rect_id = rect.id;
        let element: Element = rect.into();
        let result = find_snap_point(Point::new(10.0, 0.0), [&element], 1.5, None).unwrap();
        assert_eq!(result.point, Point::new(10.0, 0.0));
        match result.binding {
            Some(binding) => {
                assert_eq!(binding.element_id, rect_id);
                assert_eq!(binding.anchor, Point::new(0.0, 0.5));
            }
            None => panic!("Expected binding"),
        }
    }

    #[test]
    fn test_rotated_shape_targets() {
        // 20x10 box centered at (20, 15), turned a quarter
        let rect = Shape::rect(10.0, 10.0, 20.0, 10.0).with_rotation(90.0);
        let targets = shape_snap_targets(&rect);
        // Top midpoint (20, 10) ends up on the right
        assert!((targets[0].point.x - 25.0).abs() < 1e-9);
        assert!((targets[0].point.y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_binding_round_trip() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let rect = Shape::rect(10.0, 10.0, 20.0, 10.0);
        let binding = Binding::new(rect.id, Point::new(0.0, 0.5));

        let elements = scene(vec![rect.clone().into()]);
        let p = resolve_binding_point(&binding, &elements, &layout).unwrap();
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 15.0).abs() < 1e-9);

        let rotated = scene(vec![rect.with_rotation(90.0).into()]);
        let p = resolve_binding_point(&binding, &rotated, &layout).unwrap();
        let expected = rotate_point(Point::new(10.0, 15.0), Point::new(20.0, 15.0), 90.0);
        assert!((p.x - expected.x).abs() < 1e-9);
        assert!((p.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_missing_target_resolves_to_none() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let binding = Binding::new(uuid::Uuid::new_v4(), Point::new(0.5, 0.5));
        assert!(resolve_binding_point(&binding, &HashMap::new(), &layout).is_none());
    }

    #[test]
    fn test_capture_is_inverse_of_resolve() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let target: Element = Shape::ellipse(5.0, 5.0, 30.0, 12.0).with_rotation(37.0).into();
        let world = Point::new(18.0, 9.0);
        let binding = capture_binding(&target, world, &layout);
        let back = binding_point_on(&target, binding.anchor, &layout);
        assert!((back.x - world.x).abs() < 1e-9);
        assert!((back.y - world.y).abs() < 1e-9);
    }

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(7.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(8.0, 15.0) - 15.0).abs() < f64::EPSILON);
        assert!((snap_angle(-20.0, 15.0) - 345.0).abs() < f64::EPSILON);
        assert!((snap_angle(358.0, 15.0) - 0.0).abs() < f64::EPSILON);
    }
}
