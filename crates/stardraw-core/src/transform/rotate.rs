//! Drag-to-rotate.

use crate::config::GeometryConfig;
use crate::elements::{Element, ElementId, ElementTrait};
use crate::geometry::{angle_from_point, bounding_box, rotate_point};
use crate::snap::snap_angle;
use crate::text_metrics::TextLayout;
use kurbo::Point;

/// Rotation after dragging the pointer from `start_pointer` to
/// `current_pointer` around `center`, optionally snapped to `snap` degrees.
pub fn rotation_angle(
    start_rotation: f64,
    center: Point,
    start_pointer: Point,
    current_pointer: Point,
    snap: Option<f64>,
) -> f64 {
    let delta = angle_from_point(current_pointer, center) - angle_from_point(start_pointer, center);
    let angle = start_rotation + delta;
    match snap {
        Some(increment) => snap_angle(angle, increment),
        None => angle,
    }
}

/// Rotate `original` by `delta` degrees around `pivot`.
///
/// Lines and paths bake the rotation into their points, including any
/// rotation already stored on them, and end with a zero rotation field.
/// Shapes and text move their center around the pivot and add `delta` to
/// their rotation.
pub fn rotate_element(original: &Element, pivot: Point, delta: f64, layout: &TextLayout<'_>) -> Element {
    let mut element = original.clone();
    let own_center = bounding_box(original, layout).center();
    let existing = original.rotation();

    match &mut element {
        Element::Line(line) => {
            line.map_points(|p| {
                rotate_point(rotate_point(p, own_center, existing), pivot, delta)
            });
            line.rotation = 0.0;
        }
        Element::Path(path) => {
            for p in &mut path.points {
                *p = rotate_point(rotate_point(*p, own_center, existing), pivot, delta);
            }
            path.rotation = 0.0;
        }
        Element::Shape(shape) => {
            shape.translate(rotate_point(own_center, pivot, delta) - own_center);
            shape.set_rotation(existing + delta);
        }
        Element::Text(text) => {
            text.translate(rotate_point(own_center, pivot, delta) - own_center);
            text.set_rotation(existing + delta);
        }
    }
    element
}

/// A single-element rotation in progress. Snapping applies to the total
/// angle, so a snapped element lands on a multiple of the increment.
#[derive(Debug, Clone)]
pub struct RotationGesture {
    pub id: ElementId,
    pub center: Point,
    pub start_rotation: f64,
    pub start_pointer: Point,
    pub original: Element,
}

impl RotationGesture {
    pub fn begin(element: &Element, pointer: Point, layout: &TextLayout<'_>) -> Self {
        Self {
            id: element.id(),
            center: bounding_box(element, layout).center(),
            start_rotation: element.rotation(),
            start_pointer: pointer,
            original: element.clone(),
        }
    }

    /// Total rotation for the current pointer.
    pub fn angle(&self, pointer: Point, snap: bool, config: &GeometryConfig) -> f64 {
        rotation_angle(
            self.start_rotation,
            self.center,
            self.start_pointer,
            pointer,
            snap.then_some(config.rotation_snap_increment),
        )
    }

    pub fn update(
        &self,
        pointer: Point,
        snap: bool,
        config: &GeometryConfig,
        layout: &TextLayout<'_>,
    ) -> Element {
        let delta = self.angle(pointer, snap, config) - self.start_rotation;
        rotate_element(&self.original, self.center, delta, layout)
    }

    pub fn cancel(self) -> Element {
        self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Line, Path, Shape};
    use crate::text_metrics::ApproximateMeasurer;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_angle() {
        let center = Point::new(0.0, 0.0);
        let angle = rotation_angle(10.0, center, Point::new(10.0, 0.0), Point::new(0.0, 10.0), None);
        assert!((angle - 100.0).abs() < 1e-9);
        let snapped = rotation_angle(10.0, center, Point::new(10.0, 0.0), Point::new(10.0, 1.0), Some(15.0));
        assert!((snapped - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_rotation_updates_field() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let config = GeometryConfig::default();
        let shape: Element = Shape::rect(0.0, 0.0, 10.0, 10.0).into();
        // Pointer above center, then to the right: a quarter turn clockwise
        let gesture = RotationGesture::begin(&shape, Point::new(5.0, -10.0), &layout);
        match gesture.update(Point::new(20.0, 5.0), false, &config, &layout) {
            Element::Shape(s) => {
                assert!((s.rotation - 90.0).abs() < 1e-9);
                assert!((s.x).abs() < 1e-9 && (s.y).abs() < 1e-9);
            }
            _ => panic!("Expected Shape"),
        }
    }

    #[test]
    fn test_single_rotation_snaps_total() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let config = GeometryConfig::default();
        let shape: Element = Shape::rect(0.0, 0.0, 10.0, 10.0).with_rotation(7.0).into();
        let gesture = RotationGesture::begin(&shape, Point::new(20.0, 5.0), &layout);
        // Small drag: total of ~10 degrees snaps to 15
        let pointer = rotate_point(Point::new(20.0, 5.0), Point::new(5.0, 5.0), 3.0);
        match gesture.update(pointer, true, &config, &layout) {
            Element::Shape(s) => assert!((s.rotation - 15.0).abs() < 1e-9),
            _ => panic!("Expected Shape"),
        }
    }

    #[test]
    fn test_line_rotation_is_baked() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let line: Element = Line::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0)).into();
        match rotate_element(&line, Point::new(5.0, 5.0), 90.0, &layout) {
            Element::Line(l) => {
                assert_point_eq(l.start, Point::new(5.0, 0.0));
                assert_point_eq(l.end, Point::new(5.0, 10.0));
                assert!(l.rotation.abs() < f64::EPSILON);
            }
            _ => panic!("Expected Line"),
        }
    }

    #[test]
    fn test_existing_path_rotation_is_baked_first() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let mut path = Path::from_points(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        path.rotation = 90.0;
        let element: Element = path.into();
        match rotate_element(&element, Point::new(5.0, 0.0), 0.0, &layout) {
            Element::Path(p) => {
                assert_point_eq(p.points[0], Point::new(5.0, -5.0));
                assert_point_eq(p.points[1], Point::new(5.0, 5.0));
                assert!(p.rotation.abs() < f64::EPSILON);
            }
            _ => panic!("Expected Path"),
        }
    }
}
