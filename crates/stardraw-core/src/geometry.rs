//! Bounding boxes, point rotation and curve conversion.

use crate::elements::Element;
use crate::text_metrics::TextLayout;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Tolerance used for inclusive containment checks.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Axis-aligned box in local (unrotated) element space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Tight box around a set of points in a single pass.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners clockwise from top-left: `[tl, tr, br, bl]`.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Point at a normalized position inside the box.
    pub fn point_at(&self, anchor: Point) -> Point {
        Point::new(self.x + anchor.x * self.width, self.y + anchor.y * self.height)
    }

    /// Grow the box by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x - GEOMETRY_EPSILON
            && point.x <= self.right() + GEOMETRY_EPSILON
            && point.y >= self.y - GEOMETRY_EPSILON
            && point.y <= self.bottom() + GEOMETRY_EPSILON
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// Rotate `point` around `center` by `degrees`.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Angle in degrees of `point` as seen from `center`.
pub fn angle_from_point(point: Point, center: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}

/// Corners of `bbox` rotated around its center, `[tl, tr, br, bl]`.
pub fn rotated_corners(bbox: &BoundingBox, degrees: f64) -> [Point; 4] {
    let corners = bbox.corners();
    if degrees == 0.0 {
        return corners;
    }
    let center = bbox.center();
    corners.map(|c| rotate_point(c, center, degrees))
}

/// Axis-aligned box around the rotated corners of `bbox`.
pub fn rotated_aabb(bbox: &BoundingBox, degrees: f64) -> BoundingBox {
    if degrees == 0.0 {
        return *bbox;
    }
    BoundingBox::from_points(rotated_corners(bbox, degrees)).unwrap_or(*bbox)
}

/// Local (unrotated) bounds of an element.
pub fn bounding_box(element: &Element, layout: &TextLayout<'_>) -> BoundingBox {
    match element {
        Element::Shape(shape) => shape.bounds(),
        Element::Line(line) => {
            BoundingBox::from_points(line.control_points()).unwrap_or_default()
        }
        Element::Path(path) => {
            BoundingBox::from_points(path.points.iter().copied()).unwrap_or_default()
        }
        Element::Text(text) => layout.text_bounds(text),
    }
}

/// Screen extent of an element including its rotation.
pub fn world_bounds(element: &Element, layout: &TextLayout<'_>) -> BoundingBox {
    rotated_aabb(&bounding_box(element, layout), element.rotation())
}

/// Union of the rotated extents of `elements`, or `None` when empty.
pub fn group_bounding_box<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    layout: &TextLayout<'_>,
) -> Option<BoundingBox> {
    elements
        .into_iter()
        .map(|e| world_bounds(e, layout))
        .reduce(|acc, b| acc.union(&b))
}

/// Smooth a freehand point list: quadratic segments controlled at each
/// interior vertex, ending at the midpoint to the next vertex.
pub fn path_to_curve(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(first);
    match rest {
        [] => path.line_to(first),
        [only] => path.line_to(*only),
        _ => {
            for pair in points[1..].windows(2) {
                path.quad_to(pair[0], pair[0].midpoint(pair[1]));
            }
            if let Some(&last) = points.last() {
                path.line_to(last);
            }
        }
    }
    path
}

/// SVG path data for a smoothed freehand stroke.
pub fn path_to_svg(points: &[Point]) -> String {
    path_to_curve(points).to_svg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Line, Path, Shape, Text};
    use crate::text_metrics::ApproximateMeasurer;
    use kurbo::PathEl;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(Point::new(10.0, 0.0), Point::ZERO, 90.0);
        assert_point_eq(p, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_unrotation_is_idempotent() {
        let center = Point::new(12.5, -3.0);
        for (i, angle) in [0.0, 17.0, 45.0, 90.0, 137.0, -210.0, 359.9].iter().enumerate() {
            let p = Point::new(i as f64 * 3.7 - 5.0, 40.0 - i as f64 * 1.3);
            let back = rotate_point(rotate_point(p, center, *angle), center, -angle);
            assert_point_eq(back, p);
        }
    }

    #[test]
    fn test_angle_from_point() {
        assert!((angle_from_point(Point::new(0.0, 5.0), Point::ZERO) - 90.0).abs() < EPS);
        assert!((angle_from_point(Point::new(-5.0, 0.0), Point::ZERO) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_rotated_corners_identity_at_zero() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rotated_corners(&bbox, 0.0), bbox.corners());
    }

    #[test]
    fn test_rotated_corners_square_45() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let corners = rotated_corners(&bbox, 45.0);
        let r = 2.0_f64.sqrt();
        assert_point_eq(corners[0], Point::new(1.0, 1.0 - r));
        assert_point_eq(corners[2], Point::new(1.0, 1.0 + r));
    }

    #[test]
    fn test_line_bbox_includes_midpoint() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .with_midpoint(Point::new(5.0, 8.0));
        let bbox = bounding_box(&Element::from(line), &layout);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 8.0));
    }

    #[test]
    fn test_path_bbox() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let path = Path::from_points(vec![
            Point::new(3.0, 4.0),
            Point::new(-1.0, 7.0),
            Point::new(5.0, 2.0),
        ]);
        let bbox = bounding_box(&Element::from(path), &layout);
        assert_eq!(bbox, BoundingBox::new(-1.0, 2.0, 6.0, 5.0));

        let empty = Path::from_points(Vec::new());
        assert_eq!(bounding_box(&Element::from(empty), &layout), BoundingBox::default());
    }

    #[test]
    fn test_large_path_bbox() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let points: Vec<Point> = (0..200_000)
            .map(|i| Point::new((i % 1000) as f64 * 0.1, (i / 1000) as f64 * 0.5))
            .collect();
        let bbox = bounding_box(&Element::from(Path::from_points(points)), &layout);
        assert!((bbox.width - 99.9).abs() < 1e-6);
        assert!((bbox.height - 99.5).abs() < 1e-6);
    }

    #[test]
    fn test_text_bbox_uses_layout() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let text = Text::new(Point::new(10.0, 10.0), "hi");
        let bbox = bounding_box(&Element::from(text.clone()), &layout);
        assert_eq!(bbox, layout.text_bounds(&text));
    }

    #[test]
    fn test_group_bbox_contains_rotated_corners() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let elements: Vec<Element> = vec![
            Shape::rect(10.0, 10.0, 20.0, 10.0).with_rotation(30.0).into(),
            Shape::ellipse(40.0, 5.0, 8.0, 16.0).with_rotation(137.0).into(),
            Line::new(Point::new(-5.0, 50.0), Point::new(5.0, 60.0)).into(),
            Text::new(Point::new(60.0, 60.0), "note").into(),
        ];
        let group = group_bounding_box(&elements, &layout).unwrap();
        for element in &elements {
            let bbox = bounding_box(element, &layout);
            for corner in rotated_corners(&bbox, element.rotation()) {
                assert!(group.contains(corner), "{corner:?} outside {group:?}");
            }
        }
    }

    #[test]
    fn test_group_bbox_empty() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        assert!(group_bounding_box(&Vec::<Element>::new(), &layout).is_none());
    }

    #[test]
    fn test_rotated_shape_extends_group_bounds() {
        let measurer = ApproximateMeasurer;
        let layout = TextLayout::new(&measurer);
        let shape: Element = Shape::rect(0.0, 0.0, 20.0, 2.0).with_rotation(90.0).into();
        let group = group_bounding_box([&shape], &layout).unwrap();
        assert!((group.width - 2.0).abs() < 1e-6);
        assert!((group.height - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_path_to_curve_segments() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let curve = path_to_curve(&points);
        let els: Vec<PathEl> = curve.elements().to_vec();
        assert_eq!(els.len(), 4);
        match els[1] {
            PathEl::QuadTo(ctrl, end) => {
                assert_eq!(ctrl, Point::new(10.0, 0.0));
                assert_eq!(end, Point::new(10.0, 5.0));
            }
            _ => panic!("Expected QuadTo"),
        }
        match els[3] {
            PathEl::LineTo(end) => assert_eq!(end, Point::new(0.0, 10.0)),
            _ => panic!("Expected LineTo"),
        }
    }

    #[test]
    fn test_path_to_curve_short_inputs() {
        assert!(path_to_curve(&[]).elements().is_empty());
        assert_eq!(path_to_curve(&[Point::new(1.0, 1.0)]).elements().len(), 2);
        assert!(path_to_svg(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).starts_with('M'));
    }

    #[test]
    fn test_bbox_union_and_expand() {
        let a = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let b = BoundingBox::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, -1.0, 6.0, 3.0));
        assert_eq!(a.expand(1.0), BoundingBox::new(-1.0, -1.0, 4.0, 4.0));
        assert!(a.contains(Point::new(2.0, 2.0)));
        assert!(!a.contains(Point::new(2.1, 2.0)));
    }
}
