//! Rotation-aware resizing of a single box.

use crate::config::GeometryConfig;
use crate::elements::Element;
use crate::geometry::{BoundingBox, bounding_box, rotate_point};
use crate::text_metrics::TextLayout;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// One of the eight compass resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
        ResizeHandle::NW,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "n" => Some(ResizeHandle::N),
            "ne" => Some(ResizeHandle::NE),
            "e" => Some(ResizeHandle::E),
            "se" => Some(ResizeHandle::SE),
            "s" => Some(ResizeHandle::S),
            "sw" => Some(ResizeHandle::SW),
            "w" => Some(ResizeHandle::W),
            "nw" => Some(ResizeHandle::NW),
            _ => None,
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    /// Single-axis handle (n/e/s/w).
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            ResizeHandle::N | ResizeHandle::E | ResizeHandle::S | ResizeHandle::W
        )
    }

    pub fn is_corner(self) -> bool {
        !self.is_edge()
    }

    pub fn opposite(self) -> Self {
        match self {
            ResizeHandle::N => ResizeHandle::S,
            ResizeHandle::NE => ResizeHandle::SW,
            ResizeHandle::E => ResizeHandle::W,
            ResizeHandle::SE => ResizeHandle::NW,
            ResizeHandle::S => ResizeHandle::N,
            ResizeHandle::SW => ResizeHandle::NE,
            ResizeHandle::W => ResizeHandle::E,
            ResizeHandle::NW => ResizeHandle::SE,
        }
    }

    /// Normalized position of the handle on its box.
    pub fn anchor(self) -> Point {
        let x = if self.moves_left() {
            0.0
        } else if self.moves_right() {
            1.0
        } else {
            0.5
        };
        let y = if self.moves_top() {
            0.0
        } else if self.moves_bottom() {
            1.0
        } else {
            0.5
        };
        Point::new(x, y)
    }

    /// Normalized point that stays put in world space while this handle is
    /// dragged: the opposite corner, or for edge handles a corner on the
    /// fixed edge. When aspect lock centres the perpendicular axis, that
    /// axis uses the edge's midpoint.
    pub fn fixed_anchor(self, keep_aspect_ratio: bool) -> Point {
        let opposite = self.opposite().anchor();
        if self.is_corner() || keep_aspect_ratio {
            return opposite;
        }
        Point::new(
            if opposite.x == 0.5 { 0.0 } else { opposite.x },
            if opposite.y == 0.5 { 0.0 } else { opposite.y },
        )
    }
}

/// Modifier keys held during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeModifiers {
    pub keep_aspect_ratio: bool,
    pub from_center: bool,
}

impl ResizeModifiers {
    pub fn aspect() -> Self {
        Self {
            keep_aspect_ratio: true,
            from_center: false,
        }
    }

    pub fn centered() -> Self {
        Self {
            keep_aspect_ratio: false,
            from_center: true,
        }
    }
}

/// Compute the new local bounds for a handle drag.
///
/// `delta` is the screen-space pointer delta since the gesture started and
/// `rotation` the element's rotation in degrees. The returned box keeps the
/// handle's fixed anchor at the same world position.
pub fn calculate_resize_bounds(
    handle: ResizeHandle,
    start: &BoundingBox,
    delta: Vec2,
    rotation: f64,
    modifiers: ResizeModifiers,
    min_size: f64,
) -> BoundingBox {
    let local = rotate_point(delta.to_point(), Point::ZERO, -rotation).to_vec2();
    let start_center = start.center();

    let mut left = start.x;
    let mut top = start.y;
    let mut right = start.right();
    let mut bottom = start.bottom();
    if handle.moves_left() {
        left += local.x;
    }
    if handle.moves_right() {
        right += local.x;
    }
    if handle.moves_top() {
        top += local.y;
    }
    if handle.moves_bottom() {
        bottom += local.y;
    }

    let lock = modifiers.keep_aspect_ratio
        && start.width.abs() > f64::EPSILON
        && start.height.abs() > f64::EPSILON;
    let mut width = right - left;
    let mut height = bottom - top;

    if lock {
        let ratio = start.width / start.height;
        match handle {
            ResizeHandle::N | ResizeHandle::S => {
                width = height * ratio;
                left = start_center.x - width / 2.0;
            }
            ResizeHandle::E | ResizeHandle::W => {
                height = width / ratio;
                top = start_center.y - height / 2.0;
            }
            _ => {
                let scale_x = width / start.width;
                let scale_y = height / start.height;
                if (scale_x - 1.0).abs() >= (scale_y - 1.0).abs() {
                    height = width / ratio;
                } else {
                    width = height * ratio;
                }
                if handle.moves_left() {
                    left = right - width;
                }
                if handle.moves_top() {
                    top = bottom - height;
                }
            }
        }
    }

    let affects_x = handle.moves_left() || handle.moves_right() || lock;
    let affects_y = handle.moves_top() || handle.moves_bottom() || lock;

    if modifiers.from_center {
        if affects_x {
            width = width.max(min_size);
        }
        if affects_y {
            height = height.max(min_size);
        }
        return BoundingBox::new(
            start_center.x - width / 2.0,
            start_center.y - height / 2.0,
            width,
            height,
        );
    }

    // Clamp, keeping the edge opposite the handle where it was
    if affects_x && width < min_size {
        width = min_size;
        if handle.moves_left() {
            left = right - width;
        } else if !handle.moves_right() {
            left = start_center.x - width / 2.0;
        }
    }
    if affects_y && height < min_size {
        height = min_size;
        if handle.moves_top() {
            top = bottom - height;
        } else if !handle.moves_bottom() {
            top = start_center.y - height / 2.0;
        }
    }

    let mut bounds = BoundingBox::new(left, top, width, height);

    if rotation != 0.0 {
        let anchor = handle.fixed_anchor(lock);
        let before = rotate_point(start.point_at(anchor), start_center, rotation);
        let after = rotate_point(bounds.point_at(anchor), bounds.center(), rotation);
        bounds.x += before.x - after.x;
        bounds.y += before.y - after.y;
    }

    bounds
}

/// Fit `original` into `new_bounds`, given its bounds before the gesture.
///
/// Lines and paths keep every point at the same relative position inside the
/// box. Text scales its font size by the geometric mean of the two scale
/// factors, starting from the original's size.
pub fn apply_resize(original: &Element, old_bounds: &BoundingBox, new_bounds: &BoundingBox) -> Element {
    let scale_x = if old_bounds.width.abs() < f64::EPSILON {
        1.0
    } else {
        new_bounds.width / old_bounds.width
    };
    let scale_y = if old_bounds.height.abs() < f64::EPSILON {
        1.0
    } else {
        new_bounds.height / old_bounds.height
    };
    let remap = |p: Point| {
        Point::new(
            new_bounds.x + (p.x - old_bounds.x) * scale_x,
            new_bounds.y + (p.y - old_bounds.y) * scale_y,
        )
    };

    let mut element = original.clone();
    match &mut element {
        Element::Shape(shape) => shape.set_bounds(*new_bounds),
        Element::Text(text) => {
            text.font_size *= (scale_x * scale_y).abs().sqrt();
            text.wrap_width = text.wrap_width.map(|w| w * scale_x);
            text.position = Point::new(
                new_bounds.x + new_bounds.width * text.text_align.anchor_fraction(),
                new_bounds.y,
            );
        }
        Element::Line(line) => line.map_points(remap),
        Element::Path(path) => {
            for p in &mut path.points {
                *p = remap(*p);
            }
        }
    }
    element
}

/// A single-element resize in progress.
///
/// Holds the pre-gesture element so every pointer move recomputes from the
/// same basis.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    pub handle: ResizeHandle,
    pub start_bounds: BoundingBox,
    pub rotation: f64,
    pub original: Element,
}

impl ResizeGesture {
    pub fn begin(element: &Element, handle: ResizeHandle, layout: &TextLayout<'_>) -> Self {
        Self {
            handle,
            start_bounds: bounding_box(element, layout),
            rotation: element.rotation(),
            original: element.clone(),
        }
    }

    /// Bounds for the pointer delta since the gesture started.
    pub fn bounds(&self, delta: Vec2, modifiers: ResizeModifiers, config: &GeometryConfig) -> BoundingBox {
        calculate_resize_bounds(
            self.handle,
            &self.start_bounds,
            delta,
            self.rotation,
            modifiers,
            config.min_size,
        )
    }

    /// The resized element for the pointer delta since the gesture started.
    pub fn update(&self, delta: Vec2, modifiers: ResizeModifiers, config: &GeometryConfig) -> Element {
        let bounds = self.bounds(delta, modifiers, config);
        apply_resize(&self.original, &self.start_bounds, &bounds)
    }

    /// The element as it was before the gesture.
    pub fn cancel(self) -> Element {
        self.original
    }
}
