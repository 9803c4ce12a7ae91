//! stardraw core library
//!
//! Geometry and transform engine for the stardraw canvas: bounding boxes,
//! rotation-aware hit-testing, snapping with shape bindings, resize/rotate
//! gestures and the element arena that drives them.
//!
//! All coordinates live in a normalized 0–100 space. Rotations are in degrees.

pub mod config;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod import;
pub mod scene;
pub mod snap;
pub mod text_metrics;
pub mod transform;

pub use config::GeometryConfig;
pub use elements::{
    Arrowhead, Binding, DashPreset, Element, ElementId, ElementStyle, ElementTrait, FontFamily,
    FontSizePreset, Layer, Line, LineKind, Path, PathKind, Shape, ShapeKind, Text, TextAlign,
};
pub use error::{ConfigError, ImportError};
pub use geometry::{
    BoundingBox, bounding_box, group_bounding_box, rotate_point, rotated_aabb, rotated_corners,
    world_bounds,
};
pub use hit_test::{elements_at_point, hit_test_element, topmost_element_at_point};
pub use import::{parse_rotation_transform, rotation_transform};
pub use scene::Scene;
pub use snap::{SnapResult, capture_binding, find_snap_point, resolve_binding_point, snap_angle};
pub use text_metrics::{ApproximateMeasurer, CachedMeasurer, MeasuredBounds, TextLayout, TextMeasurer};
pub use transform::{
    GroupResizeState, GroupRotationState, Handle, HandleKind, ResizeGesture, ResizeHandle,
    ResizeModifiers, RotationGesture, apply_resize, calculate_resize_bounds, element_handles,
    hit_test_handles, rotate_element, rotation_angle,
};
