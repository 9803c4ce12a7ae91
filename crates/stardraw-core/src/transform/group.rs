//! Resizing and rotating several elements as one.

use super::resize::{ResizeHandle, ResizeModifiers, apply_resize, calculate_resize_bounds};
use super::rotate::rotate_element;
use crate::config::GeometryConfig;
use crate::elements::{Element, ElementId};
use crate::geometry::{BoundingBox, angle_from_point, bounding_box, group_bounding_box};
use crate::snap::snap_angle;
use crate::text_metrics::TextLayout;
use kurbo::Point;

/// Pre-gesture snapshot of one member of a group resize.
#[derive(Debug, Clone)]
pub struct ResizeMember {
    pub id: ElementId,
    pub start_bounds: BoundingBox,
    pub original: Element,
}

/// A group resize in progress.
#[derive(Debug, Clone)]
pub struct GroupResizeState {
    /// Group bounds at gesture start (union of rotated extents).
    pub start_bounds: BoundingBox,
    pub members: Vec<ResizeMember>,
}

impl GroupResizeState {
    /// Snapshot `elements`. Returns `None` for an empty selection.
    pub fn begin<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
        layout: &TextLayout<'_>,
    ) -> Option<Self> {
        let members: Vec<ResizeMember> = elements
            .into_iter()
            .map(|e| ResizeMember {
                id: e.id(),
                start_bounds: bounding_box(e, layout),
                original: e.clone(),
            })
            .collect();
        let start_bounds = group_bounding_box(members.iter().map(|m| &m.original), layout)?;
        Some(Self {
            start_bounds,
            members,
        })
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Resize every member so the group fills `new_bounds`.
    ///
    /// Each member's offset from the group origin and its own size are scaled
    /// by the group factors, then applied to the member's original clone.
    pub fn resize_to(&self, new_bounds: &BoundingBox) -> Vec<Element> {
        let start = &self.start_bounds;
        let scale_x = if start.width.abs() < f64::EPSILON {
            1.0
        } else {
            new_bounds.width / start.width
        };
        let scale_y = if start.height.abs() < f64::EPSILON {
            1.0
        } else {
            new_bounds.height / start.height
        };

        self.members
            .iter()
            .map(|m| {
                let b = &m.start_bounds;
                let member_bounds = BoundingBox::new(
                    new_bounds.x + (b.x - start.x) * scale_x,
                    new_bounds.y + (b.y - start.y) * scale_y,
                    b.width * scale_x,
                    b.height * scale_y,
                );
                apply_resize(&m.original, b, &member_bounds)
            })
            .collect()
    }

    /// Resize for a handle drag of `delta` since the gesture started.
    /// The group box itself is never rotated.
    pub fn update(
        &self,
        handle: ResizeHandle,
        delta: kurbo::Vec2,
        modifiers: ResizeModifiers,
        config: &GeometryConfig,
    ) -> Vec<Element> {
        let bounds = calculate_resize_bounds(
            handle,
            &self.start_bounds,
            delta,
            0.0,
            modifiers,
            config.min_size,
        );
        self.resize_to(&bounds)
    }

    /// Consume the state, returning the untouched originals.
    pub fn cancel(self) -> Vec<Element> {
        self.members.into_iter().map(|m| m.original).collect()
    }
}

/// Pre-gesture snapshot of one member of a group rotation.
#[derive(Debug, Clone)]
pub struct RotationMember {
    pub id: ElementId,
    pub original: Element,
}

/// A group rotation in progress around the group's center.
#[derive(Debug, Clone)]
pub struct GroupRotationState {
    pub pivot: Point,
    pub start_pointer_angle: f64,
    pub members: Vec<RotationMember>,
}

impl GroupRotationState {
    /// Snapshot `elements` for a drag starting at `pointer`.
    pub fn begin<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
        pointer: Point,
        layout: &TextLayout<'_>,
    ) -> Option<Self> {
        let members: Vec<RotationMember> = elements
            .into_iter()
            .map(|e| RotationMember {
                id: e.id(),
                original: e.clone(),
            })
            .collect();
        let pivot = group_bounding_box(members.iter().map(|m| &m.original), layout)?.center();
        Some(Self {
            pivot,
            start_pointer_angle: angle_from_point(pointer, pivot),
            members,
        })
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Rotation delta for the current pointer. Snapping applies to the delta.
    pub fn delta(&self, pointer: Point, snap: bool, config: &GeometryConfig) -> f64 {
        let delta = angle_from_point(pointer, self.pivot) - self.start_pointer_angle;
        if snap {
            snap_angle(delta, config.rotation_snap_increment)
        } else {
            delta
        }
    }

    pub fn update(
        &self,
        pointer: Point,
        snap: bool,
        config: &GeometryConfig,
        layout: &TextLayout<'_>,
    ) -> Vec<Element> {
        self.rotate_by(self.delta(pointer, snap, config), layout)
    }

    /// Rotate every member's original by `delta` degrees around the pivot.
    pub fn rotate_by(&self, delta: f64, layout: &TextLayout<'_>) -> Vec<Element> {
        self.members
            .iter()
            .map(|m| rotate_element(&m.original, self.pivot, delta, layout))
            .collect()
    }

    pub fn cancel(self) -> Vec<Element> {
        self.members.into_iter().map(|m| m.original).collect()
    }
}
