//! Resize and rotation of single elements and groups.

mod group;
mod handles;
mod resize;
mod rotate;

pub use group::{GroupResizeState, GroupRotationState, ResizeMember, RotationMember};
pub use handles::{Handle, HandleKind, box_handles, element_handles, hit_test_handles};
pub use resize::{ResizeGesture, ResizeHandle, ResizeModifiers, apply_resize, calculate_resize_bounds};
pub use rotate::{RotationGesture, rotate_element, rotation_angle};
