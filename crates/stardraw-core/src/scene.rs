//! Element arena with paint order.

use crate::config::GeometryConfig;
use crate::elements::{Binding, Element, ElementId, Layer};
use crate::error::ImportResult;
use crate::geometry::{BoundingBox, group_bounding_box};
use crate::hit_test;
use crate::import;
use crate::snap::{self, SnapResult};
use crate::text_metrics::TextLayout;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of undo steps to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Persisted form: elements in paint order.
#[derive(Serialize, Deserialize)]
struct SceneFile {
    elements: Vec<Element>,
}

/// Element state captured for undo/redo.
#[derive(Debug, Clone)]
struct SceneSnapshot {
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
}

/// All elements of a drawing, keyed by id.
///
/// Gestures work on clones and commit by replacing entries. Every mutating
/// command records an undo step first; binding refresh does not.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: HashMap<ElementId, Element>,
    /// Insertion/z-order (back to front) across all layers.
    z_order: Vec<ElementId>,
    /// Selected element ids, in selection order.
    selection: Vec<ElementId>,
    undo_stack: Vec<SceneSnapshot>,
    redo_stack: Vec<SceneSnapshot>,
}

/// Scenes compare by content and selection; history is ignored.
impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
            && self.z_order == other.z_order
            && self.selection == other.selection
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element on top of its layer. An element with an existing id
    /// replaces the old one in place.
    pub fn add(&mut self, element: impl Into<Element>) -> ElementId {
        self.push_undo();
        self.insert(element.into())
    }

    fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id();
        if self.elements.insert(id, element).is_none() {
            self.z_order.push(id);
        }
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        if !self.contains(id) {
            return None;
        }
        self.push_undo();
        self.z_order.retain(|&other| other != id);
        self.selection.retain(|&other| other != id);
        self.elements.remove(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn elements(&self) -> &HashMap<ElementId, Element> {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Replace an existing element with a new version.
    ///
    /// Returns the previous version, or `None` (and stores nothing) when the
    /// id is unknown.
    pub fn replace(&mut self, element: Element) -> Option<Element> {
        if !self.contains(element.id()) {
            return None;
        }
        self.push_undo();
        self.swap_in(element)
    }

    fn swap_in(&mut self, element: Element) -> Option<Element> {
        let slot = self.elements.get_mut(&element.id())?;
        Some(std::mem::replace(slot, element))
    }

    /// Replace many elements at once, e.g. the result of a group gesture.
    /// The whole batch is a single undo step.
    pub fn commit(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.push_undo();
        for element in elements {
            if self.swap_in(element).is_none() {
                log::debug!("commit skipped an element that is no longer in the scene");
            }
        }
    }

    /// Elements in paint order: background, default, foreground; z-order
    /// within each layer.
    pub fn ordered(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self
            .z_order
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect();
        ordered.sort_by_key(|e| e.layer());
        ordered
    }

    pub fn bring_to_front(&mut self, id: ElementId) {
        if self.contains(id) {
            self.push_undo();
            self.z_order.retain(|&other| other != id);
            self.z_order.push(id);
        }
    }

    pub fn send_to_back(&mut self, id: ElementId) {
        if self.contains(id) {
            self.push_undo();
            self.z_order.retain(|&other| other != id);
            self.z_order.insert(0, id);
        }
    }

    /// Remove every element, or only those on `layer`.
    pub fn clear(&mut self, layer: Option<Layer>) {
        self.push_undo();
        match layer {
            None => {
                self.elements.clear();
                self.z_order.clear();
            }
            Some(layer) => {
                self.elements.retain(|_, e| e.layer() != layer);
                let elements = &self.elements;
                self.z_order.retain(|id| elements.contains_key(id));
            }
        }
        self.prune_selection();
    }

    /// Move elements by `delta`.
    pub fn translate(&mut self, ids: &[ElementId], delta: Vec2) {
        if !ids.iter().any(|id| self.contains(*id)) {
            return;
        }
        self.push_undo();
        for id in ids {
            if let Some(element) = self.elements.get_mut(id) {
                element.translate(delta);
            }
        }
    }

    /// Copy elements with fresh ids, shifted by `offset`.
    ///
    /// Bindings between copied elements follow the copies; bindings to
    /// anything outside the copy are dropped. Returns the new ids in
    /// z-order.
    pub fn duplicate(&mut self, ids: &[ElementId], offset: Vec2) -> Vec<ElementId> {
        let sources: Vec<Element> = self
            .z_order
            .iter()
            .filter(|id| ids.contains(id))
            .filter_map(|id| self.elements.get(id).cloned())
            .collect();

        let mut id_map = HashMap::new();
        let mut copies = Vec::with_capacity(sources.len());
        for mut copy in sources {
            let old_id = copy.id();
            copy.regenerate_id();
            copy.translate(offset);
            id_map.insert(old_id, copy.id());
            copies.push(copy);
        }

        for copy in &mut copies {
            if let Some(line) = copy.as_line_mut() {
                for binding in [&mut line.start_binding, &mut line.end_binding] {
                    *binding = binding.and_then(|mut b| {
                        let new_target = id_map.get(&b.element_id)?;
                        b.element_id = *new_target;
                        Some(b)
                    });
                }
            }
        }

        if copies.is_empty() {
            return Vec::new();
        }
        self.push_undo();
        copies.into_iter().map(|copy| self.insert(copy)).collect()
    }

    /// Duplicate the selection by the configured offset and select the
    /// copies.
    pub fn duplicate_selected(&mut self, config: &GeometryConfig) -> Vec<ElementId> {
        let offset = Vec2::new(config.duplicate_offset, config.duplicate_offset);
        let selection = self.selection.clone();
        let copies = self.duplicate(&selection, offset);
        if !copies.is_empty() {
            self.selection = copies.clone();
        }
        copies
    }

    // --- Selection ---

    /// Select `id`, adding to the selection when `additive`.
    pub fn select(&mut self, id: ElementId, additive: bool) {
        if !self.contains(id) {
            return;
        }
        if !additive {
            self.selection.clear();
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Select the topmost element under `point` using the configured hit
    /// tolerance. A miss clears the selection unless `additive`.
    pub fn select_at(
        &mut self,
        point: Point,
        additive: bool,
        layout: &TextLayout<'_>,
        config: &GeometryConfig,
    ) -> Option<ElementId> {
        let hit = self.topmost_element_at_point(point, config.hit_tolerance, layout, config);
        match hit {
            Some(id) => self.select(id, additive),
            None if !additive => self.selection.clear(),
            None => {}
        }
        hit
    }

    /// Replace the selection; unknown ids are ignored.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        self.selection.clear();
        for &id in ids {
            if self.contains(id) && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Select every element in paint order.
    pub fn select_all(&mut self) {
        self.selection = self.ordered().iter().map(|e| e.id()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selection
    }

    /// Remove the selected elements as one undo step and return them.
    pub fn delete_selected(&mut self) -> Vec<Element> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.push_undo();
        let ids: Vec<ElementId> = self.selection.drain(..).collect();
        self.z_order.retain(|id| !ids.contains(id));
        ids.iter()
            .filter_map(|id| self.elements.remove(id))
            .collect()
    }

    /// Whether the selection is non-empty and holds only lines.
    pub fn selected_is_line(&self) -> bool {
        self.selection_all(|e| matches!(e, Element::Line(_)))
    }

    /// Whether the selection is non-empty and holds only text.
    pub fn selected_is_text(&self) -> bool {
        self.selection_all(|e| matches!(e, Element::Text(_)))
    }

    fn selection_all(&self, pred: impl Fn(&Element) -> bool) -> bool {
        !self.selection.is_empty()
            && self
                .selection
                .iter()
                .filter_map(|id| self.elements.get(id))
                .all(pred)
    }

    fn prune_selection(&mut self) {
        let elements = &self.elements;
        self.selection.retain(|id| elements.contains_key(id));
    }

    // --- Undo/Redo ---

    fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            elements: self.elements.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: SceneSnapshot) {
        self.elements = snapshot.elements;
        self.z_order = snapshot.z_order;
        self.prune_selection();
    }

    /// Record the current state as an undo step and clear the redo stack.
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Restore the previous state. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.restore(previous);
        true
    }

    /// Re-apply the last undone step. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        self.restore(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn elements_at_point(
        &self,
        point: Point,
        tolerance: f64,
        layout: &TextLayout<'_>,
        config: &GeometryConfig,
    ) -> Vec<ElementId> {
        hit_test::elements_at_point(self.ordered(), point, tolerance, layout, config)
    }

    pub fn topmost_element_at_point(
        &self,
        point: Point,
        tolerance: f64,
        layout: &TextLayout<'_>,
        config: &GeometryConfig,
    ) -> Option<ElementId> {
        hit_test::topmost_element_at_point(self.ordered(), point, tolerance, layout, config)
    }

    /// Snap search over the scene in paint order.
    pub fn find_snap_point(
        &self,
        point: Point,
        threshold: f64,
        exclude: Option<ElementId>,
    ) -> Option<SnapResult> {
        snap::find_snap_point(point, self.ordered(), threshold, exclude)
    }

    /// Move bound line endpoints onto their targets' current anchors.
    ///
    /// Bindings whose target is gone are dropped. Returns the number of
    /// dropped bindings.
    pub fn refresh_bindings(&mut self, layout: &TextLayout<'_>) -> usize {
        let mut updates = Vec::new();
        for (id, element) in &self.elements {
            let Some(line) = element.as_line() else {
                continue;
            };
            if !line.is_bound() {
                continue;
            }
            let resolve = |binding: Option<Binding>| {
                binding.map(|b| snap::resolve_binding_point(&b, &self.elements, layout))
            };
            updates.push((*id, resolve(line.start_binding), resolve(line.end_binding)));
        }

        let mut dropped = 0;
        for (id, start, end) in updates {
            let Some(line) = self.elements.get_mut(&id).and_then(Element::as_line_mut) else {
                continue;
            };
            match start {
                Some(Some(p)) => line.start = p,
                Some(None) => {
                    log::debug!("dropping broken start binding on {}", id);
                    line.start_binding = None;
                    dropped += 1;
                }
                None => {}
            }
            match end {
                Some(Some(p)) => line.end = p,
                Some(None) => {
                    log::debug!("dropping broken end binding on {}", id);
                    line.end_binding = None;
                    dropped += 1;
                }
                None => {}
            }
        }
        dropped
    }

    /// Bounds of the given elements including rotation.
    pub fn group_bounds(&self, ids: &[ElementId], layout: &TextLayout<'_>) -> Option<BoundingBox> {
        group_bounding_box(ids.iter().filter_map(|id| self.elements.get(id)), layout)
    }

    /// Serialize to JSON, elements in paint order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let file = SceneFile {
            elements: self.ordered().into_iter().cloned().collect(),
        };
        serde_json::to_string_pretty(&file)
    }

    /// Strict deserialization of [`Scene::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: SceneFile = serde_json::from_str(json)?;
        Ok(Self::from_elements(file.elements))
    }

    /// Tolerant import: malformed elements are skipped.
    pub fn import_json(json: &str) -> ImportResult<Self> {
        Ok(Self::from_elements(import::parse_elements(json)?))
    }

    /// Build a scene with an empty history.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut scene = Self::new();
        for element in elements {
            scene.insert(element);
        }
        scene
    }
}
