use tracing::{debug, warn};

use crate::scene::catalog::{AnchorMode, OverlayCategory, OverlayDef, OverlayId};
use crate::transform::model::{
    IDENTITY_OPACITY, ScaleRange, Transform, TransformOverrides, TransformPatch, compose,
};

/// An overlay placed in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Overlay reference; unique within a store.
    pub id: OverlayId,
    /// Current placement.
    pub transform: Transform,
    /// Manual placement anchor.
    pub anchor_mode: AnchorMode,
    /// Category, when the layer came from a catalog definition.
    pub category: Option<OverlayCategory>,
    default_scale: f64,
}

impl Layer {
    /// Scale restored by a reset.
    pub fn default_scale(&self) -> f64 {
        self.default_scale
    }
}

/// Ordered set of layers with at most one active layer.
///
/// Insertion order is compositing order. Every mutation clamps scale and opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStore {
    layers: Vec<Layer>,
    active: Option<OverlayId>,
    overrides: TransformOverrides,
    scale_range: ScaleRange,
    default_opacity: f64,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(ScaleRange::default(), IDENTITY_OPACITY)
    }
}

impl LayerStore {
    /// Empty store.
    pub fn new(scale_range: ScaleRange, default_opacity: f64) -> Self {
        let scale_range = if scale_range.is_valid() {
            scale_range
        } else {
            warn!(
                min = scale_range.min,
                max = scale_range.max,
                "invalid scale range, using default"
            );
            ScaleRange::default()
        };
        Self {
            layers: Vec::new(),
            active: None,
            overrides: TransformOverrides::default(),
            scale_range,
            default_opacity,
        }
    }

    /// Scale bounds enforced by this store.
    pub fn scale_range(&self) -> ScaleRange {
        self.scale_range
    }

    fn initial_transform(&self, default_scale: f64) -> Transform {
        Transform {
            opacity: self.default_opacity,
            ..Transform::with_scale(default_scale, self.scale_range)
        }
        .clamped(self.scale_range)
    }

    fn insert(&mut self, layer: Layer) -> bool {
        let id = layer.id.clone();
        let added = if self.contains(&id) {
            false
        } else {
            debug!(id = %id, "layer added");
            self.layers.push(layer);
            true
        };
        self.active = Some(id);
        added
    }

    /// Add a bare layer with scale 1 and make it active.
    ///
    /// Adding an id that is already present keeps the existing layer and only activates it.
    /// Returns `true` when a layer was created.
    pub fn add_layer(&mut self, id: impl Into<OverlayId>) -> bool {
        let layer = Layer {
            id: id.into(),
            transform: self.initial_transform(1.0),
            anchor_mode: AnchorMode::default(),
            category: None,
            default_scale: 1.0,
        };
        self.insert(layer)
    }

    /// Add a layer for a catalog definition, starting at its default scale.
    pub fn add_overlay(&mut self, def: &OverlayDef) -> bool {
        let default_scale = self.scale_range.clamp(def.default_scale);
        let layer = Layer {
            id: def.id.clone(),
            transform: self.initial_transform(default_scale),
            anchor_mode: def.anchor_mode,
            category: Some(def.category),
            default_scale,
        };
        self.insert(layer)
    }

    /// Remove a layer. Removing the active layer leaves no active layer.
    pub fn remove_layer(&mut self, id: &OverlayId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| &l.id != id);
        let removed = self.layers.len() != before;
        if removed {
            debug!(id = %id, "layer removed");
            if self.active.as_ref() == Some(id) {
                self.active = None;
            }
        }
        removed
    }

    /// Select the active layer, or clear the selection with `None`.
    ///
    /// Unknown ids are rejected and leave the selection unchanged.
    pub fn set_active_layer(&mut self, id: Option<&OverlayId>) -> bool {
        match id {
            None => {
                self.active = None;
                true
            }
            Some(id) if self.contains(id) => {
                self.active = Some(id.clone());
                true
            }
            Some(_) => false,
        }
    }

    /// Apply a partial transform to one layer. Unspecified fields stay unchanged.
    pub fn update_layer(&mut self, id: &OverlayId, patch: &TransformPatch) -> bool {
        let range = self.scale_range;
        match self.layers.iter_mut().find(|l| &l.id == id) {
            Some(layer) => {
                layer.transform = layer.transform.apply_patch(patch, range);
                true
            }
            None => false,
        }
    }

    /// Apply a partial transform to the active layer, if any.
    pub fn update_active(&mut self, patch: &TransformPatch) -> bool {
        match self.active.clone() {
            Some(id) => self.update_layer(&id, patch),
            None => false,
        }
    }

    /// Restore the active layer to its initial placement.
    pub fn reset_active_layer(&mut self) -> bool {
        let Some(id) = self.active.clone() else {
            return false;
        };
        let Some(idx) = self.layers.iter().position(|l| l.id == id) else {
            return false;
        };
        let t = self.initial_transform(self.layers[idx].default_scale);
        self.layers[idx].transform = t;
        true
    }

    /// Remove every layer and clear the selection.
    pub fn clear_all_layers(&mut self) {
        if !self.layers.is_empty() {
            debug!(count = self.layers.len(), "layers cleared");
        }
        self.layers.clear();
        self.active = None;
    }

    /// Set caller-controlled fields for the active layer; they win over tracked values when
    /// resolving transforms.
    pub fn set_overrides(&mut self, overrides: TransformOverrides) {
        self.overrides = overrides;
    }

    /// Currently controlled fields.
    pub fn overrides(&self) -> &TransformOverrides {
        &self.overrides
    }

    /// Transform used for drawing: controlled fields applied to the active layer.
    pub fn resolved_transform(&self, layer: &Layer) -> Transform {
        if self.active.as_ref() == Some(&layer.id) && !self.overrides.is_empty() {
            compose(layer.transform, &self.overrides, self.scale_range)
        } else {
            layer.transform
        }
    }

    /// Active layer id.
    pub fn active_layer_id(&self) -> Option<&OverlayId> {
        self.active.as_ref()
    }

    /// Active layer.
    pub fn active_layer(&self) -> Option<&Layer> {
        let id = self.active.as_ref()?;
        self.layer(id)
    }

    /// Look up a layer.
    pub fn layer(&self, id: &OverlayId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// Return `true` when `id` is placed.
    pub fn contains(&self, id: &OverlayId) -> bool {
        self.layers.iter().any(|l| &l.id == id)
    }

    /// Layers in compositing order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when no layer is placed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layers.rs"]
mod tests;
