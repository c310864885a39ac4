use std::f64::consts::TAU;

use crate::foundation::core::{Affine, Point, Size, Vec2};
use crate::foundation::error::{StickerError, StickerResult};

/// Edge length, in logical units, of the square an element is drawn into at `scale == 1`.
pub const ELEMENT_BASE_SIZE: f64 = 150.0;

/// Distance from the bottom edge at which newly added stickers are placed.
const ADD_OFFSET_FROM_BOTTOM: f64 = 200.0;

/// Unique identifier for a placed element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ElementId(uuid::Uuid);

impl ElementId {
    /// Create a new random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One overlay image placed on the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedElement {
    /// Stable id for the element's lifetime on the canvas.
    #[serde(default)]
    pub id: ElementId,
    /// Symbolic name of the overlay image.
    pub asset_ref: String,
    /// Center of the element in viewport logical coordinates.
    pub position: Point,
    /// Multiplier on [`ELEMENT_BASE_SIZE`]; always finite and `> 0`.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Rotation about the element center, applied after scaling. Not normalized.
    #[serde(default)]
    pub rotation_radians: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl PlacedElement {
    /// Create an element at `position` with scale 1 and no rotation.
    pub fn new(asset_ref: impl Into<String>, position: Point) -> StickerResult<Self> {
        let asset_ref = asset_ref.into();
        if asset_ref.trim().is_empty() {
            return Err(StickerError::validation("element asset_ref must be non-empty"));
        }
        Ok(Self {
            id: ElementId::new(),
            asset_ref,
            position,
            scale: 1.0,
            rotation_radians: 0.0,
        })
    }

    /// Check the element invariants.
    pub fn validate(&self) -> StickerResult<()> {
        validate_scale(self.scale)?;
        if !self.rotation_radians.is_finite() {
            return Err(StickerError::validation("element rotation must be finite"));
        }
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(StickerError::validation("element position must be finite"));
        }
        if self.asset_ref.trim().is_empty() {
            return Err(StickerError::validation("element asset_ref must be non-empty"));
        }
        Ok(())
    }

    /// Rotation folded into `[0, 2π)` for display.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation_radians.rem_euclid(TAU)
    }

    /// Map the element's local space (origin at its center, base-size units) into output pixels.
    ///
    /// Canonical order: `T(position * s) * R(rotation) * S(scale * s)`.
    pub fn local_to_output(&self, supersample: f64) -> Affine {
        let t_translate = Affine::translate(Vec2::new(
            self.position.x * supersample,
            self.position.y * supersample,
        ));
        let t_rotate = Affine::rotate(self.rotation_radians);
        let t_scale = Affine::scale(self.scale * supersample);
        t_translate * t_rotate * t_scale
    }
}

pub(crate) fn validate_scale(scale: f64) -> StickerResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(StickerError::validation(format!(
            "element scale must be finite and > 0, got {scale}"
        )));
    }
    Ok(())
}

/// Editable scene for one editing session: background plus ordered overlay elements.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// User-chosen background image name.
    #[serde(default)]
    pub background_asset: Option<String>,
    /// Theme default background, used when `background_asset` is absent or unresolvable.
    #[serde(default)]
    pub theme_background: Option<String>,
    /// Elements in z-order; later elements paint over earlier ones.
    #[serde(default)]
    pub elements: Vec<PlacedElement>,
    /// Currently selected element, if any. Never affects rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<ElementId>,
}

impl Canvas {
    /// Create an empty canvas with no background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty canvas that falls back to `theme_background`.
    pub fn with_theme_background(theme_background: impl Into<String>) -> Self {
        Self {
            theme_background: Some(theme_background.into()),
            ..Self::default()
        }
    }

    /// Check element invariants and selection consistency.
    pub fn validate(&self) -> StickerResult<()> {
        for el in &self.elements {
            el.validate()?;
        }
        for (i, el) in self.elements.iter().enumerate() {
            if self.elements[..i].iter().any(|e| e.id == el.id) {
                return Err(StickerError::validation(format!(
                    "duplicate element id {}",
                    el.id
                )));
            }
        }
        if let Some(sel) = self.selected
            && self.index_of(sel).is_none()
        {
            return Err(StickerError::validation(format!(
                "selected element {sel} is not on the canvas"
            )));
        }
        Ok(())
    }

    /// Append a new element at `position`, select it, and return its id.
    pub fn add_element(
        &mut self,
        asset_ref: impl Into<String>,
        position: Point,
    ) -> StickerResult<ElementId> {
        let el = PlacedElement::new(asset_ref, position)?;
        let id = el.id;
        self.elements.push(el);
        self.selected = Some(id);
        Ok(id)
    }

    /// Append a sticker at the default spot for `viewport`: horizontally centered, near the
    /// bottom but never above the vertical midpoint.
    pub fn add_sticker_default(
        &mut self,
        asset_ref: impl Into<String>,
        viewport: Size,
    ) -> StickerResult<ElementId> {
        if !viewport.is_positive() {
            return Err(StickerError::invalid_dimensions(
                "viewport must be positive to place a sticker",
            ));
        }
        let y = (viewport.height - ADD_OFFSET_FROM_BOTTOM).max(viewport.height * 0.5);
        self.add_element(asset_ref, Point::new(viewport.width * 0.5, y))
    }

    /// Look up an element by id.
    pub fn element(&self, id: ElementId) -> Option<&PlacedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> StickerResult<&mut PlacedElement> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StickerError::element_not_found(id.to_string()))
    }

    /// Move an element's center to `position`.
    pub fn move_element(&mut self, id: ElementId, position: Point) -> StickerResult<()> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(StickerError::validation("element position must be finite"));
        }
        self.element_mut(id)?.position = position;
        Ok(())
    }

    /// Set an element's scale; rejects non-positive values.
    pub fn set_scale(&mut self, id: ElementId, scale: f64) -> StickerResult<()> {
        validate_scale(scale)?;
        self.element_mut(id)?.scale = scale;
        Ok(())
    }

    /// Set an element's rotation in radians.
    pub fn set_rotation(&mut self, id: ElementId, radians: f64) -> StickerResult<()> {
        if !radians.is_finite() {
            return Err(StickerError::validation("element rotation must be finite"));
        }
        self.element_mut(id)?.rotation_radians = radians;
        Ok(())
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn remove_element(&mut self, id: ElementId) -> StickerResult<PlacedElement> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StickerError::element_not_found(id.to_string()))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.elements.remove(idx))
    }

    /// Remove the selected element, if any.
    pub fn remove_selected(&mut self) -> Option<PlacedElement> {
        let id = self.selected?;
        self.remove_element(id).ok()
    }

    /// Select an element by id.
    pub fn select(&mut self, id: ElementId) -> StickerResult<()> {
        if self.index_of(id).is_none() {
            return Err(StickerError::element_not_found(id.to_string()));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected element.
    pub fn selected_element(&self) -> Option<&PlacedElement> {
        self.selected.and_then(|id| self.element(id))
    }

    /// Replace the user background.
    pub fn set_background(&mut self, name: impl Into<String>) {
        self.background_asset = Some(name.into());
    }

    /// Drop the user background so the theme default shows again.
    pub fn clear_background(&mut self) {
        self.background_asset = None;
    }

    /// Background names to try, in fallback order.
    pub fn background_chain(&self) -> impl Iterator<Item = &str> {
        self.background_asset
            .as_deref()
            .into_iter()
            .chain(self.theme_background.as_deref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/canvas.rs"]
mod tests;
