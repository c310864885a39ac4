use crate::foundation::error::{StickerError, StickerResult};
use crate::scene::canvas::{Canvas, ElementId, validate_scale};

/// Accumulates simultaneous pinch and rotate gestures for one element.
///
/// Gesture recognizers report magnification and rotation relative to where the gesture began,
/// so the tracker captures the element's scale and rotation at `begin` and applies each update
/// on top of that base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureTracker {
    id: ElementId,
    base_scale: f64,
    base_rotation: f64,
}

impl GestureTracker {
    /// Start tracking a gesture on `id`.
    pub fn begin(canvas: &Canvas, id: ElementId) -> StickerResult<Self> {
        let el = canvas
            .element(id)
            .ok_or_else(|| StickerError::element_not_found(id.to_string()))?;
        Ok(Self {
            id,
            base_scale: el.scale,
            base_rotation: el.rotation_radians,
        })
    }

    /// Element being manipulated.
    pub fn element_id(&self) -> ElementId {
        self.id
    }

    /// Apply the cumulative gesture state: `scale = base * magnification`,
    /// `rotation = base + rotation_delta`.
    pub fn update(
        &self,
        canvas: &mut Canvas,
        magnification: f64,
        rotation_delta: f64,
    ) -> StickerResult<()> {
        if !magnification.is_finite() || magnification <= 0.0 {
            return Err(StickerError::validation(format!(
                "magnification must be finite and > 0, got {magnification}"
            )));
        }
        let scale = self.base_scale * magnification;
        validate_scale(scale)?;
        canvas.set_scale(self.id, scale)?;
        canvas.set_rotation(self.id, self.base_rotation + rotation_delta)
    }

    /// Finish the gesture, returning a tracker based on the committed values so a follow-up
    /// gesture continues from them.
    pub fn end(self, canvas: &Canvas) -> StickerResult<Self> {
        Self::begin(canvas, self.id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/editor.rs"]
mod tests;
