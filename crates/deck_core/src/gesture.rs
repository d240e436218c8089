//! Drag and button input to discrete decisions.

use shared::domain::{Decision, ItemId, SwipeDirection};

/// Horizontal distance a card must travel before a release counts as a swipe.
pub const SWIPE_THRESHOLD_PX: f32 = 100.0;

/// Offset the presentation layer jumps a card to when a button decides it.
pub const BUTTON_EXIT_OFFSET_PX: f32 = 100.0;

/// Strictly beyond `threshold` in either direction decides; anything else
/// (including a non-finite offset) snaps back.
pub fn interpret_release(dx: f32, threshold: f32) -> Decision {
    if dx.abs() > threshold {
        if dx > 0.0 {
            Decision::Like
        } else {
            Decision::Dislike
        }
    } else {
        Decision::Cancel
    }
}

pub fn button_exit_offset(direction: SwipeDirection) -> f32 {
    match direction {
        SwipeDirection::Right => BUTTON_EXIT_OFFSET_PX,
        SwipeDirection::Left => -BUTTON_EXIT_OFFSET_PX,
    }
}

/// Debounce for the one gesture allowed in flight against the current card.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f32,
    drag_target: Option<ItemId>,
}

impl GestureTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            drag_target: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_target.is_some()
    }

    /// Returns `false` when a drag is already in flight.
    pub fn begin_drag(&mut self, target: &ItemId) -> bool {
        if self.drag_target.is_some() {
            return false;
        }
        self.drag_target = Some(target.clone());
        true
    }

    /// Clears the in-flight flag and yields the decision together with the
    /// card the drag started on, if a drag was in flight.
    pub fn release(&mut self, dx: f32) -> (Decision, Option<ItemId>) {
        let target = self.drag_target.take();
        (interpret_release(dx, self.threshold), target)
    }

    /// Buttons always decide, but not while a drag owns the card.
    pub fn press(&self, direction: SwipeDirection) -> Option<Decision> {
        if self.is_dragging() {
            None
        } else {
            Some(Decision::from(direction))
        }
    }

    pub fn reset(&mut self) {
        self.drag_target = None;
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD_PX)
    }
}
