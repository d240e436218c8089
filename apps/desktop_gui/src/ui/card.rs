//! Card motion: drag offset to rotation/opacity, and the exit slide that plays
//! after a decision has already been committed.

use std::time::{Duration, Instant};

use shared::domain::{Decision, ItemId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub rotation_deg: f32,
    pub opacity: f32,
}

/// Piecewise-linear map through `(-x, lo) (0, mid) (x, hi)`, clamped at both ends.
fn interpolate(value: f32, extent: f32, low: f32, mid: f32, high: f32) -> f32 {
    if !value.is_finite() {
        return mid;
    }
    let t = (value / extent).clamp(-1.0, 1.0);
    if t < 0.0 {
        mid + (mid - low) * t
    } else {
        mid + (high - mid) * t
    }
}

pub fn card_transform(dx: f32) -> CardTransform {
    CardTransform {
        rotation_deg: interpolate(dx, 200.0, -10.0, 0.0, 10.0),
        opacity: interpolate(dx, 150.0, 0.0, 1.0, 0.0),
    }
}

/// Horizontal drag state of the card on top of the deck. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragOffset {
    pub dx: f32,
}

impl DragOffset {
    pub fn accumulate(&mut self, delta: f32) {
        self.dx += delta;
    }

    pub fn snap_back(&mut self) {
        self.dx = 0.0;
    }
}

/// A decided card sliding off screen. Dropping it never affects the deck.
#[derive(Debug, Clone)]
pub struct ExitAnimation {
    pub item_id: ItemId,
    pub from_dx: f32,
    pub direction: f32,
    started_at: Instant,
    duration: Duration,
}

const EXIT_TRAVEL_PX: f32 = 400.0;

impl ExitAnimation {
    pub fn start(
        item_id: ItemId,
        decision: Decision,
        from_dx: f32,
        duration: Duration,
        now: Instant,
    ) -> Self {
        let direction = match decision {
            Decision::Like => 1.0,
            Decision::Dislike => -1.0,
            Decision::Cancel => 0.0,
        };
        Self {
            item_id,
            from_dx,
            direction,
            started_at: now,
            duration,
        }
    }

    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn offset(&self, now: Instant) -> f32 {
        self.from_dx + self.direction * EXIT_TRAVEL_PX * self.progress(now)
    }
}
