//! Deck controller: owns one session and routes input through the gesture
//! interpreter into the session reducer.

use serde::Serialize;
use shared::domain::{Decision, Item, Phase, SessionId, SwipeDirection};
use tracing::{debug, info};

use crate::{
    deck::Deck,
    gesture::GestureTracker,
    preview::{upcoming, DEFAULT_PREVIEW_COUNT},
    session::{SessionState, Transition},
    settings::Settings,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragStarted,
    DragReleased { dx: f32 },
    ButtonPressed(SwipeDirection),
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeckSnapshot<'a> {
    pub current_item: Option<&'a Item>,
    pub upcoming_items: &'a [Item],
    pub liked_items: &'a [Item],
    pub phase: Phase,
    pub cursor: usize,
    pub len: usize,
}

impl DeckSnapshot<'_> {
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.cursor)
    }

    pub fn position_label(&self) -> String {
        format!("Cat {} / {}", self.cursor + 1, self.len)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "You liked {} out of {} cats!",
            self.liked_items.len(),
            self.len
        )
    }
}

#[derive(Debug, Clone)]
pub struct DeckController {
    deck: Deck,
    state: SessionState,
    gestures: GestureTracker,
    preview_count: usize,
}

impl DeckController {
    pub fn new(deck: Deck, swipe_threshold: f32, preview_count: usize) -> Self {
        let id = SessionId::new();
        info!(
            session = %id,
            len = deck.len(),
            origin = deck.origin().label(),
            "starting deck session"
        );
        Self {
            state: SessionState::new(id, &deck),
            deck,
            gestures: GestureTracker::new(swipe_threshold),
            preview_count,
        }
    }

    pub fn from_settings(deck: Deck, settings: &Settings) -> Self {
        Self::new(deck, settings.swipe_threshold_px, settings.preview_count)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> &SessionId {
        self.state.id()
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    pub fn current(&self) -> Option<&Item> {
        self.state.current(&self.deck)
    }

    pub fn snapshot(&self) -> DeckSnapshot<'_> {
        DeckSnapshot {
            current_item: self.current(),
            upcoming_items: upcoming(&self.deck, self.state.cursor(), self.preview_count),
            liked_items: self.state.liked(),
            phase: self.state.phase(),
            cursor: self.state.cursor(),
            len: self.deck.len(),
        }
    }

    /// `None` when the event produced no decision (a drag starting, or a
    /// button press swallowed by an in-flight drag).
    pub fn handle(&mut self, event: InputEvent) -> Option<Transition> {
        match event {
            InputEvent::DragStarted => {
                if let Some(item) = self.state.current(&self.deck) {
                    let id = item.id.clone();
                    self.gestures.begin_drag(&id);
                }
                None
            }
            InputEvent::DragReleased { dx } => {
                let (decision, target) = self.gestures.release(dx);
                let item = match target {
                    Some(id) => self.deck.items().iter().find(|item| item.id == id).cloned(),
                    None => self.current().cloned(),
                };
                Some(match item {
                    Some(item) => self.commit(decision, &item),
                    None => Transition::Ignored,
                })
            }
            InputEvent::ButtonPressed(direction) => {
                let decision = self.gestures.press(direction)?;
                let item = self.current().cloned();
                Some(match item {
                    Some(item) => self.commit(decision, &item),
                    None => Transition::Ignored,
                })
            }
        }
    }

    /// Feed an already-interpreted decision about `item` to the reducer.
    pub fn commit(&mut self, decision: Decision, item: &Item) -> Transition {
        let (next, transition) = self.state.apply(&self.deck, decision, item);
        self.state = next;
        debug!(
            session = %self.state.id(),
            item = %item.id,
            ?decision,
            ?transition,
            cursor = self.state.cursor(),
            "deck transition"
        );
        if matches!(transition, Transition::Advanced { finished: true, .. }) {
            info!(
                session = %self.state.id(),
                liked = self.state.liked().len(),
                len = self.deck.len(),
                "deck exhausted; showing summary"
            );
        }
        transition
    }
}

impl From<Deck> for DeckController {
    fn from(deck: Deck) -> Self {
        Self::new(deck, crate::gesture::SWIPE_THRESHOLD_PX, DEFAULT_PREVIEW_COUNT)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
