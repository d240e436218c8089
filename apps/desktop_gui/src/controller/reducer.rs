//! Session lifecycle as seen by the GUI: which load is current, and the deck
//! controller once its deck has arrived.

use deck_core::{Deck, DeckController, Settings};

use crate::controller::events::{LoadGeneration, UiEvent};

pub struct SessionView {
    generation: LoadGeneration,
    controller: Option<DeckController>,
    swipe_threshold: f32,
    preview_count: usize,
}

impl SessionView {
    pub fn new(settings: &Settings) -> Self {
        Self {
            generation: LoadGeneration(0),
            controller: None,
            swipe_threshold: settings.swipe_threshold_px,
            preview_count: settings.preview_count,
        }
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_none()
    }

    pub fn controller(&self) -> Option<&DeckController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut DeckController> {
        self.controller.as_mut()
    }

    /// Drops the current session and returns the generation the next deck
    /// load must carry.
    pub fn restart(&mut self) -> LoadGeneration {
        self.generation = self.generation.next();
        self.controller = None;
        self.generation
    }

    /// Events tagged with an older generation belong to a discarded session.
    pub fn accepts(&self, event: &UiEvent) -> bool {
        event
            .generation()
            .is_none_or(|generation| generation == self.generation)
    }

    /// Installs the deck for the current load. A deck for another generation,
    /// or a second deck for the same one, is refused.
    pub fn install_deck(&mut self, generation: LoadGeneration, deck: Deck) -> bool {
        if generation != self.generation || self.controller.is_some() {
            tracing::debug!(
                generation = generation.0,
                current = self.generation.0,
                "dropping deck for a discarded session"
            );
            return false;
        }
        self.controller = Some(DeckController::new(
            deck,
            self.swipe_threshold,
            self.preview_count,
        ));
        true
    }
}
