//! Session state and the pure deck transition.

use shared::domain::{Decision, Item, Phase, SessionId};
use tracing::debug;

use crate::deck::Deck;

/// Outcome of feeding one decision into [`SessionState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stale or out-of-phase decision; state unchanged.
    Ignored,
    /// Drag released below the threshold; state unchanged.
    SnappedBack,
    /// The current card was decided and the cursor moved on.
    Advanced { decision: Decision, finished: bool },
}

/// Cursor, liked set and phase for one pass through a [`Deck`].
///
/// `liked` is always an ordered subsequence of `deck[..cursor]`, and the phase
/// becomes [`Phase::Summary`] exactly when the cursor reaches the deck length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    id: SessionId,
    cursor: usize,
    liked: Vec<Item>,
    phase: Phase,
}

impl SessionState {
    pub fn new(id: SessionId, deck: &Deck) -> Self {
        let phase = if deck.is_empty() {
            Phase::Summary
        } else {
            Phase::Active
        };
        Self {
            id,
            cursor: 0,
            liked: Vec::new(),
            phase,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn liked(&self) -> &[Item] {
        &self.liked
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current<'d>(&self, deck: &'d Deck) -> Option<&'d Item> {
        match self.phase {
            Phase::Active => deck.get(self.cursor),
            Phase::Summary => None,
        }
    }

    /// Reduce `(state, decision, item)` to the next state.
    ///
    /// Only a decision about the card under the cursor is committed; anything
    /// else (a second gesture racing the first, or events after the summary)
    /// leaves the state untouched.
    pub fn apply(&self, deck: &Deck, decision: Decision, item: &Item) -> (Self, Transition) {
        let Some(current) = self.current(deck) else {
            return (self.clone(), Transition::Ignored);
        };
        if current.id != item.id {
            debug!(
                current = %current.id,
                decided = %item.id,
                "ignoring decision for a card that is no longer current"
            );
            return (self.clone(), Transition::Ignored);
        }

        let mut next = self.clone();
        match decision {
            Decision::Cancel => return (next, Transition::SnappedBack),
            Decision::Like => next.liked.push(current.clone()),
            Decision::Dislike => {}
        }

        next.cursor += 1;
        let finished = next.cursor >= deck.len();
        if finished {
            next.phase = Phase::Summary;
        }
        (next, Transition::Advanced { decision, finished })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
