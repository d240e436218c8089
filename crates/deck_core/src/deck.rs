//! The fixed-length card deck for one session.

use std::sync::Arc;

use shared::domain::{Item, ItemId};

pub const DEFAULT_DECK_SIZE: usize = 15;
/// Largest deck a session may ask for.
pub const MAX_DECK_SIZE: usize = 100;

/// Where the deck's items came from. Only used for logging and diagnostics;
/// the session logic treats both origins identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckOrigin {
    Fetched,
    Placeholder,
}

impl DeckOrigin {
    pub fn label(self) -> &'static str {
        match self {
            DeckOrigin::Fetched => "fetched",
            DeckOrigin::Placeholder => "placeholder",
        }
    }
}

/// Ordered items, fixed at session start. Cloning shares the same storage.
#[derive(Debug, Clone)]
pub struct Deck {
    items: Arc<[Item]>,
    origin: DeckOrigin,
}

impl Deck {
    pub fn fetched(items: Vec<Item>) -> Self {
        Self {
            items: items.into(),
            origin: DeckOrigin::Fetched,
        }
    }

    pub fn placeholder(len: usize) -> Self {
        Self {
            items: (0..len).map(placeholder_item).collect(),
            origin: DeckOrigin::Placeholder,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn origin(&self) -> DeckOrigin {
        self.origin
    }
}

/// Deterministic stand-in for the `index`-th card when the image source fails.
pub fn placeholder_item(index: usize) -> Item {
    Item {
        id: ItemId(format!("mock-cat-{index}")),
        image_url: format!(
            "https://via.placeholder.com/300x400?text=Cat+{}",
            index + 1
        ),
        tags: Vec::new(),
        created_at: String::new(),
        media_type: String::new(),
    }
}
