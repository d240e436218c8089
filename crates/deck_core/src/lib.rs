//! Swipe-deck core: a fixed deck of cat pictures, a gesture interpreter that
//! turns drags and button presses into like/dislike decisions, and a pure
//! session reducer that advances through the deck to a summary.

pub mod controller;
pub mod deck;
pub mod gesture;
pub mod preview;
pub mod session;
pub mod settings;
pub mod source;

pub use controller::{DeckController, DeckSnapshot, InputEvent};
pub use deck::{Deck, DeckOrigin};
pub use session::{SessionState, Transition};
pub use settings::{load_settings, Settings};
pub use source::{fetch_image_bytes, load_deck, HttpImageSource, ImageSource};
