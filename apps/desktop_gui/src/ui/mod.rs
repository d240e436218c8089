//! UI layer for the deck GUI: app shell and card motion.

pub mod app;
pub mod card;

pub use app::DeckGuiApp;
