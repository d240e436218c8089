//! Backend-to-UI events and error modeling for the deck GUI.

use deck_core::Deck;
use shared::{domain::ItemId, error::FetchError};

use crate::media::PreviewImage;

/// Identifies one deck load; bumped on every restart so results for a
/// discarded session can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadGeneration(pub u64);

impl LoadGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

pub enum UiEvent {
    Info(String),
    DeckLoaded {
        generation: LoadGeneration,
        deck: Deck,
    },
    ImageLoaded {
        generation: LoadGeneration,
        item_id: ItemId,
        image: PreviewImage,
    },
    ImageFailed {
        generation: LoadGeneration,
        item_id: ItemId,
        error: UiError,
    },
    Error(UiError),
}

impl UiEvent {
    pub fn generation(&self) -> Option<LoadGeneration> {
        match self {
            UiEvent::DeckLoaded { generation, .. }
            | UiEvent::ImageLoaded { generation, .. }
            | UiEvent::ImageFailed { generation, .. } => Some(*generation),
            UiEvent::Info(_) | UiEvent::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    ImageDownload,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_fetch(context: UiErrorContext, err: &FetchError) -> Self {
        let category = match err {
            FetchError::Transport(_) | FetchError::Status { .. } => UiErrorCategory::Transport,
            FetchError::Decode(_) | FetchError::InvalidUrl { .. } => UiErrorCategory::Decode,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("decode")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported image")
        {
            UiErrorCategory::Decode
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Decode => "Image",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_categories() {
        let err = UiError::from_fetch(
            UiErrorContext::ImageDownload,
            &FetchError::Status { status: 503 },
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::ImageDownload);
        assert_eq!(err.message(), "endpoint returned status 503");

        let err = UiError::from_fetch(
            UiErrorContext::BackendStartup,
            &FetchError::decode("bad json"),
        );
        assert_eq!(err.category(), UiErrorCategory::Decode);
    }

    #[test]
    fn classifies_command_queue_disconnect_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err_label(err.category()), "Network");
    }

    #[test]
    fn generation_wraps_instead_of_overflowing() {
        assert_eq!(LoadGeneration(u64::MAX).next(), LoadGeneration(0));
        assert_eq!(LoadGeneration(4).next(), LoadGeneration(5));
    }
}
