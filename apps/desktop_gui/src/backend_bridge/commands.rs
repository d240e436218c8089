//! Backend commands queued from UI to backend worker.

use shared::domain::ItemId;

use crate::controller::events::LoadGeneration;

pub enum BackendCommand {
    LoadDeck {
        generation: LoadGeneration,
        count: usize,
    },
    FetchImage {
        generation: LoadGeneration,
        item_id: ItemId,
        url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadDeck { .. } => "load_deck",
            BackendCommand::FetchImage { .. } => "fetch_image",
        }
    }
}
