//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use deck_core::{fetch_image_bytes, load_deck, HttpImageSource, Settings};
use shared::{domain::ItemId, error::FetchError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{LoadGeneration, UiError, UiErrorContext, UiEvent};
use crate::media::decode_preview_image;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let source = match HttpImageSource::from_settings(&settings) {
                Ok(source) => Arc::new(source),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_fetch(
                        UiErrorContext::BackendStartup,
                        &err,
                    )));
                    tracing::error!(error = %err, "failed to build image source");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadDeck { generation, count } => {
                        let source = Arc::clone(&source);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let deck = load_deck(source.as_ref(), count).await;
                            tracing::info!(
                                generation = generation.0,
                                origin = deck.origin().label(),
                                "deck ready"
                            );
                            if ui_tx
                                .send(UiEvent::DeckLoaded { generation, deck })
                                .is_err()
                            {
                                tracing::debug!("ui closed before deck arrived");
                            }
                        });
                    }
                    BackendCommand::FetchImage {
                        generation,
                        item_id,
                        url,
                    } => {
                        let client = source.client().clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let downloaded = fetch_image_bytes(&client, &url).await;
                            if let Err(err) = &downloaded {
                                tracing::debug!(%item_id, %url, error = %err, "image download failed");
                            }
                            let event = image_event(generation, item_id, downloaded);
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
        });
    });
}

/// Turns a finished download into the event the UI consumes; both download
/// and decode failures are reported as [`UiErrorContext::ImageDownload`].
fn image_event(
    generation: LoadGeneration,
    item_id: ItemId,
    downloaded: Result<Vec<u8>, FetchError>,
) -> UiEvent {
    let decoded = match downloaded {
        Ok(bytes) => decode_preview_image(&bytes)
            .map_err(|reason| UiError::from_message(UiErrorContext::ImageDownload, reason)),
        Err(err) => Err(UiError::from_fetch(UiErrorContext::ImageDownload, &err)),
    };
    match decoded {
        Ok(image) => UiEvent::ImageLoaded {
            generation,
            item_id,
            image,
        },
        Err(error) => UiEvent::ImageFailed {
            generation,
            item_id,
            error,
        },
    }
}
