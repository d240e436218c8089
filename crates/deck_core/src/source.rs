//! Image source: populates a deck from the remote cat endpoint, masking any
//! failure behind the placeholder deck.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Item, error::FetchError, protocol::CatDescriptor};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    deck::{Deck, MAX_DECK_SIZE},
    settings::Settings,
};

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// One random image descriptor.
    async fn fetch_one(&self) -> Result<CatDescriptor, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
    endpoint: Url,
}

impl HttpImageSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = parse_url(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::transport)?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(&settings.endpoint, settings.request_timeout())
    }

    pub fn with_client(client: Client, mut endpoint: Url) -> Self {
        endpoint.query_pairs_mut().append_pair("json", "true");
        Self { client, endpoint }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_one(&self) -> Result<CatDescriptor, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let mut descriptor: CatDescriptor = response.json().await.map_err(FetchError::decode)?;
        if descriptor.id.trim().is_empty() {
            return Err(FetchError::decode("descriptor has an empty id"));
        }
        descriptor.url = resolve_image_url(&self.endpoint, &descriptor.url)?;
        Ok(descriptor)
    }
}

/// Absolute image urls pass through; relative ones are joined onto the
/// endpoint's origin.
pub fn resolve_image_url(endpoint: &Url, raw: &str) -> Result<String, FetchError> {
    if raw.trim().is_empty() {
        return Err(FetchError::decode("descriptor has an empty url"));
    }
    endpoint
        .join(raw)
        .map(String::from)
        .map_err(|err| FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })
}

/// `count` sequential fetches; the first failure aborts the whole batch.
pub async fn fetch_items(source: &dyn ImageSource, count: usize) -> Result<Vec<Item>, FetchError> {
    let mut items = Vec::with_capacity(count.min(MAX_DECK_SIZE));
    for index in 0..count {
        let descriptor = source.fetch_one().await?;
        debug!(index, id = %descriptor.id, "fetched image descriptor");
        items.push(Item::from(descriptor));
    }
    Ok(items)
}

/// Always yields a deck of exactly `count` items, capped at
/// [`MAX_DECK_SIZE`]. Any fetch failure discards what was fetched so far and
/// substitutes the placeholder deck.
pub async fn load_deck(source: &dyn ImageSource, count: usize) -> Deck {
    if count > MAX_DECK_SIZE {
        warn!(count, max = MAX_DECK_SIZE, "deck size over the limit; capping");
    }
    let count = count.min(MAX_DECK_SIZE);
    match fetch_items(source, count).await {
        Ok(items) => {
            info!(count, "deck populated from image source");
            Deck::fetched(items)
        }
        Err(err) => {
            warn!(error = %err, count, "image source failed; using placeholder deck");
            Deck::placeholder(count)
        }
    }
}

/// Raw bytes of one card image, for display.
pub async fn fetch_image_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let url = parse_url(url)?;
    let response = client.get(url).send().await.map_err(FetchError::transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await.map_err(FetchError::transport)?;
    Ok(bytes.to_vec())
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|err| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
