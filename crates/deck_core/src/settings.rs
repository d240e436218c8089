use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{
    deck::{DEFAULT_DECK_SIZE, MAX_DECK_SIZE},
    gesture::SWIPE_THRESHOLD_PX,
    preview::DEFAULT_PREVIEW_COUNT,
};

pub const SETTINGS_FILE: &str = "paws.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub deck_size: usize,
    pub preview_count: usize,
    pub swipe_threshold_px: f32,
    pub exit_animation_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "https://cataas.com/cat".into(),
            deck_size: DEFAULT_DECK_SIZE,
            preview_count: DEFAULT_PREVIEW_COUNT,
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            exit_animation_ms: 20,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("deck_size must be at least 1")]
    EmptyDeck,
    #[error("deck_size must be at most {max}, got {size}")]
    DeckTooLarge { size: usize, max: usize },
    #[error("swipe_threshold_px must be a positive number, got {0}")]
    InvalidThreshold(f32),
    #[error("endpoint '{endpoint}' is not a valid url: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn exit_animation(&self) -> Duration {
        Duration::from_millis(self.exit_animation_ms)
    }

    pub fn endpoint_url(&self) -> Result<Url, SettingsError> {
        Url::parse(&self.endpoint).map_err(|err| SettingsError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: err.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.deck_size == 0 {
            return Err(SettingsError::EmptyDeck);
        }
        if self.deck_size > MAX_DECK_SIZE {
            return Err(SettingsError::DeckTooLarge {
                size: self.deck_size,
                max: MAX_DECK_SIZE,
            });
        }
        if !(self.swipe_threshold_px.is_finite() && self.swipe_threshold_px > 0.0) {
            return Err(SettingsError::InvalidThreshold(self.swipe_threshold_px));
        }
        self.endpoint_url()?;
        Ok(())
    }

    /// Layers environment overrides on top of the current values.
    /// Unparseable numeric values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PAWS_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("APP__ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("PAWS_DECK_SIZE").and_then(|v| v.parse().ok()) {
            self.deck_size = v;
        }
        if let Some(v) = lookup("PAWS_PREVIEW_COUNT").and_then(|v| v.parse().ok()) {
            self.preview_count = v;
        }
        if let Some(v) = lookup("PAWS_SWIPE_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.swipe_threshold_px = v;
        }
    }
}

/// Defaults, then `paws.toml` in the working directory if present, then the
/// process environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?
    } else {
        Settings::default()
    };

    settings.apply_env(lookup);
    settings.validate()?;
    Ok(settings)
}
