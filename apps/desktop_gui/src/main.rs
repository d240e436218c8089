mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use deck_core::{load_settings, Settings};
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DeckGuiApp;

#[derive(Parser, Debug)]
#[command(name = "paws-gui", about = "Swipe through a deck of cat pictures")]
struct Args {
    /// Random-cat endpoint; `json=true` is appended automatically.
    #[arg(long)]
    endpoint: Option<String>,
    /// Number of cards in the deck.
    #[arg(long)]
    count: Option<usize>,
}

fn resolve_settings(args: &Args) -> Settings {
    let mut settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("invalid settings, falling back to defaults: {err:#}");
            Settings::default()
        }
    };
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(count) = args.count {
        settings.deck_size = count;
    }
    if let Err(err) = settings.validate() {
        tracing::error!("invalid command line overrides, using defaults: {err}");
        settings = Settings::default();
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Paws & Preferences")
            .with_inner_size([420.0, 760.0])
            .with_min_inner_size([360.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Paws & Preferences",
        options,
        Box::new(|_cc| Ok(Box::new(DeckGuiApp::new(cmd_tx, ui_rx, settings)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_settings() {
        let args = Args::parse_from(["paws-gui", "--count", "4", "--endpoint", "http://localhost:1/cat"]);
        let settings = resolve_settings(&args);
        assert_eq!(settings.deck_size, 4);
        assert_eq!(settings.endpoint, "http://localhost:1/cat");
    }

    #[test]
    fn zero_count_is_rejected() {
        let args = Args::parse_from(["paws-gui", "--count", "0"]);
        assert_eq!(resolve_settings(&args).deck_size, 15);
    }
}
