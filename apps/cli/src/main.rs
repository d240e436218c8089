use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{
    load_deck, load_settings, session::Transition, DeckController, HttpImageSource, InputEvent,
    Settings,
};
use shared::domain::{Phase, SwipeDirection};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paws", about = "Fetch a deck of cat pictures and swipe through it")]
struct Args {
    /// Random-cat endpoint; `json=true` is appended automatically.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Number of cards in the deck.
    #[arg(long, global = true)]
    count: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deck as JSON.
    Fetch,
    /// Swipe through the deck on stdin.
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayInput {
    Event(InputEvent),
    Drag(f32),
    Quit,
}

fn parse_play_input(line: &str) -> Option<PlayInput> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "l" | "like" | "right" | "r" => Some(PlayInput::Event(InputEvent::ButtonPressed(
            SwipeDirection::Right,
        ))),
        "d" | "dislike" | "left" => Some(PlayInput::Event(InputEvent::ButtonPressed(
            SwipeDirection::Left,
        ))),
        "q" | "quit" => Some(PlayInput::Quit),
        other => other.parse::<f32>().ok().map(PlayInput::Drag),
    }
}

fn print_card(controller: &DeckController, out: &mut impl Write) -> io::Result<()> {
    let snapshot = controller.snapshot();
    let Some(item) = snapshot.current_item else {
        return Ok(());
    };
    writeln!(out, "{}  {}", snapshot.position_label(), item.image_url)?;
    if !item.tags.is_empty() {
        writeln!(out, "  tags: {}", item.tags.join(", "))?;
    }
    if let Some(created) = item.created_at_utc() {
        writeln!(out, "  added: {}", created.format("%Y-%m-%d"))?;
    }
    let upcoming: Vec<&str> = snapshot
        .upcoming_items
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    if upcoming.is_empty() {
        writeln!(out, "  next: none")?;
    } else {
        writeln!(out, "  next: {}", upcoming.join(", "))?;
    }
    writeln!(out, "  {} cats remaining", snapshot.remaining())?;
    write!(out, "[l]ike / [d]islike / drag offset / [q]uit > ")?;
    out.flush()
}

/// Full summary once the deck is exhausted; a partial tally when the player
/// quit early.
fn print_summary(controller: &DeckController, out: &mut impl Write) -> io::Result<()> {
    let snapshot = controller.snapshot();
    if snapshot.phase == Phase::Summary {
        writeln!(out, "Your Cat Preferences")?;
        writeln!(out, "{}", snapshot.summary_line())?;
        if snapshot.liked_items.is_empty() {
            writeln!(out, "No cats liked. Try again!")?;
        }
    } else {
        writeln!(out, "Stopped at {}", snapshot.position_label())?;
        writeln!(
            out,
            "You liked {} of the {} cats seen so far.",
            snapshot.liked_items.len(),
            snapshot.cursor
        )?;
    }
    for item in snapshot.liked_items {
        writeln!(out, "  {}  {}", item.id, item.image_url)?;
    }
    Ok(())
}

fn run_session(
    controller: &mut DeckController,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    print_card(controller, out)?;
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let event = match parse_play_input(&line) {
            Some(PlayInput::Quit) => break,
            Some(PlayInput::Event(event)) => event,
            Some(PlayInput::Drag(dx)) => {
                controller.handle(InputEvent::DragStarted);
                InputEvent::DragReleased { dx }
            }
            None => {
                write!(out, "? ")?;
                out.flush()?;
                continue;
            }
        };
        if let Some(Transition::SnappedBack) = controller.handle(event) {
            writeln!(out, "  (not far enough, card snaps back)")?;
        }
        if controller.state().phase() == Phase::Summary {
            writeln!(out)?;
            break;
        }
        print_card(controller, out)?;
    }
    print_summary(controller, out)?;
    Ok(())
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings()?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(count) = args.count {
        settings.deck_size = count;
    }
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args).context("invalid configuration")?;

    let source = HttpImageSource::from_settings(&settings).context("failed to build image source")?;
    tracing::info!(endpoint = %source.endpoint(), count = settings.deck_size, "fetching deck");
    let deck = load_deck(&source, settings.deck_size).await;
    tracing::info!(origin = deck.origin().label(), len = deck.len(), "deck ready");

    match args.command {
        Command::Fetch => {
            println!("{}", serde_json::to_string_pretty(deck.items())?);
        }
        Command::Play => {
            let mut controller = DeckController::from_settings(deck, &settings);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_session(&mut controller, stdin.lock(), &mut stdout)?;
            tracing::info!(
                session = %controller.session_id(),
                cursor = controller.state().cursor(),
                liked = controller.state().liked().len(),
                "play session ended"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use deck_core::Deck;

    use super::*;

    fn play(len: usize, script: &str) -> (DeckController, String) {
        let mut controller = DeckController::from(Deck::placeholder(len));
        let mut out = Vec::new();
        run_session(&mut controller, Cursor::new(script.as_bytes()), &mut out).expect("session");
        (controller, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn parses_play_commands() {
        assert_eq!(
            parse_play_input(" L "),
            Some(PlayInput::Event(InputEvent::ButtonPressed(SwipeDirection::Right)))
        );
        assert_eq!(
            parse_play_input("left"),
            Some(PlayInput::Event(InputEvent::ButtonPressed(SwipeDirection::Left)))
        );
        assert_eq!(parse_play_input("-150"), Some(PlayInput::Drag(-150.0)));
        assert_eq!(parse_play_input("q"), Some(PlayInput::Quit));
        assert_eq!(parse_play_input("maybe"), None);
    }

    #[test]
    fn full_session_reaches_summary() {
        let (controller, out) = play(3, "l\n40\nd\n150\n");
        assert_eq!(controller.state().phase(), Phase::Summary);
        assert_eq!(controller.state().liked().len(), 2);
        assert!(out.contains("Cat 1 / 3"));
        assert!(out.contains("card snaps back"));
        assert!(out.contains("Your Cat Preferences"));
        assert!(out.contains("You liked 2 out of 3 cats!"));
        assert!(!out.contains("Stopped at"));
        assert!(out.contains("mock-cat-2"));
    }

    #[test]
    fn quitting_early_prints_partial_tally() {
        let (controller, out) = play(5, "d\nq\nl\n");
        assert_eq!(controller.state().cursor(), 1);
        assert_eq!(controller.state().phase(), Phase::Active);
        assert!(out.contains("Stopped at Cat 2 / 5"));
        assert!(out.contains("You liked 0 of the 1 cats seen so far."));
        assert!(!out.contains("out of 5 cats!"));
        assert!(!out.contains("Your Cat Preferences"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::parse_from(["paws", "play", "--count", "4"]);
        assert_eq!(args.count, Some(4));
        assert!(matches!(args.command, Command::Play));
    }
}
