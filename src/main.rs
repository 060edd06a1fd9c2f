use clap::Parser;
use color_eyre::Result;
use placewave_tui::{
    api::PlaceProvider,
    app::App,
    config::Config,
    events::{Event, EventHandler},
    fallback::FallbackStore,
    fetcher::PlaceDetailFetcher,
    location::{GeocodeClient, LocationResolver, ManualDeviceProvider},
    logging,
    models::{normalize_reviews, Coordinate},
    ui,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tokio::sync::mpsc::UnboundedSender;

/// Terminal place detail viewer.
#[derive(Parser)]
#[command(name = "placewave", version, about)]
struct Args {
    /// Place id to open (falls back to the configured default)
    place_id: Option<String>,

    /// Path to the config file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    install_panic_hook();
    color_eyre::install()?;

    let args = Args::parse();
    let config = Config::load(&args.config);
    let place_id = args
        .place_id
        .unwrap_or_else(|| config.place.default_id.clone());

    let fetcher = Arc::new(PlaceDetailFetcher::new(
        PlaceProvider::new(&config.api.base_url, config.api.timeout_seconds),
        FallbackStore::load(&config.data.fallback_path),
    ));

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(place_id);
    let mut events = EventHandler::new(150);

    // Location resolution runs once at mount. An external coordinate from
    // the config short-circuits the network and device tiers entirely.
    let resolver = LocationResolver::new(
        GeocodeClient::new(&config.geolocation.endpoint, &config.geolocation.api_key),
        ManualDeviceProvider::new(config.location.device_position()),
        config.location.external_coordinate(),
    );
    let location_tx = events.tx.clone();
    tokio::spawn(async move {
        let resolved = resolver.resolve().await;
        let _ = location_tx.send(Event::LocationResolved(resolved));
    });

    // First fetch goes out immediately; it may finish before the coordinate
    // arrives, in which case the re-fetch below supplies the distance.
    issue_fetch(&mut app, &fetcher, &config, &events.tx, None);

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Tick => app.on_tick(),
                Event::Input(key) => app.handle_key(key),
                Event::LocationResolved(Some(coord)) => {
                    app.set_viewer_location(coord);
                    issue_fetch(&mut app, &fetcher, &config, &events.tx, Some(coord));
                }
                // Every tier failed; the page renders without a distance.
                Event::LocationResolved(None) => {}
                Event::PlaceUpdate {
                    seq,
                    record,
                    reviews,
                    origin,
                } => {
                    app.apply_place_update(seq, record, reviews, origin);
                }
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Spawns one fetch for the app's place id. The sequence number reserved
/// here supersedes any fetch still in flight, so late arrivals get dropped
/// by [`App::apply_place_update`].
fn issue_fetch(
    app: &mut App,
    fetcher: &Arc<PlaceDetailFetcher>,
    config: &Config,
    tx: &UnboundedSender<Event>,
    viewer: Option<Coordinate>,
) {
    let seq = app.next_fetch_seq();
    let id = app.place_id.clone();
    let fetcher = Arc::clone(fetcher);
    let locale = config.locale.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let fetch = fetcher.fetch(&id, viewer).await;
        let reviews = normalize_reviews(&fetch.reviews, &locale);
        let _ = tx.send(Event::PlaceUpdate {
            seq,
            record: fetch.record,
            reviews,
            origin: fetch.origin,
        });
    });
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        )
        .ok();
        original_hook(panic_info);
    }));
}
