use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use nasta_tag_core::api::TrafiklabClient;
use nasta_tag_core::config::{BoardConfig, DEFAULT_API_URL, FORECAST_MINUTES, REFRESH_INTERVAL};
use nasta_tag_core::favorites::{FavoritesPersistence, FavoritesStore, InMemoryPersistence, SqlitePersistence};
use nasta_tag_core::position;
use nasta_tag_core::refresh::RefreshController;
use nasta_tag_transit::identifiers::UserIdentifier;
use nasta_tag_transit::models::Coordinates;
use nasta_tag_transit::spatial::DEFAULT_RADIUS_M;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{info, warn};

mod commands;
mod render;

use render::BoardView;

#[derive(Parser, Debug)]
#[command(
    name = "nasta-tag",
    author,
    version,
    about = "Departure board for the transit stops around you",
    long_about = "Shows upcoming departures from every stop within walking distance, \
                  metro first, favorite stops on top.\n\n\
                  Without --lat/--lon, positions are read from stdin as `<lat>,<lon>` lines. \
                  Stdin also accepts `fav <stop key>`, `login <user>` and `logout`."
)]
struct Args {
    /// Fixed latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Fixed longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// SQLite file for favorites (kept in memory otherwise)
    #[arg(long)]
    favorites_db: Option<PathBuf>,

    /// Sign in as this user at startup
    #[arg(long)]
    user: Option<String>,

    /// Exit after the first board has been printed
    #[arg(long)]
    once: bool,

    /// Base URL of the transport API
    #[arg(long, env = "NASTA_TAG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Proximity radius in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
    radius: f64,

    /// Forecast window in minutes
    #[arg(long, default_value_t = FORECAST_MINUTES)]
    forecast: u32,

    /// Minimum seconds between two refreshes
    #[arg(long, default_value_t = REFRESH_INTERVAL.as_secs())]
    refresh_secs: u64,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> BoardConfig {
        BoardConfig {
            api_base_url: self.api_url.clone(),
            refresh_interval: Duration::from_secs(self.refresh_secs),
            radius_m: self.radius,
            forecast_minutes: self.forecast,
            ..BoardConfig::default()
        }
    }

    fn fixed_position(&self) -> Result<Option<Coordinates>> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Ok(None);
        };
        let position = Coordinates::new(lat, lon);
        if !position.is_valid() {
            bail!("{lat},{lon} is not a valid position");
        }
        Ok(Some(position))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = args.config();
    if config.refresh_interval.is_zero() {
        bail!("--refresh-secs must be at least 1");
    }
    let fixed_position = args.fixed_position()?;

    let persistence: Arc<dyn FavoritesPersistence> = match &args.favorites_db {
        Some(path) => Arc::new(
            SqlitePersistence::open(path)
                .with_context(|| format!("opening favorites database {}", path.display()))?,
        ),
        None => Arc::new(InMemoryPersistence::new()),
    };
    let mut favorites = FavoritesStore::new(persistence);
    if let Some(user) = &args.user {
        favorites
            .sign_in(UserIdentifier::new(user))
            .await
            .with_context(|| format!("signing in as {user}"))?;
    }

    info!(api = %config.api_base_url, radius_m = config.radius_m, "starting departure board");

    let client = Arc::new(
        TrafiklabClient::new(config.api_base_url.clone(), config.http_timeout())
            .context("building HTTP client")?,
    );
    let controller = RefreshController::new(config, client.clone(), client, favorites.subscribe());
    let mut board = controller.subscribe();

    let (positions, position_stream) = position::channel();
    if let Some(position) = fixed_position {
        positions.update(position);
    }

    let (stop, stopped) = oneshot::channel::<()>();
    let controller = tokio::spawn(controller.run(position_stream, async {
        let _ = stopped.await;
    }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = board.borrow_and_update().clone();
                print!("{}", BoardView(&snapshot));
                if args.once {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => commands::handle(&line, &positions, &mut favorites).await,
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "reading stdin failed");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = stop.send(());
    controller.await.context("refresh controller panicked")?;
    Ok(())
}
