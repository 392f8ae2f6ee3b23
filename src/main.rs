use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gym_finder::location::{FixedPosition, IpGeolocator, Position};
use gym_finder::render::TerminalView;
use gym_finder::search::{DirectSource, GymSource, ProxySource, SearchController, SearchOutcome};
use gym_finder::{server, Config};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Gym finder: fitness facilities within 5 km of a place or your position.
///
/// Examples:
///   gymfinder search Boston
///   gymfinder search "Kigali, Rwanda"
///   gymfinder near --lat 42.36 --lon -71.06
///   gymfinder near
///   gymfinder --proxy http://127.0.0.1:5000 search Boston
///   gymfinder serve --port 5000
#[derive(Parser)]
#[command(name = "gymfinder", version, about, long_about = None)]
struct Cli {
    /// Base URL of a proxy backend; without it Geoapify is called directly
    /// (needs GEOAPIFY_API_KEY).
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Drop cards of an older search once a newer one renders.
    #[arg(long, global = true)]
    cancel_stale: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search near an address or place name.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Search near the current position (IP lookup unless --lat/--lon are given).
    Near {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },
    /// Read place names from stdin, one search per line.
    Interactive,
    /// Run the proxy backend (`/api/gyms`, `/api/static-map`).
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, short, default_value_t = 5000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let source: Arc<dyn GymSource> = match &cli.proxy {
        Some(url) => Arc::new(ProxySource::new(url.as_str())),
        None => Arc::new(DirectSource::from_config(&config)),
    };
    let controller = || {
        Arc::new(
            SearchController::new(Arc::clone(&source), Arc::new(TerminalView::new()))
                .cancel_stale_renders(cli.cancel_stale),
        )
    };

    match cli.command {
        Command::Serve { ref host, port } => {
            server::start(&config, host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Search { ref query } => {
            let text = query.join(" ");
            match controller().submit_text(&text).await {
                Some(outcome) => Ok(finish(outcome).await),
                None => {
                    eprintln!("Error: nothing to search for.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Near { lat, lon } => {
            let ctl = controller();
            let outcome = match (lat, lon) {
                (Some(latitude), Some(longitude)) => {
                    ctl.locate_with(FixedPosition(Position { latitude, longitude }))
                        .await
                }
                _ => ctl.locate_with(IpGeolocator::new(config.ip_locate_url.clone())).await,
            };
            Ok(finish(outcome).await)
        }
        Command::Interactive => {
            interactive(controller()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Let the staggered cards land before the process exits.
async fn finish(outcome: SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::Rendered(batch) => {
            batch.settle().await;
            ExitCode::SUCCESS
        }
        SearchOutcome::ErrorDisplayed(_) => ExitCode::FAILURE,
    }
}

/// Each line is a submission. Searches run concurrently and are never
/// cancelled; the one that settles last owns the output.
async fn interactive(controller: Arc<SearchController>) -> anyhow::Result<()> {
    eprintln!("  Type a place and press Enter (Ctrl+D to quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = tokio::task::JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let ctl = Arc::clone(&controller);
        pending.spawn(async move {
            if let Some(SearchOutcome::Rendered(batch)) = ctl.submit_text(&line).await {
                batch.settle().await;
            }
        });
    }

    while pending.join_next().await.is_some() {}
    Ok(())
}
