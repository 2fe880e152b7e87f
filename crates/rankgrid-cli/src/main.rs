mod grid;
mod lookup;

use clap::{Parser, Subcommand, ValueEnum};
use rankgrid_core::AppConfig;
use rankgrid_search::{DistanceUnit, GeocodeCache, Geocoder, SearchMode, SerperClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rankgrid-cli")]
#[command(about = "Grid-based local rank tracking from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnitArg {
    Meters,
    Miles,
}

impl From<UnitArg> for DistanceUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Meters => DistanceUnit::Meters,
            UnitArg::Miles => DistanceUnit::Miles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Local,
    Organic,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Local => SearchMode::Local,
            ModeArg::Organic => SearchMode::Organic,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample rank for a keyword across a grid around a center point
    Grid {
        /// Center latitude
        #[arg(
            long,
            allow_negative_numbers = true,
            requires = "lng",
            required_unless_present = "address"
        )]
        lat: Option<f64>,
        /// Center longitude
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Free-text address geocoded to the center (instead of --lat/--lng)
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        address: Option<String>,
        /// Distance between adjacent points
        #[arg(long, default_value = "1")]
        spacing: f64,
        #[arg(long, value_enum, default_value = "miles")]
        unit: UnitArg,
        /// Points per side (odd)
        #[arg(long, default_value = "5")]
        size: u32,
        #[arg(long, value_enum, default_value = "local")]
        mode: ModeArg,
        #[arg(long)]
        keyword: String,
        /// Target website or domain
        #[arg(long)]
        target: String,
        /// Also list every top result loosely matching the target
        #[arg(long)]
        show_matches: bool,
    },
    /// Find the organic rank of a website for a keyword
    Rank {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        target: String,
        /// Country code (defaults to RANKGRID_DEFAULT_COUNTRY)
        #[arg(long)]
        country: Option<String>,
        /// Language code (defaults to RANKGRID_DEFAULT_LANGUAGE)
        #[arg(long)]
        language: Option<String>,
    },
    /// List every local-pack listing that belongs to a website
    Local {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        target: String,
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
    },
    /// Resolve a place name to coordinates
    Geocode {
        query: String,
    },
}

fn search_client(config: &AppConfig) -> anyhow::Result<SerperClient> {
    SerperClient::with_base_url(
        config.serper_api_key.as_deref(),
        config.search_timeout_secs,
        &config.user_agent,
        &config.search_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))
}

fn geocoder(config: &AppConfig) -> anyhow::Result<Geocoder> {
    Geocoder::with_base_url(
        config.search_timeout_secs,
        &config.user_agent,
        &config.geocoder_base_url,
        GeocodeCache::new(config.geocoder_cache_capacity),
    )
    .map_err(|e| anyhow::anyhow!("failed to build geocoder: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = rankgrid_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Grid {
            lat,
            lng,
            address,
            spacing,
            unit,
            size,
            mode,
            keyword,
            target,
            show_matches,
        } => {
            let center = grid::CenterArg::from_args(lat, lng, address)?;
            grid::run_grid(
                &config,
                center,
                grid::GridArgs {
                    spacing,
                    unit: unit.into(),
                    size,
                    mode: mode.into(),
                    keyword,
                    target,
                    show_matches,
                },
            )
            .await?;
        }
        Commands::Rank {
            keyword,
            target,
            country,
            language,
        } => {
            lookup::run_rank(
                &config,
                &keyword,
                &target,
                country.as_deref(),
                language.as_deref(),
            )
            .await?;
        }
        Commands::Local {
            keyword,
            target,
            lat,
            lng,
        } => {
            lookup::run_local(&config, &keyword, &target, lat.zip(lng)).await?;
        }
        Commands::Geocode { query } => lookup::run_geocode(&config, &query).await?,
    }

    Ok(())
}
