use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use amenity_finder::config::Config;
use amenity_finder::controller::{AppController, SearchParameters};
use amenity_finder::location::{ConfiguredPositioning, PositioningProvider};
use amenity_finder::overpass::OverpassClient;
use amenity_finder::render::ConsoleView;

#[derive(Parser)]
#[command(version, about = "A tool to find nearby amenities, sorted by distance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize with a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Navigate one or more URL paths, e.g. / or /results/47.39/8.51/1000
    Open {
        /// Paths to navigate, in order, within one session
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Search for amenities around a coordinate
    Search {
        /// Latitude of the search center, decimal degrees
        #[arg(long, value_name = "DEGREES")]
        lat: f64,

        /// Longitude of the search center, decimal degrees
        #[arg(long, value_name = "DEGREES")]
        lon: f64,

        /// Search radius in meters (default from config)
        #[arg(long, value_name = "METERS")]
        radius: Option<u32>,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Detect the device position and print the matching deep link
    Locate {
        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force, config } => init_config(config, *force),
        Commands::Open { paths, config } => {
            let config_data = load_config(config)?;
            let mut controller = build_controller(&config_data)?;

            for path in paths {
                controller.navigate(path).await;
            }

            Ok(())
        }
        Commands::Search {
            lat,
            lon,
            radius,
            config,
        } => {
            let config_data = load_config(config)?;
            let mut controller = build_controller(&config_data)?;

            let params = SearchParameters {
                latitude: Some(*lat),
                longitude: Some(*lon),
                radius: Some((*radius).unwrap_or(config_data.default_radius)),
            };
            controller.request_search(params).await;

            Ok(())
        }
        Commands::Locate { config } => {
            let config_data = load_config(config)?;
            let provider = ConfiguredPositioning::from_config(&config_data);

            if !provider.can_detect_location() {
                println!(
                    "Positioning is not available; set device_position in the config \
                     or the AMENITY_DEVICE_POSITION environment variable."
                );
                return Ok(());
            }

            match provider.detect_location().await {
                Ok(position) => {
                    println!(
                        "Current position: {}, {}",
                        position.latitude, position.longitude
                    );
                    println!(
                        "Open /search/{}/{}/{} to search from here",
                        position.latitude, position.longitude, config_data.default_radius
                    );
                }
                Err(err) => {
                    println!("Could not detect position: {err}");
                }
            }

            Ok(())
        }
    }
}

fn build_controller(config: &Config) -> Result<AppController<OverpassClient, ConsoleView>> {
    let client = OverpassClient::new(&config.api_url, &config.amenity)?;
    Ok(AppController::new(client, ConsoleView))
}

fn init_config(config_path_opt: &Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = Config::get_config_path(config_path_opt);

    if config_path.exists() && !force {
        println!("Config file already exists at {}", config_path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!("Created config file at {}", config_path.display());
    Ok(())
}

fn load_config(config_path_opt: &Option<PathBuf>) -> Result<Config> {
    let config_path = Config::get_config_path(config_path_opt);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run 'amenity-finder init' to create one.",
            config_path.display()
        );
    }

    Config::load_from_file(&config_path)
}
