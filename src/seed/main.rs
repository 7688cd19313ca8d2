//! Data seeders for the point-of-interest store.
//!
//! `sample` loads a CSV file or the built-in NYC landmarks, `random` scatters
//! generated records around a center point.

mod csv_rows;
mod generate;
mod landmarks;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use poi_locator::config::Config;
use poi_locator::PoiStore;

use crate::csv_rows::load_csv;
use crate::generate::ScatterArea;
use crate::landmarks::{random_city_draft, NYC_LANDMARKS};

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed the point of interest store")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store directory, overrides the config file
    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a CSV file, or NYC landmarks plus random city records
    Sample {
        /// CSV with name,category,longitude,latitude,description,address,phone,website,rating
        #[arg(long)]
        csv_file: Option<PathBuf>,

        /// Total records to generate when no CSV is loaded
        #[arg(long, default_value = "50")]
        count: usize,

        /// Remove existing records first
        #[arg(long)]
        clear: bool,
    },

    /// Scatter random records around a center
    Random {
        #[arg(long, default_value = "100")]
        count: usize,

        #[arg(long, default_value = "40.7580", allow_hyphen_values = true)]
        center_lat: f64,

        #[arg(long, default_value = "-74.0060", allow_hyphen_values = true)]
        center_lng: f64,

        #[arg(long, default_value = "10.0")]
        radius_km: f64,

        /// Seed for reproducible output
        #[arg(long)]
        rng_seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load_optional(args.config.as_ref())?;
    if let Some(path) = args.store_path {
        config.store.path = Some(path);
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(config.logging.env_filter())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = config.store.open().context("Failed to open store")?;

    match args.command {
        Command::Sample {
            csv_file,
            count,
            clear,
        } => seed_sample(&store, csv_file, count, clear)?,
        Command::Random {
            count,
            center_lat,
            center_lng,
            radius_km,
            rng_seed,
        } => {
            let area = ScatterArea {
                center_lat,
                center_lng,
                radius_km,
            };
            seed_random(&store, area, count, rng_seed)?
        }
    }

    store.flush()?;
    info!("Store now holds {} points of interest", store.len()?);
    Ok(())
}

fn seed_sample(store: &PoiStore, csv_file: Option<PathBuf>, count: usize, clear: bool) -> Result<()> {
    if clear {
        info!("Clearing existing records...");
        store.clear()?;
    }

    match csv_file {
        Some(path) if path.exists() => {
            load_csv(store, &path)?;
            return Ok(());
        }
        Some(path) => warn!("{} not found, generating records instead", path.display()),
        None => {}
    }

    info!("Generating {} NYC points of interest...", count);

    let mut created = 0;
    for landmark in &NYC_LANDMARKS {
        let draft = landmark
            .draft()
            .map_err(|e| anyhow::anyhow!("Invalid landmark {}: {}", landmark.name, e))?;
        if store.get_or_create(draft)?.1 {
            created += 1;
        }
    }

    let mut rng = StdRng::from_entropy();
    for n in 1..=count.saturating_sub(NYC_LANDMARKS.len()) {
        match random_city_draft(&mut rng, n) {
            Ok(draft) => {
                store.insert(draft)?;
                created += 1;
            }
            Err(e) => warn!("Skipping generated record {}: {}", n, e),
        }
    }

    info!("Created {} points of interest", created);
    Ok(())
}

fn seed_random(store: &PoiStore, area: ScatterArea, count: usize, rng_seed: Option<u64>) -> Result<()> {
    info!(
        "Generating {} points of interest around ({}, {}) within {} km...",
        count, area.center_lat, area.center_lng, area.radius_km
    );

    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut created = 0;
    for _ in 0..count {
        match area.draft(&mut rng) {
            Ok(draft) => {
                store.insert(draft)?;
                created += 1;
            }
            Err(e) => warn!("Skipping generated record: {}", e),
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    info!("Created {} points of interest", created);
    Ok(())
}
