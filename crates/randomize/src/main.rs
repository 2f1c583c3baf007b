mod csv_noise;
mod error;
mod geojson;
mod numeric;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Randomize demo data files for the tract dashboard", long_about = None)]
struct Cli {
    /// Seed for reproducible output (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Impute and perturb numeric fields of GeoJSON FeatureCollections in place
    Geojson {
        /// Files to rewrite (defaults to the bundled tract layers)
        files: Vec<PathBuf>,

        /// Property to randomize; repeat to override the default field list
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Maximum relative change applied to each value
        #[arg(long, default_value_t = geojson::DEFAULT_MAX_PCT)]
        max_pct: f64,
    },
    /// Add positive noise to the year columns of a CSV table
    CsvNoise {
        #[arg(long, default_value = csv_noise::DEFAULT_INPUT)]
        input: PathBuf,

        #[arg(long, default_value = csv_noise::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Noise scale; each cell grows by between 0.5x and 1.5x this amount
        #[arg(long, default_value_t = csv_noise::DEFAULT_NOISE)]
        noise: f64,

        /// Column to perturb; repeat to override the default year columns
        #[arg(long = "column")]
        columns: Vec<String>,

        /// Write every row with its columns in reverse order
        #[arg(long)]
        reverse_columns: bool,
    },
}

fn or_defaults<const N: usize>(given: Vec<String>, defaults: [&str; N]) -> Vec<String> {
    if given.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        given
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    match cli.command {
        Command::Geojson { files, fields, max_pct } => {
            ensure!((0.0..1.0).contains(&max_pct), "--max-pct must be in [0, 1), got {max_pct}");
            let files = if files.is_empty() {
                geojson::DEFAULT_TARGET_FILES.iter().map(PathBuf::from).collect()
            } else {
                files
            };
            let fields = or_defaults(fields, geojson::DEFAULT_FIELDS);
            for file in &files {
                geojson::process_file(file, &fields, max_pct, &mut rng)
                    .with_context(|| format!("Failed to randomize {}", file.display()))?;
            }
        }
        Command::CsvNoise { input, output, noise, columns, reverse_columns } => {
            ensure!(noise.is_finite() && noise >= 0.0, "--noise must be a non-negative number");
            let options = csv_noise::NoiseOptions {
                noise,
                columns: or_defaults(columns, csv_noise::DEFAULT_YEAR_COLUMNS),
                reverse_columns,
            };
            csv_noise::process_file(&input, &output, &options, &mut rng)
                .with_context(|| format!("Failed to add noise to {}", input.display()))?;
        }
    }
    Ok(())
}
