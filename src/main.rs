// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use house_price::{format_price, train, Config, Error, HouseInput, Predictor};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "house-price", version, about = "Train and query the house price model")]
struct Cli {
    /// Model artifact path (overrides HOUSE_PRICE_MODEL)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit the model on a CSV dataset and save the artifact
    Train {
        /// Training CSV (overrides HOUSE_PRICE_DATA)
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        test_size: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Price one house given on the command line
    Predict(HouseInput),
    /// Interactive prediction form (default)
    Ui,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.artifact_path = model;
    }

    match cli.command.unwrap_or(Command::Ui) {
        Command::Train { data, test_size, seed } => {
            if let Some(data) = data {
                config.data_path = data;
            }
            if let Some(test_size) = test_size {
                config.test_size = test_size;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            run_train(&config)?;
        }
        Command::Predict(input) => run_predict(&config, &input)?,
        Command::Ui => run_ui_mode(&config)?,
    }

    Ok(())
}

fn run_train(config: &Config) -> Result<()> {
    println!("🏋️  Training house price model");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n📂 Dataset: {:?}", config.data_path);

    let outcome = train(config).context("Training failed")?;
    let report = &outcome.report;

    println!(
        "✓ {} rows used ({} dropped), {} train / {} test",
        report.rows_used, report.rows_dropped, report.rows_train, report.rows_test
    );
    println!("✓ {} features", report.feature_names.len());

    println!("\n📊 Model Performance:");
    println!("   R² Score : {:.4}", report.metrics.r2);
    println!("   RMSE     : {:.2}", report.metrics.rmse);

    println!("\n✅ Model trained and saved to {:?}", config.artifact_path);
    println!("   Report: {:?}", config.report_path());

    Ok(())
}

/// Missing or corrupt artifacts end the process: there is no fallback model
fn load_predictor(config: &Config) -> Result<Predictor> {
    match Predictor::load(&config.artifact_path) {
        Ok(predictor) => Ok(predictor),
        Err(e @ (Error::ArtifactNotFound { .. } | Error::ArtifactCorrupt { .. })) => {
            eprintln!("❌ {}", e);
            eprintln!("   Run: cargo run -- train");
            eprintln!("   to train and save the model first.");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to load model artifact"),
    }
}

fn run_predict(config: &Config, input: &HouseInput) -> Result<()> {
    let predictor = load_predictor(config)?;

    match predictor.estimate(input) {
        Ok(estimate) => {
            println!("🏠 Estimated House Price: {}", format_price(estimate.price));
            Ok(())
        }
        Err(e) => {
            if let Some(expected) = e.expected_features() {
                eprintln!("⚠️  Feature mismatch! Your model expects different features.");
                eprintln!("   Expected features: {:?}", expected);
            } else {
                eprintln!("❌ Prediction Error: {}", e);
            }
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let predictor = load_predictor(config)?;

    println!("🖥️  Loading House Price Prediction form...\n");

    let mut app = ui::App::new(predictor);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: cargo run -- predict --area 3000 ...");
    eprintln!("   Or the web form: cargo run --bin house-price-server --features server");
    std::process::exit(1);
}
