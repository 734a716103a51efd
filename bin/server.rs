// House Price Estimator - Web Server
// Serves the prediction form and the JSON predict API

use anyhow::{Context, Result};
use house_price::{router, Config, Error, Predictor};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🌐 House Price Estimator - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;

    // No safe default model exists: a missing or corrupt artifact stops the process
    let predictor = match Predictor::load(&config.artifact_path) {
        Ok(predictor) => predictor,
        Err(e @ (Error::ArtifactNotFound { .. } | Error::ArtifactCorrupt { .. })) => {
            eprintln!("❌ {}", e);
            eprintln!("   Run: cargo run -- train");
            eprintln!("   to train and save the model first.");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load model artifact"),
    };
    println!(
        "✓ Model loaded: {:?} ({} features)",
        config.artifact_path,
        predictor.feature_names().len()
    );

    let app = router(predictor);

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: POST /api/predict");
    println!("   UI:  /");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
