mod config;
mod flows;
mod handlers;
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;

use config::Config;
use handlers::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Mealplan client...");

    let config = Config::from_env();
    match &config.backend_base_url {
        Some(url) => log::info!("✅ Backend: {}", url),
        None => log::warn!("⚠️ BACKEND_BASE_URL not set, recommendations will fail locally"),
    }
    match config.predict_url() {
        Some(url) => log::info!("✅ Predictor: {}", url),
        None => log::warn!("⚠️ No predictor endpoint, detection will fail locally"),
    }

    println!("\n🍜 Mealplan — kuliner Suroboyo di terminal!");
    println!("   Cari rekomendasi restoran sesuai selera dan kantong kamu,");
    println!("   atau unggah foto untuk mengenali makanan legendaris Surabaya.");

    let mut session = Session::new(&config);
    session.run().await?;

    log::info!("🛑 Shutting down...");
    Ok(())
}
