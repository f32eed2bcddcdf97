#[cfg(feature = "api-server")]
mod api;
mod error;
mod handlers;
mod models;
mod services;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenv::dotenv;

use handlers::AnalysisHandler;
use services::{DailyLedger, NutritionEnricher, OpenRouterVision};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv().ok();

    log::info!("🚀 Starting foodlens...");

    let vision_api_key = env::var("VISION_API_KEY")
        .expect("VISION_API_KEY must be set in .env file");

    let vision_model = env::var("VISION_MODEL")
        .unwrap_or_else(|_| "qwen/qwen2.5-vl-32b-instruct:free".to_string());

    let vision_api_url = env::var("VISION_API_URL")
        .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".to_string());

    let vision_timeout_secs = env::var("VISION_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(25);

    let vision = Arc::new(OpenRouterVision::with_config(
        vision_api_key,
        vision_model.clone(),
        vision_api_url,
        Duration::from_secs(vision_timeout_secs),
    ));
    log::info!("✅ Vision client initialized with model: {}", vision_model);

    let food_api_url = env::var("FOOD_API_URL")
        .unwrap_or_else(|_| "https://world.openfoodfacts.org".to_string());
    let enricher = Arc::new(NutritionEnricher::with_api_url(food_api_url));
    log::info!("✅ Nutrition enricher initialized");

    let ledger_path = env::var("LEDGER_PATH").unwrap_or_else(|_| "data/ledger.json".to_string());
    let ledger = Arc::new(DailyLedger::open(&ledger_path)?);
    log::info!("✅ Daily ledger opened at {}", ledger_path);

    let handler = Arc::new(AnalysisHandler::new(vision, enricher, ledger));
    log::info!("✅ Analysis handler initialized");

    #[cfg(feature = "api-server")]
    {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let app = api::create_api_router(handler.clone());

        log::info!("🌐 API server starting on {}", bind_addr);

        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .expect("Failed to bind API server");
            axum::serve(listener, app)
                .await
                .expect("Failed to start API server");
        });

        log::info!("✅ API server started");
    }

    log::info!("🎉 foodlens is ready!");
    println!("\n📷 POST a food photo to /api/analyze");
    println!("📋 GET /api/history for today's log");
    println!("🛑 Ctrl+C to stop\n");

    tokio::signal::ctrl_c().await?;

    log::info!("🛑 Shutting down...");

    Ok(())
}
