mod classifier;
mod config;
mod corpus;
mod error;
mod handlers;
mod models;
mod service;
mod store;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use crate::classifier::TextClassifier;
use crate::config::AppConfig;
use crate::service::PredictionService;
use crate::store::PredictionStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    // No model, no traffic: every failure here aborts before binding.
    let corpus = corpus::load(&config.data_path)
        .with_context(|| format!("loading corpus {}", config.data_path.display()))?;
    log::info!(
        "loaded {} training reviews from {}",
        corpus.len(),
        config.data_path.display()
    );

    let model = TextClassifier::default()
        .fit(&corpus.texts, &corpus.labels)
        .context("training classifier")?;
    log::info!("classifier ready, vocabulary of {} terms", model.vocabulary_len());

    let store = PredictionStore::open(&config.db_path, config.db_max_connections)
        .await
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    log::info!("prediction log at {}", config.db_path.display());

    let service = web::Data::new(PredictionService::new(model, store));
    let app_service = service.clone();

    log::info!("Server running at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_service.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("binding {}", config.bind_addr))?
    .run()
    .await?;

    service.close_store().await;
    Ok(())
}
