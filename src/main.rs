mod activity;
mod api;
mod app;
mod classifier;
mod config;
mod github;
mod hooks;
mod http;
mod store;
mod ui;

use actix_web::{middleware::Logger, App, HttpServer};
use color_eyre::eyre::{self, WrapErr as _};
use tracing_subscriber::EnvFilter;

use crate::store::{MemoryCollection, SqliteCollection, Store};

async fn open_store(config: &config::Config) -> eyre::Result<Store> {
    let timeout = config.store_timeout();
    match &config.database_url {
        Some(url) => {
            let collection = SqliteCollection::connect(url, config.max_connections, timeout)
                .await
                .wrap_err_with(|| format!("Failed to open database {}", url))?;
            Ok(Store::new(collection, timeout))
        }
        None => {
            tracing::warn!("HOOKWATCH_DATABASE_URL is not set, activities are kept in memory only");
            Ok(Store::new(MemoryCollection::new(), timeout))
        }
    }
}

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .finish(),
    )?;

    let config = config::Config::from_env().wrap_err("Failed to read configuration")?;
    let store = open_store(&config).await?;
    tracing::info!(
        "Listening on {}:{} with {:?}",
        config.host,
        config.port,
        store
    );

    HttpServer::new(move || {
        App::new()
            .data(store.clone())
            .wrap(Logger::default())
            .configure(app::routes)
    })
    .bind(config.bind())?
    .run()
    .await
    .map_err(Into::into)
}
