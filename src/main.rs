use std::time::Duration;

use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::database_interface::DatabaseInterface;
use crate::http::create_app;
use crate::local_store::LocalStore;
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod availability;
mod backend;
mod configuration;
mod configuration_handler;
mod conflicts;
mod database_interface;
mod error;
mod http;
mod lifecycle;
mod local_store;
mod notification;
mod schedule;
mod schema;
mod slots;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
pub struct AppState<B, C> {
    pub backend: B,
    pub configuration: C,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("##################");
    println!("# Barber Booking #");
    println!("##################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessable at:\n{}", address.clone());
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection: {database_url}. Retry in 1 sec. You may want to restart it with database disabled (impersistent appointments).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, configuration)
    } else {
        info!("No database configured, appointments are kept in memory only");
        create_app(LocalStore::default(), configuration)
    };

    axum::serve(listener, app).await.unwrap();
}
