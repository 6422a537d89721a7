use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::database_schedule::DatabaseSchedule;
use crate::http::create_app;
use crate::local_schedule::LocalSchedule;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backend;
mod configuration;
mod configuration_handler;
mod database_schedule;
mod http;
mod local_schedule;
mod schema;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("###########################");
    println!("# Appointment Scheduler   #");
    println!("###########################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessible at:\n{}", address);
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseSchedule::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection: {database_url}. Retry in 1 sec. You may want to restart with the database disabled (impersistent schedule).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, configuration)
    } else {
        info!("No database configured, keeping the schedule in memory");
        create_app(LocalSchedule::default(), configuration)
    };

    axum::serve(listener, app).await.unwrap();
}
