use crate::configuration::Configuration;
use clap::Parser;
use std::env;
use tracing::warn;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_ADMIN_PASSWORD: &str = "123";

#[derive(Debug, Parser)]
#[command(about = "Backend for the customer-service appointment scheduler")]
struct Arguments {
    /// Port to listen on. Falls back to the PORT environment variable.
    #[arg(long)]
    port: Option<String>,

    /// PostgreSQL connection URL. Falls back to DATABASE_URL. Without it the
    /// schedule is kept in memory and lost on restart.
    #[arg(long)]
    database_url: Option<String>,

    /// Password required by the user-management routes. Falls back to
    /// ADMIN_PASSWORD.
    #[arg(long)]
    admin_password: Option<String>,
}

#[derive(Clone)]
pub struct ConfigurationHandler {
    port: String,
    database_url: Option<String>,
    admin_password: String,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        let arguments = Arguments::parse();

        let admin_password = arguments
            .admin_password
            .or_else(|| env::var("ADMIN_PASSWORD").ok())
            .unwrap_or_else(|| {
                warn!("ADMIN_PASSWORD is not set, falling back to the default password");
                DEFAULT_ADMIN_PASSWORD.to_string()
            });

        Self {
            port: arguments
                .port
                .or_else(|| env::var("PORT").ok())
                .unwrap_or_else(|| DEFAULT_PORT.to_string()),
            database_url: arguments
                .database_url
                .or_else(|| env::var("DATABASE_URL").ok()),
            admin_password,
        }
    }
}

impl Configuration for ConfigurationHandler {
    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }
}
