use crate::configuration::Configuration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(about = "Booking platform for barbers and their clients")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(long, default_value = "3000")]
    port: String,

    /// Shared key expected in the x-provider-key header on provider routes
    #[arg(long)]
    provider_key: Option<String>,

    /// PostgreSQL connection URL; falls back to DATABASE_URL, then to the
    /// impersistent in-memory store
    #[arg(long)]
    database_url: Option<String>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn provider_key(&self) -> String {
        self.provider_key
            .clone()
            .or_else(|| std::env::var("PROVIDER_KEY").ok())
            .unwrap_or_else(|| "123".into())
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}
