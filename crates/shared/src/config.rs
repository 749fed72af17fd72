//! Application configuration management.

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Receipt numbering and rendering configuration.
    #[serde(default)]
    pub receipt: ReceiptConfig,
    /// Company details printed on receipts.
    #[serde(default)]
    pub company: CompanyDetails,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Receipt configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptConfig {
    /// Prefix for generated receipt numbers.
    #[serde(default = "default_receipt_prefix")]
    pub number_prefix: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_receipt_prefix(),
        }
    }
}

fn default_receipt_prefix() -> String {
    "RCP".to_string()
}

/// Company details denormalized into each receipt at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    /// Trading name shown on receipts.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email address.
    pub email: String,
}

impl Default for CompanyDetails {
    fn default() -> Self {
        Self {
            name: "Tillbook Retail".to_string(),
            address: "Nairobi, Kenya".to_string(),
            phone: "+254 700 000000".to_string(),
            email: "info@tillbook.example".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TILLBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
