use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use booklayer::config::StoreConfig;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mongodb,
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "books", about = "Run a create/read/update/delete cycle against the books collection")]
pub struct Cli {
    /// TOML file with store settings; flags and environment override it
    #[arg(long, env = "BOOKS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "mongodb")]
    pub backend: Backend,

    /// Connection string
    #[arg(long, env = "BOOKS_MONGODB_URI")]
    pub uri: Option<String>,

    #[arg(long, env = "BOOKS_DATABASE")]
    pub database: Option<String>,

    #[arg(long, env = "BOOKS_COLLECTION")]
    pub collection: Option<String>,

    /// Maximum wait for the connection, in milliseconds
    #[arg(long, env = "BOOKS_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: Option<u64>,

    /// Per-call timeout, in milliseconds
    #[arg(long, env = "BOOKS_OPERATION_TIMEOUT_MS")]
    pub operation_timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags/environment.
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str::<StoreConfig>(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            },
            None => StoreConfig::default(),
        };

        if let Some(uri) = &self.uri {
            config.uri = uri.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(collection) = &self.collection {
            config.collection = collection.clone();
        }
        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.operation_timeout_ms {
            config.operation_timeout_ms = ms;
        }

        Ok(config)
    }
}
