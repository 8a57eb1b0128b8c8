//! Command-line arguments for moodtunes-server

use clap::Parser;
use moodtunes_common::config::ConfigOverrides;
use std::path::PathBuf;

/// Command-line arguments for moodtunes-server
#[derive(Parser, Debug)]
#[command(name = "moodtunes-server")]
#[command(about = "Emotion-based music recommendation service")]
#[command(version)]
pub struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MOODTUNES_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Classifier artifact
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Song catalog CSV
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Prediction log database
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Create the prediction log database and exit
    #[arg(long)]
    pub setup_db: bool,

    /// Print the latest N logged predictions and exit
    #[arg(long, value_name = "N", conflicts_with = "setup_db")]
    pub recent: Option<i64>,
}

impl Args {
    /// Values that replace the config file's
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_addr: self.bind.clone(),
            model_path: self.model.clone(),
            catalog_path: self.catalog.clone(),
            database_path: self.database.clone(),
        }
    }
}
