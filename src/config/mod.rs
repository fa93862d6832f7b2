use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::auth::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one JSON file per stored collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// When set, collections are stored in Postgres instead of `data_dir`
    #[serde(default)]
    pub database_url: Option<String>,
    /// Where generated quote documents are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Command run on each generated document, e.g. `xdg-open` or `lp`
    #[serde(default)]
    pub print_command: Option<String>,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("orcamentos")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("marcenaria.log")
}

fn default_admin_email() -> String {
    DEFAULT_ADMIN_EMAIL.to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

/// Command line flags. Each one overrides the matching environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "marcenaria", version, about = "Quotes, catalog, clients and expenses for a woodworking shop")]
pub struct Cli {
    /// Directory for the JSON store
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Postgres connection URL; replaces the JSON store
    #[arg(long)]
    pub database_url: Option<String>,
    /// Directory for generated quote documents
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Command used to open or print a generated document
    #[arg(long)]
    pub print_command: Option<String>,
    /// File receiving log output
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    /// 
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(dir) = cli.data_dir {
            self.data_dir = dir;
        }
        if cli.database_url.is_some() {
            self.database_url = cli.database_url;
        }
        if let Some(dir) = cli.output_dir {
            self.output_dir = dir;
        }
        if cli.print_command.is_some() {
            self.print_command = cli.print_command;
        }
        if let Some(file) = cli.log_file {
            self.log_file = file;
        }
        self
    }

    /// Get the database URL, if a Postgres store was configured
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Parse the command line, load the environment and merge both
pub fn init() -> Result<Config> {
    let cli = Cli::parse();

    let config = Config::load()?.with_cli(cli);

    Ok(config)
}
