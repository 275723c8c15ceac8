// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{start_server, AppState};
use crate::config::{AppConfig, CachePolicy, ConfigError};
use crate::models::ModelRegistry;

/// Liveness detection web service
#[derive(Parser, Debug)]
#[command(name = "liveness-web")]
#[command(version)]
#[command(about = "Face liveness classification and reconstruction over HTTP", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "LIVENESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for uploads and generated images
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Load every configured model and report which ones are usable
    CheckModels,
}

impl Cli {
    /// Defaults, then the config file, then environment, then flags
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        let mut config = base.apply_env()?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.load_config().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let registry = Arc::new(ModelRegistry::new(config.models.cache));
            registry.warm_up(&config.models).await;

            let state = AppState::new(config, registry).context("Invalid LBP parameters")?;
            start_server(Arc::new(state))
                .await
                .context("HTTP server failed")
        }
        Commands::CheckModels => {
            // Always cache here so list_models can report what loaded
            let registry = ModelRegistry::new(CachePolicy::Shared);
            registry.warm_up(&config.models).await;

            let models = registry.list_models(&config.models).await;
            let missing = models.iter().filter(|m| !m.loaded).count();

            for model in &models {
                if model.loaded {
                    info!("✅ {} ({})", model.name, model.path);
                } else {
                    warn!("⚠️ {} unavailable ({})", model.name, model.path);
                }
            }

            if missing > 0 {
                anyhow::bail!("{} of {} models failed to load", missing, models.len());
            }
            Ok(())
        }
    }
}
