//! `escopo` — command-line admin client for the Escopo user directory.
//!
//! # Usage
//!
//! ```
//! escopo --url http://localhost:8080 --token <admin-token> users
//! escopo --config ~/.config/escopo/config.toml disable <uid>
//! ```

mod client;
mod table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "escopo", about = "Admin client for the Escopo user directory")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the callables server (default: http://localhost:8080).
  #[arg(long, env = "ESCOPO_URL")]
  url: Option<String>,

  /// Bearer token of an admin account.
  #[arg(long, env = "ESCOPO_TOKEN")]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every account, newest first.
  Users,
  /// Disable an account.
  Disable { uid: String },
  /// Re-enable an account.
  Enable { uid: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Users => {
      let users = client.list_users().await?;
      println!("{}", table::render(&users));
    }
    Command::Disable { uid } => println!("{}", client.set_user_status(&uid, true).await?),
    Command::Enable { uid } => println!("{}", client.set_user_status(&uid, false).await?),
  }

  Ok(())
}
