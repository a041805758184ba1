//! escopo-functions server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! user directory, and serves the admin callables over HTTP.
//!
//! # Bootstrapping an administrator
//!
//! ```
//! cargo run -p escopo-functions --bin server -- add-user --email root@example.com --admin
//! cargo run -p escopo-functions --bin server -- issue-token --uid <uid>
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use escopo_core::{caller::Claims, profile::ProfileDocument};
use escopo_functions::{AppState, ServerConfig};
use escopo_store_sqlite::SqliteDirectory;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Escopo admin callables server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the callables (default).
  Serve,
  /// Create an account and print its uid.
  AddUser {
    #[arg(long)]
    email: Option<String>,
    /// Grant the `admin` custom claim.
    #[arg(long)]
    admin: bool,
  },
  /// Replace the custom claims of an account.
  SetClaims {
    #[arg(long)]
    uid:   String,
    #[arg(long, action = ArgAction::Set)]
    admin: bool,
  },
  /// Sign an account in and print a bearer token for it.
  IssueToken {
    #[arg(long)]
    uid: String,
  },
  /// Write the profile document of an account.
  SetProfile {
    #[arg(long)]
    uid:           String,
    #[arg(long)]
    license:       Option<String>,
    /// RFC 3339 timestamp, e.g. `2025-01-31T23:59:59Z`.
    #[arg(long)]
    trial_ends_at: Option<DateTime<Utc>>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ESCOPO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteDirectory::open(&store_path)
    .await
    .with_context(|| format!("failed to open directory at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &server_cfg).await,
    Command::AddUser { email, admin } => {
      let record = store.create_identity(email).await?;
      if admin {
        store.set_claims(&record.uid, &Claims::admin()).await?;
      }
      println!("{}", record.uid);
      Ok(())
    }
    Command::SetClaims { uid, admin } => {
      store.set_claims(&uid, &Claims { admin }).await?;
      Ok(())
    }
    Command::IssueToken { uid } => {
      println!("{}", store.issue_token(&uid).await?);
      Ok(())
    }
    Command::SetProfile {
      uid,
      license,
      trial_ends_at,
    } => {
      store
        .put_profile(&ProfileDocument {
          id: uid,
          license_type: license,
          trial_ends_at,
        })
        .await?;
      Ok(())
    }
  }
}

async fn serve(store: SqliteDirectory, cfg: &ServerConfig) -> anyhow::Result<()> {
  let store = Arc::new(store);
  let state = AppState {
    identity: store.clone(),
    profiles: store,
  };

  let app = escopo_functions::router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
