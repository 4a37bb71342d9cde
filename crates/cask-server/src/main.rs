// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Cask secret store server binary.

use std::path::PathBuf;

use cask_server::{create_app_state, version};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cask server - encrypted, project-scoped secret storage.
#[derive(Parser, Debug)]
#[command(name = "cask-server", about = "Cask secret store server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/cask/server.toml)
	#[arg(long)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
	/// Apply the database schema and exit
	Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => cask_server_config::load_config_with_file(path)?,
		None => cask_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	config.log_summary();

	tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting cask-server");

	let pool = cask_server_db::create_pool(&config.database.url).await?;
	cask_server_db::run_migrations(&pool).await?;

	if let Some(Command::Migrate) = args.command {
		tracing::info!("migrations applied");
		return Ok(());
	}

	let _state = create_app_state(pool.clone(), &config);
	tracing::info!("secret store ready");

	tokio::signal::ctrl_c().await?;
	tracing::info!("Received shutdown signal");

	pool.close().await;
	tracing::info!("Server shutdown complete");
	Ok(())
}
