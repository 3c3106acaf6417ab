// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gatehouse login provisioning server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gatehouse_server::{cors_layer, create_app_state, create_router, Backends};
use gatehouse_server_config::{LogFormat, ServerConfig};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod version;

/// Gatehouse server - admin-gated provisioning of login identities.
#[derive(Parser, Debug)]
#[command(
	name = "gatehouse-server",
	about = "Admin-gated login identity provisioning server",
	version
)]
struct Args {
	/// Path to the TOML config file (defaults to /etc/gatehouse/server.toml)
	#[arg(long, env = "GATEHOUSE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match config.logging.format {
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => gatehouse_server_config::load_config_with_file(path)?,
		None => gatehouse_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		"starting gatehouse-server"
	);

	let backends = Backends::from_config(&config.backend)?;
	let state = create_app_state(backends.provider, backends.directory);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&config.cors)?);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
