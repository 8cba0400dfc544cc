//! Main entry point for the order service.
//!
//! This binary loads the configuration, wires the configured storage backend
//! into the order service and exposes it over HTTP.

use clap::Parser;
use order_config::Config;
use order_core::{OrderService, OrderServiceBuilder, OrderServiceFactories};
use std::path::PathBuf;

mod apis;
mod server;

use order_storage::implementations::file::create_storage as create_file_storage;
use order_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order service on the configured storage
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order service");

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Invalid config path: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let service = build_service(config.clone())?;

	match config.api.filter(|api| api.enabled) {
		Some(api_config) => server::start_server(api_config, service).await?,
		None => tracing::info!("API server disabled, nothing to serve"),
	}

	tracing::info!("Stopped order service");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order service with every available storage backend registered.
fn build_service(config: Config) -> Result<OrderService, Box<dyn std::error::Error>> {
	let builder = OrderServiceBuilder::new(config);

	let storage_factories = create_factory_map!(
		order_storage::StorageInterface,
		order_storage::StorageError,
		"file" => create_file_storage,
		"memory" => create_memory_storage,
	);

	Ok(builder.build(OrderServiceFactories { storage_factories })?)
}
