//! Graph API Server
//!
//! Serves an in-memory graph store over HTTP.
use clap::{Arg, Command};
use graph_api::core::{config, factory::create_app_state};
use graph_api::{log_error, log_info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let matches = Command::new("graph-api")
        .version(graph_api::VERSION)
        .about("HTTP API for a partitioned graph store")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
        )
        .get_matches();

    // Load configuration, then apply CLI overrides
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let (mut config, source) = config::load_config_or_default(config_path);

    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config = config.with_http_addr(addr)?;
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config = config.with_log_level(level);
    }

    // Initialize logging, then report how the configuration was obtained
    graph_api::init_logging(&config.logging.level);
    source.report();

    log_info!("Starting graph API server");

    // Create AppState using factory pattern
    let app_state = create_app_state(config);
    log_info!("AppState created successfully");

    if let Err(e) = graph_api::start_api_server(app_state).await {
        log_error!("HTTP server failed: {}", e);
        return Err(e);
    }

    log_info!("Shutdown complete");
    Ok(())
}
