//! bytedev Server Binary
//!
//! Initializes a device and serves it over TCP.

use std::sync::Arc;

use bytedev::network::Server;
use bytedev::{Config, Device};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// bytedev Server
#[derive(Parser, Debug)]
#[command(name = "bytedev-server")]
#[command(about = "Fixed-capacity byte device served over TCP")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7240")]
    listen: String,

    /// Device capacity in bytes
    #[arg(short, long, default_value = "1024")]
    capacity: usize,

    /// Worker threads (maximum concurrent clients)
    #[arg(short, long, default_value = "16")]
    max_connections: usize,

    /// Name to register the device under
    #[arg(short = 'n', long, default_value = "PA2Device")]
    device_name: String,

    /// Major number to register the device with
    #[arg(long, default_value = "240")]
    major: u8,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bytedev=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("bytedev Server v{}", bytedev::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .capacity(args.capacity)
        .max_connections(args.max_connections)
        .device_name(&args.device_name)
        .major(args.major)
        .build();

    let device = match Device::initialize(&config) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            tracing::error!("Failed to initialize device: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, Arc::clone(&device)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    drop(server);
    match device.teardown() {
        Ok(stats) => tracing::info!("Final device stats: {:?}", stats),
        Err(e) => tracing::warn!("Device teardown failed: {}", e),
    }
}
