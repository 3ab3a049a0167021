//! bytedev CLI
//!
//! Interactive exerciser for a bytedev device, either remote or in-process.

use std::io;
use std::sync::Arc;

use bytedev::exerciser::Exerciser;
use bytedev::network::Client;
use bytedev::{Config, Device};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// bytedev CLI
#[derive(Parser, Debug)]
#[command(name = "bytedev-cli")]
#[command(about = "Interactive read/write/seek exerciser for bytedev")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7240")]
    server: String,

    /// Exercise an in-process device instead of connecting to a server
    #[arg(long)]
    local: bool,

    /// Capacity of the in-process device
    #[arg(short, long, default_value = "1024")]
    capacity: usize,
}

fn main() {
    // Logs go to stderr so they never interleave with the prompts
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut exerciser = Exerciser::new(stdin.lock(), stdout.lock());

    let result = if args.local {
        let config = Config::builder().capacity(args.capacity).build();
        match Device::initialize(&config) {
            Ok(device) => {
                let mut handle = Arc::new(device).open();
                exerciser.run(&mut handle)
            }
            Err(e) => Err(e),
        }
    } else {
        match Client::connect(&args.server) {
            Ok(mut client) => exerciser.run(&mut client),
            Err(e) => {
                eprintln!(
                    "ERROR: Could not open device at {}: {}",
                    args.server, e
                );
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
