//! Network Module
//!
//! Exposes a device over TCP, standing in for a device node.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - One device handle per connection

mod server;
mod connection;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use client::Client;
