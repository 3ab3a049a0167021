//! TCP Server
//!
//! Accepts connections and dispatches them to a fixed pool of workers.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};
use parking_lot::Mutex;

use super::Connection;
use crate::config::Config;
use crate::device::Device;
use crate::error::{DeviceError, Result};

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server exposing one device
///
/// Every accepted client gets its own handle (and so its own cursor) on the
/// shared device.
pub struct Server {
    config: Config,
    device: Arc<Device>,
    listener: TcpListener,
    shutdown: AtomicBool,
    live: Arc<LiveConnections>,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, device: Arc<Device>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            DeviceError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        Ok(Self {
            config,
            device,
            listener,
            shutdown: AtomicBool::new(false),
            live: Arc::new(LiveConnections::default()),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the server (blocking until `shutdown` is called)
    pub fn run(&self) -> Result<()> {
        self.listener.set_nonblocking(true)?;

        let workers = self.config.max_connections;
        let (tx, rx) = channel::bounded::<TcpStream>(workers);

        let mut pool = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let rx = rx.clone();
            let device = Arc::clone(&self.device);
            let live = Arc::clone(&self.live);
            let timeouts = (self.config.read_timeout_ms, self.config.write_timeout_ms);

            let handle = thread::Builder::new()
                .name(format!("bytedev-worker-{}", worker_id))
                .spawn(move || worker_loop(rx, device, live, timeouts))?;
            pool.push(handle);
        }
        drop(rx);

        tracing::info!(
            "Serving device {} on {} with {} workers",
            self.device.name(),
            self.local_addr()?,
            workers
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("Accepted connection from {}", addr);
                    match tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Worker pool saturated, dropping connection from {}", addr);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::warn!("Worker pool gone, dropping connection from {}", addr);
                            break;
                        }
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        // Busy workers see their sockets closed, idle ones see the channel close
        self.live.close_all();
        drop(tx);
        for handle in pool {
            if handle.join().is_err() {
                tracing::warn!("Worker thread panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    ///
    /// Live connections are closed so their workers return and `run` can
    /// join them.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.live.close_all();
    }
}

/// Sockets of the connections workers are currently serving
#[derive(Default)]
struct LiveConnections {
    next_id: AtomicU64,
    state: Mutex<LiveState>,
}

#[derive(Default)]
struct LiveState {
    closed: bool,
    streams: HashMap<u64, TcpStream>,
}

impl LiveConnections {
    /// Track a clone of `stream`; `None` once the server is closing
    fn register(&self, stream: &TcpStream) -> Result<Option<u64>> {
        let clone = stream.try_clone()?;
        let mut state = self.state.lock();
        if state.closed {
            return Ok(None);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        state.streams.insert(id, clone);
        Ok(Some(id))
    }

    fn unregister(&self, id: u64) {
        self.state.lock().streams.remove(&id);
    }

    /// Refuse new registrations and close every tracked socket
    fn close_all(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        for (_, stream) in state.streams.drain() {
            // The peer may already be gone
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

fn worker_loop(
    rx: Receiver<TcpStream>,
    device: Arc<Device>,
    live: Arc<LiveConnections>,
    (read_ms, write_ms): (u64, u64),
) {
    for stream in rx.iter() {
        // Accepted sockets may inherit the listener's non-blocking mode
        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!("Failed to configure connection: {}", e);
            continue;
        }

        let id = match live.register(&stream) {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!("Server closing, dropping queued connection");
                continue;
            }
            Err(e) => {
                tracing::warn!("Failed to track connection: {}", e);
                continue;
            }
        };

        let result = Connection::new(stream, &device).and_then(|mut conn| {
            conn.set_timeouts(read_ms, write_ms)?;
            conn.handle()
        });
        live.unregister(id);

        if let Err(e) = result {
            tracing::warn!("Connection ended with error: {}", e);
        }
    }
}
