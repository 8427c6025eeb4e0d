//! HTTP endpoint in front of the synthesizer
//!
//! One accept loop hands connections to a fixed pool of worker threads over
//! a bounded channel. Workers share the read-only [`AppState`]; each request
//! is a single independent synthesis.

pub mod http;
pub mod routes;

use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, error, info, warn};

use crate::synth::Synthesizer;
use crate::utils::consts::*;
use http::{HttpResponse, Limits, read_request};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub cors_origins: Vec<String>,
    pub max_bits: usize,
    pub max_body_bytes: usize,
    pub socket_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            cors_origins: CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_bits: MAX_BITSTREAM_LEN,
            max_body_bytes: MAX_BODY_BYTES,
            socket_timeout: Duration::from_millis(SOCKET_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    /// Defaults, with the port taken from `PORT` when it is set and valid.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(PORT_ENV_VAR) {
            match value.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid {}={:?}", PORT_ENV_VAR, value),
            }
        }
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn limits(&self) -> Limits {
        Limits {
            max_line_bytes: MAX_LINE_BYTES,
            max_headers: MAX_HEADER_COUNT,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Shared, read-only state handed to every worker
pub struct AppState {
    pub synth: Synthesizer,
    pub config: ServerConfig,
}

/// Stops a running [`Server`] from another thread
#[derive(Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Stop the server on Ctrl+C. Can only be installed once per process.
pub fn install_ctrlc(handle: ShutdownHandle) -> io::Result<()> {
    ctrlc::set_handler(move || {
        info!("Shutdown requested");
        handle.shutdown();
    })
    .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("{err}")))
}

pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    running: Arc<AtomicBool>,
}

impl Server {
    pub fn bind(config: ServerConfig, synth: Synthesizer) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr())?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            state: Arc::new(AppState { synth, config }),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.running.clone())
    }

    /// Serve until the shutdown handle fires, then drain the workers.
    pub fn run(self) -> io::Result<()> {
        let workers = self.state.config.workers.max(1);
        let (tx, rx) = crossbeam_channel::bounded::<TcpStream>(workers * 16);

        let handles: Vec<JoinHandle<()>> = (0..workers)
            .map(|id| {
                let rx = rx.clone();
                let state = self.state.clone();
                thread::Builder::new()
                    .name(format!("worker-{id}"))
                    .spawn(move || worker_loop(id, rx, state))
            })
            .collect::<io::Result<_>>()?;
        drop(rx);

        info!(
            "Listening on http://{} with {} workers",
            self.local_addr()?,
            workers
        );

        let result = self.accept_loop(&tx);

        // 关闭通道，等待 worker 退出
        drop(tx);
        for handle in handles {
            if handle.join().is_err() {
                error!("Worker thread panicked");
            }
        }
        info!("Server stopped");
        result
    }

    fn accept_loop(&self, tx: &Sender<TcpStream>) -> io::Result<()> {
        while self.running.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!("Accepted connection from {}", peer);
                    stream.set_nonblocking(false)?;
                    match tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(stream)) => {
                            warn!("All workers busy, rejecting {}", peer);
                            let _ = reject_busy(stream);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            error!("Worker pool is gone");
                            break;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(ACCEPT_POLL_MS));
                }
                Err(e) => {
                    warn!("Accept error: {}", e);
                    thread::sleep(Duration::from_millis(ACCEPT_POLL_MS));
                }
            }
        }
        Ok(())
    }
}

fn reject_busy(mut stream: TcpStream) -> io::Result<()> {
    HttpResponse::error(503, "busy", "server is busy, retry later")
        .with_header("Retry-After", "1")
        .write_to(&mut stream)
}

fn worker_loop(id: usize, rx: Receiver<TcpStream>, state: Arc<AppState>) {
    debug!("Worker {} started", id);
    while let Ok(stream) = rx.recv() {
        if let Err(e) = handle_connection(stream, &state) {
            debug!("Worker {}: connection error: {}", id, e);
        }
    }
    debug!("Worker {} stopping", id);
}

fn handle_connection(stream: TcpStream, state: &AppState) -> io::Result<()> {
    let started = Instant::now();
    let timeout = Some(state.config.socket_timeout);
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;

    let mut reader = BufReader::new(&stream);
    let request = match read_request(&mut reader, &state.config.limits()) {
        Ok(request) => request,
        Err(err) => {
            match err.to_response() {
                Some(response) => {
                    warn!("Unreadable request: {}", err);
                    response.write_to(&mut &stream)?;
                }
                None => debug!("Dropping connection: {}", err),
            }
            return Ok(());
        }
    };

    let response = routes::route(&request, state);
    response.write_to(&mut &stream)?;
    info!(
        "{} {} -> {} ({:.1?})",
        request.method,
        request.path,
        response.status,
        started.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.cors_origins.len(), 3);
        assert_eq!(config.max_bits, MAX_BITSTREAM_LEN);
    }

    #[test]
    fn test_shutdown_handle() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..ServerConfig::default()
        };
        let server = Server::bind(config, Synthesizer::default()).unwrap();
        let handle = server.shutdown_handle();
        assert!(handle.is_running());
        handle.shutdown();
        // returns immediately once the flag is cleared
        server.run().unwrap();
    }
}
