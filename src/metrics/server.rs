// Metrics server - serves the counter pair over a minimal HTTP subset

use crate::error::{ResupError, Result};
use crate::metrics::store::MetricsStore;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Listen backlog for the scrape socket. Traffic is periodic low-rate
/// scraping, not production load.
const ACCEPT_BACKLOG: u32 = 8;

/// Upper bound on the bytes read from one request. The protocol is
/// request-response with a single read; anything past this is ignored.
const MAX_REQUEST_BYTES: usize = 1024;

/// HTTP endpoint exposing the supervisor's run counters
///
/// Runs on its own tokio task, reads the shared [`MetricsStore`] on each
/// request and stops when the supervision loop fires the shutdown
/// channel. Connections are handled one at a time; every response closes
/// the connection.
pub struct MetricsServer {
    addr: SocketAddr,
    store: MetricsStore,
}

impl MetricsServer {
    /// Create a server for the given bind address and counter store
    pub fn new(addr: SocketAddr, store: MetricsStore) -> Self {
        Self { addr, store }
    }

    /// Create the listening socket
    ///
    /// Address reuse is enabled so a restarted supervisor can rebind
    /// immediately. Any failure here is fatal to the server only.
    fn bind(&self) -> Result<TcpListener> {
        let socket = if self.addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| ResupError::MetricsServerError(format!("Failed to create socket: {}", e)))?;

        socket
            .set_reuseaddr(true)
            .map_err(|e| ResupError::MetricsServerError(format!("Failed to set SO_REUSEADDR: {}", e)))?;

        socket
            .bind(self.addr)
            .map_err(|e| ResupError::MetricsServerError(format!("Failed to bind {}: {}", self.addr, e)))?;

        socket
            .listen(ACCEPT_BACKLOG)
            .map_err(|e| ResupError::MetricsServerError(format!("Failed to listen on {}: {}", self.addr, e)))
    }

    /// Serve scrape requests until the shutdown channel fires
    ///
    /// All faults are absorbed here: a bind failure logs and returns
    /// without affecting the supervision loop, and per-connection errors
    /// never stop the accept loop. The select over the listener and the
    /// shutdown receiver is what makes shutdown race-free - the same
    /// wait that delivers "connection ready" also delivers "stop".
    pub async fn serve(self, mut shutdown: oneshot::Receiver<()>) {
        let listener = match self.bind() {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to start metrics server: {}", e);
                return;
            }
        };

        info!("Metrics server listening on {}", self.addr);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Metrics server received shutdown signal");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            if let Err(e) = handle_connection(stream, &self.store).await {
                                warn!("Failed to serve metrics request from {}: {}", peer, e);
                            }
                        }
                        Err(e) => {
                            warn!("Failed to accept metrics connection: {}", e);
                        }
                    }
                }
            }
        }

        info!("Metrics server stopped");
    }
}

/// Handle a single accepted connection: one read, one response, close
async fn handle_connection(mut stream: TcpStream, store: &MetricsStore) -> Result<()> {
    let mut buffer = [0u8; MAX_REQUEST_BYTES];
    let read = stream
        .read(&mut buffer)
        .await
        .map_err(|e| ResupError::MetricsServerError(format!("Failed to read request: {}", e)))?;

    let request = String::from_utf8_lossy(&buffer[..read]);
    let response = route_request(&request, store);

    stream
        .write_all(response.as_bytes())
        .await
        .map_err(|e| ResupError::MetricsServerError(format!("Failed to write response: {}", e)))?;

    stream
        .shutdown()
        .await
        .map_err(|e| ResupError::MetricsServerError(format!("Failed to close connection: {}", e)))?;

    Ok(())
}

/// Route a raw request head to a complete response
///
/// Exact-prefix matching on the request line is all the fixed route set
/// needs; there is no header parsing. Requests that match neither route,
/// including non-GET methods, are answered with a 404 rather than
/// dropped.
fn route_request(request: &str, store: &MetricsStore) -> String {
    if request.starts_with("GET /metrics ") {
        let snapshot = store.snapshot();
        let body = format!(
            "success_total {}\nfailures_total {}\n",
            snapshot.success_total, snapshot.failure_total
        );
        build_response("200 OK", &body)
    } else if request.starts_with("GET / ") {
        build_response("200 OK", "resup process supervisor. Counters are served at /metrics\n")
    } else {
        build_response("404 Not Found", "Not found.")
    }
}

/// Frame a complete HTTP/1.1 response around a plain-text body
fn build_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}
