use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::envelope::{RpcReply, RpcRequest, SignedEnvelope};
use super::frame::{read_frame, write_frame};
use super::RpcService;
use crate::error::{AuctionError, AuctionResult};

/// TCP server dispatching verified requests to an [`RpcService`].
///
/// A connection that has not delivered its request frame within
/// `read_timeout` is dropped.
pub struct RpcServer {
    listener: TcpListener,
    service: Arc<dyn RpcService>,
    shutdown: CancellationToken,
    read_timeout: Duration,
}

impl RpcServer {
    /// Bind to `addr`. Port 0 picks a free port; see [`Self::local_addr`].
    pub async fn bind(
        addr: SocketAddr,
        service: Arc<dyn RpcService>,
        shutdown: CancellationToken,
        read_timeout: Duration,
    ) -> AuctionResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AuctionError::Network(format!("Failed to bind {addr}: {e}")))?;
        Ok(Self {
            listener,
            service,
            shutdown,
            read_timeout,
        })
    }

    pub fn local_addr(&self) -> AuctionResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| AuctionError::Network(format!("Failed to read local address: {e}")))
    }

    /// Accept connections until the shutdown token is cancelled.
    pub async fn run(self) {
        match self.local_addr() {
            Ok(addr) => info!("RPC server listening on {}", addr),
            Err(e) => warn!("RPC server started: {}", e),
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("RPC server shutting down");
                    break;
                }
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            let service = Arc::clone(&self.service);
                            let shutdown = self.shutdown.clone();
                            let read_timeout = self.read_timeout;
                            tokio::spawn(async move {
                                tokio::select! {
                                    _ = shutdown.cancelled() => {}
                                    result = handle_connection(stream, service, read_timeout) => {
                                        if let Err(e) = result {
                                            debug!("Connection from {} ended: {}", peer_addr, e);
                                        }
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Serve one request on `stream` and reply.
async fn handle_connection(
    mut stream: TcpStream,
    service: Arc<dyn RpcService>,
    read_timeout: Duration,
) -> AuctionResult<()> {
    let frame = tokio::time::timeout(read_timeout, read_frame(&mut stream))
        .await
        .map_err(|_| {
            AuctionError::Network(format!("No request received within {read_timeout:?}"))
        })??;
    let reply = match dispatch(&frame, service.as_ref()).await {
        Ok(body) => RpcReply::Ok(body),
        Err(e) => {
            warn!("RPC request failed: {}", e);
            RpcReply::Err(e.to_string())
        }
    };
    write_frame(&mut stream, &reply.to_bytes()?).await
}

async fn dispatch(frame: &[u8], service: &dyn RpcService) -> AuctionResult<Vec<u8>> {
    let (payload, caller) = SignedEnvelope::verify_and_unwrap(frame)?;
    let request = RpcRequest::from_bytes(&payload)?;
    debug!("RPC '{}' from {}", request.method, caller);
    service.call(&caller, &request.method, &request.body).await
}
