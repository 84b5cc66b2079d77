//! WebSocket fan-out of serialized frames.
//!
//! The sender owns a Tokio runtime running an accept loop. Every connected
//! client subscribes to a broadcast channel; `send` pushes one text message
//! per frame into it and returns without waiting for delivery.

use crate::{Sender, TransportError};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// Frames buffered per client before slow clients start skipping.
const CHANNEL_CAPACITY: usize = 256;

type ClientSet = Arc<Mutex<HashSet<SocketAddr>>>;

/// Broadcasts frames to every connected WebSocket client.
pub struct WebSocketSender {
    address: String,
    local_addr: Option<SocketAddr>,
    tx: Option<broadcast::Sender<String>>,
    clients: ClientSet,
    // Dropping the runtime stops the server.
    runtime: Option<Runtime>,
}

impl WebSocketSender {
    pub fn new(address: &str) -> Self {
        WebSocketSender {
            address: address.to_string(),
            local_addr: None,
            tx: None,
            clients: Arc::new(Mutex::new(HashSet::new())),
            runtime: None,
        }
    }

    /// Binds the listener and starts accepting clients in the background.
    pub fn start(&mut self) -> Result<(), TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Runtime(e.to_string()))?;

        let socket_addr: SocketAddr = self
            .address
            .parse()
            .map_err(|e| TransportError::WebSocket(format!("Invalid address '{}': {}", self.address, e)))?;

        let listener = runtime.block_on(TcpListener::bind(socket_addr))?;
        let local_addr = listener.local_addr()?;
        info!("WebSocket server listening on ws://{}", local_addr);

        let (tx, _) = broadcast::channel::<String>(CHANNEL_CAPACITY);
        runtime.spawn(accept_loop(listener, tx.clone(), Arc::clone(&self.clients)));

        self.tx = Some(tx);
        self.local_addr = Some(local_addr);
        self.runtime = Some(runtime);
        Ok(())
    }

    /// Address actually bound, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Returns the number of connected clients
    pub fn client_count(&self) -> usize {
        lock_clients(&self.clients).len()
    }
}

impl Sender for WebSocketSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| TransportError::WebSocket("WebSocket server not started".to_string()))?;

        let text = std::str::from_utf8(data)
            .map_err(|e| TransportError::WebSocket(format!("Invalid UTF-8: {}", e)))?;

        // Err only means there are no subscribers right now.
        if tx.receiver_count() > 0 {
            let _ = tx.send(text.to_string());
        }
        Ok(())
    }
}

async fn accept_loop(listener: TcpListener, tx: broadcast::Sender<String>, clients: ClientSet) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if !lock_clients(&clients).insert(peer) {
                    continue;
                }
                let count = lock_clients(&clients).len();
                info!("Client connected: {}. Total clients: {}", peer, count);
                tokio::spawn(handle_connection(stream, peer, tx.subscribe(), Arc::clone(&clients)));
            }
            Err(e) => warn!("Failed to accept WebSocket connection: {}", e),
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    mut rx: broadcast::Receiver<String>,
    clients: ClientSet,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", peer, e);
            remove_client(peer, &clients);
            return;
        }
    };
    let (mut outgoing, mut incoming) = ws_stream.split();

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Ok(text) => {
                    if let Err(e) = outgoing.send(Message::Text(text)).await {
                        if !is_disconnect_error(&e) {
                            warn!("WebSocket send error: {} - {}", peer, e);
                        }
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Client {} lagging, skipped {} frames", peer, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = incoming.next() => match message {
                // Clients only listen; anything they send is dropped.
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    if !is_disconnect_error(&e) {
                        warn!("WebSocket receive error: {} - {}", peer, e);
                    }
                    break;
                }
            },
        }
    }

    remove_client(peer, &clients);
}

fn is_disconnect_error(e: &WsError) -> bool {
    match e {
        WsError::ConnectionClosed | WsError::AlreadyClosed => true,
        WsError::Io(io_err) => matches!(
            io_err.kind(),
            std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
        ),
        _ => false,
    }
}

fn remove_client(peer: SocketAddr, clients: &ClientSet) {
    let mut set = lock_clients(clients);
    if set.remove(&peer) {
        info!("Client disconnected: {}. Total clients: {}", peer, set.len());
    }
}

fn lock_clients(clients: &ClientSet) -> MutexGuard<'_, HashSet<SocketAddr>> {
    clients.lock().unwrap_or_else(PoisonError::into_inner)
}
