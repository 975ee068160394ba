//! Starport
//!
//! A small multiplayer space-shop economy server. Clients log in with a
//! nickname over a persistent TCP connection, receive an account with a
//! randomized starting balance, and list, buy, and sell catalog items
//! through a length-prefixed framed protocol.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: entities and the error taxonomy (Account, ShopItem, ...)
//! - **Application**: use cases and the persistence gateway port
//! - **Infrastructure**: port implementations (MemoryStore) and config
//! - **Presentation**: framing codec, connection loop, action dispatcher
//!
//! # Example
//!
//! ```ignore
//! use starport::{GameServer, MemoryStore, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let handle = GameServer::new(config, Arc::new(MemoryStore::new()))
//!         .start()
//!         .await
//!         .unwrap();
//!     handle.wait().await;
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{GameStore, SessionSnapshot, StartingBalanceRange, StoreTransaction};
pub use domain::{
    Account, AccountId, AccountSession, GameError, ItemId, NewShopItem, Nickname, SessionToken,
    ShopItem, ShopItemType,
};
pub use infrastructure::{load_item_list, ConfigError, MemoryStore, ServerConfig};
pub use presentation::{
    Connection, Dispatcher, ProtocolRequest, ProtocolResponse, ResponseData,
};

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("catalog seeding failed: {0}")]
    Seed(#[from] GameError),
}

/// The game server: owns the configuration and the persistence gateway,
/// seeds the catalog, and serves framed TCP connections.
pub struct GameServer {
    config: ServerConfig,
    store: Arc<dyn GameStore>,
}

impl GameServer {
    pub fn new(config: ServerConfig, store: Arc<dyn GameStore>) -> Self {
        GameServer { config, store }
    }

    /// Seed the catalog. Idempotent: an entry already matching on
    /// `(kind, name, price)` is left alone.
    pub async fn seed_catalog(&self, items: Vec<NewShopItem>) -> Result<(), GameError> {
        let mut tx = self.store.begin().await;
        for item in items {
            let stored = tx.add_item_if_absent(item).await;
            tracing::debug!(id = %stored.id, name = %stored.name, price = stored.price, "catalog entry");
        }
        tx.commit().await
    }

    /// Seed the catalog from the configured item list, bind the listener,
    /// and start accepting connections. Returns a handle that controls
    /// shutdown.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let items = load_item_list(&self.config.items_path)?;
        tracing::info!(count = items.len(), path = %self.config.items_path, "seeding catalog");
        self.seed_catalog(items).await?;

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "game server listening");

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&self.store),
            StartingBalanceRange {
                min: self.config.min_start_balance,
                max: self.config.max_start_balance,
            },
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(accept_loop(listener, dispatcher, shutdown_rx));

        Ok(ServerHandle {
            addr: local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Handle to a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server actually bound (useful with port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal every live connection to close, stop accepting, and wait
    /// for the drain to finish.
    pub async fn shutdown(self) {
        tracing::info!("shutting down game server");
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Wait until the accept loop exits on its own (shutdown signal).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Accept loop. The `JoinSet` is the set of live connections; it is only
/// touched from this task, so no extra synchronization is needed. On
/// shutdown every connection observes the watch channel, runs its close
/// handshake, and the loop drains the set before returning.
async fn accept_loop(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, peer)) => {
                        tracing::info!(%peer, "client connected");
                        connections.spawn(handle_client(
                            socket,
                            Arc::clone(&dispatcher),
                            shutdown.clone(),
                        ));
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to accept connection");
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    drop(listener);
    while connections.join_next().await.is_some() {}
    tracing::info!("all connections drained");
}

/// One connection's lifetime: pull requests, dispatch, respond, strictly
/// in order. Ends at stream EOF, transport failure, or server shutdown;
/// all three paths run the close handshake.
async fn handle_client(
    socket: TcpStream,
    dispatcher: Arc<Dispatcher>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut conn = Connection::new(socket);

    loop {
        tokio::select! {
            request = conn.next_request() => {
                let Some(request) = request else { break };
                let response = dispatcher.dispatch(request).await;
                if let Err(error) = conn.send(&response).await {
                    tracing::debug!(%error, "write failed, dropping connection");
                    break;
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    conn.close().await;
    tracing::info!("connection closed");
}
