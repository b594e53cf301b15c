use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{Session, SessionRegistry, handle_client};
use crate::config::ServiceConfig;
use crate::error::handlers::error_reply;
use crate::error::{ServiceError, SessionError};
use crate::middleware::RateLimiter;
use crate::middleware::logging::log_connection;
use crate::protocol::responses::{READY, format_response};

pub struct Server {
    sessions: Arc<Mutex<SessionRegistry>>,
    limiter: Arc<Mutex<RateLimiter>>,
    listener: TcpListener,
    config: Arc<ServiceConfig>,
}

impl Server {
    /// Binds the listener described by `config.server`.
    pub async fn bind(config: ServiceConfig) -> Result<Self, ServiceError> {
        let socket = config.server.listen_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        let limiter = RateLimiter::new(config.server.max_requests, config.server.rate_window());

        Ok(Self {
            sessions: Arc::new(Mutex::new(SessionRegistry::default())),
            limiter: Arc::new(Mutex::new(limiter)),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting validation service on {} (max {} clients)",
            self.config.server.listen_socket(),
            self.config.server.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let sessions = Arc::clone(&self.sessions);
                    let limiter = Arc::clone(&self.limiter);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, sessions, limiter, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Admits a new client if there is capacity, greets it, and runs its session.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    sessions: Arc<Mutex<SessionRegistry>>,
    limiter: Arc<Mutex<RateLimiter>>,
    config: Arc<ServiceConfig>,
) -> Result<(), ServiceError> {
    let max_clients = config.server.max_clients;

    {
        let mut sessions_guard = sessions.lock().await;

        if sessions_guard.len() >= max_clients {
            let err = ServiceError::from(SessionError::TooManyClients(max_clients));
            warn!("Refusing {}: {}", client_addr, err);
            stream.write_all(error_reply(&err).as_bytes()).await?;
            return Ok(());
        }

        sessions_guard.insert(client_addr, Session::new(client_addr));
        log_connection(&client_addr, sessions_guard.len(), max_clients);
    }

    let greeting = format_response(READY, "Validation service ready");
    if let Err(e) = stream.write_all(greeting.as_bytes()).await {
        sessions.lock().await.remove(&client_addr);
        return Err(e.into());
    }
    stream.flush().await?;

    handle_client(stream, sessions, limiter, client_addr, config).await;

    Ok(())
}
