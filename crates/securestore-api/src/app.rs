//! Application builder: wires stores, services, router and the background
//! scheduler into a running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use securestore_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use securestore_core::config::AppConfig;
use securestore_core::error::AppError;
use securestore_core::traits::storage::StorageProvider;
use securestore_database::memory::{MemoryFileStore, MemoryShareStore, MemoryUserStore};
use securestore_database::repositories::{file, share, user};
use securestore_database::{DatabasePool, FileStore, ShareStore, UserStore, migration};
use securestore_service::{
    AccessService, FileService, FileServiceSettings, LinkService, ShareService, UserService,
};
use securestore_worker::{TaskScheduler, register_default_tasks};

use crate::router::build_router;
use crate::state::AppState;

/// The record stores and blob store a server runs against.
#[derive(Clone)]
pub struct Backends {
    /// File records
    pub files: Arc<dyn FileStore>,
    /// Share link records
    pub shares: Arc<dyn ShareStore>,
    /// User accounts
    pub users: Arc<dyn UserStore>,
    /// Blob store
    pub storage: Arc<dyn StorageProvider>,
    /// Connection pool behind the record stores, when they are PostgreSQL
    pub pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("storage", &self.storage.provider_type())
            .finish_non_exhaustive()
    }
}

impl Backends {
    /// Connects to the configured blob store and record store.
    ///
    /// The memory profile (memory blob store with no database URL) keeps
    /// records in process; everything else goes to PostgreSQL.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let storage = securestore_storage::build_provider(&config.storage).await?;

        if config.uses_memory_records() {
            tracing::warn!("No database configured, keeping records in memory");
            return Ok(Self::in_memory(storage));
        }

        let pool = DatabasePool::connect(&config.database).await?;
        if config.database.run_migrations {
            migration::run_migrations(pool.pool()).await?;
        }
        let pg = pool.pool().clone();

        Ok(Self {
            files: Arc::new(file::FileRepository::new(pg.clone())),
            shares: Arc::new(share::ShareRepository::new(pg.clone())),
            users: Arc::new(user::UserRepository::new(pg)),
            storage,
            pool: Some(pool),
        })
    }

    /// In-process record stores over the given blob store.
    pub fn in_memory(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            files: Arc::new(MemoryFileStore::new()),
            shares: Arc::new(MemoryShareStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            storage,
            pool: None,
        }
    }
}

/// Closes the database pool, if any. Runs last on shutdown.
pub async fn close_pool(pool: Option<DatabasePool>) {
    if let Some(pool) = pool {
        pool.close().await;
    }
}

/// Builds the service graph and handler state.
pub fn build_state(config: AppConfig, backends: Backends) -> Result<AppState, AppError> {
    let key = config.crypto.file_key()?;

    let hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let file_service = Arc::new(FileService::new(
        backends.files,
        backends.storage,
        Arc::new(key),
        FileServiceSettings::from_config(&config.storage, &config.worker),
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&backends.shares),
        Arc::clone(&file_service),
        LinkService::new(),
        Arc::clone(&hasher),
    ));
    let access_service = Arc::new(AccessService::new(
        backends.shares,
        Arc::clone(&file_service),
        Arc::clone(&hasher),
    ));
    let user_service = Arc::new(UserService::new(backends.users, hasher, jwt_encoder));

    Ok(AppState {
        config: Arc::new(config),
        jwt_decoder,
        file_service,
        share_service,
        access_service,
        user_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the SecureStore server until SIGINT or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SecureStore server...");

    let backends = Backends::connect(&config).await?;
    let pool = backends.pool.clone();
    let state = build_state(config.clone(), backends)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let mut scheduler = TaskScheduler::with_shutdown(shutdown_rx.clone());
    if config.worker.enabled {
        register_default_tasks(
            &mut scheduler,
            Arc::clone(&state.file_service),
            Arc::clone(&state.share_service),
            &config.worker,
        );
        scheduler.start();
    } else {
        tracing::info!("Background sweeps disabled");
    }

    {
        let shutdown_tx = Arc::clone(&shutdown_tx);
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        });
    }

    let app = build_app(state);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SecureStore server listening on {}", addr);

    let mut server_shutdown = shutdown_rx;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    let _ = shutdown_tx.send(true);
    let grace = Duration::from_secs(config.server.shutdown_timeout_seconds);
    if tokio::time::timeout(grace, scheduler.shutdown()).await.is_err() {
        tracing::warn!("Background sweeps did not stop within {:?}", grace);
    }
    close_pool(pool).await;

    tracing::info!("SecureStore server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
