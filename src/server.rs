//! Fuel Track server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! storage init, migrations, optional seeding, REST API, rate-limit
//! housekeeping, metrics and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{AuthService, TripService};
use crate::config::AppConfig;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::seed::seed_database;
use crate::infrastructure::{init_database, run_migrations, Repositories};
use crate::interfaces::http::rate_limit::RateLimiter;
use crate::interfaces::http::{create_api_router, RouterContext};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Insert demo users and trips when the store is empty (default: false).
    pub seed: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed: false,
        }
    }
}

// ── Storage ────────────────────────────────────────────────────────

/// Repositories plus the connection behind them, if any.
pub struct Storage {
    pub repos: Repositories,
    pub db: Option<DatabaseConnection>,
}

/// Open the configured store. `memory://` skips SQL entirely.
pub async fn open_storage(
    config: &AppConfig,
    auto_migrate: bool,
) -> Result<Storage, Box<dyn std::error::Error>> {
    let db_config = config.database.connection_config();
    if db_config.is_in_memory_store() {
        info!("Using in-memory storage; data is lost on shutdown");
        return Ok(Storage {
            repos: Repositories::in_memory(),
            db: None,
        });
    }

    let db = init_database(&db_config).await?;
    if auto_migrate && config.database.run_migrations {
        run_migrations(&db).await?;
    }
    Ok(Storage {
        repos: Repositories::sea_orm(db.clone()),
        db: Some(db),
    })
}

/// Services and router wiring shared by the binary and tests.
pub fn build_router_context(
    config: &AppConfig,
    repos: &Repositories,
    metrics: Option<PrometheusHandle>,
) -> RouterContext {
    let jwt_config = JwtConfig::new(
        config.security.jwt_secret.clone(),
        config.security.jwt_expiration_hours,
    );
    info!(
        expiration_hours = jwt_config.expiration_hours,
        "JWT configured"
    );

    let rate_limiter = config.rate_limit.enabled.then(|| {
        Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        ))
    });

    RouterContext {
        trip_service: Arc::new(
            TripService::new(repos.trips.clone())
                .with_status_transitions(config.trips.enforce_status_transitions),
        ),
        auth_service: Arc::new(AuthService::new(
            repos.users.clone(),
            jwt_config,
            config.security.bcrypt_cost,
        )),
        environment: config.server.environment.clone(),
        rate_limiter,
        metrics,
    }
}

/// The global recorder can only be installed once per process.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

/// Drop expired rate-limit windows once per window until shutdown.
fn spawn_rate_limit_purge(limiter: Arc<RateLimiter>, shutdown: ShutdownSignal) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => limiter.purge_expired(),
                _ = shutdown.wait() => break,
            }
        }
    });
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
pub struct ServerHandle {
    pub repos: Repositories,
    pub config: AppConfig,
    /// Address the API is bound to (useful when port 0 was requested).
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus recorder
    /// 2. Open storage and run migrations
    /// 3. Seed demo data (if enabled)
    /// 4. Bind and serve the REST API (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        config.validate()?;

        info!(environment = %config.server.environment, "Starting Fuel Track API...");

        let metrics = prometheus_handle();

        let Storage { repos, db } = open_storage(&config, opts.auto_migrate).await?;

        if opts.seed {
            let report =
                seed_database(repos.users.as_ref(), repos.trips.as_ref(), config.security.bcrypt_cost)
                    .await?;
            info!(
                users = report.users_created,
                trips = report.trips_created,
                breakdown = ?report.status_breakdown,
                "Seeding finished"
            );
        }

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let ctx = build_router_context(&config, &repos, metrics);
        if let Some(limiter) = &ctx.rate_limiter {
            spawn_rate_limit_purge(limiter.clone(), shutdown_signal.clone());
        }
        let router = create_api_router(ctx);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the shutdown signal, drain in-flight requests within the
    /// configured timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let abort = api_task.abort_handle();
        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            abort.abort();
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("✅ Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("👋 Fuel Track API shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the application config. `RUST_LOG` wins over
/// `logging.level`.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
