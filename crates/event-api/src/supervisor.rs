//! Process supervisor: router assembly, the listener task and the
//! self-health-check loop.
//!
//! The listener runs in its own task. The supervisor loop ticks on a timer,
//! logs uptime, and every few ticks pings the listener over HTTP. When a ping
//! fails the listener is shut down gracefully (in-flight requests finish)
//! and a fresh one is bound in its place.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_api_key, ApiKey, API_KEY_HEADER};
use crate::config::ServerConfig;
use crate::db::Gateway;
use crate::error::AppResult;
use crate::handlers::{routes, HealthResource, PhotoResource, RsvpResource};

/// How long a stopping listener may spend draining in-flight requests.
const LISTENER_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Value of `Access-Control-Allow-Methods` on every response.
const ALLOW_METHODS_VALUE: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";

/// Value of `Access-Control-Allow-Headers` on every response.
const ALLOW_HEADERS_VALUE: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Headers browsers may send on cross-origin requests.
const ALLOWED_HEADERS: [&str; 9] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Build the application router with every resource mounted.
///
/// All resources share the one gateway.
pub fn build_router(config: &ServerConfig, gateway: Arc<dyn Gateway>) -> Router {
    let app = Router::new()
        .merge(routes(Arc::new(RsvpResource::new(gateway.clone()))))
        .merge(routes(Arc::new(PhotoResource::new(gateway))))
        .merge(routes(Arc::new(HealthResource)));

    let app = if config.require_api_key {
        app.layer(middleware::from_fn_with_state(
            ApiKey::new(&config.api_key),
            require_api_key,
        ))
    } else {
        app
    };

    // CorsLayer answers preflights; the fixed headers below go on every
    // response, preflight or not.
    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS_VALUE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS_VALUE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("crossorigin"),
            HeaderValue::from_static("true"),
        ))
}

/// What the supervisor should do on a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Log uptime only.
    Record,
    /// Log uptime and ping the listener.
    Probe,
}

/// Counts uptime ticks and decides when a probe is due.
#[derive(Debug, Clone)]
pub struct UptimeClock {
    ticks: u64,
    probe_every: u64,
}

impl UptimeClock {
    pub fn new(probe_every: u64) -> Self {
        Self {
            ticks: 0,
            probe_every: probe_every.max(1),
        }
    }

    pub fn tick(&mut self) -> TickAction {
        self.ticks += 1;
        if self.ticks % self.probe_every == 0 {
            TickAction::Probe
        } else {
            TickAction::Record
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// A running listener task.
struct Listener {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl Listener {
    /// Graceful shutdown: stop accepting, let in-flight requests finish.
    /// A listener still running after `grace` is aborted.
    async fn stop(mut self, grace: Duration) {
        let _ = self.shutdown.send(());
        match timeout(grace, &mut self.task).await {
            Ok(Ok(Ok(()))) => tracing::info!(address = %self.addr, "Listener stopped"),
            Ok(Ok(Err(e))) => tracing::error!(address = %self.addr, error = %e, "Listener failed"),
            Ok(Err(e)) => {
                tracing::error!(address = %self.addr, error = %e, "Listener task panicked")
            }
            Err(_) => {
                tracing::warn!(
                    address = %self.addr,
                    grace_secs = grace.as_secs_f64(),
                    "Listener did not drain in time, aborting"
                );
                self.task.abort();
            }
        }
    }
}

enum Event {
    Shutdown,
    Tick,
    ListenerExited(Result<std::io::Result<()>, tokio::task::JoinError>),
}

pub struct Supervisor {
    config: ServerConfig,
    app: Router,
    client: reqwest::Client,
    address: watch::Sender<Option<SocketAddr>>,
}

impl Supervisor {
    pub fn new(config: ServerConfig, gateway: Arc<dyn Gateway>) -> AppResult<Self> {
        let app = build_router(&config, gateway);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let (address, _) = watch::channel(None);

        Ok(Self {
            config,
            app,
            client,
            address,
        })
    }

    /// Address of the current listener; updated on every (re)start.
    pub fn subscribe(&self) -> watch::Receiver<Option<SocketAddr>> {
        self.address.subscribe()
    }

    /// Serve until `shutdown` resolves, restarting the listener whenever a
    /// self ping fails or the listener exits on its own.
    pub async fn run<S>(self, shutdown: S) -> AppResult<()>
    where
        S: Future<Output = ()> + Send,
    {
        let mut listener = self.start_listener().await?;
        let mut clock = UptimeClock::new(self.config.health_check_every);

        let period = self.config.health_check_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                _ = &mut shutdown => Event::Shutdown,
                _ = ticker.tick() => Event::Tick,
                result = &mut listener.task => Event::ListenerExited(result),
            };

            match event {
                Event::Shutdown => break,
                Event::Tick => {
                    if self.on_tick(&mut clock).await {
                        tracing::error!("The health check FAILED! Restarting the listener...");
                        listener.stop(LISTENER_SHUTDOWN_GRACE).await;
                        listener = self.start_listener().await?;
                    }
                }
                Event::ListenerExited(result) => {
                    tracing::error!(
                        address = %listener.addr,
                        result = ?result,
                        "Listener exited unexpectedly, restarting"
                    );
                    listener = self.start_listener().await?;
                }
            }
        }

        tracing::info!("Shutting down listener");
        listener.stop(LISTENER_SHUTDOWN_GRACE).await;
        Ok(())
    }

    /// Returns `true` when the listener needs a restart.
    async fn on_tick(&self, clock: &mut UptimeClock) -> bool {
        let action = clock.tick();
        tracing::info!(
            ticks = clock.ticks(),
            "The server has been up for {} health check intervals",
            clock.ticks()
        );

        if action == TickAction::Record {
            return false;
        }

        match self.probe().await {
            Ok(body) => {
                tracing::info!(response = %body, "The health check SUCCEEDED");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, url = %self.config.ping_url(), "Health check request failed");
                true
            }
        }
    }

    async fn probe(&self) -> AppResult<String> {
        let body = self
            .client
            .get(self.config.ping_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn start_listener(&self) -> AppResult<Listener> {
        let tcp = TcpListener::bind(self.config.bind_address()).await?;
        let addr = tcp.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();
        let app = self.app.clone();

        let task = tokio::spawn(async move {
            axum::serve(tcp, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        tracing::info!(address = %addr, "The Server is listening on port {}.", addr.port());
        self.address.send_replace(Some(addr));

        Ok(Listener {
            addr,
            shutdown,
            task,
        })
    }
}
