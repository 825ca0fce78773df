//! The counter thing's server side.
//!
//! # Module Organization
//!
//! ```text
//! server/
//! ├── config         - ServerConfig (JSON file + defaults)
//! ├── state          - CounterState, the mutex-guarded accumulator
//! ├── subscription   - SubscriptionManager, one poller fanning out changes
//! ├── dispatcher     - transport-neutral routing and negotiation
//! ├── middleware     - ThingLayer, lifts negotiation headers into ThingState
//! └── routes         - axum Router and response mapping
//! ```
//!
//! [`ThingServer`] wires these together in startup order.
//!
//! # Example
//!
//! ```no_run
//! use counter_thing::server::{ServerConfig, ThingServer};
//!
//! # async fn run() -> counter_thing::Result<()> {
//! let server = ThingServer::new(ServerConfig::default())?;
//! server.serve().await
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod subscription;


pub use config::ServerConfig;
pub use dispatcher::{Dispatcher, Reply, ThingRequest};
pub use middleware::{ThingLayer, ThingState};
pub use routes::thing_router;
pub use state::{CounterSnapshot, CounterState, Mutation, Watched, WatchedValue};
pub use subscription::{Subscription, SubscriptionManager};

use crate::core::description::{render, DescriptionBuilder, TemplateVars, COUNTER_SKELETON};
use crate::core::error::Result;
use crate::core::protocol::RepresentationRegistry;
use axum::Router;
use std::sync::Arc;

/// A fully assembled counter thing.
#[derive(Clone, Debug)]
pub struct ThingServer {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl ThingServer {
    /// Build registry, description, state, subscriptions and dispatcher.
    ///
    /// Spawns the subscription poller, so this must run inside a Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// An invalid configuration, or a skeleton that fails to render or
    /// expand.
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(RepresentationRegistry::standard());
        let vars = TemplateVars::for_thing(&config.thing_name, "http", &config.hostname, config.port);
        let skeleton = render(COUNTER_SKELETON, &vars)?;
        let description = Arc::new(DescriptionBuilder::new(registry.clone()).build(skeleton)?);
        tracing::debug!(
            "Built description for {} with {} affordances",
            config.thing_name,
            description.affordances().len()
        );

        let state = Arc::new(CounterState::new());
        let subscriptions = SubscriptionManager::spawn(state.clone(), config.poll_interval())?;
        let dispatcher = Arc::new(Dispatcher::new(
            config.thing_name.clone(),
            registry,
            description,
            state,
            subscriptions,
        ));

        Ok(Self { config, dispatcher })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    #[must_use]
    pub fn router(&self) -> Router {
        thing_router(self.dispatcher.clone())
    }

    /// Bind, write the description if configured, and serve until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        if let Some(path) = &self.config.description_path {
            if let Err(e) = self.dispatcher.description().persist(path).await {
                tracing::warn!("Failed to write thing description to {:?}: {}", path, e);
            }
        }

        tracing::info!(
            "Serving {} on http://{}/{}",
            self.config.thing_name,
            addr,
            self.config.thing_name
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
