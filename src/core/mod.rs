//! A Web of Things counter served over HTTP.
//!
//! The thing exposes an additive accumulator through two properties
//! (`result`, `lastChange`), two actions (`add`, `subtract`) and one event
//! (`update`). Every affordance is reachable in JSON and CBOR; the Thing
//! Description advertises one form per usable combination and each request
//! picks its own representation through `Accept` and `Content-Type`.
//!
//! # Modules
//!
//! - [`protocol`] - representations, codecs, header negotiation
//! - [`types`] - affordances, forms, numbers, statuses
//! - [`description`] - template rendering and form expansion
//! - [`server`] - state, subscriptions, dispatcher and the axum binding
//!
//! # Quick Start
//!
//! ```no_run
//! use counter_thing::server::{ServerConfig, ThingServer};
//!
//! # async fn run() -> counter_thing::Result<()> {
//! let config = ServerConfig {
//!     port: 8080,
//!     ..ServerConfig::default()
//! };
//! ThingServer::new(config)?.serve().await
//! # }
//! ```
//!
//! Then, for instance:
//!
//! ```text
//! curl http://127.0.0.1:8080/counter
//! curl -X POST -H 'Content-Type: application/json' -d 10 \
//!      http://127.0.0.1:8080/counter/actions/add
//! curl -N -H 'Subscribe: true' http://127.0.0.1:8080/counter/events/update
//! ```

pub mod description;
pub mod error;
pub mod protocol;
pub mod server;
pub mod types;

pub use error::{Result, ThingError};
pub use types::{Number, ThingStatus};
