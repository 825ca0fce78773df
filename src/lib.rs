//! Web of Things counter with per-request JSON/CBOR negotiation.
//!
//! See [`core`] for an overview.

pub mod core;

pub use crate::core::{description, protocol, server, types};
pub use crate::core::{Number, Result, ThingError, ThingStatus};
pub use crate::core::server::{ServerConfig, ThingServer};
