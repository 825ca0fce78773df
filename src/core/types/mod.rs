//! Core data types shared by the description engine and the dispatcher.
//!
//! # Type Overview
//!
//! ```text
//! AffordanceTemplate ──(Form Expander)──▶ Vec<Form>
//!        │                                   │
//!        └──────(Description Builder)────────┘──▶ ThingDescription
//!
//! ThingRequest ──(Dispatcher)──▶ Reply { Complete | Subscription }
//!                      │
//!                      └──▶ ThingStatus (HTTP / CoAP mapping)
//! ```
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AffordanceTemplate`] | Abstract property, action or event |
//! | [`Form`] | Concrete binding of an affordance to a path, method and representations |
//! | [`Number`] | Accumulator value, integer or float |
//! | [`ThingStatus`] | Protocol-neutral response status |

mod affordance;
mod form;
mod number;
mod status;

pub use affordance::{AffordanceKind, AffordanceTemplate};
pub use form::{Form, FormResponse, Operation};
pub use number::Number;
pub use status::ThingStatus;
