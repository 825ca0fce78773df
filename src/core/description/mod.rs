//! The affordance description engine.
//!
//! ```text
//! counter.td.json ──template──▶ skeleton (serde_json::Value)
//!                                   │
//!                      DescriptionBuilder::build
//!                                   │  per affordance: expander::expand
//!                                   ▼
//!                           ThingDescription
//! ```
//!
//! - [`template`] - `{{VAR}}` substitution over the embedded skeleton
//! - [`expander`] - one affordance into every concrete form
//! - [`builder`] - inlines the forms and exposes the immutable document

pub mod builder;
pub mod expander;
pub mod template;

pub use builder::{DescriptionBuilder, ThingDescription};
pub use expander::{expand, form_for};
pub use template::{render, substitute, TemplateVars, COUNTER_SKELETON};
