//! Protocol-level building blocks: representations, codecs and header parsing.

pub mod codec;
pub mod constants;
pub mod headers;
pub mod representation;

pub use codec::Encoding;
pub use constants::*;
pub use headers::*;
pub use representation::{Representation, RepresentationRegistry};
