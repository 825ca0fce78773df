//! Value encoding for the supported representations.
//!
//! JSON goes through `serde_json`, CBOR through `ciborium`. Both encodings
//! share the serde data model, so every value the thing serves (numbers,
//! timestamps, the description document) is encoded through the same
//! [`Encoding::encode`] entry point.
//!
//! # Subscription framing
//!
//! Notifications are written back to back onto one response body:
//!
//! ```text
//! JSON:  10\n15\n-3\n           (newline-delimited)
//! CBOR:  0a 0f 22               (CBOR sequence, RFC 8742)
//! ```

use crate::core::error::{Result, ThingError};
use crate::core::types::Number;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialization scheme behind a representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    Json,
    Cbor,
}

impl Encoding {
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Bytes> {
        match self {
            Encoding::Json => Ok(Bytes::from(serde_json::to_vec(value)?)),
            Encoding::Cbor => {
                let mut buf = Vec::new();
                ciborium::into_writer(value, &mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }

    /// Decode exactly one value; trailing bytes are an error.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T> {
        match self {
            Encoding::Json => Ok(serde_json::from_slice(bytes)?),
            Encoding::Cbor => {
                let mut reader = bytes;
                let value = ciborium::from_reader(&mut reader)?;
                if !reader.is_empty() {
                    return Err(ThingError::Cbor(format!(
                        "{} trailing bytes after value",
                        reader.len()
                    )));
                }
                Ok(value)
            }
        }
    }

    /// Encode one notification of a subscription stream.
    pub fn encode_frame<T: Serialize + ?Sized>(self, value: &T) -> Result<Bytes> {
        match self {
            Encoding::Json => {
                let mut buf = serde_json::to_vec(value)?;
                buf.push(b'\n');
                Ok(Bytes::from(buf))
            }
            Encoding::Cbor => self.encode(value),
        }
    }

    /// Decode an action operand.
    ///
    /// Anything that is not a single finite number is a
    /// [`ThingError::BadRequest`], including an empty body.
    pub fn decode_operand(self, bytes: &[u8]) -> Result<Number> {
        if bytes.is_empty() {
            return Err(ThingError::BadRequest("missing operand".to_string()));
        }
        let operand: Number = self
            .decode(bytes)
            .map_err(|e| ThingError::BadRequest(format!("operand is not a number: {}", e)))?;
        if !operand.is_finite() {
            return Err(ThingError::BadRequest(format!(
                "operand {} is not finite",
                operand
            )));
        }
        Ok(operand)
    }
}
