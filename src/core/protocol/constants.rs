//! Wire-level constants: header names, media types, format codes.

/// Request headers the thing understands beyond the standard ones.
pub mod headers {
    use http::HeaderName;

    /// `Subscribe: true` asks for a notification stream (Braid-HTTP style).
    pub const SUBSCRIBE: HeaderName = HeaderName::from_static("subscribe");
    /// `Observe: 0` asks for a notification stream (CoAP style).
    pub const OBSERVE: HeaderName = HeaderName::from_static("observe");
}

pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const CBOR: &str = "application/cbor";
    /// Thing Description media type, served as JSON.
    pub const TD_JSON: &str = "application/td+json";
    pub const ANY: &str = "*/*";
    pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
}

/// CoAP Content-Format numbers (RFC 7252 / RFC 8949).
pub mod format_codes {
    pub const JSON: u16 = 50;
    pub const CBOR: u16 = 60;
}

/// Marker placed in the `subprotocol` member of observe/subscribe forms.
pub const SUBSCRIPTION_SUBPROTOCOL: &str = "subscribe";

/// Optional trailing path segment equivalent to the observation flag.
pub const OBSERVE_SEGMENT: &str = "observe";

/// Default polling interval of the subscription manager, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
