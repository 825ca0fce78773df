//! The fixed table of wire representations the thing can speak.
//!
//! The registry is built once at startup and shared read-only. Lookups are
//! case-insensitive and ignore media type parameters, so
//! `Application/JSON; charset=utf-8` resolves to `application/json`.

use super::codec::Encoding;
use super::constants::{format_codes, media_types};
use super::headers::normalize_media_type;
use crate::core::error::{Result, ThingError};

/// One supported wire representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Representation {
    /// Negotiation token, a media type such as `application/json`.
    pub token: String,
    /// Numeric content-format code (CoAP registry).
    pub format_code: u16,
    pub encoding: Encoding,
    pub is_default: bool,
}

impl Representation {
    pub fn new(token: impl Into<String>, format_code: u16, encoding: Encoding) -> Self {
        Representation {
            token: normalize_media_type(&token.into()),
            format_code,
            encoding,
            is_default: false,
        }
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// JSON, the "structured-text" representation.
    #[must_use]
    pub fn json() -> Self {
        Representation::new(media_types::JSON, format_codes::JSON, Encoding::Json)
    }

    /// CBOR, the "compact-binary" representation.
    #[must_use]
    pub fn cbor() -> Self {
        Representation::new(media_types::CBOR, format_codes::CBOR, Encoding::Cbor)
    }
}

/// Ordered set of supported representations with exactly one default.
#[derive(Clone, Debug)]
pub struct RepresentationRegistry {
    entries: Vec<Representation>,
}

impl RepresentationRegistry {
    /// Build a registry from an ordered table.
    ///
    /// # Errors
    ///
    /// Fails with [`ThingError::Config`] when the table is empty, repeats a
    /// token, or does not mark exactly one entry as default.
    pub fn new(entries: Vec<Representation>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ThingError::Config(
                "representation registry is empty".to_string(),
            ));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.token == entry.token) {
                return Err(ThingError::Config(format!(
                    "duplicate representation {}",
                    entry.token
                )));
            }
        }
        let defaults = entries.iter().filter(|e| e.is_default).count();
        if defaults != 1 {
            return Err(ThingError::Config(format!(
                "expected exactly one default representation, found {}",
                defaults
            )));
        }
        Ok(Self { entries })
    }

    /// JSON (default) followed by CBOR.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: vec![Representation::json().as_default(), Representation::cbor()],
        }
    }

    /// Supported tokens in registry order.
    #[must_use]
    pub fn supported(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.token.as_str()).collect()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Representation> {
        self.entries.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_supported(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<&Representation> {
        let token = normalize_media_type(token);
        self.entries.iter().find(|e| e.token == token)
    }

    /// Look up a representation, failing with `UnknownRepresentation`.
    pub fn require(&self, token: &str) -> Result<&Representation> {
        self.get(token)
            .ok_or_else(|| ThingError::UnknownRepresentation(token.to_string()))
    }

    pub fn format_code_of(&self, token: &str) -> Result<u16> {
        self.require(token).map(|e| e.format_code)
    }

    #[must_use]
    pub fn default_representation(&self) -> &Representation {
        // `new` guarantees exactly one default
        self.entries
            .iter()
            .find(|e| e.is_default)
            .unwrap_or(&self.entries[0])
    }
}

impl Default for RepresentationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a RepresentationRegistry {
    type Item = &'a Representation;
    type IntoIter = std::slice::Iter<'a, Representation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order_and_default() {
        let registry = RepresentationRegistry::standard();
        assert_eq!(registry.supported(), vec!["application/json", "application/cbor"]);
        assert_eq!(registry.default_representation().token, "application/json");
    }

    #[test]
    fn test_format_codes() {
        let registry = RepresentationRegistry::standard();
        assert_eq!(registry.format_code_of("application/json").unwrap(), 50);
        assert_eq!(registry.format_code_of("application/cbor").unwrap(), 60);
        assert!(matches!(
            registry.format_code_of("application/xml"),
            Err(ThingError::UnknownRepresentation(_))
        ));
    }

    #[test]
    fn test_lookup_ignores_case_and_parameters() {
        let registry = RepresentationRegistry::standard();
        assert!(registry.is_supported("Application/JSON; charset=utf-8"));
        assert!(!registry.is_supported("text/plain"));
    }

    #[test]
    fn test_rejects_missing_default() {
        let err = RepresentationRegistry::new(vec![Representation::json()]).unwrap_err();
        assert!(matches!(err, ThingError::Config(_)));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = RepresentationRegistry::new(vec![
            Representation::json().as_default(),
            Representation::json(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(RepresentationRegistry::new(Vec::new()).is_err());
    }
}
