//! Header parsing for content negotiation and observation.

use super::constants::{headers, media_types};
use super::representation::{Representation, RepresentationRegistry};
use crate::core::error::{Result, ThingError};
use http::HeaderMap;

/// Lowercase a media type and strip its parameters.
///
/// ```
/// use counter_thing::protocol::normalize_media_type;
///
/// assert_eq!(normalize_media_type(" Application/CBOR ; q=1"), "application/cbor");
/// ```
#[must_use]
pub fn normalize_media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// One entry of an `Accept` header.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRange {
    pub media_type: String,
    pub quality: f32,
}

/// Parse an `Accept` header into media ranges ordered by preference.
///
/// Entries keep their header order when their `q` values tie. A missing `q`
/// counts as `1.0`; a malformed one as `0.0`, which excludes the range.
#[must_use]
pub fn parse_accept(value: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = value
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let media_type = parts.next()?.trim().to_ascii_lowercase();
            if media_type.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|p| p.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
                .map_or(1.0, |(_, q)| parse_quality(q));
            Some(MediaRange {
                media_type,
                quality,
            })
        })
        .collect();
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

fn parse_quality(value: &str) -> f32 {
    match value.trim().parse::<f32>() {
        Ok(q) if !q.is_nan() => q.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Select the response representation for an `Accept` header.
///
/// | Accept | Result |
/// |--------|--------|
/// | absent or empty | default representation |
/// | `*/*` | default representation |
/// | registered token | that representation |
/// | anything else | [`ThingError::NotAcceptable`] |
pub fn negotiate_accept<'r>(
    registry: &'r RepresentationRegistry,
    accept: Option<&str>,
) -> Result<&'r Representation> {
    select_representation(registry, accept, |t| t)
}

/// Like [`negotiate_accept`], additionally mapping `application/td+json`
/// to JSON for description requests.
pub fn negotiate_description_accept<'r>(
    registry: &'r RepresentationRegistry,
    accept: Option<&str>,
) -> Result<&'r Representation> {
    select_representation(registry, accept, |t| {
        if t == media_types::TD_JSON {
            media_types::JSON
        } else {
            t
        }
    })
}

fn select_representation<'r>(
    registry: &'r RepresentationRegistry,
    accept: Option<&str>,
    alias: impl Fn(&str) -> &str,
) -> Result<&'r Representation> {
    let Some(raw) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
        return Ok(registry.default_representation());
    };
    for range in parse_accept(raw) {
        if range.quality <= 0.0 {
            continue;
        }
        if range.media_type == media_types::ANY {
            return Ok(registry.default_representation());
        }
        if let Some(rep) = registry.get(alias(range.media_type.as_str())) {
            return Ok(rep);
        }
    }
    Err(ThingError::NotAcceptable(raw.to_string()))
}

/// Select the representation of a request body from its `Content-Type`.
///
/// A missing header means the default representation; an unregistered one is
/// [`ThingError::UnsupportedMediaType`].
pub fn negotiate_content_type<'r>(
    registry: &'r RepresentationRegistry,
    content_type: Option<&str>,
) -> Result<&'r Representation> {
    match content_type.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(registry.default_representation()),
        Some(ct) => registry
            .get(ct)
            .ok_or_else(|| ThingError::UnsupportedMediaType(ct.to_string())),
    }
}

/// Whether the request asks for observation.
///
/// Accepts `Subscribe: true` (any case) and the CoAP-style `Observe: 0`.
#[must_use]
pub fn wants_observation(map: &HeaderMap) -> bool {
    let subscribe = map
        .get(headers::SUBSCRIBE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let observe = map
        .get(headers::OBSERVE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);
    subscribe || observe
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    // ========== Accept Tests ==========

    #[test]
    fn test_parse_accept_orders_by_quality() {
        let ranges = parse_accept("application/json;q=0.5, application/cbor");
        assert_eq!(ranges[0].media_type, "application/cbor");
        assert_eq!(ranges[1].media_type, "application/json");
        assert_eq!(ranges[1].quality, 0.5);
    }

    #[test]
    fn test_parse_accept_skips_empty_entries() {
        let ranges = parse_accept("application/cbor, ,");
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_negotiate_absent_accept_is_default() {
        let registry = RepresentationRegistry::standard();
        assert_eq!(negotiate_accept(&registry, None).unwrap().token, "application/json");
        assert_eq!(negotiate_accept(&registry, Some("")).unwrap().token, "application/json");
    }

    #[test]
    fn test_negotiate_wildcard_is_default() {
        let registry = RepresentationRegistry::standard();
        assert_eq!(
            negotiate_accept(&registry, Some("*/*")).unwrap().token,
            "application/json"
        );
    }

    #[test]
    fn test_negotiate_picks_first_registered() {
        let registry = RepresentationRegistry::standard();
        let rep = negotiate_accept(&registry, Some("text/html, application/cbor")).unwrap();
        assert_eq!(rep.token, "application/cbor");
    }

    #[test]
    fn test_negotiate_q_zero_excludes() {
        let registry = RepresentationRegistry::standard();
        assert!(matches!(
            negotiate_accept(&registry, Some("application/cbor;q=0")),
            Err(ThingError::NotAcceptable(_))
        ));
    }

    #[test]
    fn test_parse_accept_quality_bounds() {
        let ranges = parse_accept("text/html;Q=0.5, application/json;q=2, application/cbor;q=abc");
        assert_eq!(ranges[0].media_type, "application/json");
        assert_eq!(ranges[0].quality, 1.0);
        assert_eq!(ranges[1].quality, 0.5);
        assert_eq!(ranges[2].media_type, "application/cbor");
        assert_eq!(ranges[2].quality, 0.0);
    }

    #[test]
    fn test_negotiate_nan_quality_excludes() {
        let registry = RepresentationRegistry::standard();
        let rep = negotiate_accept(&registry, Some("application/json, application/cbor;q=NaN")).unwrap();
        assert_eq!(rep.token, "application/json");
    }

    #[test]
    fn test_negotiate_unknown_is_not_acceptable() {
        let registry = RepresentationRegistry::standard();
        assert!(matches!(
            negotiate_accept(&registry, Some("application/xml")),
            Err(ThingError::NotAcceptable(_))
        ));
    }

    #[test]
    fn test_description_accepts_td_json() {
        let registry = RepresentationRegistry::standard();
        let rep = negotiate_description_accept(&registry, Some("application/td+json")).unwrap();
        assert_eq!(rep.token, "application/json");
        assert!(negotiate_accept(&registry, Some("application/td+json")).is_err());
    }

    // ========== Content-Type Tests ==========

    #[test]
    fn test_content_type_with_parameters() {
        let registry = RepresentationRegistry::standard();
        let rep =
            negotiate_content_type(&registry, Some("application/json; charset=utf-8")).unwrap();
        assert_eq!(rep.token, "application/json");
    }

    #[test]
    fn test_content_type_unknown_is_unsupported() {
        let registry = RepresentationRegistry::standard();
        assert!(matches!(
            negotiate_content_type(&registry, Some("text/plain")),
            Err(ThingError::UnsupportedMediaType(_))
        ));
    }

    // ========== Observation Tests ==========

    #[test]
    fn test_observation_flags() {
        let mut map = HeaderMap::new();
        assert!(!wants_observation(&map));

        map.insert("subscribe", HeaderValue::from_static("TRUE"));
        assert!(wants_observation(&map));

        let mut map = HeaderMap::new();
        map.insert("observe", HeaderValue::from_static("0"));
        assert!(wants_observation(&map));

        let mut map = HeaderMap::new();
        map.insert("observe", HeaderValue::from_static("1"));
        map.insert("subscribe", HeaderValue::from_static("yes"));
        assert!(!wants_observation(&map));
    }
}
