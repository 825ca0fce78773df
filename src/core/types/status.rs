//! Protocol-neutral status codes.

use http::StatusCode;

/// Outcome of a request, independent of the transport it arrived on.
///
/// Each intent maps onto an HTTP status and a CoAP response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThingStatus {
    /// Value read successfully.
    Ok,
    /// Mutation applied; the body carries the new value.
    Changed,
    /// Long-lived notification stream opened.
    Subscribed,
    /// Malformed operand.
    BadRequest,
    /// Unknown resource name or sub-path.
    NotFound,
    /// Path exists but the method is not allowed on it.
    MethodNotAllowed,
    /// Response representation not registered.
    NotAcceptable,
    /// Request body representation not registered.
    UnsupportedMediaType,
    /// The affordance has no non-observed form.
    ObservationRequired,
    /// Server-side failure.
    Internal,
}

/// Status used for subscription responses, as Braid-HTTP does.
pub const STATUS_SUBSCRIPTION: u16 = 209;

impl ThingStatus {
    /// HTTP status code for this intent.
    #[must_use]
    pub fn http_status(self) -> StatusCode {
        match self {
            ThingStatus::Ok | ThingStatus::Changed => StatusCode::OK,
            ThingStatus::Subscribed => {
                StatusCode::from_u16(STATUS_SUBSCRIPTION).unwrap_or(StatusCode::OK)
            }
            ThingStatus::BadRequest | ThingStatus::ObservationRequired => StatusCode::BAD_REQUEST,
            ThingStatus::NotFound => StatusCode::NOT_FOUND,
            ThingStatus::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ThingStatus::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ThingStatus::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ThingStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// CoAP response code in `class.detail` notation.
    #[must_use]
    pub fn coap_code(self) -> &'static str {
        match self {
            ThingStatus::Ok | ThingStatus::Subscribed => "2.05",
            ThingStatus::Changed => "2.04",
            ThingStatus::BadRequest | ThingStatus::ObservationRequired => "4.00",
            ThingStatus::NotFound => "4.04",
            ThingStatus::MethodNotAllowed => "4.05",
            ThingStatus::NotAcceptable => "4.06",
            ThingStatus::UnsupportedMediaType => "4.15",
            ThingStatus::Internal => "5.00",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(
            self,
            ThingStatus::Ok | ThingStatus::Changed | ThingStatus::Subscribed
        )
    }

    #[inline]
    #[must_use]
    pub fn is_client_error(self) -> bool {
        self.http_status().is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        assert_eq!(ThingStatus::Ok.http_status(), StatusCode::OK);
        assert_eq!(ThingStatus::Changed.coap_code(), "2.04");
        assert_eq!(ThingStatus::Subscribed.http_status().as_u16(), 209);
        assert!(ThingStatus::Subscribed.is_success());
    }

    #[test]
    fn test_negotiation_statuses() {
        assert_eq!(ThingStatus::NotAcceptable.http_status().as_u16(), 406);
        assert_eq!(ThingStatus::NotAcceptable.coap_code(), "4.06");
        assert_eq!(ThingStatus::UnsupportedMediaType.http_status().as_u16(), 415);
        assert_eq!(ThingStatus::UnsupportedMediaType.coap_code(), "4.15");
    }

    #[test]
    fn test_observation_required_is_plain_bad_request() {
        assert_eq!(ThingStatus::ObservationRequired.http_status().as_u16(), 400);
        assert_eq!(ThingStatus::ObservationRequired.coap_code(), "4.00");
        assert!(ThingStatus::ObservationRequired.is_client_error());
    }

    #[test]
    fn test_internal_is_not_client_error() {
        assert!(!ThingStatus::Internal.is_client_error());
        assert!(!ThingStatus::Internal.is_success());
    }
}
