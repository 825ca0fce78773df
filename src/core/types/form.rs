//! Interaction forms as they appear in the Thing Description.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation type carried in a form's `op` member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    ReadProperty,
    ObserveProperty,
    InvokeAction,
    SubscribeEvent,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ReadProperty => "readproperty",
            Operation::ObserveProperty => "observeproperty",
            Operation::InvokeAction => "invokeaction",
            Operation::SubscribeEvent => "subscribeevent",
        }
    }

    /// Whether forms with this operation open a notification stream.
    #[inline]
    #[must_use]
    pub fn is_subscription(self) -> bool {
        matches!(self, Operation::ObserveProperty | Operation::SubscribeEvent)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected response of a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResponse {
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// A concrete, protocol-level binding of an affordance.
///
/// `content_type` is the request representation for actions and the payload
/// representation for reads. `response.content_type` is always the
/// representation the server answers with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub href: String,
    pub op: Operation,
    #[serde(rename = "htv:methodName")]
    pub method: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub response: FormResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol: Option<String>,
}

impl Form {
    /// The (request, response) representation pair of this form.
    #[must_use]
    pub fn representation_pair(&self) -> (&str, &str) {
        (&self.content_type, &self.response.content_type)
    }

    #[inline]
    #[must_use]
    pub fn is_subscription(&self) -> bool {
        self.subprotocol.is_some()
    }
}
