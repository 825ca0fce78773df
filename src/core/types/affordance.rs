//! Abstract affordances before form expansion.

use http::Method;
use std::fmt;

/// The three kinds of affordance a Thing Description can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AffordanceKind {
    Property,
    Action,
    Event,
}

impl AffordanceKind {
    pub const ALL: [AffordanceKind; 3] = [
        AffordanceKind::Property,
        AffordanceKind::Action,
        AffordanceKind::Event,
    ];

    /// Name of the TD section (and path segment) holding this kind.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            AffordanceKind::Property => "properties",
            AffordanceKind::Action => "actions",
            AffordanceKind::Event => "events",
        }
    }

    #[must_use]
    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.section() == section)
    }

    /// The only method this kind of affordance accepts.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            AffordanceKind::Property | AffordanceKind::Event => Method::GET,
            AffordanceKind::Action => Method::POST,
        }
    }
}

impl fmt::Display for AffordanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// A property, action or event as declared in the description skeleton.
///
/// Templates are created once at startup and never mutated; the Form
/// Expander derives every concrete form from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffordanceTemplate {
    pub kind: AffordanceKind,
    pub name: String,
    /// Relative href, e.g. `properties/result`.
    pub path: String,
    pub default_representation: String,
    pub observable: bool,
}

impl AffordanceTemplate {
    pub fn new(
        kind: AffordanceKind,
        name: impl Into<String>,
        default_representation: impl Into<String>,
    ) -> Self {
        let name = name.into();
        AffordanceTemplate {
            kind,
            path: format!("{}/{}", kind.section(), name),
            name,
            default_representation: default_representation.into(),
            observable: false,
        }
    }

    #[must_use]
    pub fn observable(mut self, observable: bool) -> Self {
        self.observable = observable;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> Method {
        self.kind.method()
    }
}
