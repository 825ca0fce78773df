//! Loading the Thing Description skeleton and substituting its variables.
//!
//! The skeleton is a JSON document with `{{NAME}}` placeholders. Rendering
//! replaces every known placeholder and fails if any remain, so a typo in
//! the skeleton is caught at startup rather than served to consumers.

use crate::core::error::{Result, ThingError};
use serde_json::Value;
use std::collections::BTreeMap;

/// The skeleton shipped with the crate.
pub const COUNTER_SKELETON: &str = include_str!("counter.td.json");

/// Placeholder values for a skeleton.
#[derive(Clone, Debug, Default)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables for the standard skeleton.
    #[must_use]
    pub fn for_thing(thing_name: &str, protocol: &str, hostname: &str, port: u16) -> Self {
        Self::new()
            .with("THING_NAME", thing_name)
            .with("PROTOCOL", protocol)
            .with("HOSTNAME", hostname)
            .with("PORT_NUMBER", port.to_string())
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Substitute every `{{NAME}}` in `raw`.
///
/// # Errors
///
/// Returns [`ThingError::Template`] naming the first placeholder that has
/// no value, or when a `{{` is never closed.
pub fn substitute(raw: &str, vars: &TemplateVars) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| ThingError::Template("unterminated placeholder".to_string()))?;
        let name = after[..end].trim();
        let value = vars
            .get(name)
            .ok_or_else(|| ThingError::Template(format!("no value for {{{{{}}}}}", name)))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Substitute and parse a skeleton into a JSON document.
pub fn render(raw: &str, vars: &TemplateVars) -> Result<Value> {
    let text = substitute(raw, vars)?;
    Ok(serde_json::from_str(&text)?)
}
