//! Assembling the expanded Thing Description.

use super::expander::expand;
use crate::core::error::{Result, ThingError};
use crate::core::protocol::RepresentationRegistry;
use crate::core::types::{AffordanceKind, AffordanceTemplate, Form};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A fully expanded description, immutable once built.
#[derive(Clone, Debug)]
pub struct ThingDescription {
    document: Value,
    affordances: Vec<AffordanceTemplate>,
    forms: HashMap<(AffordanceKind, String), Vec<Form>>,
}

impl ThingDescription {
    /// The expanded document as served to consumers.
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    #[inline]
    #[must_use]
    pub fn current_description(&self) -> &Value {
        self.document()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.document.get("title").and_then(Value::as_str)
    }

    #[must_use]
    pub fn affordances(&self) -> &[AffordanceTemplate] {
        &self.affordances
    }

    #[must_use]
    pub fn affordance(&self, kind: AffordanceKind, name: &str) -> Option<&AffordanceTemplate> {
        self.affordances
            .iter()
            .find(|a| a.kind == kind && a.name == name)
    }

    #[must_use]
    pub fn forms(&self, kind: AffordanceKind, name: &str) -> Option<&[Form]> {
        self.forms
            .get(&(kind, name.to_string()))
            .map(Vec::as_slice)
    }

    /// Write a pretty-printed copy of the document for offline inspection.
    pub async fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.document)?;
        tokio::fs::write(path, content).await?;
        tracing::info!("Wrote thing description to {:?}", path);
        Ok(())
    }
}

/// Applies the Form Expander to every affordance of a skeleton.
#[derive(Clone, Debug)]
pub struct DescriptionBuilder {
    registry: Arc<RepresentationRegistry>,
}

impl DescriptionBuilder {
    #[must_use]
    pub fn new(registry: Arc<RepresentationRegistry>) -> Self {
        Self { registry }
    }

    /// Expand a rendered skeleton.
    ///
    /// Each affordance's template is read from the skeleton: the path and
    /// default representation come from its first form (falling back to
    /// `<section>/<name>` and the registry default), observability from its
    /// `observable` member. The skeleton's `forms` are then replaced by the
    /// expanded list.
    ///
    /// # Errors
    ///
    /// [`ThingError::Description`] when the skeleton or an affordance is not a
    /// JSON object; `UnknownRepresentation` when a declared representation is
    /// not registered.
    pub fn build(&self, skeleton: Value) -> Result<ThingDescription> {
        let Value::Object(mut root) = skeleton else {
            return Err(ThingError::Description(
                "skeleton is not a JSON object".to_string(),
            ));
        };

        let mut affordances = Vec::new();
        let mut forms = HashMap::new();

        for kind in AffordanceKind::ALL {
            let Some(section) = root.get_mut(kind.section()) else {
                continue;
            };
            let section = section.as_object_mut().ok_or_else(|| {
                ThingError::Description(format!("{} is not an object", kind.section()))
            })?;

            for (name, body) in section.iter_mut() {
                let body = body.as_object_mut().ok_or_else(|| {
                    ThingError::Description(format!("{}/{} is not an object", kind, name))
                })?;
                let template = self.template_from(kind, name, body);
                let expanded = expand(&template, &self.registry)?;
                tracing::debug!(
                    "Expanded {}/{} into {} forms",
                    kind,
                    name,
                    expanded.len()
                );
                body.insert("forms".to_string(), serde_json::to_value(&expanded)?);
                forms.insert((kind, name.clone()), expanded);
                affordances.push(template);
            }
        }

        Ok(ThingDescription {
            document: Value::Object(root),
            affordances,
            forms,
        })
    }

    fn template_from(
        &self,
        kind: AffordanceKind,
        name: &str,
        body: &Map<String, Value>,
    ) -> AffordanceTemplate {
        let first_form = body
            .get("forms")
            .and_then(Value::as_array)
            .and_then(|forms| forms.first());
        let content_type = first_form
            .and_then(|f| f.get("contentType"))
            .and_then(Value::as_str)
            .unwrap_or(self.registry.default_representation().token.as_str());
        let observable = body
            .get("observable")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut template =
            AffordanceTemplate::new(kind, name, content_type).observable(observable);
        if let Some(href) = first_form.and_then(|f| f.get("href")).and_then(Value::as_str) {
            template = template.with_path(href);
        }
        template
    }
}
