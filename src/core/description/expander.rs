//! Form expansion: one abstract affordance into every concrete form.
//!
//! A consumer must be able to find every legal representation pairing in
//! the description before issuing a request. The expander therefore emits:
//!
//! ```text
//! property         per representation r (default first):
//!                    read form (r)           [+ observe form (r) if observable]
//! event            per representation r (default first):
//!                    subscribe form (r)      [+ subscribe form (r) at <path>/observe
//!                                             if observable]
//! action           (default, default)
//!                  (r, r)                    for every other r
//!                  (r, s)                    for every r, every s != r
//! ```
//!
//! | Kind | Forms |
//! |------|-------|
//! | property, observable | `2·|R|` |
//! | property | `|R|` |
//! | event | `|R|` (`2·|R|` when marked observable) |
//! | action | `|R| + (|R|-1)·|R|` |

use crate::core::error::Result;
use crate::core::protocol::{
    Representation, RepresentationRegistry, OBSERVE_SEGMENT, SUBSCRIPTION_SUBPROTOCOL,
};
use crate::core::types::{AffordanceKind, AffordanceTemplate, Form, FormResponse, Operation};

/// Build a single form for an affordance and a representation pair.
#[must_use]
pub fn form_for(
    template: &AffordanceTemplate,
    op: Operation,
    request: &Representation,
    response: &Representation,
) -> Form {
    Form {
        href: template.path.clone(),
        op,
        method: template.method().to_string(),
        content_type: request.token.clone(),
        response: FormResponse {
            content_type: response.token.clone(),
        },
        subprotocol: op
            .is_subscription()
            .then(|| SUBSCRIPTION_SUBPROTOCOL.to_string()),
    }
}

/// Expand an affordance into its ordered list of forms.
///
/// # Errors
///
/// Fails with `UnknownRepresentation` when the template's default
/// representation is not registered.
pub fn expand(
    template: &AffordanceTemplate,
    registry: &RepresentationRegistry,
) -> Result<Vec<Form>> {
    let default = registry.require(&template.default_representation)?;
    let ordered: Vec<&Representation> = std::iter::once(default)
        .chain(registry.iter().filter(|r| r.token != default.token))
        .collect();

    let forms = match template.kind {
        AffordanceKind::Property => {
            let mut ops = vec![Operation::ReadProperty];
            if template.observable {
                ops.push(Operation::ObserveProperty);
            }
            per_representation(template, &ordered, &ops)
        }
        AffordanceKind::Event => event_forms(template, &ordered),
        AffordanceKind::Action => action_forms(template, &ordered),
    };
    Ok(forms)
}

fn per_representation(
    template: &AffordanceTemplate,
    ordered: &[&Representation],
    ops: &[Operation],
) -> Vec<Form> {
    ordered
        .iter()
        .flat_map(|rep| ops.iter().map(move |op| form_for(template, *op, rep, rep)))
        .collect()
}

fn event_forms(template: &AffordanceTemplate, ordered: &[&Representation]) -> Vec<Form> {
    let op = Operation::SubscribeEvent;
    let mut forms = Vec::with_capacity(ordered.len() * 2);
    for rep in ordered {
        forms.push(form_for(template, op, rep, rep));
        if template.observable {
            forms.push(Form {
                href: format!("{}/{}", template.path, OBSERVE_SEGMENT),
                ..form_for(template, op, rep, rep)
            });
        }
    }
    forms
}

fn action_forms(template: &AffordanceTemplate, ordered: &[&Representation]) -> Vec<Form> {
    let op = Operation::InvokeAction;

    // base form first, then the symmetric variants
    let mut forms: Vec<Form> = ordered
        .iter()
        .map(|rep| form_for(template, op, rep, rep))
        .collect();

    if ordered.len() < 2 {
        return forms;
    }

    for request in ordered {
        for response in ordered.iter().filter(|r| r.token != request.token) {
            forms.push(form_for(template, op, request, response));
        }
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::protocol::Encoding;
    use std::collections::HashSet;

    fn property(observable: bool) -> AffordanceTemplate {
        AffordanceTemplate::new(AffordanceKind::Property, "result", "application/json")
            .observable(observable)
    }

    fn action() -> AffordanceTemplate {
        AffordanceTemplate::new(AffordanceKind::Action, "add", "application/json")
    }

    fn three_representations() -> RepresentationRegistry {
        RepresentationRegistry::new(vec![
            Representation::json().as_default(),
            Representation::cbor(),
            Representation::new("application/x-counter", 65000, Encoding::Json),
        ])
        .unwrap()
    }

    fn pairs(forms: &[Form]) -> Vec<(String, String)> {
        forms
            .iter()
            .map(|f| (f.content_type.clone(), f.response.content_type.clone()))
            .collect()
    }

    #[test]
    fn test_observable_property_count() {
        let registry = RepresentationRegistry::standard();
        let forms = expand(&property(true), &registry).unwrap();
        assert_eq!(forms.len(), 2 * registry.len());
    }

    #[test]
    fn test_plain_property_count() {
        let registry = three_representations();
        let forms = expand(&property(false), &registry).unwrap();
        assert_eq!(forms.len(), registry.len());
        assert!(forms.iter().all(|f| f.op == Operation::ReadProperty));
    }

    #[test]
    fn test_property_order_base_first() {
        let registry = RepresentationRegistry::standard();
        let forms = expand(&property(true), &registry).unwrap();
        assert_eq!(forms[0].op, Operation::ReadProperty);
        assert_eq!(forms[0].content_type, "application/json");
        assert_eq!(forms[1].op, Operation::ObserveProperty);
        assert_eq!(forms[1].subprotocol.as_deref(), Some("subscribe"));
        assert_eq!(forms[2].content_type, "application/cbor");
        assert_eq!(forms[3].op, Operation::ObserveProperty);
        assert_eq!(forms[3].response.content_type, "application/cbor");
    }

    #[test]
    fn test_default_representation_leads_even_when_not_registry_default() {
        let registry = RepresentationRegistry::standard();
        let template =
            AffordanceTemplate::new(AffordanceKind::Property, "result", "application/cbor");
        let forms = expand(&template, &registry).unwrap();
        assert_eq!(forms[0].content_type, "application/cbor");
        assert_eq!(forms[1].content_type, "application/json");
    }

    #[test]
    fn test_event_forms_all_subscribe() {
        let registry = RepresentationRegistry::standard();
        let template = AffordanceTemplate::new(AffordanceKind::Event, "update", "application/json");
        let forms = expand(&template, &registry).unwrap();
        assert_eq!(forms.len(), registry.len());
        assert!(forms.iter().all(|f| f.op == Operation::SubscribeEvent));
        assert!(forms.iter().all(Form::is_subscription));
        assert!(forms.iter().all(|f| f.method == "GET"));
    }

    #[test]
    fn test_observable_event_count() {
        let registry = three_representations();
        let template = AffordanceTemplate::new(AffordanceKind::Event, "update", "application/json")
            .observable(true);
        let forms = expand(&template, &registry).unwrap();
        assert_eq!(forms.len(), 2 * registry.len());
        assert!(forms.iter().all(|f| f.op == Operation::SubscribeEvent));
    }

    #[test]
    fn test_observable_event_second_form_uses_observe_path() {
        let registry = RepresentationRegistry::standard();
        let template = AffordanceTemplate::new(AffordanceKind::Event, "update", "application/json")
            .observable(true)
            .with_path("counter/events/update");
        let forms = expand(&template, &registry).unwrap();
        assert_eq!(forms[0].href, "counter/events/update");
        assert_eq!(forms[1].href, "counter/events/update/observe");
        assert_eq!(forms[1].content_type, "application/json");
        assert_eq!(forms[3].href, "counter/events/update/observe");
        assert_eq!(forms[3].response.content_type, "application/cbor");
        assert!(forms.iter().all(Form::is_subscription));
    }

    #[test]
    fn test_action_count_and_uniqueness() {
        for registry in [RepresentationRegistry::standard(), three_representations()] {
            let n = registry.len();
            let forms = expand(&action(), &registry).unwrap();
            assert_eq!(forms.len(), n + (n - 1) * n);

            let unique: HashSet<_> = pairs(&forms).into_iter().collect();
            assert_eq!(unique.len(), forms.len(), "duplicate pair emitted");
        }
    }

    #[test]
    fn test_action_order() {
        let registry = RepresentationRegistry::standard();
        let forms = expand(&action(), &registry).unwrap();
        let expected = vec![
            ("application/json".to_string(), "application/json".to_string()),
            ("application/cbor".to_string(), "application/cbor".to_string()),
            ("application/json".to_string(), "application/cbor".to_string()),
            ("application/cbor".to_string(), "application/json".to_string()),
        ];
        assert_eq!(pairs(&forms), expected);
        assert!(forms.iter().all(|f| f.method == "POST" && f.subprotocol.is_none()));
    }

    #[test]
    fn test_single_representation_emits_only_base_forms() {
        let registry =
            RepresentationRegistry::new(vec![Representation::json().as_default()]).unwrap();
        assert_eq!(expand(&action(), &registry).unwrap().len(), 1);
        assert_eq!(expand(&property(true), &registry).unwrap().len(), 2);
        assert_eq!(expand(&property(false), &registry).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_default_representation() {
        let registry = RepresentationRegistry::standard();
        let template = AffordanceTemplate::new(AffordanceKind::Action, "add", "application/xml");
        assert!(expand(&template, &registry).is_err());
    }

    #[test]
    fn test_form_for_uses_template_path() {
        let registry = RepresentationRegistry::standard();
        let template = action().with_path("counter/actions/add");
        let json = registry.get("application/json").unwrap();
        let cbor = registry.get("application/cbor").unwrap();
        let form = form_for(&template, Operation::InvokeAction, cbor, json);
        assert_eq!(form.href, "counter/actions/add");
        assert_eq!(form.representation_pair(), ("application/cbor", "application/json"));
    }
}
