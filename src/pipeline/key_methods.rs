//! Key-Method Extractor
//!
//! Joins the component map with the business-logic flag to select the
//! reportable methods, then asks for a one-line description of each.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::ai::NarrativeService;
use crate::types::{ComponentMap, ComponentRole, KeyMethodSummary, ParsedFile};

/// Extract key methods from controllers and services.
///
/// Descriptions are requested one at a time in output order. A failed
/// request leaves that entry without a description.
pub async fn extract_key_methods(
    files: &[ParsedFile],
    components: &ComponentMap,
    narrator: &dyn NarrativeService,
    describe: bool,
) -> Vec<KeyMethodSummary> {
    let roles = reverse_index(components);
    let mut key_methods = Vec::new();

    for file in files {
        for class in &file.classes {
            let Some(&role) = roles.get(class.name.as_str()) else {
                continue;
            };
            if !role.exposes_key_methods() {
                continue;
            }

            for method in class.business_methods() {
                let description = if describe {
                    let text = narrator
                        .describe_method(&method.signature, &class.name, &method.annotations)
                        .await;
                    if text.is_none() {
                        warn!(
                            "Could not generate description for {}.{}",
                            class.name, method.name
                        );
                    }
                    text
                } else {
                    None
                };

                key_methods.push(KeyMethodSummary {
                    class_name: class.name.clone(),
                    method_name: method.name.clone(),
                    signature: method.signature.clone(),
                    description,
                    annotations: method.annotations.clone(),
                    component_type: Some(role),
                });
            }
        }
    }

    debug!("Extracted {} key methods", key_methods.len());
    key_methods
}

/// Class name -> role. Names are unique across roles by construction.
fn reverse_index(components: &ComponentMap) -> HashMap<&str, ComponentRole> {
    components
        .iter()
        .flat_map(|(role, names)| names.iter().map(move |n| (n.as_str(), role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::narrative::testing::ScriptedNarrator;
    use crate::pipeline::components::classify_components;
    use crate::types::{ParsedClass, ParsedMethod};

    fn method(name: &str, business: bool) -> ParsedMethod {
        ParsedMethod::new(name, format!("void {name}()")).business(business)
    }

    fn corpus() -> Vec<ParsedFile> {
        vec![
            ParsedFile::new("src/OrderController.java", "java").with_class(
                ParsedClass::new("OrderController")
                    .with_method(method("createOrder", true))
                    .with_method(method("getId", false)),
            ),
            ParsedFile::new("src/OrderRepository.java", "java").with_class(
                ParsedClass::new("OrderRepository").with_method(method("findByCustomer", true)),
            ),
            ParsedFile::new("src/entities/Order.java", "java")
                .with_package("app.entities")
                .with_class(ParsedClass::new("Order").with_method(method("calculateTotal", true))),
            ParsedFile::new("src/OrderService.java", "java").with_class(
                ParsedClass::new("OrderService")
                    .with_method(method("processPayment", true))
                    .with_method(method("sendReceipt", true)),
            ),
        ]
    }

    #[tokio::test]
    async fn test_only_controllers_and_services_contribute() {
        let files = corpus();
        let components = classify_components(&files);
        let narrator = ScriptedNarrator::default().with_default_description("Does a thing.");

        let methods = extract_key_methods(&files, &components, &narrator, true).await;

        let names: Vec<_> = methods.iter().map(|m| m.method_name.as_str()).collect();
        assert_eq!(names, vec!["createOrder", "processPayment", "sendReceipt"]);
        assert!(methods.iter().all(|m| m.class_name != "OrderRepository"));
        assert!(methods.iter().all(|m| m.class_name != "Order"));
        assert_eq!(methods[0].component_type, Some(ComponentRole::Controllers));
        assert_eq!(methods[1].component_type, Some(ComponentRole::Services));
    }

    #[tokio::test]
    async fn test_one_sequential_request_per_method() {
        let files = corpus();
        let components = classify_components(&files);
        let narrator = ScriptedNarrator::default().with_default_description("Does a thing.");

        extract_key_methods(&files, &components, &narrator, true).await;

        assert_eq!(narrator.calls("describe_method"), 3);
        assert_eq!(
            narrator.described(),
            vec![
                "void createOrder()".to_string(),
                "void processPayment()".to_string(),
                "void sendReceipt()".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_extraction() {
        let files = vec![ParsedFile::new("src/PayService.java", "java").with_class(
            ParsedClass::new("PayService")
                .with_method(method("createA", true))
                .with_method(method("createB", true))
                .with_method(method("createC", true)),
        )];
        let components = classify_components(&files);
        let narrator = ScriptedNarrator::default()
            .with_description("void createA()", "Creates A.")
            .with_description("void createC()", "Creates C.");

        let methods = extract_key_methods(&files, &components, &narrator, true).await;

        assert_eq!(methods.len(), 3);
        assert_eq!(methods[0].description.as_deref(), Some("Creates A."));
        assert_eq!(methods[1].description, None);
        assert_eq!(methods[2].description.as_deref(), Some("Creates C."));
    }

    #[tokio::test]
    async fn test_shadowed_class_name_keeps_controller_methods() {
        let files = vec![
            ParsedFile::new("src/web/Order.java", "java").with_class(
                ParsedClass::new("Order")
                    .with_annotations(vec!["Controller".into()])
                    .with_method(method("createOrder", true)),
            ),
            ParsedFile::new("src/model/Order.java", "java")
                .with_package("shop.entities")
                .with_class(ParsedClass::new("Order")),
        ];
        let components = classify_components(&files);

        let methods =
            extract_key_methods(&files, &components, &ScriptedNarrator::default(), false).await;

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].method_name, "createOrder");
        assert_eq!(methods[0].component_type, Some(ComponentRole::Controllers));
    }

    #[tokio::test]
    async fn test_describe_disabled_makes_no_calls() {
        let files = corpus();
        let components = classify_components(&files);
        let narrator = ScriptedNarrator::default().with_default_description("unused");

        let methods = extract_key_methods(&files, &components, &narrator, false).await;

        assert_eq!(methods.len(), 3);
        assert!(methods.iter().all(|m| m.description.is_none()));
        assert_eq!(narrator.calls("describe_method"), 0);
    }
}
