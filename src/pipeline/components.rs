//! Component Classifier
//!
//! Assigns each parsed class to at most one architectural role using an
//! ordered rule table. The first matching rule wins and unmatched classes are
//! left out of the map.

use std::collections::HashSet;

use crate::types::{ComponentMap, ComponentRole, ParsedClass, ParsedFile};

/// One row of the classification table
struct RoleRule {
    role: ComponentRole,
    matches: fn(&ParsedClass, &ParsedFile) -> bool,
}

/// Classification order is part of the contract
const RULES: &[RoleRule] = &[
    RoleRule {
        role: ComponentRole::Controllers,
        matches: is_controller,
    },
    RoleRule {
        role: ComponentRole::Services,
        matches: is_service,
    },
    RoleRule {
        role: ComponentRole::Repositories,
        matches: is_repository,
    },
    RoleRule {
        role: ComponentRole::Entities,
        matches: is_entity,
    },
    RoleRule {
        role: ComponentRole::Configurations,
        matches: is_configuration,
    },
];

fn is_controller(class: &ParsedClass, _file: &ParsedFile) -> bool {
    class.name.contains("Controller") || class.has_annotation("Controller")
}

fn is_service(class: &ParsedClass, _file: &ParsedFile) -> bool {
    class.name.contains("Service") || class.has_annotation("Service")
}

fn is_repository(class: &ParsedClass, _file: &ParsedFile) -> bool {
    class.name.contains("Repository") || class.has_annotation("Repository")
}

fn is_entity(class: &ParsedClass, file: &ParsedFile) -> bool {
    class.has_annotation("Entity")
        || file
            .package
            .as_deref()
            .is_some_and(|p| p.contains("entities"))
}

fn is_configuration(class: &ParsedClass, _file: &ParsedFile) -> bool {
    class.has_annotation("Configuration") || class.name.contains("Config")
}

/// Role of a single class, if any rule matches
pub fn classify_class(class: &ParsedClass, file: &ParsedFile) -> Option<ComponentRole> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(class, file))
        .map(|rule| rule.role)
}

/// Classify every class of every file, preserving discovery order.
///
/// A class name is listed once: the first classified declaration of a
/// name decides its role.
pub fn classify_components(files: &[ParsedFile]) -> ComponentMap {
    let mut map = ComponentMap::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for file in files {
        for class in &file.classes {
            if seen.contains(class.name.as_str()) {
                continue;
            }
            if let Some(role) = classify_class(class, file) {
                seen.insert(class.name.as_str());
                map.push(role, class.name.clone());
            }
        }
    }

    tracing::debug!(
        controllers = map.controllers.len(),
        services = map.services.len(),
        repositories = map.repositories.len(),
        entities = map.entities.len(),
        configurations = map.configurations.len(),
        "Classified components"
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn file_with(classes: Vec<ParsedClass>) -> ParsedFile {
        classes
            .into_iter()
            .fold(ParsedFile::new("src/A.java", "java"), |f, c| f.with_class(c))
    }

    #[test]
    fn test_controller_by_name() {
        let files = vec![file_with(vec![ParsedClass::new("OrderController")])];
        let map = classify_components(&files);
        assert_eq!(map.controllers, vec!["OrderController"]);
        assert_eq!(map.total(), 1);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Matches both the controller and service rules
        let class = ParsedClass::new("ServiceController");
        let file = file_with(vec![]);
        assert_eq!(classify_class(&class, &file), Some(ComponentRole::Controllers));

        // Annotated as a service but named like a repository
        let class = ParsedClass::new("UserRepository").with_annotations(vec!["Service".into()]);
        assert_eq!(classify_class(&class, &file), Some(ComponentRole::Services));

        // Entity annotation beats the Config name rule
        let class = ParsedClass::new("ConfigEntry").with_annotations(vec!["Entity".into()]);
        assert_eq!(classify_class(&class, &file), Some(ComponentRole::Entities));
    }

    #[test]
    fn test_entity_by_package() {
        let file = ParsedFile::new("src/Car.java", "java")
            .with_package("com.rental.entities")
            .with_class(ParsedClass::new("Car"));
        let map = classify_components(&[file]);
        assert_eq!(map.entities, vec!["Car"]);
    }

    #[test]
    fn test_configuration_by_annotation_or_name() {
        let files = vec![file_with(vec![
            ParsedClass::new("WebSecurityConfig"),
            ParsedClass::new("AppSetup").with_annotations(vec!["Configuration".into()]),
        ])];
        let map = classify_components(&files);
        assert_eq!(map.configurations, vec!["WebSecurityConfig", "AppSetup"]);
    }

    #[test]
    fn test_unmatched_classes_are_omitted() {
        let files = vec![file_with(vec![
            ParsedClass::new("StringUtils"),
            ParsedClass::new("Money"),
        ])];
        let map = classify_components(&files);
        assert_eq!(map, ComponentMap::default());
    }

    #[test]
    fn test_same_name_in_two_files_keeps_first_role() {
        let files = vec![
            ParsedFile::new("src/web/Order.java", "java").with_class(
                ParsedClass::new("Order").with_annotations(vec!["Controller".into()]),
            ),
            ParsedFile::new("src/model/Order.java", "java")
                .with_package("shop.entities")
                .with_class(ParsedClass::new("Order")),
        ];

        let map = classify_components(&files);
        assert_eq!(map.controllers, vec!["Order"]);
        assert!(map.entities.is_empty());
        assert_eq!(map.total(), 1);
    }

    #[test]
    fn test_unclassified_first_declaration_does_not_reserve_name() {
        let files = vec![
            file_with(vec![ParsedClass::new("Order")]),
            ParsedFile::new("src/model/Order.java", "java")
                .with_package("shop.entities")
                .with_class(ParsedClass::new("Order")),
        ];

        let map = classify_components(&files);
        assert_eq!(map.entities, vec!["Order"]);
    }

    #[test]
    fn test_order_follows_files_then_classes() {
        let files = vec![
            file_with(vec![
                ParsedClass::new("BController"),
                ParsedClass::new("AController"),
            ]),
            file_with(vec![ParsedClass::new("CController")]),
        ];
        let map = classify_components(&files);
        assert_eq!(map.controllers, vec!["BController", "AController", "CController"]);
    }

    fn arb_class() -> impl Strategy<Value = ParsedClass> {
        let name = prop_oneof![
            Just("Controller"),
            Just("Service"),
            Just("Repository"),
            Just("Config"),
            Just("Thing"),
        ];
        let annotation = prop_oneof![
            Just("Controller"),
            Just("Service"),
            Just("Repository"),
            Just("Entity"),
            Just("Configuration"),
            Just("Deprecated"),
        ];
        (
            "[A-Z][a-z]{1,6}",
            name,
            proptest::collection::vec(annotation, 0..3),
        )
            .prop_map(|(prefix, suffix, annotations)| {
                ParsedClass::new(format!("{prefix}{suffix}"))
                    .with_annotations(annotations.into_iter().map(String::from).collect())
            })
    }

    proptest! {
        #[test]
        fn prop_each_class_has_at_most_one_role(
            classes in proptest::collection::vec(arb_class(), 0..20),
            entity_package in any::<bool>(),
        ) {
            // Unique names so membership can be counted per class
            let classes: Vec<ParsedClass> = classes
                .into_iter()
                .enumerate()
                .map(|(i, mut c)| { c.name = format!("{}{}", c.name, i); c })
                .collect();

            let mut file = file_with(classes.clone());
            if entity_package {
                file.package = Some("app.entities".to_string());
            }
            let map = classify_components(&[file]);

            let mut seen = HashSet::new();
            for (_, names) in map.iter() {
                for name in names {
                    prop_assert!(seen.insert(name.clone()), "{} listed twice", name);
                }
            }
            prop_assert!(map.total() <= classes.len());
        }
    }
}
