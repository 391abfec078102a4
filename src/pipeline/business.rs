//! Business-Logic Filter
//!
//! Decides whether a method performs application behavior or is an
//! accessor / utility. Rules are evaluated in order, first decisive rule wins:
//!
//! 1. `get*` with no parameters is an accessor
//! 2. `set*` with one parameter is a mutator
//! 3. `is*` with no parameters is a predicate accessor
//! 4. names in the utility list are boilerplate
//! 5. any business annotation marks business logic
//! 6. a business keyword in the lower-cased name marks business logic
//! 7. everything else is not business logic
//!
//! The accessor rules are fixed. The three lists are configurable through the
//! `[rules]` table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRules {
    /// Exact method names never treated as business logic
    pub utility_methods: Vec<String>,
    /// Annotation names that mark a method as business logic
    pub business_annotations: Vec<String>,
    /// Case-insensitive name fragments that mark a method as business logic
    pub business_keywords: Vec<String>,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            utility_methods: to_strings(&["equals", "hashCode", "toString", "clone", "finalize"]),
            business_annotations: to_strings(&[
                "PostMapping",
                "GetMapping",
                "PutMapping",
                "DeleteMapping",
                "RequestMapping",
                "Service",
                "Transactional",
                "Async",
            ]),
            business_keywords: to_strings(&[
                "create",
                "update",
                "delete",
                "save",
                "find",
                "search",
                "process",
                "calculate",
                "validate",
                "authenticate",
                "authorize",
                "send",
                "receive",
                "fetch",
                "load",
                "rent",
            ]),
        }
    }
}

impl BusinessRules {
    pub fn is_business_logic(
        &self,
        name: &str,
        annotations: &[String],
        parameter_count: usize,
    ) -> bool {
        if is_accessor(name, parameter_count) {
            return false;
        }

        if self.utility_methods.iter().any(|u| u == name) {
            return false;
        }

        if annotations
            .iter()
            .any(|a| self.business_annotations.iter().any(|b| b == a))
        {
            return true;
        }

        let lower = name.to_lowercase();
        self.business_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

fn is_accessor(name: &str, parameter_count: usize) -> bool {
    (name.starts_with("get") && parameter_count == 0)
        || (name.starts_with("set") && parameter_count == 1)
        || (name.starts_with("is") && parameter_count == 0)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ann(names: &[&str]) -> Vec<String> {
        to_strings(names)
    }

    #[test]
    fn test_accessors_are_excluded() {
        let rules = BusinessRules::default();
        assert!(!rules.is_business_logic("getId", &[], 0));
        assert!(!rules.is_business_logic("setName", &[], 1));
        assert!(!rules.is_business_logic("isActive", &[], 0));
    }

    #[test]
    fn test_accessor_rules_depend_on_parameter_count() {
        let rules = BusinessRules::default();
        // getOrdersByCustomer(id) is not a plain getter, but has no keyword either
        assert!(!rules.is_business_logic("getOrdersByCustomer", &[], 1));
        // setupAndSave with no params passes the setter rule and hits "save"
        assert!(rules.is_business_logic("setupAndSave", &[], 0));
        assert!(rules.is_business_logic("isValidatedBy", &[], 1));
    }

    #[test]
    fn test_utility_methods_are_excluded_even_with_annotations() {
        let rules = BusinessRules::default();
        assert!(!rules.is_business_logic("toString", &ann(&["Transactional"]), 0));
        assert!(!rules.is_business_logic("equals", &[], 1));
    }

    #[test]
    fn test_business_annotation_marks_method() {
        let rules = BusinessRules::default();
        assert!(rules.is_business_logic("handle", &ann(&["PostMapping"]), 1));
        assert!(rules.is_business_logic("run", &ann(&["Async"]), 0));
        assert!(!rules.is_business_logic("handle", &ann(&["Override"]), 1));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let rules = BusinessRules::default();
        assert!(rules.is_business_logic("createOrder", &[], 1));
        assert!(rules.is_business_logic("bulkUPDATE", &[], 2));
        assert!(rules.is_business_logic("rentCar", &[], 1));
        assert!(!rules.is_business_logic("helper", &[], 0));
    }

    #[test]
    fn test_custom_lists_replace_defaults() {
        let rules = BusinessRules {
            utility_methods: vec![],
            business_annotations: ann(&["Command"]),
            business_keywords: ann(&["dispatch"]),
        };
        assert!(rules.is_business_logic("toString", &ann(&["Command"]), 0));
        assert!(rules.is_business_logic("dispatchEvent", &[], 1));
        assert!(!rules.is_business_logic("createOrder", &[], 1));
    }

    proptest! {
        #[test]
        fn prop_name_exclusions_dominate_annotations(
            suffix in "[A-Za-z]{0,12}",
            annotations in proptest::collection::vec(
                prop_oneof![
                    Just("PostMapping".to_string()),
                    Just("Service".to_string()),
                    Just("Transactional".to_string()),
                    Just("Async".to_string()),
                ],
                0..4,
            ),
        ) {
            let rules = BusinessRules::default();
            let getter = format!("get{suffix}");
            let setter = format!("set{suffix}");
            let predicate = format!("is{suffix}");
            prop_assert!(!rules.is_business_logic(&getter, &annotations, 0));
            prop_assert!(!rules.is_business_logic(&setter, &annotations, 1));
            prop_assert!(!rules.is_business_logic(&predicate, &annotations, 0));
        }

        #[test]
        fn prop_business_annotation_wins_for_non_accessors(
            name in "(handle|run|execute)[A-Z][a-z]{0,8}",
            params in 0usize..4,
        ) {
            let rules = BusinessRules::default();
            prop_assert!(rules.is_business_logic(&name, &ann(&["GetMapping"]), params));
        }
    }
}
