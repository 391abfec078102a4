use tree_sitter::Node;

use super::{Language, Parser, count_lines, create_ts_parser, get_node_text, query_texts};
use crate::pipeline::BusinessRules;
use crate::types::{CodebriefError, ParsedClass, ParsedFile, ParsedMethod, Result};

/// Structural Java parser on tree-sitter
pub struct JavaParser {
    rules: BusinessRules,
}

impl JavaParser {
    pub fn new(rules: BusinessRules) -> Result<Self> {
        create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;
        Ok(Self { rules })
    }
}

impl Parser for JavaParser {
    fn parse(&self, path: &str, content: &str) -> Result<ParsedFile> {
        let mut parser = create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| CodebriefError::Parse {
                message: "Failed to parse Java file".to_string(),
                path: path.to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(CodebriefError::Parse {
                message: "Syntax error in Java source".to_string(),
                path: path.to_string(),
            });
        }

        let bytes = content.as_bytes();
        let language = tree_sitter_java::LANGUAGE.into();

        let package = query_texts(
            &language,
            "(package_declaration [(scoped_identifier) (identifier)] @package)",
            root,
            bytes,
        )
        .into_iter()
        .next();

        let imports = query_texts(
            &language,
            "(import_declaration [(scoped_identifier) (identifier)] @import)",
            root,
            bytes,
        );

        let mut declarations = Vec::new();
        collect_class_declarations(root, &mut declarations);

        let mut classes = Vec::with_capacity(declarations.len());
        let mut constructor_scores = Vec::new();
        for decl in declarations {
            if let Some(class) = self.extract_class(decl, bytes, package.as_deref()) {
                constructor_scores.extend(constructor_complexities(decl, bytes));
                classes.push(class);
            }
        }

        let lines = count_lines(content, Language::Java.comment_prefix());
        let mut file = ParsedFile::new(path, Language::Java.tag()).with_lines(lines.total, lines.code);
        file.package = package;
        file.imports = imports;

        // Constructors count toward the file score but are not methods
        let scores: Vec<f64> = classes
            .iter()
            .flat_map(|c| c.methods.iter())
            .filter_map(|m| m.complexity)
            .chain(constructor_scores)
            .collect();
        if !scores.is_empty() {
            file.complexity = Some(scores.iter().sum::<f64>() / scores.len() as f64);
        }

        file.classes = classes;
        Ok(file)
    }

    fn language(&self) -> Language {
        Language::Java
    }
}

impl JavaParser {
    fn extract_class(&self, decl: Node, bytes: &[u8], package: Option<&str>) -> Option<ParsedClass> {
        let name = decl.child_by_field_name("name")?;
        let mut class = ParsedClass::new(get_node_text(name, bytes))
            .with_annotations(annotations_of(decl, bytes));
        class.package = package.map(String::from);

        if let Some(body) = decl.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if member.kind() == "method_declaration"
                    && let Some(method) = self.extract_method(member, bytes)
                {
                    class.methods.push(method);
                }
            }
        }

        Some(class)
    }

    fn extract_method(&self, decl: Node, bytes: &[u8]) -> Option<ParsedMethod> {
        let name = get_node_text(decl.child_by_field_name("name")?, bytes).to_string();

        let return_type = decl
            .child_by_field_name("type")
            .filter(|t| t.kind() != "void_type")
            .map(|t| get_node_text(t, bytes).to_string());

        let params = decl
            .child_by_field_name("parameters")
            .map(|p| parameters_of(p, bytes))
            .unwrap_or_default();

        let signature = format!(
            "{} {}({})",
            return_type.as_deref().unwrap_or("void"),
            name,
            params.join(", ")
        );

        let annotations = annotations_of(decl, bytes);
        let is_business_logic = self.rules.is_business_logic(&name, &annotations, params.len());

        let mut method = ParsedMethod::new(name, signature)
            .with_annotations(annotations)
            .business(is_business_logic);
        method.return_type = return_type;
        method.parameter_count = params.len();
        method.complexity = decl
            .child_by_field_name("body")
            .map(|body| cyclomatic_complexity(body, bytes));

        Some(method)
    }
}

/// Scores of the class's own constructor bodies
fn constructor_complexities(decl: Node, bytes: &[u8]) -> Vec<f64> {
    let Some(body) = decl.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|member| member.kind() == "constructor_declaration")
        .filter_map(|ctor| ctor.child_by_field_name("body"))
        .map(|ctor_body| cyclomatic_complexity(ctor_body, bytes))
        .collect()
}

/// Every class declaration in document order, nested ones included
fn collect_class_declarations<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "class_declaration" {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_class_declarations(child, out);
    }
}

/// Simple annotation names from the declaration's modifiers
fn annotations_of(decl: Node, bytes: &[u8]) -> Vec<String> {
    let mut cursor = decl.walk();
    let Some(modifiers) = decl
        .named_children(&mut cursor)
        .find(|c| c.kind() == "modifiers")
    else {
        return Vec::new();
    };

    let mut cursor = modifiers.walk();
    modifiers
        .named_children(&mut cursor)
        .filter(|c| matches!(c.kind(), "annotation" | "marker_annotation"))
        .filter_map(|a| a.child_by_field_name("name"))
        .map(|n| simple_name(get_node_text(n, bytes)).to_string())
        .collect()
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// `Type name` for each declared parameter; varargs render as `Type... name`
fn parameters_of(params: Node, bytes: &[u8]) -> Vec<String> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|p| match p.kind() {
            "formal_parameter" => {
                let ty = get_node_text(p.child_by_field_name("type")?, bytes);
                let name = get_node_text(p.child_by_field_name("name")?, bytes);
                Some(format!("{} {}", ty, name))
            }
            "spread_parameter" => {
                let mut cursor = p.walk();
                let children: Vec<Node> = p.named_children(&mut cursor).collect();
                let ty = children
                    .iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))?;
                let declarator = children.iter().find(|c| c.kind() == "variable_declarator")?;
                let name = get_node_text(declarator.child_by_field_name("name")?, bytes);
                Some(format!("{}... {}", get_node_text(*ty, bytes), name))
            }
            _ => None,
        })
        .collect()
}

/// 1 + decision points. Bodies of local and anonymous classes are skipped.
fn cyclomatic_complexity(body: Node, bytes: &[u8]) -> f64 {
    (1 + decision_points(body, bytes)) as f64
}

fn decision_points(node: Node, bytes: &[u8]) -> usize {
    let own = match node.kind() {
        "if_statement" | "for_statement" | "enhanced_for_statement" | "while_statement"
        | "do_statement" | "catch_clause" | "ternary_expression" => 1,
        "switch_label" if get_node_text(node, bytes).trim_start().starts_with("case") => 1,
        "binary_expression" => node
            .child_by_field_name("operator")
            .filter(|op| matches!(op.kind(), "&&" | "||"))
            .map_or(0, |_| 1),
        _ => 0,
    };

    let mut cursor = node.walk();
    let nested: usize = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "class_body")
        .map(|c| decision_points(c, bytes))
        .sum();

    own + nested
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: &str = r#"package com.shop.web;

import java.util.List;
import org.springframework.web.bind.annotation.RestController;

// Order endpoints
@RestController
@org.springframework.web.bind.annotation.RequestMapping("/orders")
public class OrderController {

    private final OrderService service;

    public OrderController(OrderService service) {
        this.service = service;
    }

    @PostMapping
    public Order createOrder(@RequestBody OrderRequest request) {
        if (request == null || request.isEmpty()) {
            throw new IllegalArgumentException("empty");
        }
        return service.create(request);
    }

    public List<Order> findAll() {
        return service.findAll();
    }

    public String getName() {
        return "orders";
    }

    public void setName(String name) {
    }
}
"#;

    fn parser() -> JavaParser {
        JavaParser::new(BusinessRules::default()).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parser().parse("web/OrderController.java", CONTROLLER).unwrap();

        assert_eq!(file.file_type, "java");
        assert_eq!(file.package.as_deref(), Some("com.shop.web"));
        assert_eq!(
            file.imports,
            vec![
                "java.util.List",
                "org.springframework.web.bind.annotation.RestController"
            ]
        );
    }

    #[test]
    fn test_class_annotations_use_simple_names() {
        let file = parser().parse("web/OrderController.java", CONTROLLER).unwrap();

        assert_eq!(file.classes.len(), 1);
        let class = &file.classes[0];
        assert_eq!(class.name, "OrderController");
        assert_eq!(class.package.as_deref(), Some("com.shop.web"));
        assert_eq!(class.annotations, vec!["RestController", "RequestMapping"]);
    }

    #[test]
    fn test_methods_signatures_and_business_flags() {
        let file = parser().parse("web/OrderController.java", CONTROLLER).unwrap();
        let methods = &file.classes[0].methods;

        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["createOrder", "findAll", "getName", "setName"]);

        let create = &methods[0];
        assert_eq!(create.signature, "Order createOrder(OrderRequest request)");
        assert_eq!(create.return_type.as_deref(), Some("Order"));
        assert_eq!(create.annotations, vec!["PostMapping"]);
        assert_eq!(create.parameter_count, 1);
        assert!(create.is_business_logic);

        assert_eq!(methods[1].signature, "List<Order> findAll()");
        assert!(methods[1].is_business_logic);
        assert!(!methods[2].is_business_logic);

        let setter = &methods[3];
        assert_eq!(setter.signature, "void setName(String name)");
        assert_eq!(setter.return_type, None);
        assert!(!setter.is_business_logic);
    }

    #[test]
    fn test_method_complexity_and_file_mean() {
        let file = parser().parse("web/OrderController.java", CONTROLLER).unwrap();
        let scores: Vec<_> = file.classes[0].methods.iter().map(|m| m.complexity).collect();

        // if + || in createOrder; the constructor adds a fifth score of 1
        assert_eq!(scores, vec![Some(3.0), Some(1.0), Some(1.0), Some(1.0)]);
        assert_eq!(file.complexity, Some(1.4));
    }

    #[test]
    fn test_line_counts() {
        let file = parser().parse("web/OrderController.java", CONTROLLER).unwrap();
        let expected = count_lines(CONTROLLER, "//");

        assert_eq!(file.total_lines, expected.total);
        assert_eq!(file.code_lines, expected.code);
        assert_eq!(file.comment_lines, file.total_lines - file.code_lines);
    }

    #[test]
    fn test_branches_and_nested_classes() {
        let source = r#"
package com.shop.billing;

@Service
public class BillingService {
    public int calculateTotal(int[] items, boolean vip) {
        int total = 0;
        for (int item : items) {
            total += item > 100 ? item - 5 : item;
        }
        switch (total) {
            case 0: return 0;
            case 1: return 1;
            default: break;
        }
        try {
            while (vip && total > 0) { total--; }
        } catch (RuntimeException e) {
            total = -1;
        }
        return total;
    }

    static class Helper {
        void help(String... args) {
            Runnable r = new Runnable() {
                public void run() { if (args.length > 0) { return; } }
            };
        }
    }
}
"#;
        let file = parser().parse("billing/BillingService.java", source).unwrap();

        let names: Vec<_> = file.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["BillingService", "Helper"]);
        assert_eq!(file.classes[0].annotations, vec!["Service"]);

        // enhanced for, ternary, two case labels, while, &&, catch
        let calculate = &file.classes[0].methods[0];
        assert_eq!(calculate.complexity, Some(8.0));
        assert_eq!(calculate.parameter_count, 2);
        assert_eq!(calculate.signature, "int calculateTotal(int[] items, boolean vip)");

        let help = &file.classes[1].methods[0];
        assert_eq!(help.signature, "void help(String... args)");
        assert_eq!(help.parameter_count, 1);
        assert_eq!(help.complexity, Some(1.0));

        assert_eq!(file.complexity, Some(4.5));
    }

    #[test]
    fn test_abstract_methods_have_no_complexity() {
        let source = "abstract class Repo { abstract void saveAll(); }";
        let file = parser().parse("Repo.java", source).unwrap();

        assert_eq!(file.classes[0].methods[0].complexity, None);
        assert_eq!(file.complexity, None);
    }

    #[test]
    fn test_constructor_only_class_is_scored() {
        let source = r#"
class Money {
    private final long cents;

    Money(long cents) {
        if (cents < 0 || cents > MAX) {
            throw new IllegalArgumentException();
        }
        this.cents = cents;
    }
}
"#;
        let file = parser().parse("Money.java", source).unwrap();

        assert!(file.classes[0].methods.is_empty());
        assert_eq!(file.complexity, Some(3.0));
    }

    #[test]
    fn test_file_without_methods_has_no_complexity() {
        let file = parser()
            .parse("Config.java", "@Configuration\nclass AppConfig {}\n")
            .unwrap();
        assert_eq!(file.classes[0].annotations, vec!["Configuration"]);
        assert_eq!(file.complexity, None);
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parser().parse("Broken.java", "class Broken { void x( { }").unwrap_err();
        assert!(matches!(err, CodebriefError::Parse { .. }));
    }
}
