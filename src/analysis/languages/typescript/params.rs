//! Parameter extraction.

use tree_sitter::Node;

use super::annotations::{render_default_value, render_type_annotation};
use crate::analysis::{ParamInfo, SyntaxTree};

/// Name used for parameters whose pattern is not a plain identifier.
pub(super) const PLACEHOLDER_PARAM: &str = "param";

/// Parameter forms the extractor distinguishes.
enum ParamShape<'a> {
    /// `x`, `x: T`, `x?: T`
    Plain { name: &'a str },
    /// `x = 1`, `x: T = 1`
    Defaulted { name: &'a str, value: Node<'a> },
    /// `...xs`, `...xs: T[]`
    Rest { name: &'a str },
    /// Destructuring and anything else.
    Other,
}

impl<'a> ParamShape<'a> {
    fn classify(tree: &'a SyntaxTree, param: Node<'a>) -> Self {
        if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
            return ParamShape::Other;
        }
        let Some(pattern) = param.child_by_field_name("pattern") else {
            return ParamShape::Other;
        };
        let value = param.child_by_field_name("value");

        match (pattern.kind(), value) {
            ("identifier" | "this", None) => ParamShape::Plain {
                name: tree.node_text(pattern),
            },
            ("identifier" | "this", Some(value)) => ParamShape::Defaulted {
                name: tree.node_text(pattern),
                value,
            },
            ("rest_pattern", None) => match pattern.named_child(0) {
                Some(target) if target.kind() == "identifier" => ParamShape::Rest {
                    name: tree.node_text(target),
                },
                _ => ParamShape::Other,
            },
            _ => ParamShape::Other,
        }
    }
}

/// Extract every declared parameter of a `formal_parameters` node, in
/// declaration order.
pub(super) fn extract_params(tree: &SyntaxTree, parameters: Option<Node>) -> Vec<ParamInfo> {
    let Some(parameters) = parameters else {
        return Vec::new();
    };
    let mut cursor = parameters.walk();
    let params = parameters
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| extract_param(tree, n))
        .collect();
    params
}

fn extract_param(tree: &SyntaxTree, param: Node) -> ParamInfo {
    let type_name = param
        .child_by_field_name("type")
        .map(|t| render_type_annotation(tree, t));

    match ParamShape::classify(tree, param) {
        ParamShape::Plain { name } => ParamInfo {
            name: name.to_string(),
            type_name,
            is_optional: param.kind() == "optional_parameter",
            default_value: None,
        },
        ParamShape::Defaulted { name, value } => ParamInfo {
            name: name.to_string(),
            type_name,
            is_optional: true,
            default_value: render_default_value(tree, value),
        },
        ParamShape::Rest { name } => ParamInfo {
            name: format!("...{}", name),
            type_name,
            is_optional: false,
            default_value: None,
        },
        ParamShape::Other => collapse_pattern(),
    }
}

/// Destructured parameters are not decomposed; they collapse to a single
/// untyped placeholder entry.
fn collapse_pattern() -> ParamInfo {
    ParamInfo {
        name: PLACEHOLDER_PARAM.to_string(),
        type_name: None,
        is_optional: false,
        default_value: None,
    }
}
