//! Rendering of type annotations and default-value literals.
//!
//! Type nodes are first classified into a small closed set of shapes;
//! rendering is a match over that set with an explicit fallback to
//! `"unknown"` for everything else.

use tree_sitter::Node;

use crate::analysis::SyntaxTree;

/// Primitive keywords rendered by name.
const PRIMITIVE_KEYWORDS: &[&str] = &[
    "string",
    "number",
    "boolean",
    "void",
    "any",
    "unknown",
    "null",
    "undefined",
];

/// Rendering used for any type shape not covered below.
pub(super) const UNRECOGNIZED_TYPE: &str = "unknown";

/// The type shapes the renderer distinguishes.
#[derive(Debug)]
enum TypeShape<'a> {
    /// `string`, `number`, `null`, ...
    Keyword(&'static str),
    /// `Foo` or `Foo<T>`; only the simple identifier is kept.
    Reference(&'a str),
    /// `T[]`
    Array(Node<'a>),
    /// `A | B | C`, flattened in source order.
    Union(Vec<Node<'a>>),
    /// `(a: A) => B`
    Function,
    Unrecognized,
}

impl<'a> TypeShape<'a> {
    fn classify(tree: &'a SyntaxTree, node: Node<'a>) -> Self {
        match node.kind() {
            "predefined_type" => keyword(tree.node_text(node))
                .map(TypeShape::Keyword)
                .unwrap_or(TypeShape::Unrecognized),
            "literal_type" => match first_type_child(node).map(|n| n.kind()) {
                Some("null") => TypeShape::Keyword("null"),
                Some("undefined") => TypeShape::Keyword("undefined"),
                _ => TypeShape::Unrecognized,
            },
            "type_identifier" => TypeShape::Reference(tree.node_text(node)),
            "generic_type" => match node.child_by_field_name("name") {
                Some(name) if name.kind() == "type_identifier" => {
                    TypeShape::Reference(tree.node_text(name))
                }
                _ => TypeShape::Unrecognized,
            },
            "array_type" => first_type_child(node)
                .map(TypeShape::Array)
                .unwrap_or(TypeShape::Unrecognized),
            "union_type" => {
                let mut members = Vec::new();
                flatten_union(node, &mut members);
                TypeShape::Union(members)
            }
            "function_type" => TypeShape::Function,
            // `(T)` has the shape of `T`.
            "parenthesized_type" => first_type_child(node)
                .map(|inner| TypeShape::classify(tree, inner))
                .unwrap_or(TypeShape::Unrecognized),
            _ => TypeShape::Unrecognized,
        }
    }
}

fn keyword(text: &str) -> Option<&'static str> {
    PRIMITIVE_KEYWORDS.iter().copied().find(|k| *k == text)
}

fn first_type_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment");
    child
}

/// The grammar nests `A | B | C` as `(A | B) | C`.
fn flatten_union<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "union_type" => flatten_union(child, out),
            _ => out.push(child),
        }
    }
}

/// Render a type node to its display string.
pub(super) fn render_type(tree: &SyntaxTree, node: Node) -> String {
    match TypeShape::classify(tree, node) {
        TypeShape::Keyword(name) => name.to_string(),
        TypeShape::Reference(name) => name.to_string(),
        TypeShape::Array(element) => format!("{}[]", render_type(tree, element)),
        TypeShape::Union(members) => members
            .into_iter()
            .map(|m| render_type(tree, m))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeShape::Function => "Function".to_string(),
        TypeShape::Unrecognized => UNRECOGNIZED_TYPE.to_string(),
    }
}

/// Render a `: T` annotation node.
///
/// Return-type positions can also hold `asserts x` or `x is T`
/// annotations; those render as unrecognized.
pub(super) fn render_type_annotation(tree: &SyntaxTree, annotation: Node) -> String {
    if annotation.kind() != "type_annotation" {
        return UNRECOGNIZED_TYPE.to_string();
    }
    match first_type_child(annotation) {
        Some(ty) => render_type(tree, ty),
        None => UNRECOGNIZED_TYPE.to_string(),
    }
}

/// Render a default-value expression, if it is a simple literal or
/// identifier.
///
/// Strings render as their decoded value in double quotes; numbers render
/// as their decimal value.
pub(super) fn render_default_value(tree: &SyntaxTree, value: Node) -> Option<String> {
    let text = tree.node_text(value);
    match value.kind() {
        "string" => {
            let inner = text
                .get(1..text.len().saturating_sub(1))
                .unwrap_or_default();
            Some(format!("\"{}\"", unescape(inner)))
        }
        "number" => Some(number_value(text)),
        "true" | "false" | "identifier" | "undefined" => Some(text.to_string()),
        "null" => Some("null".to_string()),
        _ => None,
    }
}

/// Decode the escape sequences of a string literal body.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation.
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, &format!("\\x{}", hex));
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                push_code_point(&mut out, &hex, &format!("\\u{{{}}}", hex));
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, &hex, &format!("\\u{}", hex));
            }
            other => out.push(other),
        }
    }

    out
}

fn push_code_point(out: &mut String, hex: &str, fallback: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => out.push_str(fallback),
    }
}

/// Decimal form of a numeric literal: `0x10` is `16`, `1_000` is `1000`.
/// Literals that do not fit (bigints, huge values) keep their source text.
fn number_value(text: &str) -> String {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();

    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find(|(prefix, _)| lower.starts_with(*prefix));
    if let Some((prefix, radix)) = radix {
        return u64::from_str_radix(&lower[prefix.len()..], radix)
            .map(|n| n.to_string())
            .unwrap_or_else(|_| text.to_string());
    }

    match lower.parse::<f64>() {
        Ok(n) if n.is_finite() && n.abs() < 1e21 => n.to_string(),
        _ => text.to_string(),
    }
}
