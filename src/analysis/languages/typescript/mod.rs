//! TypeScript / TSX declaration extractor using tree-sitter.
//!
//! Extraction runs in two passes over one tree:
//! 1. collect the names bound by `export <declaration>` statements for
//!    functions, classes and variable lists;
//! 2. walk every node and record functions, classes, interfaces and type
//!    aliases (at any nesting depth), checking membership in that set.
//!
//! `export default ...`, re-exports (`export { a }`, `export * from`) and
//! `export interface` / `export type` do not add names to the set.

mod annotations;
mod params;

use std::collections::HashSet;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    ClassInfo, ExtractError, FunctionInfo, ImportInfo, InterfaceInfo, LanguageAnalyzer,
    ParsedFile, PropertyInfo, SyntaxTree, TypeInfo,
};

use annotations::render_type_annotation;
use params::extract_params;

/// Tree-sitter query for `export <declaration>` statements.
const EXPORT_QUERY: &str = r#"
(export_statement
  declaration: (_) @declaration
) @export
"#;

/// Tree-sitter query for import statements.
const IMPORT_QUERY: &str = r#"
(import_statement
  source: (string) @source
) @import
"#;

pub struct TypeScriptAnalyzer {
    language: Language,
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptAnalyzer {
    /// Analyzer for plain TypeScript (`.ts`).
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            language_id: "typescript",
            extensions: &["ts"],
        }
    }

    /// Analyzer for sources that may contain JSX markup (`.tsx`, `.js`, `.jsx`).
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            language_id: "tsx",
            extensions: &["tsx", "js", "jsx"],
        }
    }

    fn create_parser(&self) -> Result<Parser, ExtractError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// First pass: names bound by `export <declaration>`.
    fn exported_names(&self, tree: &SyntaxTree) -> Result<HashSet<String>, ExtractError> {
        let query = Query::new(&self.language, EXPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.tree.root_node(), &tree.source[..]);

        let mut names = HashSet::new();

        while let Some(m) = matches.next() {
            let mut export_node = None;
            let mut declaration = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "export" => export_node = Some(capture.node),
                    "declaration" => declaration = Some(capture.node),
                    _ => {}
                }
            }

            let (Some(export_node), Some(declaration)) = (export_node, declaration) else {
                continue;
            };
            if has_token(export_node, "default") {
                continue;
            }

            match declaration.kind() {
                "function_declaration"
                | "generator_function_declaration"
                | "class_declaration"
                | "abstract_class_declaration" => {
                    if let Some(name) = declaration.child_by_field_name("name") {
                        names.insert(tree.node_text(name).to_string());
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    let mut decl_cursor = declaration.walk();
                    for declarator in declaration.named_children(&mut decl_cursor) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        match declarator.child_by_field_name("name") {
                            Some(name) if name.kind() == "identifier" => {
                                names.insert(tree.node_text(name).to_string());
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(names)
    }

    fn extract_imports(&self, tree: &SyntaxTree) -> Result<Vec<ImportInfo>, ExtractError> {
        let query = Query::new(&self.language, IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.tree.root_node(), &tree.source[..]);

        let mut imports = Vec::new();

        while let Some(m) = matches.next() {
            let mut import_node = None;
            let mut source = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "import" => import_node = Some(capture.node),
                    "source" => source = Some(string_value(tree, capture.node)),
                    _ => {}
                }
            }

            if let (Some(node), Some(source)) = (import_node, source) {
                let (specifiers, is_default) = import_bindings(tree, node);
                imports.push(ImportInfo {
                    source,
                    specifiers,
                    is_default,
                });
            }
        }

        Ok(imports)
    }

    /// Second pass: pre-order walk over the whole tree.
    fn extract_declarations(
        &self,
        tree: &SyntaxTree,
        exported: &HashSet<String>,
        file: &mut ParsedFile,
    ) {
        let mut stack = vec![tree.tree.root_node()];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    if let Some(function) = function_info(tree, node, exported) {
                        file.functions.push(function);
                    }
                }
                "class_declaration" | "abstract_class_declaration" => {
                    if let Some(class) = class_info(tree, node, exported) {
                        file.classes.push(class);
                    }
                }
                "interface_declaration" => {
                    if let Some(interface) = interface_info(tree, node, exported) {
                        file.interfaces.push(interface);
                    }
                }
                "type_alias_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        let name = tree.node_text(name).to_string();
                        file.types.push(TypeInfo {
                            is_exported: exported.contains(&name),
                            name,
                        });
                    }
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
}

impl Default for TypeScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for TypeScriptAnalyzer {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, ExtractError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| ExtractError::Parse {
            path: path.to_path_buf(),
        })?;

        if let Some(error) = first_error(tree.root_node()) {
            let position = error.start_position();
            return Err(ExtractError::Syntax {
                path: path.to_path_buf(),
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(SyntaxTree {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract(&self, tree: &SyntaxTree, relative_path: &str) -> Result<ParsedFile, ExtractError> {
        let exported = self.exported_names(tree)?;
        let mut file = ParsedFile::empty(&tree.path, relative_path);

        self.extract_declarations(tree, &exported, &mut file);
        file.imports = self.extract_imports(tree)?;

        Ok(file)
    }
}

fn function_info(tree: &SyntaxTree, node: Node, exported: &HashSet<String>) -> Option<FunctionInfo> {
    let name = tree.node_text(node.child_by_field_name("name")?).to_string();

    Some(FunctionInfo {
        params: extract_params(tree, node.child_by_field_name("parameters")),
        return_type: node
            .child_by_field_name("return_type")
            .map(|t| render_type_annotation(tree, t)),
        description: doc_comment(tree, node),
        is_exported: exported.contains(&name),
        is_async: has_token(node, "async"),
        is_private: is_private_name(&name),
        name,
    })
}

fn class_info(tree: &SyntaxTree, node: Node, exported: &HashSet<String>) -> Option<ClassInfo> {
    let name = tree.node_text(node.child_by_field_name("name")?).to_string();

    let mut methods = Vec::new();
    let mut properties = Vec::new();

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_definition" => {
                    if let Some(method) = method_info(tree, member) {
                        methods.push(method);
                    }
                }
                "public_field_definition" => {
                    if let Some(property) = field_info(tree, member) {
                        properties.push(property);
                    }
                }
                _ => {}
            }
        }
    }

    let (extends, implements) = heritage(tree, node);

    Some(ClassInfo {
        methods,
        properties,
        description: doc_comment(tree, node),
        is_exported: exported.contains(&name),
        extends,
        implements,
        name,
    })
}

/// Class methods are always reported as exported.
fn method_info(tree: &SyntaxTree, member: Node) -> Option<FunctionInfo> {
    let name = member_name(tree, member)?;
    if name == "constructor" {
        return None;
    }

    Some(FunctionInfo {
        params: extract_params(tree, member.child_by_field_name("parameters")),
        return_type: member
            .child_by_field_name("return_type")
            .map(|t| render_type_annotation(tree, t)),
        description: doc_comment(tree, member),
        is_exported: true,
        is_async: has_token(member, "async"),
        is_private: is_private_name(&name) || is_private_member(tree, member),
        name,
    })
}

fn field_info(tree: &SyntaxTree, member: Node) -> Option<PropertyInfo> {
    let name = member_name(tree, member)?;

    Some(PropertyInfo {
        type_name: member
            .child_by_field_name("type")
            .map(|t| render_type_annotation(tree, t)),
        is_static: has_token(member, "static"),
        is_private: is_private_name(&name) || is_private_member(tree, member),
        name,
    })
}

fn interface_info(
    tree: &SyntaxTree,
    node: Node,
    exported: &HashSet<String>,
) -> Option<InterfaceInfo> {
    let name = tree.node_text(node.child_by_field_name("name")?).to_string();

    let mut properties = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "property_signature" {
                continue;
            }
            let Some(key) = member.child_by_field_name("name") else {
                continue;
            };
            if key.kind() != "property_identifier" {
                continue;
            }
            properties.push(PropertyInfo {
                name: tree.node_text(key).to_string(),
                type_name: member
                    .child_by_field_name("type")
                    .map(|t| render_type_annotation(tree, t)),
                is_static: false,
                is_private: false,
            });
        }
    }

    Some(InterfaceInfo {
        properties,
        is_exported: exported.contains(&name),
        name,
    })
}

/// Superclass (bare identifier only) and implemented interface names.
fn heritage(tree: &SyntaxTree, class: Node) -> (Option<String>, Option<Vec<String>>) {
    let mut extends = None;
    let mut implements = Vec::new();

    let mut cursor = class.walk();
    let Some(heritage) = class
        .named_children(&mut cursor)
        .find(|n| n.kind() == "class_heritage")
    else {
        return (None, None);
    };

    let mut heritage_cursor = heritage.walk();
    for clause in heritage.named_children(&mut heritage_cursor) {
        match clause.kind() {
            "extends_clause" => {
                extends = clause
                    .child_by_field_name("value")
                    .filter(|v| v.kind() == "identifier")
                    .map(|v| tree.node_text(v).to_string());
            }
            "implements_clause" => {
                let mut clause_cursor = clause.walk();
                for ty in clause.named_children(&mut clause_cursor) {
                    let name = match ty.kind() {
                        "type_identifier" => Some(ty),
                        "generic_type" => ty
                            .child_by_field_name("name")
                            .filter(|n| n.kind() == "type_identifier"),
                        _ => None,
                    };
                    if let Some(name) = name {
                        implements.push(tree.node_text(name).to_string());
                    }
                }
            }
            _ => {}
        }
    }

    let implements = if implements.is_empty() {
        None
    } else {
        Some(implements)
    };
    (extends, implements)
}

/// Locally bound names of an import and whether one is a default binding.
fn import_bindings(tree: &SyntaxTree, import: Node) -> (Vec<String>, bool) {
    let mut specifiers = Vec::new();
    let mut is_default = false;

    let mut cursor = import.walk();
    let Some(clause) = import
        .named_children(&mut cursor)
        .find(|n| n.kind() == "import_clause")
    else {
        return (specifiers, is_default);
    };

    let mut clause_cursor = clause.walk();
    for binding in clause.named_children(&mut clause_cursor) {
        match binding.kind() {
            "identifier" => {
                is_default = true;
                specifiers.push(tree.node_text(binding).to_string());
            }
            "namespace_import" => {
                let mut ns_cursor = binding.walk();
                let local = binding
                    .named_children(&mut ns_cursor)
                    .find(|n| n.kind() == "identifier");
                if let Some(local) = local {
                    specifiers.push(tree.node_text(local).to_string());
                }
            }
            "named_imports" => {
                let mut named_cursor = binding.walk();
                for spec in binding.named_children(&mut named_cursor) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let local = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(local) = local {
                        specifiers.push(string_value(tree, local));
                    }
                }
            }
            _ => {}
        }
    }

    (specifiers, is_default)
}

/// Name of a class member when it is a plain or `#private` identifier.
fn member_name(tree: &SyntaxTree, member: Node) -> Option<String> {
    let key = member.child_by_field_name("name")?;
    match key.kind() {
        "property_identifier" | "private_property_identifier" => {
            Some(tree.node_text(key).to_string())
        }
        _ => None,
    }
}

fn is_private_member(tree: &SyntaxTree, member: Node) -> bool {
    let mut cursor = member.walk();
    let private = member
        .named_children(&mut cursor)
        .any(|n| n.kind() == "accessibility_modifier" && tree.node_text(n) == "private");
    private
}

fn is_private_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('#')
}

/// Whether `node` has a direct anonymous child token such as `async`.
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Contents of a string literal node, without quotes.
fn string_value(tree: &SyntaxTree, node: Node) -> String {
    let text = tree.node_text(node);
    if node.kind() != "string" {
        return text.to_string();
    }
    text.get(1..text.len().saturating_sub(1))
        .unwrap_or_default()
        .to_string()
}

/// JSDoc block directly above a declaration (or above its `export`).
///
/// Member decorators are siblings in the class body, so they are skipped.
fn doc_comment(tree: &SyntaxTree, node: Node) -> Option<String> {
    let mut anchor = match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => node,
    };
    let mut comment = anchor.prev_sibling()?;
    while comment.kind() == "decorator" {
        anchor = comment;
        comment = anchor.prev_sibling()?;
    }
    if comment.kind() != "comment" {
        return None;
    }
    if anchor.start_position().row > comment.end_position().row + 1 {
        return None;
    }
    clean_doc_comment(tree.node_text(comment))
}

fn clean_doc_comment(raw: &str) -> Option<String> {
    let body = raw.strip_prefix("/**")?.strip_suffix("*/")?;
    let lines: Vec<&str> = body
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .take_while(|line| !line.starts_with('@'))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

/// First ERROR or MISSING node in pre-order, if any.
fn first_error(root: Node) -> Option<Node> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    Some(root)
}
