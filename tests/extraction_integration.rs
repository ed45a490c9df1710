//! Integration tests for per-file extraction.
//!
//! These tests run the extractor against the files of the
//! `testdata/sample-app` fixture project.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use docgen::{extract_file, ExtractError, ImportInfo, ParamInfo, ParsedFile};

fn sample_app() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample-app")
}

fn extract(relative: &str) -> ParsedFile {
    docgen::init();
    extract_file(&sample_app().join(relative), relative).expect("fixture should parse")
}

fn param(name: &str, ty: Option<&str>, optional: bool, default: Option<&str>) -> ParamInfo {
    ParamInfo {
        name: name.to_string(),
        type_name: ty.map(str::to_string),
        is_optional: optional,
        default_value: default.map(str::to_string),
    }
}

// =============================================================================
// TypeScript
// =============================================================================

#[test]
fn test_index_functions() {
    let file = extract("src/index.ts");

    let main = file.find_function("main").expect("main should be extracted");
    assert!(main.is_exported);
    assert!(main.is_async);
    assert!(!main.is_private);
    assert_eq!(main.return_type.as_deref(), Some("Promise"));
    assert_eq!(main.description.as_deref(), Some("Start the HTTP server."));
    assert_eq!(
        main.params,
        vec![
            param("port", Some("number"), true, Some("3000")),
            param("...args", Some("string[]"), false, None),
        ]
    );

    let internal = file.find_function("_internal").unwrap();
    assert!(!internal.is_exported);
    assert!(internal.is_private);
    assert_eq!(internal.return_type.as_deref(), Some("boolean | undefined"));
    assert_eq!(internal.params, vec![param("flag", Some("boolean"), true, None)]);
}

#[test]
fn test_index_imports() {
    let file = extract("src/index.ts");

    assert_eq!(
        file.imports,
        vec![
            ImportInfo {
                source: "express".to_string(),
                specifiers: vec!["express".to_string()],
                is_default: true,
            },
            ImportInfo {
                source: "./server/app".to_string(),
                specifiers: vec!["App".to_string()],
                is_default: false,
            },
            ImportInfo {
                source: "./utils/format".to_string(),
                specifiers: vec!["format".to_string()],
                is_default: false,
            },
        ]
    );
}

#[test]
fn test_class_hierarchy_and_members() {
    let file = extract("src/server/app.ts");

    let names: Vec<_> = file.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Base", "App"]);

    let base = file.find_class("Base").unwrap();
    assert!(!base.is_exported);
    assert_eq!(base.properties.len(), 1);
    assert!(!base.properties[0].is_private);

    let app = file.find_class("App").unwrap();
    assert!(app.is_exported);
    assert_eq!(app.extends.as_deref(), Some("Base"));
    assert_eq!(app.implements, Some(vec!["Service".to_string()]));
    assert_eq!(app.description.as_deref(), Some("Express application wrapper."));

    let methods: Vec<_> = app
        .methods
        .iter()
        .map(|m| (m.name.as_str(), m.is_async, m.is_private))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("listen", true, false),
            ("stop", false, false),
            ("_reset", false, true),
        ]
    );
    assert_eq!(
        app.methods[2].params,
        vec![param("hard", None, true, Some("false"))]
    );
    assert_eq!(
        app.methods[0].description.as_deref(),
        Some("Begin listening on a port.")
    );

    let props: Vec<_> = app
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_deref(), p.is_static, p.is_private))
        .collect();
    assert_eq!(
        props,
        vec![
            ("instances", Some("number"), true, false),
            ("logger", Some("Logger"), false, true),
            ("name", Some("string"), false, false),
        ]
    );
}

#[test]
fn test_interfaces_and_type_aliases() {
    let file = extract("src/types.ts");

    // `export interface` and `export type` never join the exported-name set.
    let service = file.find_interface("Service").unwrap();
    assert!(!service.is_exported);
    let props: Vec<_> = service.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["name"]);

    let logger = file.find_interface("Logger").unwrap();
    assert_eq!(logger.properties[0].type_name.as_deref(), Some("unknown | unknown"));
    assert_eq!(logger.properties[1].type_name.as_deref(), Some("Function"));

    assert!(!file.find_interface("Internal").unwrap().is_exported);

    let types: Vec<_> = file
        .types
        .iter()
        .map(|t| (t.name.as_str(), t.is_exported))
        .collect();
    assert_eq!(types, vec![("Handler", false), ("Id", false)]);
}

// =============================================================================
// TSX and JavaScript
// =============================================================================

#[test]
fn test_tsx_component() {
    let file = extract("src/components/Button.tsx");

    let button = file.find_function("Button").unwrap();
    assert!(button.is_exported);
    assert_eq!(button.params, vec![param("param", None, false, None)]);
    assert_eq!(button.description.as_deref(), Some("Clickable button with a counter."));

    assert!(!file.find_interface("ButtonProps").unwrap().is_exported);
    assert_eq!(file.imports[0].specifiers, vec!["React", "useState"]);
    assert!(file.imports[0].is_default);
}

#[test]
fn test_plain_javascript() {
    let file = extract("src/utils/format.js");

    let pad = file.find_function("pad").unwrap();
    assert!(pad.is_exported);
    assert_eq!(pad.return_type, None);
    assert_eq!(
        pad.params,
        vec![
            param("text", None, false, None),
            param("width", None, true, Some("10")),
            param("fill", None, true, Some("\" \"")),
        ]
    );

    let banner = file.find_function("banner").unwrap();
    assert_eq!(banner.params, vec![param("args", None, true, None)]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_broken_file_is_a_syntax_error() {
    docgen::init();
    let result = extract_file(&sample_app().join("src/broken.ts"), "src/broken.ts");
    match result {
        Err(ExtractError::Syntax { line, .. }) => assert!(line >= 1),
        other => panic!("expected syntax error, got {:?}", other.map(|f| f.relative_path)),
    }
}

#[test]
fn test_paths_are_recorded() {
    let file = extract("src/types.ts");
    assert_eq!(file.relative_path, "src/types.ts");
    assert!(file.path.ends_with("types.ts"));
}
