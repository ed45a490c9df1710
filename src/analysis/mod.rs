//! AST-backed declaration extraction.
//!
//! This module turns one source file into a `ParsedFile`: functions,
//! classes, interfaces, type aliases and imports, with export visibility
//! and rendered type annotations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source bytes    │────▶│ Analyzer     │────▶│ ParsedFile    │
//! └─────────────────┘     │ (ts / tsx)   │     │ (functions,   │
//!                         └──────────────┘     │  classes, ...)│
//!                                              └───────────────┘
//! ```
//!
//! Parsing is single-pass and purely syntactic: no type checking and no
//! cross-file symbol resolution.

mod facts;
mod languages;
mod traits;

use std::path::PathBuf;

use thiserror::Error;

pub use facts::{
    ClassInfo, CodeStructure, DependencyInfo, ExportInfo, ExportKind, FrameworkCategory,
    FrameworkInfo, FunctionInfo, ImportInfo, InterfaceInfo, PackageInfo, ParamInfo, ParsedFile,
    PropertyInfo, TypeInfo,
};
pub use languages::{
    get_analyzer, register_analyzers, registered_extensions, TypeScriptAnalyzer,
};
pub use traits::{LanguageAnalyzer, SyntaxTree};

/// Errors that make a single file unextractable.
///
/// These never abort an analysis run; the aggregator logs them and omits
/// the file.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no analyzer for {path}")]
    UnsupportedExtension { path: PathBuf },
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("parser produced no tree for {path}")]
    Parse { path: PathBuf },
    #[error("syntax error in {path} at {line}:{column}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },
}
