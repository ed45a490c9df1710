//! docgen - structural extraction for TypeScript/JavaScript codebases.
//!
//! docgen walks a project, parses each source file with tree-sitter and
//! produces a `CodeStructure`: per-file functions, classes, interfaces,
//! type aliases and imports, a flat list of exports, the declared
//! dependencies and the frameworks they indicate.
//!
//! # Architecture
//!
//! - `analysis`: data model and per-file extraction (language analyzers)
//! - `discover`: source file discovery with exclude globs
//! - `manifest`: `package.json` reader
//! - `frameworks`: framework detection from dependencies
//! - `codebase`: pipeline orchestration and aggregation
//! - `config`: YAML config file
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```no_run
//! let structure = docgen::parse_codebase("./my-app", &[]).unwrap();
//! println!("{} files, {} exports", structure.files.len(), structure.exports.len());
//! ```

pub mod analysis;
pub mod cli;
pub mod codebase;
pub mod config;
pub mod discover;
pub mod frameworks;
pub mod manifest;
pub mod report;

pub use analysis::{
    register_analyzers, ClassInfo, CodeStructure, DependencyInfo, ExportInfo, ExportKind,
    ExtractError, FrameworkCategory, FrameworkInfo, FunctionInfo, ImportInfo, InterfaceInfo,
    LanguageAnalyzer, PackageInfo, ParamInfo, ParsedFile, PropertyInfo, TypeInfo,
    TypeScriptAnalyzer,
};
pub use codebase::{extract_file, parse_codebase, AnalyzeError, CodebaseAnalyzer};
pub use config::Config;
pub use discover::{discover_sources, DEFAULT_EXCLUDES};
pub use frameworks::detect_frameworks;
pub use manifest::Manifest;

/// Initialize all subsystems.
///
/// Analyzers are also created lazily on first use; calling this up front
/// keeps grammar loading out of the parallel extraction phase.
pub fn init() {
    register_analyzers();
}
