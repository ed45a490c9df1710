//! Core traits for language analysis.

use std::path::Path;

use super::{ExtractError, ParsedFile};

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Kept separate from `ParsedFile` so the tree can be inspected (or
/// re-walked) without re-parsing.
pub struct SyntaxTree {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// Source bytes (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl SyntaxTree {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// # Thread Safety
///
/// `tree_sitter::Parser` is not Sync, so implementations create a parser
/// per call to `parse`.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "typescript", "tsx").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// A tree containing syntax errors is rejected with
    /// `ExtractError::Syntax`; a malformed file never yields a record.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, ExtractError>;

    /// Walk a parsed tree and collect its declarations.
    ///
    /// Fails only if one of the analyzer's queries does not compile.
    fn extract(&self, tree: &SyntaxTree, relative_path: &str) -> Result<ParsedFile, ExtractError>;

    /// Parse and extract in one step.
    fn extract_source(
        &self,
        path: &Path,
        relative_path: &str,
        source: &[u8],
    ) -> Result<ParsedFile, ExtractError> {
        let tree = self.parse(path, source)?;
        self.extract(&tree, relative_path)
    }

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
