//! Language-specific analyzer implementations.

mod typescript;

pub use typescript::TypeScriptAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static storage for the plain TypeScript analyzer.
static TYPESCRIPT_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Static storage for the TSX analyzer (also used for JavaScript).
static TSX_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Whether analyzers have been registered.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register all available language analyzers.
///
/// Idempotent; `get_analyzer` calls it on demand.
pub fn register_analyzers() {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }

    TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new);
    TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx);
}

/// Get an analyzer for the given file extension (without dot).
///
/// `.ts` files use the TypeScript grammar. `.tsx`, `.js` and `.jsx` use
/// the TSX grammar, which accepts JSX markup and plain JavaScript.
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    match ext {
        "ts" => Some(TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new)),
        "tsx" | "js" | "jsx" => Some(TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx)),
        _ => None,
    }
    .map(|a| a as &'static dyn LanguageAnalyzer)
}

/// Get all registered file extensions.
pub fn registered_extensions() -> Vec<&'static str> {
    register_analyzers();

    [&TYPESCRIPT_ANALYZER, &TSX_ANALYZER]
        .iter()
        .filter_map(|cell| cell.get())
        .flat_map(|a| a.file_extensions().iter().copied())
        .collect()
}
