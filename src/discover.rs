//! Source discovery.
//!
//! Walks a project root and returns the source files to analyze, relative
//! to the root, in a stable order.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use walkdir::WalkDir;

/// Exclude patterns that always apply.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules/**",
    "dist/**",
    "build/**",
    "**/*.test.ts",
    "**/*.spec.ts",
    "**/*.test.js",
    "**/*.spec.js",
];

/// Extensions (without dot) of files considered source.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Directory names pruned anywhere in the tree.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Find source files under `root`.
///
/// `exclude` is unioned with [`DEFAULT_EXCLUDES`]. Patterns are matched
/// against the `/`-separated path relative to `root`; `*` does not cross
/// directory boundaries. Invalid patterns are logged and ignored.
///
/// Hidden files and directories are skipped. The result is sorted and
/// contains no duplicates; an empty result is not an error here.
pub fn discover_sources(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    let excludes = build_exclude_set(exclude);
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            !(e.file_type().is_dir() && SKIPPED_DIRS.contains(&&*name))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if excludes.is_match(normalize(relative)) {
            continue;
        }

        files.push(relative.to_path_buf());
    }

    debug!("discovered {} source files under {}", files.len(), root.display());
    files
}

/// `/`-separated form of a relative path, used for matching and reporting.
pub fn normalize(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_exclude_set(extra: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();

    let patterns = DEFAULT_EXCLUDES
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str));

    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("ignoring invalid exclude pattern {:?}: {}", pattern, e),
        }
    }

    builder.build().unwrap_or_else(|e| {
        warn!("failed to compile exclude patterns: {}", e);
        GlobSet::empty()
    })
}
