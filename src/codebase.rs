//! Codebase aggregation.
//!
//! Runs the whole pipeline for one root: manifest and framework detection,
//! source discovery, per-file extraction (in parallel), and a single
//! sequential merge into a [`CodeStructure`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::analysis::{get_analyzer, CodeStructure, ExtractError, ParsedFile};
use crate::discover::{discover_sources, normalize};
use crate::frameworks::detect_frameworks;
use crate::manifest::Manifest;

/// Conditions under which no `CodeStructure` is produced.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("no source files found in {root} (check exclude patterns)")]
    NoSourceFiles { root: PathBuf },
    #[error("none of the {attempted} source files in {root} could be parsed")]
    NoParseableFiles { root: PathBuf, attempted: usize },
}

/// Analyzes one project root.
pub struct CodebaseAnalyzer {
    root: PathBuf,
    exclude_patterns: Vec<String>,
    jobs: Option<usize>,
}

impl CodebaseAnalyzer {
    /// Create an analyzer for `root` with only the default excludes.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            root: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
            exclude_patterns: Vec::new(),
            jobs: None,
        }
    }

    /// Extra exclude globs, on top of the defaults.
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Limit the number of files extracted concurrently.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// The root being analyzed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the full pipeline.
    ///
    /// Files that fail extraction are logged and left out. The only errors
    /// are an empty discovery result and every discovered file failing.
    pub fn run(&self) -> Result<CodeStructure, AnalyzeError> {
        let manifest = Manifest::from_root(&self.root);
        let frameworks = detect_frameworks(&manifest.dependencies);
        debug!("detected {} frameworks", frameworks.len());

        let sources = discover_sources(&self.root, &self.exclude_patterns);
        if sources.is_empty() {
            return Err(AnalyzeError::NoSourceFiles {
                root: self.root.clone(),
            });
        }
        info!(
            "analyzing {} source files under {}",
            sources.len(),
            self.root.display()
        );

        let results = self.extract_all(&sources);

        let mut files = Vec::with_capacity(results.len());
        let mut exports = Vec::new();
        for (relative, result) in sources.iter().zip(results) {
            match result {
                Ok(file) => {
                    exports.extend(file.exports());
                    files.push(file);
                }
                Err(e) => warn!("skipping {}: {}", normalize(relative), e),
            }
        }

        if files.is_empty() {
            return Err(AnalyzeError::NoParseableFiles {
                root: self.root.clone(),
                attempted: sources.len(),
            });
        }

        info!(
            "extracted {} of {} files, {} exports",
            files.len(),
            sources.len(),
            exports.len()
        );

        Ok(CodeStructure {
            files,
            dependencies: manifest.dependencies,
            exports,
            frameworks,
            package_info: manifest.package,
        })
    }

    /// Extract every file, returning results in input order.
    fn extract_all(&self, sources: &[PathBuf]) -> Vec<Result<ParsedFile, ExtractError>> {
        let extract = || -> Vec<Result<ParsedFile, ExtractError>> {
            sources
                .par_iter()
                .map(|relative| extract_file(&self.root.join(relative), &normalize(relative)))
                .collect()
        };

        let Some(jobs) = self.jobs else {
            return extract();
        };

        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(extract),
            Err(e) => {
                warn!("failed to build a {}-thread pool, using the global pool: {}", jobs, e);
                extract()
            }
        }
    }
}

/// Analyze `root` with the given extra exclude patterns.
pub fn parse_codebase<P: AsRef<Path>>(
    root: P,
    exclude_patterns: &[String],
) -> Result<CodeStructure, AnalyzeError> {
    CodebaseAnalyzer::new(root)
        .exclude_patterns(exclude_patterns.to_vec())
        .run()
}

/// Read and extract one file, choosing the grammar by extension.
pub fn extract_file(path: &Path, relative_path: &str) -> Result<ParsedFile, ExtractError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let analyzer = get_analyzer(ext).ok_or_else(|| ExtractError::UnsupportedExtension {
        path: path.to_path_buf(),
    })?;

    let source = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file = analyzer.extract_source(path, relative_path, &source)?;
    debug!(
        "{}: {} functions, {} classes, {} imports",
        relative_path,
        file.functions.len(),
        file.classes.len(),
        file.imports.len()
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_extract_file_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "def f(): pass\n");
        let result = extract_file(&dir.path().join("a.py"), "a.py");
        assert!(matches!(result, Err(ExtractError::UnsupportedExtension { .. })));
    }

    #[test]
    fn test_extract_file_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = extract_file(&dir.path().join("gone.ts"), "gone.ts");
        assert!(matches!(result, Err(ExtractError::Read { .. })));
    }

    #[test]
    fn test_empty_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "# nothing\n");
        let err = parse_codebase(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, AnalyzeError::NoSourceFiles { .. }));
        assert!(err.to_string().contains("no source files"));
    }

    #[test]
    fn test_all_files_broken_is_distinguished() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.ts", "function (\n");
        write(dir.path(), "b.ts", "class {{{\n");
        let err = parse_codebase(dir.path(), &[]).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::NoParseableFiles { attempted: 2, .. }
        ));
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.ts", "export function a() {}\n");
        write(dir.path(), "b.ts", "export function b( {\n");
        write(dir.path(), "c.ts", "export class C {}\n");

        let structure = parse_codebase(dir.path(), &[]).unwrap();
        let paths: Vec<_> = structure.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.ts", "c.ts"]);
        assert_eq!(structure.exports.len(), 2);
    }

    #[test]
    fn test_jobs_do_not_change_order() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write(
                dir.path(),
                &format!("src/m{:02}.ts", i),
                &format!("export function f{}() {{}}\n", i),
            );
        }

        let sequential = CodebaseAnalyzer::new(dir.path()).jobs(Some(1)).run().unwrap();
        let parallel = CodebaseAnalyzer::new(dir.path()).jobs(Some(4)).run().unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.files[0].relative_path, "src/m00.ts");
        assert_eq!(sequential.exports[19].name, "f19");
    }

    #[test]
    fn test_absolute_paths_are_under_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "lib/index.ts", "export const x = 1;\n");

        let analyzer = CodebaseAnalyzer::new(dir.path());
        let structure = analyzer.run().unwrap();
        let file = &structure.files[0];
        assert_eq!(file.relative_path, "lib/index.ts");
        assert_eq!(
            Path::new(&file.path),
            analyzer.root().join("lib").join("index.ts")
        );
    }
}
