//! `package.json` reader.
//!
//! A missing or malformed manifest is a normal condition: [`Manifest::from_root`]
//! never fails and falls back to an empty manifest.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::{DependencyInfo, PackageInfo};

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Reasons a manifest could not be used.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest is not a JSON object")]
    NotAnObject,
}

/// Package metadata and declared dependencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub package: Option<PackageInfo>,
    pub dependencies: DependencyInfo,
}

impl Manifest {
    /// Load `package.json` from `root`.
    ///
    /// Any failure yields `Manifest::default()`: no package info and empty
    /// dependency maps.
    pub fn from_root(root: &Path) -> Self {
        let path = root.join(MANIFEST_FILE);
        match Self::parse_file(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("no usable manifest at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and parse a manifest file.
    pub fn parse_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse manifest JSON text.
    pub fn parse_str(content: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content)?;
        let pkg = value.as_object().ok_or(ManifestError::NotAnObject)?;

        Ok(Self {
            package: Some(package_info(pkg)),
            dependencies: DependencyInfo {
                production: string_map(pkg.get("dependencies")),
                dev: string_map(pkg.get("devDependencies")),
                peer: string_map(pkg.get("peerDependencies")),
            },
        })
    }
}

fn package_info(pkg: &Map<String, Value>) -> PackageInfo {
    let name = string_field(pkg, "name");

    PackageInfo {
        version: string_field(pkg, "version").unwrap_or_default(),
        description: string_field(pkg, "description"),
        license: string_field(pkg, "license"),
        author: string_or_field(pkg.get("author"), "name"),
        repository: string_or_field(pkg.get("repository"), "url"),
        homepage: string_field(pkg, "homepage"),
        keywords: pkg.get("keywords").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }),
        main: string_field(pkg, "main"),
        bin: bin_map(pkg.get("bin"), name.as_deref()),
        scripts: pkg
            .get("scripts")
            .filter(|v| v.is_object())
            .map(|v| string_map(Some(v))),
        private: pkg.get("private").and_then(Value::as_bool),
        name: name.unwrap_or_default(),
    }
}

fn string_field(pkg: &Map<String, Value>, key: &str) -> Option<String> {
    pkg.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `"value"` or `{ "<key>": "value" }`.
fn string_or_field(value: Option<&Value>, key: &str) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get(key).and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// String-valued entries of an object; anything else is empty.
fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(obj)) = value else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
        .collect()
}

/// `bin` as a map; the string shorthand maps the package name to the path.
fn bin_map(value: Option<&Value>, package_name: Option<&str>) -> Option<BTreeMap<String, String>> {
    match value? {
        Value::String(path) => {
            let name = package_name?;
            let name = name.rsplit('/').next().unwrap_or(name);
            Some(BTreeMap::from([(name.to_string(), path.clone())]))
        }
        obj @ Value::Object(_) => Some(string_map(Some(obj))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_full_manifest() {
        let manifest = Manifest::parse_str(
            r#"{
                "name": "@acme/tool",
                "version": "1.2.3",
                "description": "A tool",
                "license": "MIT",
                "author": { "name": "Acme Devs", "email": "dev@acme.test" },
                "repository": { "type": "git", "url": "https://example.test/acme/tool.git" },
                "homepage": "https://example.test",
                "keywords": ["cli", 3, "docs"],
                "main": "dist/index.js",
                "bin": "bin/tool.js",
                "scripts": { "build": "tsc", "weird": 1 },
                "private": true,
                "dependencies": { "react": "^18.2.0" },
                "devDependencies": { "jest": "~29.0.0" },
                "peerDependencies": { "react-dom": ">=18" }
            }"#,
        )
        .unwrap();

        let pkg = manifest.package.unwrap();
        assert_eq!(pkg.name, "@acme/tool");
        assert_eq!(pkg.version, "1.2.3");
        assert_eq!(pkg.author.as_deref(), Some("Acme Devs"));
        assert_eq!(
            pkg.repository.as_deref(),
            Some("https://example.test/acme/tool.git")
        );
        assert_eq!(
            pkg.keywords,
            Some(vec!["cli".to_string(), "docs".to_string()])
        );
        assert_eq!(
            pkg.bin,
            Some(BTreeMap::from([("tool".to_string(), "bin/tool.js".to_string())]))
        );
        assert_eq!(
            pkg.scripts,
            Some(BTreeMap::from([("build".to_string(), "tsc".to_string())]))
        );
        assert_eq!(pkg.private, Some(true));

        let deps = manifest.dependencies;
        assert_eq!(deps.production.get("react").map(String::as_str), Some("^18.2.0"));
        assert_eq!(deps.dev.get("jest").map(String::as_str), Some("~29.0.0"));
        assert_eq!(deps.peer.get("react-dom").map(String::as_str), Some(">=18"));
    }

    #[test]
    fn test_string_author_and_repository() {
        let manifest = Manifest::parse_str(
            r#"{ "name": "x", "author": "Jo <jo@x.test>", "repository": "github:x/x",
                 "bin": { "x": "cli.js" } }"#,
        )
        .unwrap();
        let pkg = manifest.package.unwrap();
        assert_eq!(pkg.author.as_deref(), Some("Jo <jo@x.test>"));
        assert_eq!(pkg.repository.as_deref(), Some("github:x/x"));
        assert_eq!(pkg.version, "");
        assert_eq!(pkg.keywords, None);
        assert_eq!(
            pkg.bin,
            Some(BTreeMap::from([("x".to_string(), "cli.js".to_string())]))
        );
    }

    #[test]
    fn test_non_object_dependency_sections_are_empty() {
        let manifest =
            Manifest::parse_str(r#"{ "dependencies": ["react"], "devDependencies": null }"#)
                .unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.package.is_some());
    }

    #[test]
    fn test_invalid_manifests() {
        assert!(matches!(
            Manifest::parse_str("{ not json"),
            Err(ManifestError::Json(_))
        ));
        assert!(matches!(
            Manifest::parse_str("[1, 2]"),
            Err(ManifestError::NotAnObject)
        ));
    }

    #[test]
    fn test_from_root_never_fails() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Manifest::from_root(dir.path()), Manifest::default());

        std::fs::write(dir.path().join(MANIFEST_FILE), "{{{").unwrap();
        let manifest = Manifest::from_root(dir.path());
        assert!(manifest.package.is_none());
        assert!(manifest.dependencies.is_empty());

        std::fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":"ok"}"#).unwrap();
        let manifest = Manifest::from_root(dir.path());
        assert_eq!(manifest.package.unwrap().name, "ok");
    }
}
