//! Fact structures extracted from AST analysis.
//!
//! These are the values handed to the documentation generator. They
//! serialize with the camelCase field names downstream prompt builders
//! expect (`relativePath`, `isExported`, `returnType`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStructure {
    /// Successfully extracted files, in discovery order.
    pub files: Vec<ParsedFile>,
    pub dependencies: DependencyInfo,
    /// Flat projection of exported functions, classes and interfaces.
    pub exports: Vec<ExportInfo>,
    /// Detected frameworks, highest confidence first.
    pub frameworks: Vec<FrameworkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_info: Option<PackageInfo>,
}

impl CodeStructure {
    /// Total number of functions across all files (methods excluded).
    pub fn function_count(&self) -> usize {
        self.files.iter().map(|f| f.functions.len()).sum()
    }

    /// Total number of classes across all files.
    pub fn class_count(&self) -> usize {
        self.files.iter().map(|f| f.classes.len()).sum()
    }

    /// Find a file by its root-relative path.
    pub fn find_file(&self, relative_path: &str) -> Option<&ParsedFile> {
        self.files.iter().find(|f| f.relative_path == relative_path)
    }

    /// Copy of this structure with private functions, methods and
    /// properties removed.
    ///
    /// Export entries pointing at a removed function are dropped as well.
    pub fn without_private(&self) -> CodeStructure {
        let files: Vec<ParsedFile> = self.files.iter().map(ParsedFile::without_private).collect();

        let exports = self
            .exports
            .iter()
            .filter(|e| {
                if e.kind != ExportKind::Function {
                    return true;
                }
                files
                    .iter()
                    .find(|f| f.relative_path == e.file)
                    .map(|f| f.functions.iter().any(|func| func.name == e.name))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        CodeStructure {
            files,
            dependencies: self.dependencies.clone(),
            exports,
            frameworks: self.frameworks.clone(),
            package_info: self.package_info.clone(),
        }
    }
}

/// Declarations extracted from a single source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Absolute path of the file.
    pub path: String,
    /// Path relative to the analysis root, `/`-separated.
    pub relative_path: String,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub types: Vec<TypeInfo>,
}

impl ParsedFile {
    /// Create an empty record for a file.
    pub fn empty(path: &str, relative_path: &str) -> Self {
        Self {
            path: path.to_string(),
            relative_path: relative_path.to_string(),
            ..Default::default()
        }
    }

    /// Project exported functions, classes and interfaces into export
    /// entries, in that order. Type aliases are never projected.
    pub fn exports(&self) -> Vec<ExportInfo> {
        let functions = self
            .functions
            .iter()
            .filter(|f| f.is_exported)
            .map(|f| ExportInfo {
                name: f.name.clone(),
                kind: ExportKind::Function,
                file: self.relative_path.clone(),
                description: f.description.clone(),
            });

        let classes = self
            .classes
            .iter()
            .filter(|c| c.is_exported)
            .map(|c| ExportInfo {
                name: c.name.clone(),
                kind: ExportKind::Class,
                file: self.relative_path.clone(),
                description: c.description.clone(),
            });

        let interfaces = self
            .interfaces
            .iter()
            .filter(|i| i.is_exported)
            .map(|i| ExportInfo {
                name: i.name.clone(),
                kind: ExportKind::Interface,
                file: self.relative_path.clone(),
                description: None,
            });

        functions.chain(classes).chain(interfaces).collect()
    }

    /// Find a top-level or nested function by name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Find a class by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Find an interface by name.
    pub fn find_interface(&self, name: &str) -> Option<&InterfaceInfo> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    fn without_private(&self) -> ParsedFile {
        ParsedFile {
            functions: self.functions.iter().filter(|f| !f.is_private).cloned().collect(),
            classes: self
                .classes
                .iter()
                .map(|c| ClassInfo {
                    methods: c.methods.iter().filter(|m| !m.is_private).cloned().collect(),
                    properties: c.properties.iter().filter(|p| !p.is_private).cloned().collect(),
                    ..c.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// A function declaration or class method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always true for class methods.
    pub is_exported: bool,
    pub is_async: bool,
    pub is_private: bool,
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamInfo {
    /// Bound name; rest parameters carry a `...` prefix.
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    /// Methods, constructor excluded.
    pub methods: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_exported: bool,
    /// Superclass name, only when it is a bare identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implements: Option<Vec<String>>,
}

/// A class field or interface property signature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub is_static: bool,
    pub is_private: bool,
}

/// An interface declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub properties: Vec<PropertyInfo>,
    pub is_exported: bool,
}

/// A type alias declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub name: String,
    pub is_exported: bool,
}

/// An import statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    /// Module specifier as written.
    pub source: String,
    /// Locally bound names.
    pub specifiers: Vec<String>,
    pub is_default: bool,
}

/// Kind of an exported declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Constant,
    Interface,
    Type,
}

impl ExportKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Function => "function",
            ExportKind::Class => "class",
            ExportKind::Constant => "constant",
            ExportKind::Interface => "interface",
            ExportKind::Type => "type",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry in the flat export list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExportKind,
    /// Relative path of the declaring file.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared dependencies from the package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub production: BTreeMap<String, String>,
    pub dev: BTreeMap<String, String>,
    pub peer: BTreeMap<String, String>,
}

impl DependencyInfo {
    /// Whether no dependency of any kind is declared.
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.dev.is_empty() && self.peer.is_empty()
    }

    /// Production and development dependencies merged; development
    /// entries win on conflicting names.
    pub fn merged(&self) -> BTreeMap<&str, &str> {
        self.production
            .iter()
            .chain(self.dev.iter())
            .map(|(name, version)| (name.as_str(), version.as_str()))
            .collect()
    }
}

/// Broad category of a detected framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkCategory {
    Frontend,
    Backend,
    Testing,
    Build,
    Utility,
}

impl FrameworkCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkCategory::Frontend => "frontend",
            FrameworkCategory::Backend => "backend",
            FrameworkCategory::Testing => "testing",
            FrameworkCategory::Build => "build",
            FrameworkCategory::Utility => "utility",
        }
    }
}

impl fmt::Display for FrameworkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A framework or library inferred from declared dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub category: FrameworkCategory,
    /// Matched signature dependencies over total, in `[0, 1]`.
    pub confidence: f64,
}

/// Package metadata from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, exported: bool, private: bool) -> FunctionInfo {
        FunctionInfo {
            name: name.to_string(),
            is_exported: exported,
            is_private: private,
            ..Default::default()
        }
    }

    #[test]
    fn test_exports_projection_skips_types() {
        let file = ParsedFile {
            relative_path: "src/lib.ts".to_string(),
            functions: vec![function("run", true, false), function("helper", false, false)],
            classes: vec![ClassInfo {
                name: "Server".to_string(),
                is_exported: true,
                description: Some("HTTP server".to_string()),
                ..Default::default()
            }],
            interfaces: vec![InterfaceInfo {
                name: "Options".to_string(),
                properties: vec![],
                is_exported: true,
            }],
            types: vec![TypeInfo {
                name: "Id".to_string(),
                is_exported: true,
            }],
            ..Default::default()
        };

        let exports = file.exports();
        let names: Vec<_> = exports.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("run", ExportKind::Function),
                ("Server", ExportKind::Class),
                ("Options", ExportKind::Interface),
            ]
        );
        assert!(exports.iter().all(|e| e.file == "src/lib.ts"));
        assert_eq!(exports[1].description.as_deref(), Some("HTTP server"));
    }

    #[test]
    fn test_merged_dependencies_prefer_dev() {
        let mut deps = DependencyInfo::default();
        deps.production.insert("react".to_string(), "^18.0.0".to_string());
        deps.dev.insert("react".to_string(), "^18.2.0".to_string());
        deps.dev.insert("jest".to_string(), "29.0.0".to_string());
        deps.peer.insert("vue".to_string(), "3".to_string());

        let merged = deps.merged();
        assert_eq!(merged.get("react"), Some(&"^18.2.0"));
        assert_eq!(merged.get("jest"), Some(&"29.0.0"));
        assert!(!merged.contains_key("vue"));
    }

    #[test]
    fn test_without_private() {
        let structure = CodeStructure {
            files: vec![ParsedFile {
                relative_path: "a.ts".to_string(),
                functions: vec![function("run", true, false), function("_internal", true, true)],
                classes: vec![ClassInfo {
                    name: "Cache".to_string(),
                    methods: vec![function("get", true, false), function("_evict", true, true)],
                    properties: vec![PropertyInfo {
                        name: "#store".to_string(),
                        type_name: None,
                        is_static: false,
                        is_private: true,
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            exports: vec![
                ExportInfo {
                    name: "run".to_string(),
                    kind: ExportKind::Function,
                    file: "a.ts".to_string(),
                    description: None,
                },
                ExportInfo {
                    name: "_internal".to_string(),
                    kind: ExportKind::Function,
                    file: "a.ts".to_string(),
                    description: None,
                },
            ],
            ..Default::default()
        };

        let public = structure.without_private();
        let file = &public.files[0];
        assert_eq!(file.functions.len(), 1);
        assert_eq!(file.classes[0].methods.len(), 1);
        assert!(file.classes[0].properties.is_empty());
        assert_eq!(public.exports.len(), 1);
        assert_eq!(public.exports[0].name, "run");
    }

    #[test]
    fn test_serialized_field_names() {
        let param = ParamInfo {
            name: "...rest".to_string(),
            type_name: Some("string[]".to_string()),
            is_optional: false,
            default_value: None,
        };
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["type"], "string[]");
        assert_eq!(json["isOptional"], false);
        assert!(json.get("defaultValue").is_none());

        let export = ExportInfo {
            name: "App".to_string(),
            kind: ExportKind::Class,
            file: "src/app.ts".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["type"], "class");
    }
}
