//! Framework detection from declared dependencies.

use phf::phf_ordered_map;

use crate::analysis::{DependencyInfo, FrameworkCategory, FrameworkInfo};

/// Dependencies whose presence indicates a framework.
#[derive(Debug)]
pub struct Signature {
    pub deps: &'static [&'static str],
    pub category: FrameworkCategory,
}

const fn sig(deps: &'static [&'static str], category: FrameworkCategory) -> Signature {
    Signature { deps, category }
}

/// Known frameworks, in reporting order for equal confidence.
pub static FRAMEWORK_SIGNATURES: phf::OrderedMap<&'static str, Signature> = phf_ordered_map! {
    "react" => sig(&["react", "react-dom"], FrameworkCategory::Frontend),
    "vue" => sig(&["vue"], FrameworkCategory::Frontend),
    "angular" => sig(&["@angular/core"], FrameworkCategory::Frontend),
    "svelte" => sig(&["svelte"], FrameworkCategory::Frontend),
    "next" => sig(&["next"], FrameworkCategory::Frontend),
    "nuxt" => sig(&["nuxt"], FrameworkCategory::Frontend),
    "express" => sig(&["express"], FrameworkCategory::Backend),
    "fastify" => sig(&["fastify"], FrameworkCategory::Backend),
    "koa" => sig(&["koa"], FrameworkCategory::Backend),
    "nestjs" => sig(&["@nestjs/core"], FrameworkCategory::Backend),
    "hapi" => sig(&["@hapi/hapi"], FrameworkCategory::Backend),
    "jest" => sig(&["jest"], FrameworkCategory::Testing),
    "vitest" => sig(&["vitest"], FrameworkCategory::Testing),
    "mocha" => sig(&["mocha"], FrameworkCategory::Testing),
    "webpack" => sig(&["webpack"], FrameworkCategory::Build),
    "vite" => sig(&["vite"], FrameworkCategory::Build),
    "rollup" => sig(&["rollup"], FrameworkCategory::Build),
    "esbuild" => sig(&["esbuild"], FrameworkCategory::Build),
    "typescript" => sig(&["typescript"], FrameworkCategory::Utility),
    "lodash" => sig(&["lodash"], FrameworkCategory::Utility),
    "axios" => sig(&["axios"], FrameworkCategory::Utility),
    "prisma" => sig(&["prisma", "@prisma/client"], FrameworkCategory::Backend),
    "graphql" => sig(&["graphql"], FrameworkCategory::Backend),
    "trpc" => sig(&["@trpc/server"], FrameworkCategory::Backend),
    "tailwindcss" => sig(&["tailwindcss"], FrameworkCategory::Frontend),
    "electron" => sig(&["electron"], FrameworkCategory::Frontend),
};

/// Detect frameworks from production and development dependencies.
///
/// A signature dependency counts when it is declared with a non-empty
/// version. Results are sorted by descending confidence; ties keep table
/// order. Peer dependencies are not considered.
pub fn detect_frameworks(dependencies: &DependencyInfo) -> Vec<FrameworkInfo> {
    let declared = dependencies.merged();

    let mut frameworks: Vec<FrameworkInfo> = FRAMEWORK_SIGNATURES
        .entries()
        .filter_map(|(name, signature)| {
            let matched: Vec<&str> = signature
                .deps
                .iter()
                .filter_map(|dep| declared.get(dep).copied())
                .filter(|version| !version.is_empty())
                .collect();

            let first = matched.first()?;
            Some(FrameworkInfo {
                name: name.to_string(),
                version: numeric_version(first),
                category: signature.category,
                confidence: matched.len() as f64 / signature.deps.len() as f64,
            })
        })
        .collect();

    frameworks.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    frameworks
}

/// Keep only digits and dots: `^18.2.0` becomes `18.2.0`.
fn numeric_version(raw: &str) -> Option<String> {
    let version: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}
