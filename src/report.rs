//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal summary for human readability
//! - JSON: the full `CodeStructure`, with camelCase field names

use std::io::Write;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{CodeStructure, FrameworkInfo, ParsedFile};

/// Output format selectable on the command line or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write the structure as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, structure: &CodeStructure) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, structure)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a human-readable summary.
pub fn write_pretty<W: Write>(
    out: &mut W,
    root: &str,
    structure: &CodeStructure,
) -> anyhow::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "docgen".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;

    writeln!(out, "  {}{}", "Root:    ".dimmed(), root)?;
    if let Some(pkg) = &structure.package_info {
        write!(out, "  {}{}", "Package: ".dimmed(), pkg.name.bold())?;
        if !pkg.version.is_empty() {
            write!(out, "@{}", pkg.version)?;
        }
        writeln!(out)?;
        if let Some(description) = &pkg.description {
            writeln!(out, "           {}", description.dimmed())?;
        }
    }
    writeln!(out)?;

    write_summary(out, structure)?;
    writeln!(out)?;

    if !structure.frameworks.is_empty() {
        write_frameworks(out, &structure.frameworks)?;
        writeln!(out)?;
    }

    write_files(out, &structure.files)?;
    writeln!(out)?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, structure: &CodeStructure) -> anyhow::Result<()> {
    writeln!(
        out,
        "  {} {}, {}  {}",
        "✓".green(),
        plural(structure.files.len(), "file"),
        plural(structure.exports.len(), "export"),
        format!(
            "({}, {})",
            plural(structure.function_count(), "function"),
            plural(structure.class_count(), "class")
        )
        .dimmed()
    )?;

    let deps = &structure.dependencies;
    if !deps.is_empty() {
        writeln!(
            out,
            "    {}",
            format!(
                "{} production, {} dev, {} peer dependencies",
                deps.production.len(),
                deps.dev.len(),
                deps.peer.len()
            )
            .dimmed()
        )?;
    }
    Ok(())
}

fn write_frameworks<W: Write>(out: &mut W, frameworks: &[FrameworkInfo]) -> anyhow::Result<()> {
    writeln!(out, "  {} ({}):", "Frameworks".bold(), frameworks.len())?;

    for fw in frameworks {
        write!(
            out,
            "    {:<14}{:<10}{:<10}",
            fw.name,
            fw.category.as_str().dimmed(),
            fw.version.as_deref().unwrap_or("-")
        )?;
        let percent = (fw.confidence * 100.0).round() as u32;
        let confidence = format!("{:>3}%", percent);
        if fw.confidence >= 1.0 {
            writeln!(out, "{}", confidence.green())?;
        } else {
            writeln!(out, "{}", confidence.yellow())?;
        }
    }
    Ok(())
}

fn write_files<W: Write>(out: &mut W, files: &[ParsedFile]) -> anyhow::Result<()> {
    writeln!(out, "  {} ({}):", "Files".bold(), files.len())?;

    let width = files
        .iter()
        .map(|f| f.relative_path.len())
        .max()
        .unwrap_or(0);

    for file in files {
        let mut counts = Vec::new();
        for (n, noun) in [
            (file.functions.len(), "function"),
            (file.classes.len(), "class"),
            (file.interfaces.len(), "interface"),
            (file.types.len(), "type"),
        ] {
            if n > 0 {
                counts.push(plural(n, noun));
            }
        }
        let counts = if counts.is_empty() {
            "no declarations".to_string()
        } else {
            counts.join(", ")
        };

        writeln!(
            out,
            "    {:<width$}  {}",
            file.relative_path.blue(),
            counts.dimmed(),
            width = width
        )?;
    }
    Ok(())
}

fn plural(n: usize, noun: &str) -> String {
    match (n, noun.ends_with('s')) {
        (1, _) => format!("{} {}", n, noun),
        (_, true) => format!("{} {}es", n, noun),
        (_, false) => format!("{} {}s", n, noun),
    }
}
