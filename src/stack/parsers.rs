//! Shared signal extractors used by every ecosystem classifier.

use crate::fs::ProjectFiles;
use regex::Regex;
use std::collections::BTreeSet;

/// Reduces a dotted version to its first two components.
///
/// `"3.11.2"` becomes `"3.11"`; strings with fewer than two components are
/// returned unchanged.
pub fn normalize_version(version: &str) -> String {
    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{}.{}", major, minor),
        _ => version.to_string(),
    }
}

/// First capture group of `pattern` in `content`, normalized.
pub fn extract_version(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(content)?;
    Some(normalize_version(caps.get(1)?.as_str()))
}

/// First capture group of `pattern` in `content`, verbatim.
pub fn capture(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(content)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Declared package names of a requirements-style manifest, lowercased.
pub fn parse_dependencies(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        // comments, and option/continuation lines such as `-r base.txt`
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| {
            let name = line
                .split(|c| matches!(c, '=' | '<' | '>' | '~' | '!'))
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Parsed dependency set of one project-relative file; empty when unreadable.
pub fn dependencies_from_file(files: &ProjectFiles, name: &str) -> BTreeSet<String> {
    parse_dependencies(&files.read_file(name))
}

/// Whether `dependency` (case-insensitive) is declared in any of `names`.
pub fn dependency_in_files(files: &ProjectFiles, dependency: &str, names: &[&str]) -> bool {
    let dependency = dependency.to_lowercase();
    names
        .iter()
        .any(|name| dependencies_from_file(files, name).contains(&dependency))
}

/// Package name of a PEP 508 requirement string such as `"flask[async]>=2.0; python_version>'3'"`.
pub fn pep508_name(requirement: &str) -> Option<String> {
    let name: String = requirement
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    (!name.is_empty()).then(|| name.to_lowercase())
}
