//! Path-derived area labels for pull requests.
//!
//! Pure classification: given the file paths a PR touches, produce the area
//! labels to apply. The rules are deliberately coarse; labels are a triage
//! aid, not a taxonomy.

/// Dependency manifest file names, matched against the last path segment.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "Cargo.toml",
    "Cargo.lock",
    "go.mod",
    "go.sum",
    "requirements.txt",
    "pyproject.toml",
    "Gemfile",
];

/// Returns true if the path names a dependency manifest.
pub fn is_dependency_manifest(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    MANIFEST_FILES.contains(&file_name)
}

/// Classifies a single path into an area label, if any rule matches.
fn label_for_path(path: &str) -> Option<&'static str> {
    if is_dependency_manifest(path) {
        return Some("dependencies");
    }
    if path.starts_with(".github/") {
        return Some("ci");
    }
    if path.starts_with("docs/") || path.ends_with(".md") {
        return Some("documentation");
    }
    if path.starts_with("tests/") || path.starts_with("test/") {
        return Some("tests");
    }
    None
}

/// Derives the sorted, deduplicated label set for a changed-file list.
pub fn labels_for_paths<'a, I>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut labels: Vec<&'static str> = paths.into_iter().filter_map(label_for_path).collect();
    labels.sort_unstable();
    labels.dedup();
    labels.into_iter().map(String::from).collect()
}
