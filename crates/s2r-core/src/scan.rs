//! Shallow project directory scan for tech-stack hints.
//!
//! The walk honours `.gitignore`, skips hidden entries and never descends into
//! dependency or build caches. Results are hint strings for the prompt, not a
//! file inventory.

use crate::config::ScanConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Directory names that hold installed dependencies or build output.
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "vendor",
    "venv",
    "env",
    "__pycache__",
    "dist",
    "build",
    "bin",
    "obj",
    "Pods",
    "bower_components",
    "site-packages",
];

/// Well-known manifest and build files: (file name, hint, implied language).
const MANIFESTS: &[(&str, &str, Option<&str>)] = &[
    ("requirements.txt", "Python dependencies", Some("Python")),
    ("pyproject.toml", "Python project metadata", Some("Python")),
    ("setup.py", "Python package setup", Some("Python")),
    ("Pipfile", "Pipenv dependencies", Some("Python")),
    ("package.json", "Node.js dependencies", Some("JavaScript/TypeScript")),
    ("tsconfig.json", "TypeScript configuration", Some("TypeScript")),
    ("Cargo.toml", "Rust crate manifest", Some("Rust")),
    ("go.mod", "Go module", Some("Go")),
    ("pom.xml", "Maven build", Some("Java")),
    ("build.gradle", "Gradle build", Some("Java")),
    ("build.gradle.kts", "Gradle Kotlin build", Some("Kotlin")),
    ("pubspec.yaml", "Dart/Flutter dependencies", Some("Dart/Flutter")),
    ("Gemfile", "Ruby gems", Some("Ruby")),
    ("composer.json", "PHP dependencies", Some("PHP")),
    ("Package.swift", "Swift package", Some("Swift")),
    ("CMakeLists.txt", "CMake build", Some("C++")),
    ("Makefile", "Make build", None),
    ("Dockerfile", "Docker support", None),
    ("docker-compose.yml", "Docker Compose services", None),
    ("docker-compose.yaml", "Docker Compose services", None),
];

/// Source extensions and the language they indicate.
const EXTENSIONS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("java", "Java"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("dart", "Dart/Flutter"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("c", "C"),
    ("cs", "C#"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("kt", "Kotlin"),
];

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scan exclude pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Hints gathered from one directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    hints: BTreeSet<String>,
    primary_language: Option<String>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Hints in stable (sorted) order.
    pub fn hints(&self) -> impl Iterator<Item = &str> {
        self.hints.iter().map(String::as_str)
    }

    pub fn contains(&self, hint: &str) -> bool {
        self.hints.contains(hint)
    }

    /// Best guess at the project's main language, if anything pointed at one.
    pub fn primary_language(&self) -> Option<&str> {
        self.primary_language.as_deref()
    }
}

/// Scan `root` and return whatever hints were found.
///
/// Fails only when the root itself cannot be listed; unreadable entries below
/// it are skipped.
pub fn scan_project(root: &Path, config: &ScanConfig) -> Result<ScanResult, ScanError> {
    let meta = std::fs::metadata(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    // Listing permission is checked up front; the walker would only log it.
    std::fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let excludes = build_exclude_set(&config.exclude)?;
    let filter_root = root.to_path_buf();

    let walker = ignore::WalkBuilder::new(root)
        .max_depth(Some(config.max_depth.max(1)))
        .hidden(true)
        .parents(false)
        .git_ignore(true)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir && is_excluded_dir(&entry.file_name().to_string_lossy()) {
                return false;
            }
            let rel = entry
                .path()
                .strip_prefix(&filter_root)
                .unwrap_or(entry.path());
            !excludes.is_match(rel)
        })
        .build();

    let mut hints = BTreeSet::new();
    let mut manifest_language: Option<(usize, &'static str)> = None;
    let mut extension_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut listed = 0usize;
    let mut has_tests = false;

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().contains("test") {
            has_tests = true;
        }
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        if entry.depth() == 1 && listed < config.max_listed_files {
            hints.insert(format!("file: {}", name));
            listed += 1;
        }

        if let Some((rank, (manifest, hint, language))) = MANIFESTS
            .iter()
            .enumerate()
            .find(|(_, (manifest, _, _))| *manifest == name)
        {
            hints.insert(format!("{} ({})", manifest, hint));
            if let Some(language) = *language
                && manifest_language.is_none_or(|(best, _)| rank < best)
            {
                manifest_language = Some((rank, language));
            }
        }
        if name.ends_with(".csproj") {
            hints.insert(format!("{} (.NET project)", name));
        }

        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if let Some((ext, language)) = EXTENSIONS.iter().find(|(e, _)| *e == ext) {
            hints.insert(format!("*.{} ({})", ext, language));
            *extension_counts.entry(*language).or_default() += 1;
        }
    }

    if has_tests {
        hints.insert("test files present".to_string());
    }

    let primary_language = manifest_language
        .map(|(_, language)| language)
        .or_else(|| most_common(&extension_counts))
        .map(str::to_string);

    tracing::debug!(
        "scanned {}: {} hints, language guess {:?}",
        root.display(),
        hints.len(),
        primary_language
    );

    Ok(ScanResult {
        hints,
        primary_language,
    })
}

/// Like [`scan_project`], but a failed scan degrades to an empty result.
pub fn scan_or_empty(root: &Path, config: &ScanConfig) -> ScanResult {
    match scan_project(root, config) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!("directory scan skipped: {}", err);
            ScanResult::default()
        }
    }
}

fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p)?);
    }
    Ok(builder.build()?)
}

/// Highest count wins; ties go to the alphabetically first language.
fn most_common(counts: &BTreeMap<&'static str, usize>) -> Option<&'static str> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(language, _)| *language)
}
