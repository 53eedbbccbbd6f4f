//! Boundary lint for the rideshare backend.
//!
//! The backend keeps ride rules in `domain`, HTTP in `inbound` and storage in
//! `outbound`. Every source file under those directories is parsed with
//! `syn`, every path it names is collected, and each path is checked against
//! the rules of the file's layer:
//!
//! - `domain` may not name an adapter module, a web crate, a storage crate
//!   or the password hashing crate
//! - `inbound` may not name `outbound`, a storage crate or the hashing crate
//! - `outbound` may not name `inbound` or a web crate
//!
//! Test-support files (`tests.rs`, `test_utils.rs` and anything under a
//! `tests/` directory) may wire real adapters and are skipped.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Library name used when the binary or integration tests refer to the crate.
const CRATE_NAME: &str = "rideshare";

const WEB_CRATES: &[&str] = &[
    "actix",
    "actix_http",
    "actix_session",
    "actix_web",
    "utoipa",
    "utoipa_swagger_ui",
];
const STORAGE_CRATES: &[&str] = &["bb8", "diesel", "diesel_async", "diesel_migrations"];
const HASHING_CRATES: &[&str] = &["bcrypt"];

/// One rule broken by one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Why a lint run failed.
#[derive(Debug)]
pub enum ArchitectureLintError {
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse { file: PathBuf, message: String },
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} architecture boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "- {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file handed to the lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    pub contents: String,
}

/// Lint `backend_dir/src` on disk.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.dir());
        if dir.is_dir() {
            read_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources.iter().filter(|s| !is_test_support(&s.file)) {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain, inbound or outbound".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(
            layer
                .check(&parsed)
                .into_iter()
                .map(|message| Violation {
                    file: source.file.clone(),
                    message,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    fn forbidden_layers(self) -> &'static [Self] {
        match self {
            Self::Domain => &[Self::Inbound, Self::Outbound],
            Self::Inbound => &[Self::Outbound],
            Self::Outbound => &[Self::Inbound],
        }
    }

    fn forbidden_crates(self) -> Vec<&'static str> {
        let groups: &[&[&'static str]] = match self {
            Self::Domain => &[WEB_CRATES, STORAGE_CRATES, HASHING_CRATES],
            Self::Inbound => &[STORAGE_CRATES, HASHING_CRATES],
            Self::Outbound => &[WEB_CRATES],
        };
        groups.concat()
    }

    /// Messages for every rule `file` breaks, sorted and deduplicated.
    fn check(self, file: &syn::File) -> BTreeSet<String> {
        let mut collector = PathCollector::default();
        collector.visit_file(file);

        let forbidden_crates = self.forbidden_crates();
        let mut messages = BTreeSet::new();
        for segments in &collector.paths {
            let layer = internal_layer(segments).filter(|l| self.forbidden_layers().contains(l));
            if let Some(layer) = layer {
                messages.insert(format!(
                    "{} module must not depend on crate::{}",
                    self.dir(),
                    layer.dir()
                ));
            }
            let root = external_root(segments).filter(|r| forbidden_crates.iter().any(|c| c == r));
            if let Some(root) = root {
                messages.insert(format!(
                    "{} module must not depend on external crate `{root}`",
                    self.dir()
                ));
            }
        }
        messages
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// The backend layer a path points into, if it names one.
fn internal_layer(segments: &[String]) -> Option<Layer> {
    let first = segments.first()?;
    let target = if is_relative(first) || first == CRATE_NAME {
        segments.iter().find(|s| !is_relative(s) && *s != CRATE_NAME)?
    } else {
        first
    };
    Layer::ALL.into_iter().find(|layer| layer.dir() == target)
}

/// The external crate a path starts with.
fn external_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    (!is_relative(first) && first != CRATE_NAME).then_some(first)
}

fn is_test_support(relative_path: &Path) -> bool {
    let in_tests_dir = relative_path
        .parent()
        .is_some_and(|parent| parent.components().any(|c| c.as_os_str() == "tests"));
    let stem = relative_path.file_stem().and_then(|stem| stem.to_str());
    in_tests_dir || matches!(stem, Some("tests" | "test_utils"))
}

/// Every path named in a file, as identifier segments.
#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                self.insert_with(prefix, ident.to_string());
            }
            syn::UseTree::Glob(_) => self.insert_with(prefix, "*".to_owned()),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix);
                }
            }
        }
    }

    fn insert_with(&mut self, prefix: &[String], last: String) {
        let mut segments = prefix.to_vec();
        segments.push(last);
        self.paths.insert(segments);
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node.segments.iter().map(|s| s.ident.to_string()).collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, &mut Vec::new());
    }
}

fn read_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            read_sources(src_root, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let file = path
                .strip_prefix(src_root)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
