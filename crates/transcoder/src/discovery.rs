//! Module discovery: list the modules of one package directory.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::extract::CLIENT_MODULE;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker file of a package directory.
const PACKAGE_MARKER: &str = "__init__";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One module file of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredModule {
    pub name: String,
    pub path: PathBuf,
}

impl DiscoveredModule {
    pub fn is_client(&self) -> bool {
        self.name == CLIENT_MODULE
    }
}

/// List the modules directly inside `package_dir`, sorted by name.
///
/// Sub-packages are not descended into; each is reported as a skipped
/// module. Modules starting with one of `excluded_prefixes` are skipped at
/// debug level.
pub fn discover(
    package_dir: &Path,
    excluded_prefixes: &[String],
    extensions: &[&str],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<DiscoveredModule>, DiscoveryError> {
    if !package_dir.is_dir() {
        return Err(DiscoveryError::NotADirectory(package_dir.to_path_buf()));
    }

    let mut modules = Vec::new();
    let walker = WalkDir::new(package_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: package_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if is_package(path, extensions) {
                diagnostics.warning(
                    DiagnosticKind::SkippedModule,
                    format!("sub-package {} skipped", path.display()),
                );
            }
            continue;
        }

        let Some(name) = module_name(path, extensions) else {
            continue;
        };
        if name == PACKAGE_MARKER {
            continue;
        }
        if let Some(prefix) = excluded_prefixes.iter().find(|p| name.starts_with(p.as_str())) {
            diagnostics.debug(
                DiagnosticKind::SkippedModule,
                format!("module {} skipped (excluded prefix {:?})", name, prefix),
            );
            continue;
        }

        modules.push(DiscoveredModule {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        package = %package_dir.display(),
        modules = modules.len(),
        "discovered modules"
    );
    Ok(modules)
}

/// Module name of a source file with one of `extensions`.
fn module_name<'p>(path: &'p Path, extensions: &[&str]) -> Option<&'p str> {
    let ext = path.extension()?.to_str()?;
    if !extensions.contains(&ext) {
        return None;
    }
    path.file_stem()?.to_str()
}

fn is_package(dir: &Path, extensions: &[&str]) -> bool {
    extensions
        .iter()
        .any(|ext| dir.join(format!("{}.{}", PACKAGE_MARKER, ext)).is_file())
}
