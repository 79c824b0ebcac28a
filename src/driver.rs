//! Tree traversal, staging and the round-trip path maps.
//!
//! [`process_tree`] starts at a root file, follows `import` edges
//! transitively, and writes every transformed file under a fresh staging
//! directory that mirrors the layout relative to the root's parent.
//! Processing is best-effort throughout: unreadable or unwritable files
//! are skipped without diagnostics and everything else proceeds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::transform::process_source;

/// Outcome of preprocessing a file tree.
///
/// The staging directory is owned by this result; drop it with
/// [`cleanup`] once the downstream consumer is done with the tree.
#[derive(Debug, Clone, Default)]
pub struct PreprocessResult {
    /// Canonicalized root the traversal started from.
    pub original_root: PathBuf,
    /// Staged counterpart of the root.
    pub processed_root: PathBuf,
    /// The staging directory all processed files were written into.
    pub staging_dir: PathBuf,
    /// Original path to staged path, for every written file.
    pub original_to_processed: BTreeMap<PathBuf, PathBuf>,
    /// Staged path back to original path.
    pub processed_to_original: BTreeMap<PathBuf, PathBuf>,
    /// Whether any visited file contained templates.
    pub had_templates: bool,
}

/// Transform the tree reachable from `root_path`.
///
/// Returns `None` when the root is empty, the staging directory cannot be
/// created, or no visited file contained a template; in the last case the
/// staging directory has already been removed, signaling that the
/// original tree can be consumed as-is.
pub fn process_tree(root_path: &Path) -> Option<PreprocessResult> {
    if root_path.as_os_str().is_empty() {
        return None;
    }

    let canonical_root = canonicalize_path(root_path);
    let staging_dir =
        std::env::temp_dir().join(format!("tmpl_{:x}", rand::random::<u64>()));
    fs::create_dir_all(&staging_dir).ok()?;
    debug!(staging = %staging_dir.display(), "created staging directory");

    let mut result = PreprocessResult {
        original_root: canonical_root.clone(),
        staging_dir: staging_dir.clone(),
        ..PreprocessResult::default()
    };

    let base_dir = canonical_root
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut visited: FxHashSet<PathBuf> = FxHashSet::default();
    let mut queue = vec![canonical_root.clone()];

    while let Some(current) = queue.pop() {
        let current = canonicalize_path(&current);
        if !visited.insert(current.clone()) {
            continue;
        }

        let Ok(content) = fs::read_to_string(&current) else {
            continue;
        };

        let processed = process_source(&current, &content);
        trace!(
            file = %current.display(),
            had_templates = processed.had_templates,
            imports = processed.imports.len(),
            "processed file"
        );
        if processed.had_templates {
            result.had_templates = true;
        }

        let relative = current
            .strip_prefix(&base_dir)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty() && rel.is_relative())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.file_name().map(PathBuf::from).unwrap_or_default());
        let staged = staging_dir.join(relative);

        if let Some(parent) = staged.parent() {
            if fs::create_dir_all(parent).is_err() {
                continue;
            }
        }
        if fs::write(&staged, processed.processed.as_bytes()).is_err() {
            continue;
        }

        result
            .original_to_processed
            .insert(current.clone(), staged.clone());
        result.processed_to_original.insert(staged, current);

        queue.extend(processed.imports);
    }

    if !result.had_templates {
        debug!(staging = %staging_dir.display(), "no templates found, removing staging directory");
        remove_staging_dir(&staging_dir);
        return None;
    }

    result.processed_root = result
        .original_to_processed
        .get(&canonical_root)
        .cloned()
        .unwrap_or(canonical_root);

    debug!(
        files = result.original_to_processed.len(),
        processed_root = %result.processed_root.display(),
        "tree preprocessing complete"
    );
    Some(result)
}

/// Delete a result's staging directory recursively.
///
/// Safe to call on an empty or already-missing path.
pub fn cleanup(result: &PreprocessResult) {
    remove_staging_dir(&result.staging_dir);
}

fn remove_staging_dir(dir: &Path) {
    if dir.as_os_str().is_empty() {
        return;
    }
    let _ = fs::remove_dir_all(dir);
}

/// Absolutize and canonicalize a path, keeping the absolute form when
/// canonicalization fails (for example because the file does not exist).
pub(crate) fn canonicalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    fs::canonicalize(&absolute).unwrap_or(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root_is_rejected() {
        assert!(process_tree(Path::new("")).is_none());
    }

    #[test]
    fn missing_root_yields_no_templates() {
        // The file cannot be opened, so it is skipped and nothing has
        // templates; the staging directory must be gone afterwards.
        assert!(process_tree(Path::new("/nonexistent/definitely/missing.gx")).is_none());
    }

    #[test]
    fn canonicalize_keeps_missing_absolute_paths() {
        let path = Path::new("/no/such/file.gx");
        assert_eq!(canonicalize_path(path), path);
    }

    #[test]
    fn cleanup_tolerates_missing_directory() {
        let result = PreprocessResult {
            staging_dir: PathBuf::from("/tmp/tmpl_does_not_exist_anymore"),
            ..PreprocessResult::default()
        };
        cleanup(&result);
        cleanup(&result);
    }

    #[test]
    fn cleanup_tolerates_empty_path() {
        cleanup(&PreprocessResult::default());
    }
}
