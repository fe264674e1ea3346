use crate::{Error, Result, core::DocFilter};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/* =========================== Filesystem & paths ============================ */

/// Join the components of `p` with `/` regardless of platform.
#[must_use]
pub fn path_to_unix(p: &Path) -> String {
    let mut s = String::new();
    for (i, comp) in p.iter().enumerate() {
        if i > 0 {
            s.push('/');
        }
        s.push_str(&comp.to_string_lossy());
    }
    s
}

/// Collect the repository-relative paths of every file under `root` that
/// `filter` accepts, sorted.
///
/// When the filter skips dotfiles, hidden directories (`.git` included) are
/// not entered. Subdirectories that cannot be read are skipped. Symlinks are
/// not followed: a link to a regular file is listed under the link's own
/// path, links to directories and dangling links are left out.
pub fn scan_checkout(root: &Path, filter: &DocFilter) -> Result<Vec<String>> {
    let root = dunce::canonicalize(root).map_err(|source| Error::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;
    let entries = fs::read_dir(&root).map_err(|source| Error::UnreadableRoot {
        path: root.clone(),
        source,
    })?;

    let mut out = Vec::new();
    let mut pending: Vec<PathBuf> = Vec::new();
    visit_entries(&root, entries, filter, &mut pending, &mut out);

    while let Some(dir) = pending.pop() {
        match fs::read_dir(&dir) {
            Ok(entries) => visit_entries(&root, entries, filter, &mut pending, &mut out),
            Err(e) => debug!(dir = %dir.display(), error = %e, "skipping unreadable directory"),
        }
    }

    out.sort();
    debug!(root = %root.display(), files = out.len(), "scanned checkout");
    Ok(out)
}

fn visit_entries(
    root: &Path,
    entries: fs::ReadDir,
    filter: &DocFilter,
    pending: &mut Vec<PathBuf>,
    out: &mut Vec<String>,
) {
    for ent in entries.flatten() {
        let path = ent.path();
        let hidden = ent.file_name().to_string_lossy().starts_with('.');
        let Ok(ft) = ent.file_type() else {
            continue;
        };

        if ft.is_symlink() {
            // Links are never entered; only a link to a regular file is listed.
            if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                debug!(path = %path.display(), "skipping symlink that is not a file");
                continue;
            }
        } else if ft.is_dir() {
            if !(hidden && filter.skips_dotfiles()) {
                pending.push(path);
            }
            continue;
        }

        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel = path_to_unix(rel);
        if filter.matches(&rel) {
            out.push(rel);
        }
    }
}
