//! Path normalization and filesystem probes shared by the validator, handler and
//! migration engine.
//!
//! Paths arrive from admin input with mixed separators and trailing slashes, so every
//! comparison goes through [`normalize`] first. Containment is decided on path
//! *components*, never on string prefixes: `/srv/up-evil` is not inside `/srv/up`.

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

/// Names written by the tool itself (or by the web server) that are never treated as
/// user content: not copied by migration, not counted, not cleaned.
pub const GUARD_FILE: &str = "index.php";
pub const SYSTEM_FILES: &[&str] = &[GUARD_FILE, ".htaccess"];

pub fn is_system_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| SYSTEM_FILES.contains(&n))
        .unwrap_or(false)
}

/// Converts `\` to `/`, collapses repeated separators and trims trailing ones.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let raw = path.as_ref().to_string_lossy().replace('\\', "/");
    let mut out = String::with_capacity(raw.len());
    let mut prev_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    PathBuf::from(out)
}

pub fn has_traversal(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// True when `path` equals `root` or descends from it. Both sides are normalized.
pub fn is_within(path: impl AsRef<Path>, root: impl AsRef<Path>) -> bool {
    let path = normalize(path);
    let root = normalize(root);
    path.starts_with(&root)
}

/// Lowercased extension, or an empty string for files without one.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn modified_at(meta: &Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Bytes available to unprivileged users on the filesystem holding `path`.
/// Returns 0 when the probe fails.
#[cfg(unix)]
pub fn free_space(path: &Path) -> u64 {
    rustix::fs::statvfs(path)
        .map(|stat| stat.f_bavail.saturating_mul(stat.f_frsize))
        .unwrap_or(0)
}

#[cfg(not(unix))]
pub fn free_space(_path: &Path) -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_trailing() {
        assert_eq!(normalize("C:\\sites\\up\\"), PathBuf::from("C:/sites/up"));
        assert_eq!(normalize("/srv//up///tpl/"), PathBuf::from("/srv/up/tpl"));
        assert_eq!(normalize("/"), PathBuf::from("/"));
    }

    #[test]
    fn test_is_within_uses_components() {
        assert!(is_within("/srv/up/tpl", "/srv/up"));
        assert!(is_within("/srv/up/", "/srv/up"));
        assert!(!is_within("/srv/up-evil", "/srv/up"));
        assert!(!is_within("/etc/tpl", "/srv/up"));
    }

    #[test]
    fn test_has_traversal() {
        assert!(has_traversal(&normalize("/srv/up/../etc")));
        assert!(has_traversal(&normalize("/srv/up\\..\\etc")));
        assert!(!has_traversal(&normalize("/srv/up/a..b")));
    }

    #[test]
    fn test_system_files() {
        assert!(is_system_file(Path::new("/x/index.php")));
        assert!(is_system_file(Path::new(".htaccess")));
        assert!(!is_system_file(Path::new("/x/report.docx")));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/B.DOCX")), "docx");
        assert_eq!(extension_of(Path::new("a/README")), "");
    }

    #[test]
    fn test_probes_on_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable(dir.path()));
        assert!(!is_writable(&dir.path().join("missing")));
        assert!(free_space(dir.path()) > 0);
        assert_eq!(free_space(&dir.path().join("missing")), 0);
    }
}
