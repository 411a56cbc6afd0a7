//! Pure checks on candidate directory paths. Nothing here touches the filesystem
//! beyond existence and permission probes.

use crate::error::{DocgenError, Result};
use crate::model::SiteLayout;
use crate::paths::{has_traversal, is_within, is_writable, normalize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirectoryValidator {
    layout: SiteLayout,
}

impl DirectoryValidator {
    pub fn new(layout: SiteLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn uploads_root(&self) -> &Path {
        &self.layout.uploads_root
    }

    /// Validates `path` and returns its normalized form.
    ///
    /// The root check runs before the traversal check, so `<root>/../etc` passes the
    /// first and is still rejected by the second.
    pub fn validate(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let raw = path.as_ref();
        if raw.as_os_str().is_empty() || raw.to_string_lossy().trim().is_empty() {
            return Err(DocgenError::EmptyPath);
        }

        let normalized = normalize(raw);

        let inside = self
            .layout
            .roots()
            .iter()
            .any(|root| is_within(&normalized, root));
        if !inside {
            return Err(DocgenError::invalid_path(
                normalized,
                "Directory must be within the site installation",
            ));
        }

        if has_traversal(&normalized) {
            return Err(DocgenError::invalid_path(
                normalized,
                "Directory path contains invalid navigation",
            ));
        }

        if normalized.exists() {
            if !is_writable(&normalized) {
                return Err(DocgenError::NotWritable(format!(
                    "Directory exists but is not writable: {}",
                    normalized.display()
                )));
            }
        } else {
            let parent = normalized.parent().unwrap_or(Path::new("/"));
            if !parent.is_dir() || !is_writable(parent) {
                return Err(DocgenError::NotWritable(format!(
                    "Parent directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(normalized)
    }

    /// Containment check used by migration: inside the uploads root, no traversal.
    pub fn is_in_uploads(&self, path: impl AsRef<Path>) -> bool {
        let normalized = normalize(path);
        !has_traversal(&normalized) && is_within(&normalized, &self.layout.uploads_root)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A site tree `<tmp>/site/wp-content/uploads` with a validator over it.
    pub(crate) fn site() -> (TempDir, DirectoryValidator) {
        let tmp = TempDir::new().unwrap();
        let site_root = tmp.path().join("site");
        let content_root = site_root.join("wp-content");
        let uploads_root = content_root.join("uploads");
        fs::create_dir_all(&uploads_root).unwrap();
        let validator = DirectoryValidator::new(SiteLayout {
            site_root,
            content_root,
            uploads_root,
        });
        (tmp, validator)
    }

    #[test]
    fn test_empty_path() {
        let (_tmp, v) = site();
        assert!(matches!(v.validate(""), Err(DocgenError::EmptyPath)));
        assert!(matches!(v.validate("   "), Err(DocgenError::EmptyPath)));
    }

    #[test]
    fn test_outside_roots_is_invalid() {
        let (tmp, v) = site();
        let outside = tmp.path().join("elsewhere");
        fs::create_dir_all(&outside).unwrap();
        for p in [outside.as_path(), Path::new("/etc/tpl"), Path::new("relative/dir")] {
            let err = v.validate(p).unwrap_err();
            assert_eq!(err.code(), "invalid_path", "{}", p.display());
        }
    }

    #[test]
    fn test_sibling_prefix_is_not_inside() {
        let (tmp, v) = site();
        let evil = tmp.path().join("site-evil");
        fs::create_dir_all(&evil).unwrap();
        assert_eq!(v.validate(&evil).unwrap_err().code(), "invalid_path");
    }

    #[test]
    fn test_traversal_rejected_even_inside_root() {
        let (_tmp, v) = site();
        let sneaky = v.uploads_root().join("..").join("..").join("wp-content");
        assert_eq!(v.validate(&sneaky).unwrap_err().code(), "invalid_path");

        let backslashed = format!("{}\\..\\uploads", v.uploads_root().display());
        assert_eq!(v.validate(backslashed).unwrap_err().code(), "invalid_path");
    }

    #[test]
    fn test_new_dir_with_writable_parent() {
        let (_tmp, v) = site();
        let target = v.uploads_root().join("docgen-temp");
        let normalized = v.validate(format!("{}/", target.display())).unwrap();
        assert_eq!(normalized, target);
        assert!(!target.exists());
    }

    #[test]
    fn test_new_dir_with_missing_parent_is_not_writable() {
        let (_tmp, v) = site();
        let target = v.uploads_root().join("missing").join("child");
        assert_eq!(v.validate(&target).unwrap_err().code(), "not_writable");
    }

    #[test]
    fn test_existing_dir_ok() {
        let (_tmp, v) = site();
        assert!(v.validate(v.uploads_root()).is_ok());
    }

    #[test]
    fn test_is_in_uploads() {
        let (_tmp, v) = site();
        assert!(v.is_in_uploads(v.uploads_root().join("tpl")));
        assert!(!v.is_in_uploads("/etc/tpl"));
        assert!(!v.is_in_uploads(v.uploads_root().join("..").join("x")));
        assert!(!v.is_in_uploads(&v.layout().content_root));
    }
}
