//! Filesystem operations on validated directories: secure creation, statistics,
//! template scanning and age/count based cleanup.

use crate::error::{DocgenError, Result};
use crate::model::{CleanupOptions, CleanupReport, DirectoryStats, TemplateFile, TemplateKind};
use crate::paths::{
    extension_of, free_space, is_system_file, is_writable, modified_at, GUARD_FILE,
};
use crate::template::{template_kind, validate_template_file};
use crate::validator::DirectoryValidator;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

pub const DEFAULT_DIR_MODE: u32 = 0o755;

#[derive(Debug, Clone)]
pub struct DirectoryHandler {
    validator: DirectoryValidator,
}

impl DirectoryHandler {
    pub fn new(validator: DirectoryValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &DirectoryValidator {
        &self.validator
    }

    /// Validates, creates (recursively) and guards `path`. Returns the normalized path.
    pub fn create_directory(&self, path: impl AsRef<Path>, mode: u32) -> Result<PathBuf> {
        let path = self.validator.validate(path)?;
        self.ensure_secure_directory(&path, mode)?;
        Ok(path)
    }

    /// Creates `path` and its guard file without re-validating. Callers are expected to
    /// have run their own containment check.
    pub(crate) fn ensure_secure_directory(&self, path: &Path, mode: u32) -> Result<()> {
        if !path.is_dir() {
            fs::create_dir_all(path).map_err(|source| DocgenError::CreateFailed {
                path: path.to_path_buf(),
                source,
            })?;
            apply_mode(path, mode);
            tracing::info!(path = %path.display(), "created directory");
        }

        let guard = path.join(GUARD_FILE);
        if !guard.exists() {
            if let Err(e) = fs::write(&guard, b"") {
                tracing::warn!(path = %guard.display(), error = %e, "failed to write guard file");
            }
        }
        Ok(())
    }

    pub fn get_directory_size(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        require_dir(path)?;
        Ok(regular_files(path, true)
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum())
    }

    pub fn get_directory_stats(&self, path: impl AsRef<Path>) -> Result<DirectoryStats> {
        let path = path.as_ref();
        require_dir(path)?;

        let mut stats = DirectoryStats {
            is_writable: is_writable(path),
            free_space: free_space(path),
            ..DirectoryStats::default()
        };

        for file in regular_files(path, true) {
            let Ok(meta) = fs::metadata(&file) else {
                continue;
            };
            stats.total_files += 1;
            stats.total_size += meta.len();
            if let Some(mtime) = modified_at(&meta) {
                stats.last_modified = Some(stats.last_modified.map_or(mtime, |m| m.max(mtime)));
            }
            *stats.by_extension.entry(extension_of(&file)).or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Lists `.docx` then `.odt` files directly inside `path`, sorted by name within each
    /// kind, each with its structural validity.
    pub fn scan_template_files(&self, path: impl AsRef<Path>) -> Result<Vec<TemplateFile>> {
        let path = path.as_ref();
        require_dir(path)?;

        let mut candidates: Vec<(TemplateKind, PathBuf)> = fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter_map(|p| template_kind(&p).map(|k| (k, p)))
            .collect();
        candidates.sort_by(|(ka, pa), (kb, pb)| {
            let rank = |k: &TemplateKind| TemplateKind::ALL.iter().position(|x| x == k);
            rank(ka).cmp(&rank(kb)).then_with(|| pa.cmp(pb))
        });

        let mut templates = Vec::with_capacity(candidates.len());
        for (kind, file) in candidates {
            let meta = fs::metadata(&file)?;
            templates.push(TemplateFile {
                name: file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size: meta.len(),
                modified_at: modified_at(&meta),
                extension: kind,
                is_valid: validate_template_file(&file),
                path: file,
            });
        }
        Ok(templates)
    }

    pub fn validate_template_file(&self, path: impl AsRef<Path>) -> bool {
        validate_template_file(path.as_ref())
    }

    pub fn clean_directory(
        &self,
        path: impl AsRef<Path>,
        options: &CleanupOptions,
    ) -> Result<CleanupReport> {
        self.clean_directory_at(path, options, SystemTime::now())
    }

    /// Cleanup against an explicit clock.
    ///
    /// The `keep_latest` newest matching files are removed from consideration before
    /// age is looked at, so they survive even when older than the threshold.
    pub fn clean_directory_at(
        &self,
        path: impl AsRef<Path>,
        options: &CleanupOptions,
        now: SystemTime,
    ) -> Result<CleanupReport> {
        let path = path.as_ref();
        require_dir(path)?;

        let mut files: Vec<(PathBuf, SystemTime)> = regular_files(path, options.recursive)
            .filter(|p| !is_system_file(p))
            .filter(|p| {
                options.extensions.is_empty() || options.extensions.contains(&extension_of(p))
            })
            .filter_map(|p| {
                let mtime = fs::metadata(&p).and_then(|m| m.modified()).ok()?;
                Some((p, mtime))
            })
            .collect();

        files.sort_by(|(pa, ta), (pb, tb)| tb.cmp(ta).then_with(|| pa.cmp(pb)));

        let max_age = Duration::from_secs(options.older_than_hours.saturating_mul(3600));
        let mut report = CleanupReport::default();

        for (file, mtime) in files.into_iter().skip(options.keep_latest) {
            let age = now.duration_since(mtime).unwrap_or(Duration::ZERO);
            if age < max_age {
                report.skipped += 1;
                continue;
            }
            match fs::remove_file(&file) {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!(path = %file.display(), error = %e, "failed to delete file");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            path = %path.display(),
            deleted = report.deleted,
            failed = report.failed,
            skipped = report.skipped,
            "cleanup finished"
        );
        Ok(report)
    }
}

fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(DocgenError::InvalidDirectory(path.to_path_buf()))
    }
}

fn regular_files(root: &Path, recursive: bool) -> impl Iterator<Item = PathBuf> {
    let walker = WalkDir::new(root).min_depth(1);
    let walker = if recursive { walker } else { walker.max_depth(1) };
    walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        tracing::warn!(path = %path.display(), error = %e, "failed to set directory permissions");
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::tests::{write_docx, write_odt, write_zip};
    use crate::validator::tests::site;
    use std::fs::File;

    fn set_age(path: &Path, now: SystemTime, hours: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(now - Duration::from_secs(hours * 3600))
            .unwrap();
    }

    #[test]
    fn test_create_directory_writes_guard() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let target = v.uploads_root().join("docgen-temp");

        let created = handler.create_directory(&target, DEFAULT_DIR_MODE).unwrap();
        assert_eq!(created, target);
        assert!(target.is_dir());
        let guard = target.join(GUARD_FILE);
        assert_eq!(fs::metadata(guard).unwrap().len(), 0);
    }

    #[test]
    fn test_create_directory_is_validated() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v);
        let err = handler.create_directory("/etc/tpl", DEFAULT_DIR_MODE).unwrap_err();
        assert_eq!(err.code(), "invalid_path");
    }

    #[test]
    fn test_create_under_regular_file_is_create_failed() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let blocker = v.uploads_root().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = handler
            .ensure_secure_directory(&blocker.join("tpl"), DEFAULT_DIR_MODE)
            .unwrap_err();
        assert_eq!(err.code(), "create_failed");
    }

    #[test]
    fn test_stats_and_size() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let root = v.uploads_root().join("stats");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("a.DOCX"), "12345").unwrap();
        fs::write(root.join("b.docx"), "123").unwrap();
        fs::write(root.join("nested").join("c.pdf"), "12").unwrap();
        fs::write(root.join("README"), "1").unwrap();

        assert_eq!(handler.get_directory_size(&root).unwrap(), 11);

        let stats = handler.get_directory_stats(&root).unwrap();
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.total_size, 11);
        assert!(stats.is_writable);
        assert!(stats.last_modified.is_some());
        assert_eq!(stats.by_extension.get("docx"), Some(&2));
        assert_eq!(stats.by_extension.get("pdf"), Some(&1));
        assert_eq!(stats.by_extension.get(""), Some(&1));
    }

    #[test]
    fn test_stats_on_file_is_invalid_directory() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let file = v.uploads_root().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(
            handler.get_directory_stats(&file).unwrap_err().code(),
            "invalid_directory"
        );
        assert_eq!(
            handler.scan_template_files(v.uploads_root().join("nope")).unwrap_err().code(),
            "invalid_directory"
        );
    }

    #[test]
    fn test_scan_template_files() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let dir = v.uploads_root().join("tpl");
        fs::create_dir_all(dir.join("sub")).unwrap();
        write_odt(&dir.join("a.odt"));
        write_docx(&dir.join("z.docx"));
        write_zip(&dir.join("broken.docx"), &["[Content_Types].xml"]);
        write_docx(&dir.join("sub").join("deep.docx"));
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let templates = handler.scan_template_files(&dir).unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["broken.docx", "z.docx", "a.odt"]);
        assert!(!templates[0].is_valid);
        assert!(templates[1].is_valid);
        assert!(templates[2].is_valid);
        assert_eq!(templates[2].extension, TemplateKind::Odt);
    }

    #[test]
    fn test_clean_keeps_latest_regardless_of_age() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let dir = v.uploads_root().join("clean");
        fs::create_dir_all(&dir).unwrap();
        let now = SystemTime::now();
        for (name, hours) in [("a", 100), ("b", 90), ("c", 80), ("d", 70), ("e", 2)] {
            let path = dir.join(format!("{}.tmp", name));
            fs::write(&path, name).unwrap();
            set_age(&path, now, hours);
        }

        let options = CleanupOptions {
            older_than_hours: 0,
            keep_latest: 2,
            ..CleanupOptions::default()
        };
        let report = handler.clean_directory_at(&dir, &options, now).unwrap();
        assert_eq!(report.deleted, 3);
        assert!(dir.join("e.tmp").exists());
        assert!(dir.join("d.tmp").exists());
        assert!(!dir.join("a.tmp").exists());
    }

    #[test]
    fn test_clean_skips_young_and_filters_extensions() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let dir = v.uploads_root().join("clean");
        fs::create_dir_all(&dir).unwrap();
        let now = SystemTime::now();
        for (name, hours) in [("old.docx", 48), ("young.docx", 1), ("old.pdf", 48)] {
            let path = dir.join(name);
            fs::write(&path, name).unwrap();
            set_age(&path, now, hours);
        }

        let options = CleanupOptions {
            extensions: vec!["docx".into()],
            keep_latest: 0,
            ..CleanupOptions::default()
        };
        let report = handler.clean_directory_at(&dir, &options, now).unwrap();
        assert_eq!(
            report,
            CleanupReport {
                deleted: 1,
                failed: 0,
                skipped: 1
            }
        );
        assert!(!dir.join("old.docx").exists());
        assert!(dir.join("young.docx").exists());
        assert!(dir.join("old.pdf").exists());
    }

    #[test]
    fn test_clean_recursive_and_guard_survives() {
        let (_tmp, v) = site();
        let handler = DirectoryHandler::new(v.clone());
        let dir = handler
            .create_directory(v.uploads_root().join("temp"), DEFAULT_DIR_MODE)
            .unwrap();
        fs::create_dir_all(dir.join("jobs")).unwrap();
        fs::write(dir.join("top.docx"), "x").unwrap();
        fs::write(dir.join("jobs").join("nested.docx"), "x").unwrap();

        let shallow = CleanupOptions {
            older_than_hours: 0,
            keep_latest: 0,
            ..CleanupOptions::default()
        };
        let report = handler.clean_directory(&dir, &shallow).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(dir.join("jobs").join("nested.docx").exists());

        let report = handler.clean_directory(&dir, &CleanupOptions::purge_all()).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(dir.join(GUARD_FILE).exists());
    }
}
