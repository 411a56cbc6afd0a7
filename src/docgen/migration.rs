//! Copy-based migration of the configured directories.
//!
//! A migration request goes through three phases:
//!
//! 1. [`MigrationEngine::check_migration_needed`] compares the old and new configuration
//!    and produces a [`MigrationPlan`] describing what would move.
//! 2. The caller presents the plan and obtains explicit confirmation.
//! 3. [`MigrationEngine::migrate_directory`] runs once per changed target.
//!
//! Files are copied, never moved: sources stay in place so a failed or interrupted run
//! can be retried. Per-file copy failures are collected and the walk continues;
//! anything else aborts the target. There is no rollback.

use crate::error::{DocgenError, Result};
use crate::handler::{DirectoryHandler, DEFAULT_DIR_MODE};
use crate::model::{
    DirectoryConfig, MigrationChange, MigrationChanges, MigrationPlan, MigrationResult, Target,
};
use crate::paths::{is_system_file, is_within, normalize};
use crate::validator::DirectoryValidator;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct MigrationEngine {
    handler: DirectoryHandler,
}

impl MigrationEngine {
    pub fn new(handler: DirectoryHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &DirectoryHandler {
        &self.handler
    }

    pub fn validator(&self) -> &DirectoryValidator {
        self.handler.validator()
    }

    pub fn uploads_root(&self) -> &Path {
        self.handler.validator().uploads_root()
    }

    pub fn check_migration_needed(
        &self,
        old: &DirectoryConfig,
        new: &DirectoryConfig,
    ) -> MigrationPlan {
        let mut changes = MigrationChanges::default();

        for target in Target::ALL {
            let from = normalize(old.dir(target));
            let to = normalize(new.dir(target));
            if from == to {
                continue;
            }
            let files = count_files(&from);
            let valid = self.handler.validator().is_in_uploads(&to);
            tracing::debug!(%target, from = %from.display(), to = %to.display(), files, valid, "directory change detected");
            changes.set(
                target,
                MigrationChange {
                    from,
                    to,
                    files,
                    valid,
                },
            );
        }

        MigrationPlan {
            has_changes: changes.template.is_some() || changes.temp.is_some(),
            changes,
            upload_base: self.uploads_root().to_path_buf(),
        }
    }

    pub fn migrate_directory(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> MigrationResult {
        let from = normalize(from);
        let to = normalize(to);

        if !self.handler.validator().is_in_uploads(&to) {
            return MigrationResult::failed(
                DocgenError::InvalidDestination("Not in uploads directory".into()).to_string(),
            );
        }
        // Neither side may contain the other.
        if from != to && (is_within(&to, &from) || is_within(&from, &to)) {
            return MigrationResult::failed(
                DocgenError::InvalidDestination("Overlaps the source directory".into())
                    .to_string(),
            );
        }

        if let Err(e) = self.handler.ensure_secure_directory(&to, DEFAULT_DIR_MODE) {
            tracing::error!(to = %to.display(), error = %e, "failed to create migration destination");
            return MigrationResult::failed(e.to_string());
        }

        let mut result = MigrationResult::default();
        if from.is_dir() && from != to {
            if let Err(e) = copy_tree(&from, &to, &mut result) {
                tracing::error!(from = %from.display(), to = %to.display(), error = %e, "migration aborted");
                result.success = false;
                result.errors.push(e.to_string());
                return result;
            }
        }

        if !result.errors.is_empty() {
            result.success = false;
            tracing::warn!(errors = ?result.errors, "migration finished with copy errors");
        }
        tracing::info!(
            from = %from.display(),
            to = %to.display(),
            migrated = result.migrated,
            skipped = result.skipped,
            "migration finished"
        );
        result
    }
}

/// Walks `from` parents-first and mirrors it under `to`.
///
/// Returns `Err` only for failures that abort the target; copy failures are recorded on
/// `result` and the walk continues.
fn copy_tree(from: &Path, to: &Path, result: &mut MigrationResult) -> Result<()> {
    let walker = WalkDir::new(from).min_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| DocgenError::Migration(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| DocgenError::Migration(e.to_string()))?
            .to_path_buf();
        let target = to.join(&relative);

        if entry.file_type().is_dir() {
            if !target.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| DocgenError::Migration(format!("{}: {}", target.display(), e)))?;
            }
            continue;
        }

        if is_system_file(entry.path()) {
            result.skipped += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DocgenError::Migration(format!("{}: {}", parent.display(), e)))?;
        }

        match copy_file(entry.path(), &target) {
            Ok(()) => result.migrated += 1,
            Err(e) => {
                tracing::warn!(file = %relative.display(), error = %e, "copy failed");
                result
                    .errors
                    .push(DocgenError::CopyFailed(relative).to_string());
            }
        }
    }
    Ok(())
}

fn copy_file(source: &Path, target: &Path) -> std::io::Result<()> {
    fs::copy(source, target)?;
    if let Ok(meta) = fs::metadata(source) {
        if let Err(e) = fs::set_permissions(target, meta.permissions()) {
            tracing::warn!(path = %target.display(), error = %e, "failed to replicate permissions");
        }
    }
    Ok(())
}

/// Regular files under `dir`, recursively, ignoring system files. Missing dirs count 0.
pub fn count_files(dir: &Path) -> usize {
    if !dir.is_dir() {
        return 0;
    }
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "error while counting files");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && !is_system_file(e.path()))
        .count()
}
