//! The two migration endpoints: `check_migration` and `migrate_files`.
//!
//! Both take folder names (as typed by the admin) and resolve them under the uploads
//! root before comparing against the saved settings.

use crate::commands::{current_config, resolve_in_uploads, CmdMessage, CmdResult};
use crate::error::{DocgenError, Result};
use crate::migration::MigrationEngine;
use crate::model::{DirectoryConfig, MigrationReport};
use crate::store::SettingsStore;

/// The settings that would result from the submitted folder names.
pub fn proposed_config(
    current: &DirectoryConfig,
    engine: &MigrationEngine,
    temp_name: &str,
    template_name: &str,
) -> Result<DirectoryConfig> {
    let uploads = engine.uploads_root();
    let temp_dir = resolve_in_uploads(uploads, temp_name)?;
    let template_dir = resolve_in_uploads(uploads, template_name)?;
    if temp_dir == template_dir {
        return Err(DocgenError::DuplicateDirectory(template_dir));
    }
    Ok(DirectoryConfig {
        temp_dir,
        template_dir,
        ..current.clone()
    })
}

pub fn check<S: SettingsStore>(
    store: &S,
    engine: &MigrationEngine,
    temp_name: &str,
    template_name: &str,
) -> Result<CmdResult> {
    let old = current_config(store, engine.uploads_root())?;
    let new = proposed_config(&old, engine, temp_name, template_name)?;
    let plan = engine.check_migration_needed(&old, &new);

    let mut result = CmdResult::default();
    if plan.has_changes {
        result.add_message(CmdMessage::warning(
            "Directory changes detected. Migration may be needed.",
        ));
    } else {
        result.add_message(CmdMessage::info("No directory changes."));
    }
    Ok(result.with_plan(plan))
}

/// Migrates every changed target and commits the new settings only if all succeeded.
pub fn run<S: SettingsStore>(
    store: &mut S,
    engine: &MigrationEngine,
    temp_name: &str,
    template_name: &str,
) -> Result<CmdResult> {
    let old = current_config(store, engine.uploads_root())?;
    let new = proposed_config(&old, engine, temp_name, template_name)?;
    migrate_and_commit(store, engine, &old, new)
}

pub(crate) fn migrate_and_commit<S: SettingsStore>(
    store: &mut S,
    engine: &MigrationEngine,
    old: &DirectoryConfig,
    new: DirectoryConfig,
) -> Result<CmdResult> {
    let plan = engine.check_migration_needed(old, &new);
    let mut report = MigrationReport::default();

    for (target, change) in plan.changes.iter() {
        let outcome = engine.migrate_directory(&change.from, &change.to);
        if !outcome.success {
            tracing::error!(%target, errors = ?outcome.errors, "directory migration failed");
        }
        report.set(target, outcome);
    }

    let mut result = CmdResult::default();
    for (target, outcome) in report.iter() {
        let summary = format!(
            "{}: migrated {}, skipped {}",
            target.label(),
            outcome.migrated,
            outcome.skipped
        );
        if outcome.success {
            result.add_message(CmdMessage::success(summary));
        } else {
            result.add_message(CmdMessage::error(summary));
            for error in &outcome.errors {
                result.add_message(CmdMessage::error(format!("  {}", error)));
            }
        }
    }

    if report.all_succeeded() {
        store.save(&new)?;
        result.committed = true;
        result.add_message(CmdMessage::success("Settings saved."));
        tracing::info!(
            temp_dir = %new.temp_dir.display(),
            template_dir = %new.template_dir.display(),
            "settings committed"
        );
        result = result.with_config(new);
    } else {
        result.add_message(CmdMessage::error(
            "Migration failed; previous settings remain active.",
        ));
        result = result.with_config(old.clone());
    }

    Ok(result.with_plan(plan).with_migration(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::DirectoryHandler;
    use crate::paths::GUARD_FILE;
    use crate::store::memory::InMemorySettingsStore;
    use crate::validator::tests::site;
    use std::fs;

    fn setup() -> (tempfile::TempDir, MigrationEngine, InMemorySettingsStore) {
        let (tmp, v) = site();
        let engine = MigrationEngine::new(DirectoryHandler::new(v));
        let up = engine.uploads_root().to_path_buf();
        let mut config = DirectoryConfig::defaults_for(&up);
        config.template_dir = up.join("tpl-a");
        let store = InMemorySettingsStore::with_config(config);
        (tmp, engine, store)
    }

    fn seed(dir: &std::path::Path) {
        fs::create_dir_all(dir).unwrap();
        for name in ["one.docx", "two.docx", "three.odt"] {
            fs::write(dir.join(name), name).unwrap();
        }
        fs::write(dir.join(GUARD_FILE), "").unwrap();
    }

    #[test]
    fn test_check_reports_template_change() {
        let (_tmp, engine, store) = setup();
        let up = engine.uploads_root().to_path_buf();
        seed(&up.join("tpl-a"));

        let res = check(&store, &engine, "docgen-temp", "tpl-b").unwrap();
        let plan = res.plan.unwrap();
        assert!(plan.has_changes);
        assert_eq!(plan.changes.template.as_ref().unwrap().files, 3);
        assert!(plan.changes.temp.is_none());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_names_are_resolved_under_uploads() {
        let (_tmp, engine, store) = setup();
        let res = check(&store, &engine, "../../etc", "tpl-a").unwrap();
        let change = res.plan.unwrap().changes.temp.unwrap();
        assert_eq!(change.to, engine.uploads_root().join("etc"));
        assert!(change.valid);
    }

    #[test]
    fn test_run_migrates_and_commits() {
        let (_tmp, engine, mut store) = setup();
        let up = engine.uploads_root().to_path_buf();
        seed(&up.join("tpl-a"));

        let res = run(&mut store, &engine, "docgen-temp", "tpl-b").unwrap();
        assert!(res.committed);
        let report = res.migration.unwrap();
        let template = report.template.unwrap();
        assert_eq!((template.migrated, template.skipped), (3, 1));
        assert!(report.temp.is_none());
        assert_eq!(store.load().unwrap().unwrap().template_dir, up.join("tpl-b"));
        assert!(up.join("tpl-b").join("one.docx").exists());
        assert!(up.join("tpl-a").join("one.docx").exists());
    }

    #[test]
    fn test_failed_target_blocks_commit() {
        let (_tmp, engine, mut store) = setup();
        let up = engine.uploads_root().to_path_buf();
        seed(&up.join("tpl-a"));
        // make the copy of one.docx fail
        fs::create_dir_all(up.join("tpl-b").join("one.docx")).unwrap();

        let res = run(&mut store, &engine, "docgen-temp", "tpl-b").unwrap();
        assert!(!res.committed);
        assert_eq!(store.saves, 0);
        assert_eq!(res.config.unwrap().template_dir, up.join("tpl-a"));
    }

    #[test]
    fn test_uncreatable_destination_blocks_commit() {
        let (_tmp, engine, mut store) = setup();
        let up = engine.uploads_root().to_path_buf();
        seed(&up.join("tpl-a"));
        fs::write(up.join("blocker"), "x").unwrap();

        let old = store.load().unwrap().unwrap();
        let new = DirectoryConfig {
            template_dir: up.join("blocker").join("tpl"),
            ..old.clone()
        };
        let res = migrate_and_commit(&mut store, &engine, &old, new).unwrap();
        assert!(!res.committed);
        assert_eq!(store.saves, 0);
        let outcome = res.migration.unwrap().template.unwrap();
        assert!(outcome.errors[0].starts_with("Failed to create directory"));
    }

    #[test]
    fn test_invalid_name_is_rejected_before_any_work() {
        let (_tmp, engine, mut store) = setup();
        let err = run(&mut store, &engine, "..", "tpl-b").unwrap_err();
        assert_eq!(err.code(), "invalid_directory_name");
        assert!(!engine.uploads_root().join("tpl-b").exists());
    }
}
