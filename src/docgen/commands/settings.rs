use crate::commands::migrate::{migrate_and_commit, proposed_config};
use crate::commands::{current_config, CmdMessage, CmdResult};
use crate::error::Result;
use crate::migration::MigrationEngine;
use crate::model::{OutputFormat, Target};
use crate::store::SettingsStore;

/// Admin form input. Directory fields are folder names relative to the uploads root.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub temp_dir: String,
    pub template_dir: String,
    pub output_format: OutputFormat,
    pub debug_mode: bool,
}

pub fn show<S: SettingsStore>(store: &S, engine: &MigrationEngine) -> Result<CmdResult> {
    let config = current_config(store, engine.uploads_root())?;
    let mut result = CmdResult::default();
    if store.load()?.is_none() {
        result.add_message(CmdMessage::info(
            "Settings were never saved; showing defaults.",
        ));
    }
    Ok(result.with_config(config))
}

/// Validates and saves the form.
///
/// When a directory changes, nothing is written until `confirmed` is set: the plan is
/// returned so the caller can show it. With confirmation the changed directories are
/// migrated and the settings committed only if every migration succeeded.
pub fn save<S: SettingsStore>(
    store: &mut S,
    engine: &MigrationEngine,
    form: &SettingsForm,
    confirmed: bool,
) -> Result<CmdResult> {
    let old = current_config(store, engine.uploads_root())?;
    let mut new = proposed_config(&old, engine, &form.temp_dir, &form.template_dir)?;
    new.output_format = form.output_format;
    new.debug_mode = form.debug_mode;

    let validator = engine.validator();
    for target in Target::ALL {
        validator.validate(new.dir(target))?;
    }

    let plan = engine.check_migration_needed(&old, &new);
    if !plan.has_changes {
        store.save(&new)?;
        let mut result = CmdResult::default().with_config(new);
        result.committed = true;
        result.add_message(CmdMessage::success("Settings saved."));
        return Ok(result);
    }

    if !confirmed {
        let mut result = CmdResult::default().with_config(old);
        result.add_message(CmdMessage::warning(
            "Directory changes detected. Migration may be needed:",
        ));
        for (target, change) in plan.changes.iter() {
            result.add_message(CmdMessage::info(format!(
                "  {}: {} -> {} ({} files{})",
                target.label(),
                change.from.display(),
                change.to.display(),
                change.files,
                if change.valid { "" } else { ", invalid destination" }
            )));
        }
        result.add_message(CmdMessage::info(
            "Re-run with confirmation to migrate these files and save.",
        ));
        return Ok(result.with_plan(plan));
    }

    migrate_and_commit(store, engine, &old, new)
}
