//! Activation and deactivation hooks.

use crate::commands::{current_config, CmdMessage, CmdResult};
use crate::error::Result;
use crate::handler::{DirectoryHandler, DEFAULT_DIR_MODE};
use crate::model::{CleanupOptions, Target};
use crate::store::SettingsStore;

/// Creates the configured (or default) directories with their guard files and writes the
/// settings record. Running it again is harmless.
pub fn activate<S: SettingsStore>(store: &mut S, handler: &DirectoryHandler) -> Result<CmdResult> {
    let existing = store.load()?;
    let config = current_config(store, handler.validator().uploads_root())?;

    let mut result = CmdResult::default();
    for target in Target::ALL {
        let path = handler.create_directory(config.dir(target), DEFAULT_DIR_MODE)?;
        result.add_message(CmdMessage::success(format!(
            "{}: {}",
            target.label(),
            path.display()
        )));
    }

    if existing.is_none() {
        store.save(&config)?;
        result.committed = true;
        result.add_message(CmdMessage::success("Default settings saved."));
    }
    tracing::info!(
        temp_dir = %config.temp_dir.display(),
        template_dir = %config.template_dir.display(),
        "activated"
    );
    Ok(result.with_config(config))
}

/// Empties the temp directory. Templates and settings are left alone.
pub fn deactivate<S: SettingsStore>(store: &S, handler: &DirectoryHandler) -> Result<CmdResult> {
    let config = current_config(store, handler.validator().uploads_root())?;
    let mut result = CmdResult::default();

    if !config.temp_dir.is_dir() {
        result.add_message(CmdMessage::info("Temporary directory does not exist."));
        return Ok(result.with_path(config.temp_dir));
    }

    let report = handler.clean_directory(&config.temp_dir, &CleanupOptions::purge_all())?;
    result.add_message(CmdMessage::success(format!(
        "Removed {} temporary file(s).",
        report.deleted
    )));
    if report.failed > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} file(s) could not be removed.",
            report.failed
        )));
    }
    tracing::info!(deleted = report.deleted, failed = report.failed, "deactivated");
    Ok(result.with_cleanup(report).with_path(config.temp_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectoryConfig;
    use crate::paths::GUARD_FILE;
    use crate::store::memory::InMemorySettingsStore;
    use crate::validator::tests::site;
    use std::fs;

    fn handler() -> (tempfile::TempDir, DirectoryHandler) {
        let (tmp, v) = site();
        (tmp, DirectoryHandler::new(v))
    }

    #[test]
    fn test_activate_creates_defaults() {
        let (_tmp, handler) = handler();
        let mut store = InMemorySettingsStore::new();
        let res = activate(&mut store, &handler).unwrap();
        assert!(res.committed);

        let up = handler.validator().uploads_root();
        assert!(up.join("docgen-temp").join(GUARD_FILE).is_file());
        assert!(up.join("docgen-templates").join(GUARD_FILE).is_file());
        assert_eq!(store.load().unwrap().unwrap(), DirectoryConfig::defaults_for(up));
    }

    #[test]
    fn test_activate_keeps_existing_settings() {
        let (_tmp, handler) = handler();
        let up = handler.validator().uploads_root().to_path_buf();
        let mut config = DirectoryConfig::defaults_for(&up);
        config.template_dir = up.join("custom");
        let mut store = InMemorySettingsStore::with_config(config);

        let res = activate(&mut store, &handler).unwrap();
        assert!(!res.committed);
        assert_eq!(store.saves, 0);
        assert!(up.join("custom").join(GUARD_FILE).is_file());
    }

    #[test]
    fn test_deactivate_purges_temp_only() {
        let (_tmp, handler) = handler();
        let mut store = InMemorySettingsStore::new();
        activate(&mut store, &handler).unwrap();
        let up = handler.validator().uploads_root().to_path_buf();
        fs::write(up.join("docgen-temp").join("out.pdf"), "x").unwrap();
        fs::write(up.join("docgen-templates").join("t.docx"), "x").unwrap();

        let res = deactivate(&store, &handler).unwrap();
        assert_eq!(res.cleanup.unwrap().deleted, 1);
        assert!(!up.join("docgen-temp").join("out.pdf").exists());
        assert!(up.join("docgen-temp").join(GUARD_FILE).exists());
        assert!(up.join("docgen-templates").join("t.docx").exists());
    }
}
