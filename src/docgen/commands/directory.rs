//! Directory probes used by the settings page: "test this folder" buttons, template
//! listings and the statistics panel.

use crate::commands::{current_config, resolve_in_uploads, CmdMessage, CmdResult};
use crate::error::Result;
use crate::handler::{DirectoryHandler, DEFAULT_DIR_MODE};
use crate::model::Target;
use crate::store::SettingsStore;

/// Validates `<uploads>/<name>`, creates it when missing and reports its statistics.
pub fn test_directory(handler: &DirectoryHandler, name: &str) -> Result<CmdResult> {
    let path = resolve_in_uploads(handler.validator().uploads_root(), name)?;
    let path = handler.create_directory(&path, DEFAULT_DIR_MODE)?;
    let stats = handler.get_directory_stats(&path)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Directory is valid and writable: {}",
        path.display()
    )));
    if !stats.is_writable {
        result.add_message(CmdMessage::warning("Directory exists but is not writable."));
    }
    Ok(result.with_stats(stats).with_path(path))
}

/// Like [`test_directory`] but also lists the templates found directly inside.
pub fn test_template_directory(handler: &DirectoryHandler, name: &str) -> Result<CmdResult> {
    let path = resolve_in_uploads(handler.validator().uploads_root(), name)?;
    let path = handler.create_directory(&path, DEFAULT_DIR_MODE)?;
    let templates = handler.scan_template_files(&path)?;
    let stats = handler.get_directory_stats(&path)?;

    let valid = templates.iter().filter(|t| t.is_valid).count();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template directory is valid. Found {} template(s), {} valid.",
        templates.len(),
        valid
    )));
    if valid < templates.len() {
        result.add_message(CmdMessage::warning(format!(
            "{} template(s) failed structural validation.",
            templates.len() - valid
        )));
    }
    Ok(result
        .with_templates(templates)
        .with_stats(stats)
        .with_path(path))
}

/// Templates in the configured template directory.
pub fn templates<S: SettingsStore>(store: &S, handler: &DirectoryHandler) -> Result<CmdResult> {
    let config = current_config(store, handler.validator().uploads_root())?;
    let path = config.template_dir.clone();
    let mut result = CmdResult::default();

    if !path.is_dir() {
        result.add_message(CmdMessage::info(format!(
            "Template directory does not exist yet: {}",
            path.display()
        )));
        return Ok(result.with_path(path));
    }

    let templates = handler.scan_template_files(&path)?;
    if templates.is_empty() {
        result.add_message(CmdMessage::info("No templates found."));
    }
    Ok(result.with_templates(templates).with_path(path))
}

/// Statistics for one of the configured directories.
pub fn stats<S: SettingsStore>(
    store: &S,
    handler: &DirectoryHandler,
    target: Target,
) -> Result<CmdResult> {
    let config = current_config(store, handler.validator().uploads_root())?;
    let path = config.dir(target).to_path_buf();
    let stats = handler.get_directory_stats(&path)?;
    Ok(CmdResult::default().with_stats(stats).with_path(path))
}
