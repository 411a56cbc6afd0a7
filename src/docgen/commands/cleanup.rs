use crate::commands::{current_config, CmdMessage, CmdResult};
use crate::error::Result;
use crate::handler::DirectoryHandler;
use crate::model::{CleanupOptions, CleanupReport};
use crate::store::SettingsStore;
use std::path::Path;

/// Cleans `dir`, or the configured temp directory when `dir` is `None`.
///
/// Explicit directories still have to pass validation. A configured temp directory that
/// was never created is not an error: there is nothing to clean.
pub fn run<S: SettingsStore>(
    store: &S,
    handler: &DirectoryHandler,
    dir: Option<&Path>,
    options: &CleanupOptions,
) -> Result<CmdResult> {
    let path = match dir {
        Some(dir) => handler.validator().validate(dir)?,
        None => current_config(store, handler.validator().uploads_root())?.temp_dir,
    };

    let mut result = CmdResult::default();
    if dir.is_none() && !path.is_dir() {
        result.add_message(CmdMessage::info(format!(
            "Nothing to clean, {} does not exist.",
            path.display()
        )));
        return Ok(result
            .with_cleanup(CleanupReport::default())
            .with_path(path));
    }

    let report = handler.clean_directory(&path, options)?;
    let summary = format!(
        "Cleaned {}: {} deleted, {} kept, {} failed.",
        path.display(),
        report.deleted,
        report.skipped,
        report.failed
    );
    if report.failed > 0 {
        result.add_message(CmdMessage::warning(summary));
    } else {
        result.add_message(CmdMessage::success(summary));
    }
    Ok(result.with_cleanup(report).with_path(path))
}
