use crate::commands::{current_config, CmdMessage, CmdResult};
use crate::error::{DocgenError, Result};
use crate::handler::{DirectoryHandler, DEFAULT_DIR_MODE};
use crate::store::SettingsStore;
use crate::template::template_kind;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies `source` into the configured template directory.
///
/// The file lands under a sanitized name, suffixed `-1`, `-2`, ... when taken. A file that
/// fails the structural check is removed again and reported as `invalid_template`.
pub fn run<S: SettingsStore>(
    store: &S,
    handler: &DirectoryHandler,
    source: &Path,
) -> Result<CmdResult> {
    let config = current_config(store, handler.validator().uploads_root())?;
    let template_dir = handler.create_directory(&config.template_dir, DEFAULT_DIR_MODE)?;

    let kind = template_kind(source).ok_or(DocgenError::InvalidType)?;
    let name = sanitize_file_name(source).ok_or(DocgenError::InvalidType)?;
    let target = unique_target(&template_dir, &name);

    fs::copy(source, &target).map_err(|e| {
        tracing::error!(from = %source.display(), to = %target.display(), error = %e, "template upload failed");
        DocgenError::MoveFailed(e.to_string())
    })?;

    if !handler.validate_template_file(&target) {
        if let Err(e) = fs::remove_file(&target) {
            tracing::warn!(path = %target.display(), error = %e, "failed to remove rejected upload");
        }
        return Err(DocgenError::InvalidTemplate(source.to_path_buf()));
    }

    tracing::info!(path = %target.display(), kind = kind.extension(), "template uploaded");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template uploaded: {}",
        target.display()
    )));
    let templates = handler.scan_template_files(&template_dir)?;
    Ok(result.with_templates(templates).with_path(target))
}

fn sanitize_file_name(source: &Path) -> Option<String> {
    let raw = source.file_name()?.to_string_lossy();
    let name: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let name = name.trim_start_matches(['.', '-']).to_string();
    let (stem, _) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(name)
}

fn unique_target(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
    (1..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
