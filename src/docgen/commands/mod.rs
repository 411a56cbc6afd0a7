use crate::error::{DocgenError, Result};
use crate::model::{
    CleanupReport, DirectoryConfig, DirectoryStats, MigrationPlan, MigrationReport, SystemInfo,
    TemplateFile,
};
use crate::modules::ModuleStatus;
use crate::provider::GenerationRequest;
use crate::store::SettingsStore;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod cleanup;
pub mod directory;
pub mod generate;
pub mod lifecycle;
pub mod migrate;
pub mod modules;
pub mod settings;
pub mod status;
pub mod upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured outcome of a command. Only the fields relevant to the command are set.
#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<DirectoryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DirectoryStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<MigrationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SystemInfo>,
    /// Whether the command changed the persisted settings.
    pub committed: bool,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_stats(mut self, stats: DirectoryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_templates(mut self, templates: Vec<TemplateFile>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_plan(mut self, plan: MigrationPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_migration(mut self, report: MigrationReport) -> Self {
        self.migration = Some(report);
        self
    }

    pub fn with_cleanup(mut self, report: CleanupReport) -> Self {
        self.cleanup = Some(report);
        self
    }

    pub fn with_generation(mut self, request: GenerationRequest) -> Self {
        self.generation = Some(request);
        self
    }

    pub fn with_modules(mut self, modules: Vec<ModuleStatus>) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_status(mut self, info: SystemInfo) -> Self {
        self.status = Some(info);
        self
    }
}

/// Current settings, or the activation defaults when none were saved yet.
pub fn current_config<S: SettingsStore>(store: &S, uploads_root: &Path) -> Result<DirectoryConfig> {
    Ok(store
        .load()?
        .unwrap_or_else(|| DirectoryConfig::defaults_for(uploads_root)))
}

/// Reduces admin input to a single safe folder name.
///
/// Only the last path segment is kept, spaces become dashes and anything outside
/// `[A-Za-z0-9._-]` is dropped.
pub fn validate_directory_name(input: &str) -> Result<String> {
    let last = input
        .trim()
        .replace('\\', "/")
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string();

    let name: String = last
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let name = name.trim_matches(|c| c == '.' || c == '-').to_string();

    if name.is_empty() || name.contains("..") {
        return Err(DocgenError::InvalidDirectoryName(input.to_string()));
    }
    Ok(name)
}

/// `<uploads>/<sanitized name>`.
pub fn resolve_in_uploads(uploads_root: &Path, name: &str) -> Result<PathBuf> {
    Ok(uploads_root.join(validate_directory_name(name)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_names() {
        assert_eq!(validate_directory_name("docgen-temp").unwrap(), "docgen-temp");
        assert_eq!(validate_directory_name("/etc/passwd/").unwrap(), "passwd");
        assert_eq!(validate_directory_name("my templates").unwrap(), "my-templates");
        assert_eq!(validate_directory_name("a\\b\\tpl").unwrap(), "tpl");
        assert_eq!(validate_directory_name("tpl<script>").unwrap(), "tplscript");
    }

    #[test]
    fn test_rejected_directory_names() {
        for bad in ["", "   ", "..", "/", "a/..", "x..y", "***"] {
            let err = validate_directory_name(bad).unwrap_err();
            assert_eq!(err.code(), "invalid_directory_name", "{:?}", bad);
        }
    }
}
