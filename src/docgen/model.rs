use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_TEMP_DIR: &str = "docgen-temp";
pub const DEFAULT_TEMPLATE_DIR: &str = "docgen-templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Docx => write!(f, "docx"),
            OutputFormat::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// The persisted settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub temp_dir: PathBuf,
    pub template_dir: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub debug_mode: bool,
}

impl DirectoryConfig {
    /// Activation defaults: both directories directly under the uploads root.
    pub fn defaults_for(uploads_root: &Path) -> Self {
        Self {
            temp_dir: uploads_root.join(DEFAULT_TEMP_DIR),
            template_dir: uploads_root.join(DEFAULT_TEMPLATE_DIR),
            output_format: OutputFormat::default(),
            debug_mode: false,
        }
    }

    pub fn dir(&self, target: Target) -> &Path {
        match target {
            Target::Template => &self.template_dir,
            Target::Temp => &self.temp_dir,
        }
    }
}

/// The two configured directories a migration can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Template,
    Temp,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Template, Target::Temp];

    pub fn label(&self) -> &'static str {
        match self {
            Target::Template => "Template Directory",
            Target::Temp => "Temporary Directory",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Template => write!(f, "template"),
            Target::Temp => write!(f, "temp"),
        }
    }
}

/// The directories a configured path may live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteLayout {
    pub site_root: PathBuf,
    pub content_root: PathBuf,
    pub uploads_root: PathBuf,
}

impl SiteLayout {
    pub fn roots(&self) -> [&Path; 3] {
        [&self.site_root, &self.content_root, &self.uploads_root]
    }
}

/// Dashboard summary. Directories are `None` until settings are first saved.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub version: String,
    pub uploads_root: PathBuf,
    pub temp_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub modules: usize,
    pub active_modules: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryStats {
    pub total_files: usize,
    pub total_size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_writable: bool,
    pub free_space: u64,
    pub by_extension: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Docx,
    Odt,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Docx, TemplateKind::Odt];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(TemplateKind::Docx),
            "odt" => Some(TemplateKind::Odt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TemplateKind::Docx => "docx",
            TemplateKind::Odt => "odt",
        }
    }

    /// Entries that must be present in the zip container.
    pub fn required_entries(&self) -> &'static [&'static str] {
        match self {
            TemplateKind::Docx => &["[Content_Types].xml", "word/document.xml"],
            TemplateKind::Odt => &["META-INF/manifest.xml", "content.xml"],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified_at: Option<DateTime<Utc>>,
    pub extension: TemplateKind,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationChange {
    pub from: PathBuf,
    pub to: PathBuf,
    pub files: usize,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<MigrationChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<MigrationChange>,
}

impl MigrationChanges {
    pub fn get(&self, target: Target) -> Option<&MigrationChange> {
        match target {
            Target::Template => self.template.as_ref(),
            Target::Temp => self.temp.as_ref(),
        }
    }

    pub fn set(&mut self, target: Target, change: MigrationChange) {
        match target {
            Target::Template => self.template = Some(change),
            Target::Temp => self.temp = Some(change),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Target, &MigrationChange)> {
        Target::ALL
            .into_iter()
            .filter_map(move |t| self.get(t).map(|c| (t, c)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub has_changes: bool,
    pub changes: MigrationChanges,
    pub upload_base: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub success: bool,
    pub migrated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl Default for MigrationResult {
    fn default() -> Self {
        Self {
            success: true,
            migrated: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

impl MigrationResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![error.into()],
            ..Self::default()
        }
    }
}

/// Per-target outcome of a `migrate_files` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<MigrationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<MigrationResult>,
}

impl MigrationReport {
    pub fn set(&mut self, target: Target, result: MigrationResult) {
        match target {
            Target::Template => self.template = Some(result),
            Target::Temp => self.temp = Some(result),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Target, &MigrationResult)> {
        [
            (Target::Template, self.template.as_ref()),
            (Target::Temp, self.temp.as_ref()),
        ]
        .into_iter()
        .filter_map(|(t, r)| r.map(|r| (t, r)))
    }

    /// True when every target that ran succeeded (vacuously true when none ran).
    pub fn all_succeeded(&self) -> bool {
        self.iter().all(|(_, r)| r.success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    pub older_than_hours: u64,
    /// Lowercase extensions without the dot. Empty means every file.
    pub extensions: Vec<String>,
    pub keep_latest: usize,
    pub recursive: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            older_than_hours: 24,
            extensions: Vec::new(),
            keep_latest: 5,
            recursive: false,
        }
    }
}

impl CleanupOptions {
    /// Removes everything, used when the tool is deactivated.
    pub fn purge_all() -> Self {
        Self {
            older_than_hours: 0,
            extensions: Vec::new(),
            keep_latest: 0,
            recursive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
}
