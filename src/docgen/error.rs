use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocgenError {
    #[error("Directory path cannot be empty")]
    EmptyPath,

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Not writable: {0}")]
    NotWritable(String),

    #[error("Invalid directory: {0}")]
    InvalidDirectory(PathBuf),

    #[error("Invalid directory name: {0:?}")]
    InvalidDirectoryName(String),

    #[error("Failed to create directory {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Temp and template directories must differ: {0}")]
    DuplicateDirectory(PathBuf),

    #[error("Invalid destination path: {0}")]
    InvalidDestination(String),

    #[error("Failed to copy: {0}")]
    CopyFailed(PathBuf),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid file type. Only DOCX and ODT files are allowed.")]
    InvalidType,

    #[error("The uploaded file is not a valid template: {0}")]
    InvalidTemplate(PathBuf),

    #[error("Failed to save uploaded file: {0}")]
    MoveFailed(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Security check failed")]
    InvalidToken,

    #[error("Template file not found at: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocgenError {
    /// Stable snake_case code, used in JSON responses.
    pub fn code(&self) -> &'static str {
        match self {
            DocgenError::EmptyPath => "empty_path",
            DocgenError::InvalidPath { .. } => "invalid_path",
            DocgenError::NotWritable(_) => "not_writable",
            DocgenError::InvalidDirectory(_) => "invalid_directory",
            DocgenError::InvalidDirectoryName(_) => "invalid_directory_name",
            DocgenError::CreateFailed { .. } => "create_failed",
            DocgenError::DuplicateDirectory(_) => "duplicate_directory",
            DocgenError::InvalidDestination(_) => "invalid_destination",
            DocgenError::CopyFailed(_) => "copy_failed",
            DocgenError::Migration(_) => "unexpected_exception",
            DocgenError::InvalidType => "invalid_type",
            DocgenError::InvalidTemplate(_) => "invalid_template",
            DocgenError::MoveFailed(_) => "move_failed",
            DocgenError::PermissionDenied => "permission_denied",
            DocgenError::InvalidToken => "invalid_token",
            DocgenError::TemplateNotFound(_) => "template_not_found",
            DocgenError::ModuleNotFound(_) => "module_not_found",
            DocgenError::NotConfigured(_) => "not_configured",
            DocgenError::Io(_) => "io_error",
            DocgenError::Serialization(_) => "serialization_error",
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DocgenError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocgenError>;
