use super::{SettingsStore, ACTIVE_MODULES_KEY, SETTINGS_KEY};
use crate::error::{DocgenError, Result};
use crate::model::DirectoryConfig;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const OPTIONS_FILENAME: &str = "options.json";

pub struct FileSettingsStore {
    root: PathBuf,
}

impl FileSettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn options_path(&self) -> PathBuf {
        self.root.join(OPTIONS_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(DocgenError::Io)?;
        }
        Ok(())
    }

    fn load_options(&self) -> Result<Map<String, Value>> {
        let path = self.options_path();
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path).map_err(DocgenError::Io)?;
        let options: Map<String, Value> =
            serde_json::from_str(&content).map_err(DocgenError::Serialization)?;
        Ok(options)
    }

    fn save_options(&self, options: &Map<String, Value>) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(options).map_err(DocgenError::Serialization)?;

        // Sibling temp file, then rename over the original.
        let path = self.options_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(DocgenError::Io)?;
        fs::rename(&tmp, &path).map_err(DocgenError::Io)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<DirectoryConfig>> {
        let options = self.load_options()?;
        match options.get(SETTINGS_KEY) {
            Some(value) => Ok(Some(
                serde_json::from_value(value.clone()).map_err(DocgenError::Serialization)?,
            )),
            None => Ok(None),
        }
    }

    fn save(&mut self, config: &DirectoryConfig) -> Result<()> {
        let mut options = self.load_options()?;
        options.insert(
            SETTINGS_KEY.to_string(),
            serde_json::to_value(config).map_err(DocgenError::Serialization)?,
        );
        self.save_options(&options)?;
        tracing::debug!(path = %self.options_path().display(), "settings saved");
        Ok(())
    }

    fn load_active_modules(&self) -> Result<Vec<String>> {
        let options = self.load_options()?;
        match options.get(ACTIVE_MODULES_KEY) {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(DocgenError::Serialization)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save_active_modules(&mut self, slugs: &[String]) -> Result<()> {
        let mut options = self.load_options()?;
        options.insert(
            ACTIVE_MODULES_KEY.to_string(),
            serde_json::to_value(slugs).map_err(DocgenError::Serialization)?,
        );
        self.save_options(&options)?;
        tracing::debug!(modules = ?slugs, "active modules saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join(".docgen"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSettingsStore::new(dir.path().join(".docgen"));
        let mut config = DirectoryConfig::defaults_for(Path::new("/srv/up"));
        config.output_format = OutputFormat::Pdf;

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
        assert!(!store.options_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_other_options_are_preserved() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".docgen");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(OPTIONS_FILENAME), r#"{"blogname": "Acme"}"#).unwrap();

        let mut store = FileSettingsStore::new(&root);
        store
            .save(&DirectoryConfig::defaults_for(Path::new("/srv/up")))
            .unwrap();

        let raw: Value =
            serde_json::from_str(&fs::read_to_string(root.join(OPTIONS_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(raw["blogname"], "Acme");
        assert!(raw[SETTINGS_KEY].is_object());
    }

    #[test]
    fn test_active_modules_share_the_options_file() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSettingsStore::new(dir.path());
        assert!(store.load_active_modules().unwrap().is_empty());

        let config = DirectoryConfig::defaults_for(Path::new("/srv/up"));
        store.save(&config).unwrap();
        store
            .save_active_modules(&["company-profile".to_string()])
            .unwrap();

        assert_eq!(store.load().unwrap(), Some(config));
        assert_eq!(store.load_active_modules().unwrap(), vec!["company-profile"]);
    }

    #[test]
    fn test_corrupt_options_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(OPTIONS_FILENAME), "{not json").unwrap();
        let store = FileSettingsStore::new(dir.path());
        assert_eq!(store.load().unwrap_err().code(), "serialization_error");
    }
}
