use super::SettingsStore;
use crate::error::Result;
use crate::model::DirectoryConfig;

/// In-memory option storage for tests. Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    config: Option<DirectoryConfig>,
    active_modules: Vec<String>,
    /// Number of successful saves, lets tests assert that nothing was committed.
    pub saves: usize,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DirectoryConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<Option<DirectoryConfig>> {
        Ok(self.config.clone())
    }

    fn save(&mut self, config: &DirectoryConfig) -> Result<()> {
        self.config = Some(config.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_active_modules(&self) -> Result<Vec<String>> {
        Ok(self.active_modules.clone())
    }

    fn save_active_modules(&mut self, slugs: &[String]) -> Result<()> {
        self.active_modules = slugs.to_vec();
        self.saves += 1;
        Ok(())
    }
}
