//! Registry of the document modules this build ships.
//!
//! A module is a document type with its own provider and template. The registry is
//! fixed at compile time; which modules are switched on is a separate, persisted list of
//! slugs kept by the [`crate::store::SettingsStore`]. Slugs in that list that no longer
//! match a registered module are ignored.

use crate::error::Result;
use crate::store::SettingsStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

pub const COMPANY_PROFILE: ModuleInfo = ModuleInfo {
    slug: "company-profile",
    name: "Company Profile",
    description: "Generate professional company profile documents",
    version: "1.0.1",
};

/// A registered module together with its activation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStatus {
    #[serde(flatten)]
    pub info: ModuleInfo,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<ModuleInfo>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new(vec![COMPANY_PROFILE])
    }
}

impl ModuleRegistry {
    pub fn new(modules: Vec<ModuleInfo>) -> Self {
        Self { modules }
    }

    pub fn all(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn get(&self, slug: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.slug == slug)
    }

    pub fn exists(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    /// Every registered module, flagged with whether its slug is in the active list.
    pub fn statuses<S: SettingsStore>(&self, store: &S) -> Result<Vec<ModuleStatus>> {
        let active = store.load_active_modules()?;
        Ok(self
            .modules
            .iter()
            .map(|info| ModuleStatus {
                info: *info,
                active: active.iter().any(|slug| slug == info.slug),
            })
            .collect())
    }
}
