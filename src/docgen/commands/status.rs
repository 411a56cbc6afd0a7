use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::SystemInfo;
use crate::modules::ModuleRegistry;
use crate::store::SettingsStore;
use std::path::Path;

/// Tool version and the saved directories. Unsaved settings are reported as absent,
/// not as their defaults.
pub fn run<S: SettingsStore>(
    store: &S,
    registry: &ModuleRegistry,
    uploads_root: &Path,
) -> Result<CmdResult> {
    let settings = store.load()?;
    let modules = registry.statuses(store)?;
    let info = SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uploads_root: uploads_root.to_path_buf(),
        temp_dir: settings.as_ref().map(|c| c.temp_dir.clone()),
        template_dir: settings.as_ref().map(|c| c.template_dir.clone()),
        modules: modules.len(),
        active_modules: modules.iter().filter(|m| m.active).count(),
    };
    Ok(CmdResult::default().with_status(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectoryConfig;
    use crate::store::memory::InMemorySettingsStore;

    #[test]
    fn test_unsaved_settings_are_not_set() {
        let store = InMemorySettingsStore::new();
        let res = run(&store, &ModuleRegistry::default(), Path::new("/srv/up")).unwrap();
        let info = res.status.unwrap();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.temp_dir.is_none());
        assert!(info.template_dir.is_none());
        assert_eq!((info.modules, info.active_modules), (1, 0));
    }

    #[test]
    fn test_saved_settings_are_reported() {
        let up = Path::new("/srv/up");
        let mut store = InMemorySettingsStore::with_config(DirectoryConfig::defaults_for(up));
        store
            .save_active_modules(&["company-profile".to_string()])
            .unwrap();

        let info = run(&store, &ModuleRegistry::default(), up)
            .unwrap()
            .status
            .unwrap();
        assert_eq!(info.template_dir, Some(up.join("docgen-templates")));
        assert_eq!(info.active_modules, 1);
    }
}
