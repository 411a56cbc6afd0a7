use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DocgenError, Result};
use crate::modules::ModuleRegistry;
use crate::store::SettingsStore;

pub fn list<S: SettingsStore>(
    store: &S,
    registry: &ModuleRegistry,
    active_only: bool,
) -> Result<CmdResult> {
    let modules: Vec<_> = registry
        .statuses(store)?
        .into_iter()
        .filter(|m| m.active || !active_only)
        .collect();

    let mut result = CmdResult::default();
    if modules.is_empty() {
        result.add_message(CmdMessage::info(if active_only {
            "No active modules."
        } else {
            "No modules found."
        }));
    }
    Ok(result.with_modules(modules))
}

/// Adds `slug` to the active list. Unknown slugs are an error; activating twice is not.
pub fn activate<S: SettingsStore>(
    store: &mut S,
    registry: &ModuleRegistry,
    slug: &str,
) -> Result<CmdResult> {
    let info = registry
        .get(slug)
        .ok_or_else(|| DocgenError::ModuleNotFound(slug.to_string()))?;

    let mut active = store.load_active_modules()?;
    let mut result = CmdResult::default();
    if active.iter().any(|s| s == slug) {
        result.add_message(CmdMessage::info(format!("{} is already active.", info.name)));
    } else {
        active.push(slug.to_string());
        store.save_active_modules(&active)?;
        tracing::info!(module = slug, "module activated");
        result.committed = true;
        result.add_message(CmdMessage::success(format!("{} activated.", info.name)));
    }
    Ok(result.with_modules(registry.statuses(&*store)?))
}

/// Removes `slug` from the active list. Slugs that were not active leave it untouched.
pub fn deactivate<S: SettingsStore>(
    store: &mut S,
    registry: &ModuleRegistry,
    slug: &str,
) -> Result<CmdResult> {
    let mut active = store.load_active_modules()?;
    let before = active.len();
    active.retain(|s| s != slug);

    let mut result = CmdResult::default();
    if active.len() == before {
        result.add_message(CmdMessage::warning(format!("{} is not active.", slug)));
    } else {
        store.save_active_modules(&active)?;
        tracing::info!(module = slug, "module deactivated");
        result.committed = true;
        result.add_message(CmdMessage::success(format!("{} deactivated.", slug)));
    }
    Ok(result.with_modules(registry.statuses(&*store)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemorySettingsStore;

    #[test]
    fn test_list_all_and_active() {
        let store = InMemorySettingsStore::new();
        let registry = ModuleRegistry::default();

        let all = list(&store, &registry, false).unwrap();
        assert_eq!(all.modules.len(), 1);
        assert!(!all.modules[0].active);

        let active = list(&store, &registry, true).unwrap();
        assert!(active.modules.is_empty());
        assert_eq!(active.messages[0].content, "No active modules.");
    }

    #[test]
    fn test_activate_persists_once() {
        let mut store = InMemorySettingsStore::new();
        let registry = ModuleRegistry::default();

        let res = activate(&mut store, &registry, "company-profile").unwrap();
        assert!(res.committed);
        assert!(res.modules[0].active);

        let res = activate(&mut store, &registry, "company-profile").unwrap();
        assert!(!res.committed);
        assert_eq!(store.saves, 1);
        assert_eq!(store.load_active_modules().unwrap(), vec!["company-profile"]);
    }

    #[test]
    fn test_activate_unknown_module() {
        let mut store = InMemorySettingsStore::new();
        let err = activate(&mut store, &ModuleRegistry::default(), "invoice").unwrap_err();
        assert_eq!(err.code(), "module_not_found");
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_deactivate() {
        let mut store = InMemorySettingsStore::new();
        let registry = ModuleRegistry::default();
        activate(&mut store, &registry, "company-profile").unwrap();

        let res = deactivate(&mut store, &registry, "company-profile").unwrap();
        assert!(res.committed);
        assert!(store.load_active_modules().unwrap().is_empty());

        let res = deactivate(&mut store, &registry, "company-profile").unwrap();
        assert!(!res.committed);
        assert_eq!(res.messages[0].level, crate::commands::MessageLevel::Warning);
    }
}
