//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for every docgen operation, whichever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Authorizes** each request through the [`RequestGuard`] before anything else runs
//! - **Wires** the validator, handler and migration engine for one site layout
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: No stdout, stderr or formatting
//!
//! ## Generic Over SettingsStore
//!
//! `DocgenApi<S: SettingsStore>` is generic over where settings are persisted:
//! - Production: `DocgenApi<FileSettingsStore>`
//! - Testing: `DocgenApi<InMemorySettingsStore>`
//!
//! The API is constructed explicitly by its caller; there is no process-wide instance.

use crate::auth::RequestGuard;
use crate::commands;
use crate::error::Result;
use crate::handler::DirectoryHandler;
use crate::migration::MigrationEngine;
use crate::model::{CleanupOptions, SiteLayout, Target};
use crate::modules::ModuleRegistry;
use crate::provider::DataSource;
use crate::store::SettingsStore;
use crate::validator::DirectoryValidator;
use std::path::Path;

pub use crate::auth::{Action, AdminRequest};
pub use crate::commands::settings::SettingsForm;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

pub struct DocgenApi<S: SettingsStore> {
    store: S,
    engine: MigrationEngine,
    guard: RequestGuard,
    registry: ModuleRegistry,
}

impl<S: SettingsStore> DocgenApi<S> {
    pub fn new(store: S, layout: SiteLayout) -> Self {
        let handler = DirectoryHandler::new(DirectoryValidator::new(layout));
        Self {
            store,
            engine: MigrationEngine::new(handler),
            guard: RequestGuard::new(),
            registry: ModuleRegistry::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn layout(&self) -> &SiteLayout {
        self.engine.validator().layout()
    }

    /// Issues the anti-forgery token a client must echo back for `action`.
    pub fn issue_token(&mut self, action: Action) -> String {
        self.guard.issue(action)
    }

    /// An admin request carrying a fresh token, for callers that are trusted by
    /// construction such as the local CLI.
    pub fn local_request(&mut self, action: Action) -> AdminRequest {
        AdminRequest::new(true, self.issue_token(action))
    }

    fn handler(&self) -> &DirectoryHandler {
        self.engine.handler()
    }

    pub fn activate(&mut self, req: &AdminRequest) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::lifecycle::activate(&mut self.store, self.engine.handler())
    }

    pub fn deactivate(&self, req: &AdminRequest) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::lifecycle::deactivate(&self.store, self.handler())
    }

    pub fn show_settings(&self, req: &AdminRequest) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::settings::show(&self.store, &self.engine)
    }

    pub fn save_settings(
        &mut self,
        req: &AdminRequest,
        form: &SettingsForm,
        confirmed: bool,
    ) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::settings::save(&mut self.store, &self.engine, form, confirmed)
    }

    /// Folder names are resolved under the uploads root.
    pub fn check_migration(
        &self,
        req: &AdminRequest,
        temp_dir: &str,
        template_dir: &str,
    ) -> Result<CmdResult> {
        self.guard.check(Action::Migration, req)?;
        commands::migrate::check(&self.store, &self.engine, temp_dir, template_dir)
    }

    pub fn migrate_files(
        &mut self,
        req: &AdminRequest,
        temp_dir: &str,
        template_dir: &str,
    ) -> Result<CmdResult> {
        self.guard.check(Action::Migration, req)?;
        commands::migrate::run(&mut self.store, &self.engine, temp_dir, template_dir)
    }

    pub fn test_directory(&self, req: &AdminRequest, name: &str) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::directory::test_directory(self.handler(), name)
    }

    pub fn test_template_directory(&self, req: &AdminRequest, name: &str) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::directory::test_template_directory(self.handler(), name)
    }

    pub fn templates(&self, req: &AdminRequest) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::directory::templates(&self.store, self.handler())
    }

    pub fn stats(&self, req: &AdminRequest, target: Target) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::directory::stats(&self.store, self.handler(), target)
    }

    pub fn upload_template(&self, req: &AdminRequest, source: &Path) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::upload::run(&self.store, self.handler(), source)
    }

    pub fn cleanup(
        &self,
        req: &AdminRequest,
        dir: Option<&Path>,
        options: &CleanupOptions,
    ) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::cleanup::run(&self.store, self.handler(), dir, options)
    }

    pub fn generate(&self, req: &AdminRequest, source: DataSource) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::generate::run(&self.store, self.handler(), source)
    }

    pub fn status(&self, req: &AdminRequest) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::status::run(&self.store, &self.registry, self.engine.uploads_root())
    }

    pub fn modules(&self, req: &AdminRequest, active_only: bool) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::modules::list(&self.store, &self.registry, active_only)
    }

    pub fn activate_module(&mut self, req: &AdminRequest, slug: &str) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::modules::activate(&mut self.store, &self.registry, slug)
    }

    pub fn deactivate_module(&mut self, req: &AdminRequest, slug: &str) -> Result<CmdResult> {
        self.guard.check(Action::Admin, req)?;
        commands::modules::deactivate(&mut self.store, &self.registry, slug)
    }
}
