use clap::Parser;
use docgen::api::{Action, CmdMessage, CmdResult, DocgenApi, SettingsForm};
use docgen::commands::generate::{load_source, SourceKind};
use docgen::config::{SiteConfig, CONFIG_DIRNAME};
use docgen::error::{DocgenError, Result};
use docgen::logging::{default_log_file, init_logging};
use docgen::model::{CleanupOptions, OutputFormat};
use docgen::store::fs::FileSettingsStore;
use docgen::store::SettingsStore;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod args;
mod print;
use args::{Cli, Commands, ModulesAction, SourceArg};
use print::{
    print_config, print_generation, print_messages, print_modules, print_plan, print_stats,
    print_status, print_templates,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {} ({})", e, e.code());
        std::process::exit(1);
    }
}

struct AppContext {
    api: DocgenApi<FileSettingsStore>,
    json: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Init => handle_init(&mut ctx),
        Commands::Deactivate => handle_deactivate(&mut ctx),
        Commands::Settings => handle_settings(&mut ctx),
        Commands::Save {
            temp_dir,
            template_dir,
            output_format,
            debug,
            yes,
        } => handle_save(&mut ctx, temp_dir, template_dir, output_format, debug, yes),
        Commands::CheckMigration {
            temp_dir,
            template_dir,
        } => handle_check_migration(&mut ctx, &temp_dir, &template_dir),
        Commands::Migrate {
            temp_dir,
            template_dir,
            yes,
        } => handle_migrate(&mut ctx, &temp_dir, &template_dir, yes),
        Commands::TestDir { name, templates } => handle_test_dir(&mut ctx, &name, templates),
        Commands::Templates => handle_templates(&mut ctx),
        Commands::Upload { file } => handle_upload(&mut ctx, &file),
        Commands::Stats { dir } => handle_stats(&mut ctx, dir.into()),
        Commands::Cleanup {
            older_than,
            keep_latest,
            extensions,
            recursive,
            dir,
        } => {
            let options = CleanupOptions {
                older_than_hours: older_than,
                extensions: extensions
                    .iter()
                    .map(|e| e.trim_start_matches('.').to_lowercase())
                    .collect(),
                keep_latest,
                recursive,
            };
            handle_cleanup(&mut ctx, dir.as_deref(), &options)
        }
        Commands::Generate { source, data } => handle_generate(&mut ctx, source, &data),
        Commands::Status => handle_status(&mut ctx),
        Commands::Modules { action } => handle_modules(
            &mut ctx,
            action.unwrap_or(ModulesAction::List { active: false }),
        ),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let site_root = match &cli.site {
        Some(site) => site.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let config_dir = site_root.join(CONFIG_DIRNAME);
    let config = SiteConfig::load(&config_dir)?;

    let store = FileSettingsStore::new(&config_dir);
    let debug_mode = store
        .load()
        .ok()
        .flatten()
        .is_some_and(|settings| settings.debug_mode);
    let log_file = config.log_file.clone().or_else(default_log_file);
    init_logging(&config.log_level, cli.verbose || debug_mode, log_file.as_deref());

    tracing::debug!(site = %site_root.display(), "using site root");
    let api = DocgenApi::new(store, config.layout(&site_root));
    Ok(AppContext {
        api,
        json: cli.json,
    })
}

/// Prints a command result either as JSON or as formatted text.
fn output(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    print_messages(&result.messages);
    if let Some(plan) = &result.plan {
        print_plan(plan);
    }
    if let Some(config) = &result.config {
        print_config(config);
    }
    if !result.templates.is_empty() {
        print_templates(&result.templates);
    }
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    if let Some(request) = &result.generation {
        print_generation(request);
    }
    if !result.modules.is_empty() {
        print_modules(&result.modules);
    }
    if let Some(info) = &result.status {
        print_status(info);
    }
    Ok(())
}

fn handle_init(ctx: &mut AppContext) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.activate(&req)?;
    output(ctx, &result)
}

fn handle_deactivate(ctx: &mut AppContext) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.deactivate(&req)?;
    output(ctx, &result)
}

fn handle_settings(ctx: &mut AppContext) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.show_settings(&req)?;
    output(ctx, &result)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn handle_save(
    ctx: &mut AppContext,
    temp_dir: Option<String>,
    template_dir: Option<String>,
    output_format: Option<OutputFormat>,
    debug: Option<bool>,
    yes: bool,
) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let current = ctx
        .api
        .show_settings(&req)?
        .config
        .ok_or(DocgenError::NotConfigured("Settings"))?;

    let form = SettingsForm {
        temp_dir: temp_dir.unwrap_or_else(|| folder_name(&current.temp_dir)),
        template_dir: template_dir.unwrap_or_else(|| folder_name(&current.template_dir)),
        output_format: output_format.unwrap_or(current.output_format),
        debug_mode: debug.unwrap_or(current.debug_mode),
    };

    let result = ctx.api.save_settings(&req, &form, yes)?;
    if result.committed || result.plan.is_none() || ctx.json {
        return output(ctx, &result);
    }

    output(ctx, &result)?;
    if !confirm("[Y] To migrate and save: ")? {
        print_messages(&[CmdMessage::info("Operation cancelled.")]);
        return Ok(());
    }
    let result = ctx.api.save_settings(&req, &form, true)?;
    output(ctx, &result)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "Y")
}

fn handle_check_migration(ctx: &mut AppContext, temp_dir: &str, template_dir: &str) -> Result<()> {
    let req = ctx.api.local_request(Action::Migration);
    let result = ctx.api.check_migration(&req, temp_dir, template_dir)?;
    output(ctx, &result)
}

fn handle_migrate(
    ctx: &mut AppContext,
    temp_dir: &str,
    template_dir: &str,
    yes: bool,
) -> Result<()> {
    if !yes {
        let req = ctx.api.local_request(Action::Migration);
        let check = ctx.api.check_migration(&req, temp_dir, template_dir)?;
        let has_changes = check.plan.as_ref().is_some_and(|plan| plan.has_changes);
        if has_changes {
            output(ctx, &check)?;
            if ctx.json {
                return Ok(());
            }
            if !confirm("[Y] To migrate and save: ")? {
                print_messages(&[CmdMessage::info("Operation cancelled.")]);
                return Ok(());
            }
        }
    }

    let req = ctx.api.local_request(Action::Migration);
    let result = ctx.api.migrate_files(&req, temp_dir, template_dir)?;
    output(ctx, &result)?;
    if result.committed {
        Ok(())
    } else {
        Err(DocgenError::Migration(
            "one or more directories failed to migrate".into(),
        ))
    }
}

fn handle_test_dir(ctx: &mut AppContext, name: &str, templates: bool) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = if templates {
        ctx.api.test_template_directory(&req, name)?
    } else {
        ctx.api.test_directory(&req, name)?
    };
    output(ctx, &result)
}

fn handle_templates(ctx: &mut AppContext) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.templates(&req)?;
    output(ctx, &result)
}

fn handle_upload(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.upload_template(&req, file)?;
    output(ctx, &result)
}

fn handle_stats(ctx: &mut AppContext, target: docgen::model::Target) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.stats(&req, target)?;
    output(ctx, &result)
}

fn handle_cleanup(
    ctx: &mut AppContext,
    dir: Option<&Path>,
    options: &CleanupOptions,
) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.cleanup(&req, dir, options)?;
    output(ctx, &result)
}

fn handle_generate(ctx: &mut AppContext, source: SourceArg, data: &Path) -> Result<()> {
    let kind = match source {
        SourceArg::Form => SourceKind::Form,
        SourceArg::Json => SourceKind::Json,
    };
    let source = load_source(kind, data)?;
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.generate(&req, source)?;
    output(ctx, &result)
}

fn handle_status(ctx: &mut AppContext) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = ctx.api.status(&req)?;
    output(ctx, &result)
}

fn handle_modules(ctx: &mut AppContext, action: ModulesAction) -> Result<()> {
    let req = ctx.api.local_request(Action::Admin);
    let result = match action {
        ModulesAction::List { active } => ctx.api.modules(&req, active)?,
        ModulesAction::Enable { slug } => ctx.api.activate_module(&req, &slug)?,
        ModulesAction::Disable { slug } => ctx.api.deactivate_module(&req, &slug)?,
    };
    output(ctx, &result)
}
