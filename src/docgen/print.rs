use chrono::{DateTime, Utc};
use colored::Colorize;
use docgen::api::{CmdMessage, MessageLevel};
use docgen::model::{DirectoryConfig, DirectoryStats, MigrationPlan, SystemInfo, TemplateFile};
use docgen::modules::ModuleStatus;
use docgen::provider::GenerationRequest;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const SIZE_WIDTH: usize = 10;
const VALID_MARKER: &str = "✓";
const INVALID_MARKER: &str = "✗";
const NOT_SET: &str = "Not set";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_config(config: &DirectoryConfig) {
    println!("{:<16}{}", "Template dir:".bold(), config.template_dir.display());
    println!("{:<16}{}", "Temp dir:".bold(), config.temp_dir.display());
    println!("{:<16}{}", "Output format:".bold(), config.output_format);
    println!("{:<16}{}", "Debug mode:".bold(), config.debug_mode);
}

pub(super) fn print_plan(plan: &MigrationPlan) {
    if !plan.has_changes {
        return;
    }
    println!("{} {}", "Uploads root:".bold(), plan.upload_base.display());
    for (target, change) in plan.changes.iter() {
        let marker = if change.valid {
            VALID_MARKER.green()
        } else {
            INVALID_MARKER.red()
        };
        println!(
            "  {} {:<10} {} → {} ({} files)",
            marker,
            target.label(),
            change.from.display(),
            change.to.display(),
            change.files
        );
    }
}

pub(super) fn print_templates(templates: &[TemplateFile]) {
    for template in templates {
        let marker = if template.is_valid {
            format!("  {} ", VALID_MARKER).green()
        } else {
            format!("  {} ", INVALID_MARKER).red()
        };
        let size = format!("{:>width$}", human_size(template.size), width = SIZE_WIDTH);
        let time_ago = template
            .modified_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let fixed = 4 + SIZE_WIDTH + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let name = truncate_to_width(&template.name, available);
        let padding = available.saturating_sub(name.width());

        println!(
            "{}{}{}  {}{}",
            marker,
            name,
            " ".repeat(padding),
            size,
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_stats(stats: &DirectoryStats) {
    println!("{:<16}{}", "Files:".bold(), stats.total_files);
    println!("{:<16}{}", "Size:".bold(), human_size(stats.total_size));
    if let Some(modified) = stats.last_modified {
        println!("{:<16}{}", "Last modified:".bold(), format_time_ago(modified).trim());
    }
    println!(
        "{:<16}{}",
        "Writable:".bold(),
        if stats.is_writable {
            "yes".green()
        } else {
            "no".red()
        }
    );
    println!("{:<16}{}", "Free space:".bold(), human_size(stats.free_space));
    for (ext, count) in &stats.by_extension {
        let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
        println!("  {:<14}{}", ext, count);
    }
}

pub(super) fn print_generation(request: &GenerationRequest) {
    println!("{:<16}{}", "Template:".bold(), request.template_path.display());
    println!(
        "{:<16}{}.{}",
        "Output:".bold(),
        request.output_filename,
        request.output_format
    );
    println!("{:<16}{}", "Work dir:".bold(), request.temp_dir.display());
    for (key, value) in &request.data {
        let first_line = value.lines().next().unwrap_or_default();
        println!("  {:<22}{}", key.dimmed(), truncate_to_width(first_line, 60));
    }
}

pub(super) fn print_modules(modules: &[ModuleStatus]) {
    for module in modules {
        let state = if module.active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        println!(
            "  {:<20}{:<10}{:<10}{}",
            module.info.slug,
            module.info.version,
            state,
            module.info.description
        );
    }
}

pub(super) fn print_status(info: &SystemInfo) {
    let dir = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| NOT_SET.to_string())
    };
    println!("{:<16}{}", "Version:".bold(), info.version);
    println!("{:<16}{}", "Uploads root:".bold(), info.uploads_root.display());
    println!("{:<16}{}", "Temp dir:".bold(), dir(&info.temp_dir));
    println!("{:<16}{}", "Template dir:".bold(), dir(&info.template_dir));
    println!(
        "{:<16}{} of {} active",
        "Modules:".bold(),
        info.active_modules,
        info.modules
    );
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
