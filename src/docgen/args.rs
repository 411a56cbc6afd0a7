use clap::{Parser, Subcommand, ValueEnum};
use docgen::model::{OutputFormat, Target};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("DOCGEN_GIT_HASH");
    const COMMIT_DATE: &str = env!("DOCGEN_COMMIT_DATE");
    const IS_RELEASE: &str = env!("DOCGEN_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "docgen", bin_name = "docgen", version = get_version())]
#[command(about = "Manage template and output directories for document generation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub site: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirArg {
    Template,
    Temp,
}

impl From<DirArg> for Target {
    fn from(arg: DirArg) -> Self {
        match arg {
            DirArg::Template => Target::Template,
            DirArg::Temp => Target::Temp,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Form,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the default directories and settings
    Init,

    /// Remove every generated file from the temp directory
    Deactivate,

    /// Show the current settings
    Settings,

    /// Save settings, migrating files when a directory changes
    Save {
        /// Temp folder name under the uploads root
        #[arg(long)]
        temp_dir: Option<String>,

        /// Template folder name under the uploads root
        #[arg(long)]
        template_dir: Option<String>,

        /// Output format (docx or pdf)
        #[arg(long)]
        output_format: Option<OutputFormat>,

        /// Enable or disable debug mode
        #[arg(long)]
        debug: Option<bool>,

        /// Confirm the migration without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show which files a directory change would migrate
    CheckMigration {
        /// Temp folder name under the uploads root
        temp_dir: String,

        /// Template folder name under the uploads root
        template_dir: String,
    },

    /// Migrate files to new directories and save them
    Migrate {
        /// Temp folder name under the uploads root
        temp_dir: String,

        /// Template folder name under the uploads root
        template_dir: String,

        /// Migrate without showing the plan and asking first
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate, create and inspect a folder under the uploads root
    TestDir {
        name: String,

        /// Also scan it for templates
        #[arg(long)]
        templates: bool,
    },

    /// List templates in the template directory
    #[command(alias = "ls")]
    Templates,

    /// Upload a DOCX/ODT template
    Upload { file: PathBuf },

    /// Show statistics for a configured directory
    Stats {
        #[arg(value_enum, default_value = "temp")]
        dir: DirArg,
    },

    /// Delete old files (defaults to the temp directory)
    Cleanup {
        /// Minimum age in hours
        #[arg(long, default_value_t = 24)]
        older_than: u64,

        /// Number of newest files always kept
        #[arg(long, default_value_t = 5)]
        keep_latest: usize,

        /// Only these extensions (repeatable)
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Directory to clean instead of the temp directory
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show the tool version and the saved directories
    Status,

    /// List, enable or disable document modules
    Modules {
        #[command(subcommand)]
        action: Option<ModulesAction>,
    },

    /// Prepare a company profile generation request
    Generate {
        /// Shape of the input file
        #[arg(long, value_enum, default_value = "json")]
        source: SourceArg,

        /// JSON file with the company data
        data: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModulesAction {
    /// List registered modules (default)
    #[command(alias = "ls")]
    List {
        /// Only active modules
        #[arg(long)]
        active: bool,
    },

    /// Activate a module
    Enable { slug: String },

    /// Deactivate a module
    Disable { slug: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save() {
        let cli = Cli::try_parse_from([
            "docgen",
            "--site",
            "/srv/www",
            "save",
            "--template-dir",
            "tpl",
            "--output-format",
            "pdf",
            "-y",
        ])
        .unwrap();
        assert_eq!(cli.site, Some(PathBuf::from("/srv/www")));
        match cli.command {
            Commands::Save {
                template_dir,
                output_format,
                yes,
                temp_dir,
                ..
            } => {
                assert_eq!(template_dir.as_deref(), Some("tpl"));
                assert_eq!(output_format, Some(OutputFormat::Pdf));
                assert!(yes);
                assert!(temp_dir.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_modules() {
        let cli = Cli::try_parse_from(["docgen", "modules"]).unwrap();
        assert!(matches!(cli.command, Commands::Modules { action: None }));

        let cli = Cli::try_parse_from(["docgen", "modules", "enable", "company-profile"]).unwrap();
        match cli.command {
            Commands::Modules {
                action: Some(ModulesAction::Enable { slug }),
            } => assert_eq!(slug, "company-profile"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_cleanup_defaults() {
        let cli = Cli::try_parse_from(["docgen", "cleanup", "--ext", "pdf", "--ext", "docx"])
            .unwrap();
        match cli.command {
            Commands::Cleanup {
                older_than,
                keep_latest,
                extensions,
                recursive,
                dir,
            } => {
                assert_eq!((older_than, keep_latest), (24, 5));
                assert_eq!(extensions, vec!["pdf", "docx"]);
                assert!(!recursive);
                assert!(dir.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
