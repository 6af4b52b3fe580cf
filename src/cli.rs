use crate::cleaner::CleanMethod;
use crate::config::Config;
use crate::filter::ScanFilter;
use crate::output::OutputMode;
use crate::scanner::Scanner;
use crate::size;
use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "tidyup")]
#[command(version)]
#[command(about = "Find and remove junk files: temp files, logs, browser caches and trash")]
#[command(
    long_about = "tidyup scans well-known junk locations (or any directory you point it at) \
    for files matching name, size and age rules, and cleans them by moving them to the trash, \
    deleting, renaming to .bak or securely overwriting.\n\n\
    Examples:\n  \
    tidyup scan --all                       # Scan every preset location\n  \
    tidyup scan --logs --min-age 30         # Logs untouched for 30 days\n  \
    tidyup scan --path ~/Downloads --pattern '*.part'\n  \
    tidyup clean --temp --method permanent -y\n  \
    tidyup analyze ~/projects --depth 2 --top 15\n  \
    tidyup disks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Target selection and filters shared by `scan` and `clean`
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Scan every preset location plus the targets from the config file
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Temporary files in the system temp directory
    #[arg(long)]
    pub temp: bool,

    /// System and user log files
    #[arg(long)]
    pub logs: bool,

    /// Browser cache directories
    #[arg(long)]
    pub browser: bool,

    /// Files already in the trash / recycle bin
    #[arg(long)]
    pub trash: bool,

    /// Scan a custom directory
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// File name glob for --path (repeatable, default '*')
    #[arg(long, value_name = "GLOB", requires = "path")]
    pub pattern: Vec<String>,

    /// File name glob to skip in --path (repeatable)
    #[arg(long, value_name = "GLOB", requires = "path")]
    pub exclude: Vec<String>,

    /// Only files not modified for at least N days
    #[arg(long, value_name = "DAYS")]
    pub min_age: Option<u32>,

    /// Only files at least this large (e.g. 10MB)
    #[arg(long, value_name = "SIZE")]
    pub min_size: Option<String>,

    /// Only files at most this large (e.g. 1GB)
    #[arg(long, value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Size expression: '>10MB', '<1GB', '10MB-1GB' or an exact size
    #[arg(long, value_name = "EXPR", conflicts_with_all = ["min_size", "max_size"])]
    pub size: Option<String>,

    /// Only files with these extensions (repeatable, e.g. --ext log)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Skip files with these extensions (repeatable)
    #[arg(long = "exclude-ext", value_name = "EXT")]
    pub exclude_extensions: Vec<String>,
}

impl TargetArgs {
    fn any_preset(&self) -> bool {
        self.all || self.temp || self.logs || self.browser || self.trash
    }

    /// Scanner loaded with the selected targets. With no selection at all,
    /// every preset and configured target is used.
    pub fn build_scanner(&self, config: &Config) -> anyhow::Result<Scanner> {
        let mut scanner = Scanner::with_config(config);
        let everything = self.all || (!self.any_preset() && self.path.is_none());

        if everything || self.temp {
            scanner.add_temp_files_target();
        }
        if everything || self.logs {
            scanner.add_log_files_targets();
        }
        if everything || self.browser {
            scanner.add_browser_cache_targets();
        }
        if everything || self.trash {
            scanner.add_recycle_bin_target();
        }
        if everything {
            scanner.add_configured_targets(config)?;
        }

        if let Some(path) = &self.path {
            let target = scanner
                .add_custom_target("Custom", path, &self.pattern, None, 0, None)
                .with_context(|| format!("Path does not exist: {}", path.display()))?;
            for pattern in &self.exclude {
                target.add_exclude_pattern(pattern);
            }
        }

        Ok(scanner)
    }

    /// Global filter built from the size, age and extension options
    pub fn global_filter(&self) -> anyhow::Result<Option<ScanFilter>> {
        let (min_size, max_size) = match &self.size {
            Some(expr) => size::parse_size_filter(expr)
                .with_context(|| format!("Invalid --size expression: {}", expr))?,
            None => {
                let min = match &self.min_size {
                    Some(s) => size::parse_size(s).context("Invalid --min-size")?,
                    None => 0,
                };
                let max = match &self.max_size {
                    Some(s) => Some(size::parse_size(s).context("Invalid --max-size")?),
                    None => None,
                };
                (min, max)
            }
        };

        let mut filter = ScanFilter::new()
            .with_size(min_size, max_size)
            .with_extensions(&self.extensions)
            .with_exclude_extensions(&self.exclude_extensions);
        if let Some(days) = self.min_age {
            filter = filter.with_min_age(days);
        }

        Ok(if filter.is_empty() { None } else { Some(filter) })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find junk files (read-only, safe to run anytime)
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        targets: TargetArgs,

        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Scan, then clean what was found (with confirmation)
    #[command(visible_alias = "c")]
    Clean {
        #[command(flatten)]
        targets: TargetArgs,

        /// How to clean [default: from config, else trash]
        #[arg(short = 'm', long, value_enum)]
        method: Option<CleanMethod>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Show what would be cleaned without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what is using space under a directory
    #[command(visible_alias = "a")]
    Analyze {
        /// Directory (or file) to analyze [default: current directory]
        path: Option<PathBuf>,

        /// Maximum depth to descend (root is depth 0)
        #[arg(short = 'd', long, value_name = "N")]
        depth: Option<usize>,

        /// Number of rows per list
        #[arg(short = 'n', long, default_value_t = 10, value_name = "N")]
        top: usize,

        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show usage of mounted volumes
    Disks {
        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// View or reset the configuration file
    Config {
        /// Print the current configuration
        #[arg(long)]
        show: bool,

        /// Write the default configuration to disk
        #[arg(long)]
        reset: bool,

        /// Print the configuration file location
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = OutputMode::from_flags(self.quiet, self.verbose);

        match self.command {
            Commands::Scan { targets, json } => {
                let config = Config::load();
                commands::scan_command::handle_scan(&targets, json, &config, output_mode)
            }
            Commands::Clean {
                targets,
                method,
                yes,
                dry_run,
            } => {
                let mut config = Config::load();
                config.apply_cli_overrides(method, None);
                commands::clean_command::handle_clean(&targets, yes, dry_run, &config, output_mode)
            }
            Commands::Analyze {
                path,
                depth,
                top,
                json,
            } => {
                let mut config = Config::load();
                config.apply_cli_overrides(None, depth);
                commands::analyze_command::handle_analyze(path, top, json, &config, output_mode)
            }
            Commands::Disks { json } => commands::disks_command::handle_disks(json),
            Commands::Config { show, reset, path } => {
                commands::config_command::handle_config(show, reset, path)
            }
        }
    }
}
