use clap::{Args, Parser, Subcommand};
use data_scourge_core::ScanInput;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "data-scourge")]
#[command(about = "Find large files nobody has opened in months, and delete them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and report large, unused files
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
        /// Also write the results to this CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
    /// Scan, choose flagged files and delete them
    Clean {
        #[command(flatten)]
        scan: ScanArgs,
        /// Select every flagged file instead of prompting for a selection
        #[arg(long)]
        all: bool,
        /// Do not ask for confirmation before deleting
        #[arg(short, long)]
        yes: bool,
    },
    /// Print configuration values
    PrintConfig {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

/// Overrides for the configured defaults. Values stay raw strings; the core
/// validates them.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(short, long)]
    pub root: Option<String>,
    /// Minimum file size in MB (files must be larger)
    #[arg(short = 's', long = "min-size", value_name = "MB")]
    pub min_size_mb: Option<String>,
    /// Months since the file was last accessed
    #[arg(short, long = "months")]
    pub months_unused: Option<String>,
    /// Comma-separated path suffixes to skip, e.g. ".jpg,.png"
    #[arg(long = "exclude-ext", value_name = "LIST")]
    pub exclude_extensions: Option<String>,
    /// Comma-separated file name prefixes to skip, e.g. "backup,old"
    #[arg(long = "exclude-names", value_name = "LIST")]
    pub exclude_names: Option<String>,
}

impl ScanArgs {
    pub fn apply(&self, mut input: ScanInput) -> ScanInput {
        if let Some(root) = &self.root {
            input.root = root.clone();
        }
        if let Some(size) = &self.min_size_mb {
            input.min_size_mb = size.clone();
        }
        if let Some(months) = &self.months_unused {
            input.months_unused = months.clone();
        }
        if let Some(extensions) = &self.exclude_extensions {
            input.exclude_extensions = extensions.clone();
        }
        if let Some(names) = &self.exclude_names {
            input.exclude_names = names.clone();
        }
        input
    }
}
