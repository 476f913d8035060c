use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Scan parameters exactly as the user typed them.
///
/// Every field is a string so the same struct can be filled from the defaults
/// file, the environment or command-line flags before any validation happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInput {
    pub root: String,
    /// Minimum size in megabytes.
    pub min_size_mb: String,
    pub months_unused: String,
    /// Comma-separated path suffixes, e.g. `.jpg,.png`.
    pub exclude_extensions: String,
    /// Comma-separated file name prefixes, e.g. `backup,old`.
    pub exclude_names: String,
}

impl Default for ScanInput {
    fn default() -> Self {
        let root = env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|_| ".".to_string());

        Self {
            root,
            min_size_mb: "100".to_string(),
            months_unused: "6".to_string(),
            exclude_extensions: ".jpg,.png,.pdf".to_string(),
            exclude_names: "backup,old".to_string(),
        }
    }
}

/// Validated, immutable parameters for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Files must be strictly larger than this.
    pub min_size_bytes: u64,
    pub months_unused: u32,
    /// Case-sensitive suffixes matched against the full path.
    pub excluded_extensions: BTreeSet<String>,
    /// Lowercase prefixes matched against the lowercased file name.
    pub excluded_name_prefixes: BTreeSet<String>,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_size_bytes: 0,
            months_unused: 0,
            excluded_extensions: BTreeSet::new(),
            excluded_name_prefixes: BTreeSet::new(),
        }
    }

    pub fn with_min_size_bytes(mut self, bytes: u64) -> Self {
        self.min_size_bytes = bytes;
        self
    }

    pub fn with_months_unused(mut self, months: u32) -> Self {
        self.months_unused = months;
        self
    }

    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn with_excluded_name_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_name_prefixes = prefixes
            .into_iter()
            .map(|prefix| prefix.as_ref().trim().to_lowercase())
            .filter(|prefix| !prefix.is_empty())
            .collect();
        self
    }

    /// Validate raw user input. A scan never starts from input that fails here.
    pub fn from_input(input: &ScanInput) -> Result<Self, Error> {
        let root = input.root.trim();
        if root.is_empty() {
            return Err(Error::invalid_input("root", &input.root, "a directory is required"));
        }

        let min_size_mb = parse_non_negative::<u64>("minimum size", &input.min_size_mb)?;
        let min_size_bytes = min_size_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| Error::invalid_input("minimum size", &input.min_size_mb, "value is too large"))?;
        let months_unused = parse_non_negative::<u32>("months unused", &input.months_unused)?;

        Ok(ScanConfig::new(root)
            .with_min_size_bytes(min_size_bytes)
            .with_months_unused(months_unused)
            .with_excluded_extensions(split_list(&input.exclude_extensions))
            .with_excluded_name_prefixes(split_list(&input.exclude_names)))
    }
}

impl TryFrom<&ScanInput> for ScanConfig {
    type Error = Error;

    fn try_from(input: &ScanInput) -> Result<Self, Self::Error> {
        ScanConfig::from_input(input)
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_non_negative<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(field, raw, "a value is required"));
    }
    trimmed
        .parse::<T>()
        .map_err(|_| Error::invalid_input(field, raw, "expected a non-negative whole number"))
}

/// Layered defaults: built-ins, then `DataScourge.toml`, then `DATA_SCOURGE_*` variables.
pub fn load_configuration() -> Result<ScanInput, Error> {
    load_configuration_from("DataScourge")
}

pub fn load_configuration_from(file_name: &str) -> Result<ScanInput, Error> {
    let defaults = ScanInput::default();
    let builder = Config::builder()
        .set_default("root", defaults.root)?
        .set_default("min_size_mb", defaults.min_size_mb)?
        .set_default("months_unused", defaults.months_unused)?
        .set_default("exclude_extensions", defaults.exclude_extensions)?
        .set_default("exclude_names", defaults.exclude_names)?
        .add_source(ConfigFile::with_name(file_name).required(false))
        .add_source(Environment::with_prefix("DATA_SCOURGE"))
        .build()?;
    Ok(builder.try_deserialize::<ScanInput>()?)
}
