//! Run configuration.
//!
//! Everything the pipeline needs is collected into one explicit [`RunConfig`]
//! before any file is touched. Boundary adapters (CLI flags, environment,
//! an optional `config.toml`, the interactive prompt) only ever fill that
//! struct; the pipeline itself never reads stdin or the environment.
//!
//! ## Config File
//!
//! A config file is optional and passed with `--config <FILE>`. It is sparse:
//! stock defaults are overridden by whatever keys the file sets.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! quality = 90                            # JPEG quality (0-100)
//! max_width = 4096                        # Wider images are downscaled to this
//! dir_name = "CompressedAndResizedImages" # Created inside the source directory
//! naming = "original"                     # "original" keeps name + extension, "jpg" renames
//!
//! [batch]
//! on_error = "abort"                      # "abort" stops at the first bad file, "continue" skips it
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Precedence
//!
//! stock defaults < config file < environment < CLI flags < interactive prompt.
//! The prompt only asks for values nothing else supplied.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Used when no max width is configured anywhere.
pub const DEFAULT_MAX_WIDTH: u32 = 4096;

/// Destination folder created inside the source directory.
pub const DEFAULT_DIR_NAME: &str = "CompressedAndResizedImages";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from a config file, layered over stock defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Output encoding and placement.
    pub output: OutputConfig,
    /// Batch failure policy.
    pub batch: BatchConfig,
}

impl Settings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality > Quality::MAX {
            return Err(ConfigError::Validation(
                "output.quality must be 0-100".into(),
            ));
        }
        if self.output.max_width == 0 {
            return Err(ConfigError::Validation(
                "output.max_width must be at least 1".into(),
            ));
        }
        validate_dir_name(&self.output.dir_name)?;
        Ok(())
    }
}

fn validate_dir_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "output.dir_name must be a single folder name, got {name:?}"
        )));
    }
    Ok(())
}

/// Output encoding and placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (0 = smallest file, 100 = best fidelity).
    pub quality: u32,
    /// Images strictly wider than this are downscaled to exactly this width.
    pub max_width: u32,
    /// Name of the destination folder inside the source directory.
    pub dir_name: String,
    /// How output files are named.
    pub naming: Naming,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            max_width: DEFAULT_MAX_WIDTH,
            dir_name: DEFAULT_DIR_NAME.to_string(),
            naming: Naming::default(),
        }
    }
}

/// Output file naming policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// Keep the source file name and extension, even though the content is
    /// always JPEG (`photo.png` holds JPEG bytes).
    #[default]
    Original,
    /// Replace the extension with `.jpg`.
    Jpg,
}

/// Batch failure policy settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub on_error: OnError,
}

/// What to do when one image fails to decode, resize, or write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop the batch at the first failure. Files already written stay on disk.
    #[default]
    Abort,
    /// Record the failure and move on to the next file.
    Continue,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// The file was named explicitly, so a missing file is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Settings, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from an optional config file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. `None` yields the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let base = stock_defaults_value();
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgcr Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with `imgcr --config imgcr.toml <SOURCE>`.
# Command-line flags and IMGCR_* environment variables override it.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (0 = smallest file, 100 = best fidelity).
quality = 90

# Images strictly wider than this many pixels are downscaled to exactly this
# width. Height follows the original aspect ratio (rounded down).
max_width = 4096

# Folder created inside the source directory to hold the results.
dir_name = "CompressedAndResizedImages"

# Output file naming:
#   "original" - same name and extension as the source (a .png holds JPEG data)
#   "jpg"      - same name with the extension replaced by .jpg
naming = "original"

# ---------------------------------------------------------------------------
# Batch
# ---------------------------------------------------------------------------
[batch]
# What happens when an image cannot be decoded or written:
#   "abort"    - stop at the first failure (files already written are kept)
#   "continue" - report the failure and carry on with the next image
on_error = "abort"
"##
}

// =============================================================================
// Boundary parsing
// =============================================================================

/// Parse a quality percent typed by the user or passed as a flag.
///
/// Strict: anything that is not an integer in 0-100 is rejected.
pub fn parse_quality(input: &str) -> Result<Quality, ConfigError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .and_then(Quality::new)
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "quality must be an integer between 0 and 100, got {trimmed:?}"
            ))
        })
}

/// Parse a maximum width typed by the user or passed as a flag.
///
/// Strict: anything that is not a positive integer is rejected.
pub fn parse_max_width(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v >= 1)
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "max width must be a positive integer, got {trimmed:?}"
            ))
        })
}

/// Resolve the source directory answer: `.` means `cwd`.
///
/// The directory must exist; nothing is created here.
pub fn resolve_source_dir(input: &str, cwd: &Path) -> Result<PathBuf, ConfigError> {
    let trimmed = input.trim();
    let path = match trimmed {
        "" => {
            return Err(ConfigError::Validation(
                "source directory must not be empty".into(),
            ));
        }
        "." => cwd.to_path_buf(),
        other => PathBuf::from(other),
    };
    if !path.is_dir() {
        return Err(ConfigError::Validation(format!(
            "source directory does not exist: {}",
            path.display()
        )));
    }
    Ok(path)
}

// =============================================================================
// Layering
// =============================================================================

/// Values from command-line flags and `IMGCR_*` environment variables.
///
/// These sit above the config file and below prompt answers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub quality: Option<Quality>,
    pub max_width: Option<u32>,
    pub keep_going: bool,
    pub jpg_extension: bool,
}

/// Which values the interactive prompt still has to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptNeeds {
    pub quality: bool,
    pub max_width: bool,
}

impl Overrides {
    /// Overwrite `settings` with every value given here.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(quality) = self.quality {
            settings.output.quality = quality.value();
        }
        if let Some(max_width) = self.max_width {
            settings.output.max_width = max_width;
        }
        if self.keep_going {
            settings.batch.on_error = OnError::Continue;
        }
        if self.jpg_extension {
            settings.output.naming = Naming::Jpg;
        }
    }

    /// A value is missing when neither these overrides nor the user's config
    /// file (`overlay`, before stock defaults are merged in) set it.
    pub fn prompt_needs(&self, overlay: Option<&toml::Value>) -> PromptNeeds {
        let file_sets = |key: &str| {
            overlay
                .and_then(|v| v.get("output"))
                .and_then(|o| o.get(key))
                .is_some()
        };
        PromptNeeds {
            quality: self.quality.is_none() && !file_sets("quality"),
            max_width: self.max_width.is_none() && !file_sets("max_width"),
        }
    }
}

/// Stock defaults, then the config file `overlay`, then `overrides`.
pub fn layered_settings(
    overlay: Option<toml::Value>,
    overrides: &Overrides,
) -> Result<Settings, ConfigError> {
    let mut settings = resolve_config(stock_defaults_value(), overlay)?;
    overrides.apply(&mut settings);
    Ok(settings)
}

// =============================================================================
// RunConfig
// =============================================================================

/// Fully validated parameters for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub quality: Quality,
    pub max_width: u32,
    pub on_error: OnError,
    pub naming: Naming,
}

impl RunConfig {
    /// Build a run from a source directory and resolved settings.
    ///
    /// Validates everything up front and performs no writes: the
    /// destination directory is only computed here, not created.
    pub fn new(source_dir: PathBuf, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        if !source_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source directory does not exist: {}",
                source_dir.display()
            )));
        }
        let quality = Quality::new(settings.output.quality).ok_or_else(|| {
            ConfigError::Validation("output.quality must be 0-100".into())
        })?;

        Ok(Self {
            dest_dir: source_dir.join(&settings.output.dir_name),
            source_dir,
            quality,
            max_width: settings.output.max_width,
            on_error: settings.batch.on_error,
            naming: settings.output.naming,
        })
    }
}
