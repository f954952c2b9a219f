//! Migration configuration
//!
//! Handles loading `extract.yaml` and resolving where each migrated test is
//! written:
//!
//! ```yaml
//! version: 1
//! output:
//!   root: extracted
//!   category: libsolidity/semanticTests/end-to-end
//!   naming:
//!     pattern: "{name}.{ext}"
//!     extension: sol
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "extract.yaml";

/// Migration configuration (`extract.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where migrated tests go
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            output: OutputConfig::default(),
        }
    }
}

/// Output location settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root of the extracted test tree
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Category directory below the root
    #[serde(default = "default_category")]
    pub category: PathBuf,

    /// File naming conventions
    #[serde(default)]
    pub naming: NamingConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from("extracted")
}

fn default_category() -> PathBuf {
    PathBuf::from("libsolidity/semanticTests/end-to-end")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            category: default_category(),
            naming: NamingConfig::default(),
        }
    }
}

/// Naming convention for migrated test files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// File name pattern: {name}, {ext}
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_pattern() -> String {
    "{name}.{ext}".to_string()
}

fn default_extension() -> String {
    "sol".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            extension: default_extension(),
        }
    }
}

impl NamingConfig {
    /// Apply the naming pattern to a test name
    pub fn apply(&self, name: &str) -> String {
        self.pattern
            .replace("{name}", name)
            .replace("{ext}", &self.extension)
    }
}

impl MigrateConfig {
    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: MigrateConfig = serde_norway::from_str(yaml)?;

        if config.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported {} version: {}",
                CONFIG_FILE, config.version
            )));
        }
        if !config.output.naming.pattern.contains("{name}") {
            return Err(Error::Config(format!(
                "Naming pattern must contain {{name}}: {}",
                config.output.naming.pattern
            )));
        }

        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `extract.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(None);
        }
        Self::load(&file).map(Some)
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout {
            dir: self.output.root.join(&self.output.category),
            naming: self.output.naming.clone(),
        }
    }
}

/// Resolved output directory and file naming for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    naming: NamingConfig,
}

impl OutputLayout {
    pub fn new(root: impl AsRef<Path>, category: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(category),
            naming: NamingConfig::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a test with this name is written to
    pub fn test_path(&self, name: &str) -> PathBuf {
        self.dir.join(self.naming.apply(name))
    }

    /// Create the category directory
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        MigrateConfig::default().layout()
    }
}
