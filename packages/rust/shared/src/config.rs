//! Application configuration for Quarry.
//!
//! User config lives at `~/.quarry/quarry.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuarryError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "quarry.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".quarry";

// ---------------------------------------------------------------------------
// Config structs (matching quarry.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pipeline execution settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Vault discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Generated component settings.
    #[serde(default)]
    pub component: ComponentConfig,

    /// Output persistence settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum transform invocations in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

/// `[discovery]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Glob patterns excluded from the vault walk.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

fn default_ignore() -> Vec<String> {
    vec!["node_modules/**".into()]
}

/// `[component]` section — shape of the generated TSX modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// BEM block name passed to `blem` in the generated component.
    #[serde(default = "default_block")]
    pub block: String,

    /// Import path for the code component used by the fixup passes.
    #[serde(default = "default_code_import")]
    pub code_import: String,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            block: default_block(),
            code_import: default_code_import(),
        }
    }
}

fn default_block() -> String {
    "Note".into()
}

fn default_code_import() -> String {
    "@/components/Code".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated modules when writing is enabled.
    #[serde(default = "default_out_dir")]
    pub dir: String,

    /// Whether `build` persists generated modules by default.
    /// The pipeline itself never writes; this only arms the sink.
    #[serde(default)]
    pub write: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            write: false,
        }
    }
}

fn default_out_dir() -> String {
    "generated".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.quarry/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QuarryError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.quarry/quarry.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QuarryError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| QuarryError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| QuarryError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| QuarryError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| QuarryError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
