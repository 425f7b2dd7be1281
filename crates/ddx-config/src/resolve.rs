//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to table.json (or None if not found).
    pub table: Option<PathBuf>,

    /// Path to graph.json (or None if not found).
    pub graph: Option<PathBuf>,

    /// Source of the table config (for diagnostics).
    pub table_source: ConfigSource,

    /// Source of the graph config (for diagnostics).
    pub graph_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_TABLE_PATH: &str = "DDX_TABLE";
pub const ENV_GRAPH_PATH: &str = "DDX_GRAPH";
pub const ENV_CONFIG_DIR: &str = "DDX_CONFIG_DIR";

/// Standard config file names.
pub const TABLE_FILENAME: &str = "table.json";
pub const GRAPH_FILENAME: &str = "graph.json";

/// Application name for XDG directories.
const APP_NAME: &str = "ddx";

/// Resolve configuration paths using the standard resolution order.
///
/// Resolution order for each config file:
/// 1. Explicit CLI path (if provided)
/// 2. Environment variable (DDX_TABLE, DDX_GRAPH)
/// 3. DDX_CONFIG_DIR environment variable + filename
/// 4. XDG config directory (~/.config/ddx/)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_table: Option<&Path>, cli_graph: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();

    paths.table = resolve_single_config(
        cli_table,
        ENV_TABLE_PATH,
        TABLE_FILENAME,
        &mut paths.table_source,
    );

    paths.graph = resolve_single_config(
        cli_graph,
        ENV_GRAPH_PATH,
        GRAPH_FILENAME,
        &mut paths.graph_source,
    );

    paths
}

/// Resolve a single configuration file path.
fn resolve_single_config(
    cli_path: Option<&Path>,
    env_var: &str,
    filename: &str,
    source: &mut ConfigSource,
) -> Option<PathBuf> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path.to_path_buf());
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(env_var) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(filename);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 4. XDG config directory
    if let Some(xdg_config) = xdg_config_dir() {
        let path = xdg_config.join(filename);
        if path.exists() {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    // 5. Built-in default (None)
    *source = ConfigSource::BuiltinDefault;
    None
}

/// Get the XDG config directory for ddx.
///
/// `XDG_CONFIG_HOME` is honored on every platform so tests and containers
/// can redirect it.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join(APP_NAME));
        }
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
