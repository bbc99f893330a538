use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "gadb.toml";
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct GadbConfig {
    /// adb program plus any leading arguments, e.g. `adb -H 10.0.0.2`
    pub adb: String,
    pub scan_timeout_secs: u64,
    pub history_limit: usize,
    pub history_file: PathBuf,
    pub shell_history_file: PathBuf,
}

/// Keys as written in `gadb.toml`. Everything is optional.
#[derive(Debug, Default, Deserialize)]
struct FileLayer {
    adb: Option<String>,
    scan_timeout_secs: Option<u64>,
    history_limit: Option<usize>,
    history_file: Option<PathBuf>,
    shell_history_file: Option<PathBuf>,
}

impl Default for GadbConfig {
    fn default() -> Self {
        let tmp = env::temp_dir();
        Self {
            adb: "adb".to_string(),
            scan_timeout_secs: DEFAULT_SCAN_TIMEOUT_SECS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_file: tmp.join("gadb_history"),
            shell_history_file: tmp.join("gadb_shell_history"),
        }
    }
}

impl GadbConfig {
    fn apply_file(&mut self, layer: FileLayer, dir: &Path) {
        if let Some(adb) = layer.adb {
            self.adb = adb;
        }
        if let Some(secs) = layer.scan_timeout_secs {
            self.scan_timeout_secs = secs;
        }
        if let Some(limit) = layer.history_limit {
            self.history_limit = limit;
        }
        // Relative history paths are relative to the config file, not the cwd
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { dir.join(p) };
        if let Some(path) = layer.history_file {
            self.history_file = resolve(path);
        }
        if let Some(path) = layer.shell_history_file {
            self.shell_history_file = resolve(path);
        }
    }

    /// Overrides from `GADB_*` variables.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(adb) = vars.get("GADB_ADB").filter(|v| !v.trim().is_empty()) {
            self.adb = adb.clone();
        }
        if let Some(secs) = vars.get("GADB_SCAN_TIMEOUT") {
            self.scan_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("GADB_SCAN_TIMEOUT must be a number of seconds, got '{}'", secs))?;
        }
        Ok(())
    }
}

pub fn load_config(dir: &Path) -> Result<GadbConfig> {
    let process_env: HashMap<String, String> = env::vars().collect();
    load_config_with(dir, &process_env)
}

/// Layers, lowest first: built-in defaults, `gadb.toml`, `.env` (or
/// `.env.<GADB_ENV>`), then the process environment.
pub fn load_config_with(dir: &Path, process_env: &HashMap<String, String>) -> Result<GadbConfig> {
    let mut config = GadbConfig::default();

    // 1. gadb.toml (Base Layer)
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let layer: FileLayer = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config.apply_file(layer, dir);
    }

    // 2. .env file, then the real environment on top of it
    let env_filename = process_env
        .get("GADB_ENV")
        .map(|v| format!(".env.{}", v))
        .unwrap_or_else(|| ".env".to_string());
    let env_path = dir.join(&env_filename);

    let mut vars = HashMap::new();
    if env_path.exists() {
        debug!("Loading environment from: {}", env_filename);
        for item in dotenvy::from_path_iter(&env_path)
            .with_context(|| format!("Failed to read {}", env_filename))?
        {
            let (key, val) = item.with_context(|| format!("Malformed line in {}", env_filename))?;
            vars.insert(key, val);
        }
    }
    vars.extend(process_env.iter().map(|(k, v)| (k.clone(), v.clone())));

    config.apply_env(&vars)?;
    debug!("Config: {:?}", config);
    Ok(config)
}
