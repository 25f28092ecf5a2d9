//! Layered warehouse configuration: defaults, TOML file, environment, flags.
//!
//! Environment variables and flags arrive through clap as one layer, since
//! clap lets a flag win over its `env` fallback.

use std::fs;
use std::path::{Path, PathBuf};

use divifilter_warehouse::WarehouseConfig;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "divifilter.toml";

/// Settings accepted in `divifilter.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub divifilter_home: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub max_pool_size: Option<usize>,
}

/// Values taken from flags or their environment fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub max_pool_size: Option<usize>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            db_path: cli.db_path.clone(),
            max_pool_size: cli.pool_size,
        }
    }
}

/// Build the warehouse configuration for this invocation.
pub fn load(cli: &Cli) -> Result<WarehouseConfig, CliError> {
    let defaults = WarehouseConfig::default();
    let file = match &cli.config {
        Some(path) => Some(read_file(path)?),
        None => {
            let path = defaults.divifilter_home.join(CONFIG_FILE_NAME);
            if path.is_file() {
                Some(read_file(&path)?)
            } else {
                None
            }
        }
    };

    let config = resolve(defaults, file, &Overrides::from(cli))?;
    tracing::debug!(
        db_path = %config.db_path.display(),
        max_pool_size = config.max_pool_size,
        "resolved configuration"
    );
    Ok(config)
}

/// Apply the file and override layers on top of `base`.
pub fn resolve(
    base: WarehouseConfig,
    file: Option<FileConfig>,
    overrides: &Overrides,
) -> Result<WarehouseConfig, CliError> {
    let mut config = base;

    if let Some(file) = file {
        if let Some(home) = file.divifilter_home {
            config = WarehouseConfig {
                max_pool_size: config.max_pool_size,
                ..WarehouseConfig::with_home(home)
            };
        }
        if let Some(db_path) = file.db_path {
            config.db_path = db_path;
        }
        if let Some(size) = file.max_pool_size {
            config.max_pool_size = size;
        }
    }

    if let Some(db_path) = &overrides.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(size) = overrides.max_pool_size {
        config.max_pool_size = size;
    }

    if config.max_pool_size == 0 {
        return Err(CliError::Config(String::from(
            "max_pool_size must be at least 1",
        )));
    }
    Ok(config)
}

fn read_file(path: &Path) -> Result<FileConfig, CliError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CliError::Config(format!("cannot read '{}': {error}", path.display()))
    })?;
    toml::from_str(&raw)
        .map_err(|error| CliError::Config(format!("invalid '{}': {error}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn base() -> WarehouseConfig {
        WarehouseConfig::with_home("/srv/divifilter")
    }

    #[test]
    fn defaults_apply_without_layers() {
        let config = resolve(base(), None, &Overrides::default()).expect("resolve");
        assert_eq!(config.db_path, PathBuf::from("/srv/divifilter/warehouse.duckdb"));
        assert_eq!(config.max_pool_size, 4);
    }

    #[test]
    fn file_home_moves_default_db_path() {
        let file = FileConfig {
            divifilter_home: Some(PathBuf::from("/data/screener")),
            ..FileConfig::default()
        };
        let config = resolve(base(), Some(file), &Overrides::default()).expect("resolve");
        assert_eq!(config.divifilter_home, PathBuf::from("/data/screener"));
        assert_eq!(config.db_path, PathBuf::from("/data/screener/warehouse.duckdb"));
    }

    #[test]
    fn overrides_win_over_file() {
        let file = FileConfig {
            db_path: Some(PathBuf::from("/from/file.duckdb")),
            max_pool_size: Some(8),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            db_path: Some(PathBuf::from("/from/flag.duckdb")),
            max_pool_size: None,
        };
        let config = resolve(base(), Some(file), &overrides).expect("resolve");
        assert_eq!(config.db_path, PathBuf::from("/from/flag.duckdb"));
        assert_eq!(config.max_pool_size, 8);
    }

    #[test]
    fn zero_pool_size_is_a_config_error() {
        let overrides = Overrides {
            max_pool_size: Some(0),
            ..Overrides::default()
        };
        let error = resolve(base(), None, &overrides).expect_err("zero pool");
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn reads_toml_file_and_rejects_unknown_keys() {
        let temp = tempdir().expect("tempdir");
        let good = temp.path().join("good.toml");
        fs::write(&good, "db_path = \"/tmp/x.duckdb\"\nmax_pool_size = 2\n").expect("write");
        let file = read_file(&good).expect("read");
        assert_eq!(file.db_path, Some(PathBuf::from("/tmp/x.duckdb")));
        assert_eq!(file.max_pool_size, Some(2));

        let bad = temp.path().join("bad.toml");
        fs::write(&bad, "database = \"x\"\n").expect("write");
        assert!(matches!(read_file(&bad), Err(CliError::Config(_))));

        let missing = temp.path().join("missing.toml");
        assert!(matches!(read_file(&missing), Err(CliError::Config(_))));
    }
}
