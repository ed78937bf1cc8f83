/// Command line and config file handling for the terminal host.
use anyhow::{Context, Result};
use bunview_core::StageConfig;
use clap::Parser;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "bunview.toml";

#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(
    name = "bunview-terminal",
    version,
    about = "Interactive bunny scene in the terminal"
)]
pub struct Args {
    /// TOML stage config (defaults to ./bunview.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// STL file to show instead of the configured asset
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,
}

/// Explicit path must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<StageConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                debug!("no {DEFAULT_CONFIG_FILE}, using built-in defaults");
                return Ok(StageConfig::default());
            }
            default
        }
    };
    let text = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(text: &str) -> Result<StageConfig> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("bunview-terminal").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--config", "stage.toml", "bunny.stl"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("stage.toml")));
        assert_eq!(parsed.model, Some(PathBuf::from("bunny.stl")));
        let short = args(&["-c", "stage.toml"]).unwrap();
        assert_eq!(short.config, Some(PathBuf::from("stage.toml")));
        assert_eq!(short.model, None);
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_bad_args() {
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.stl", "b.stl"]).is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            "[controls]\nmin_distance = 3.0\n\n[drag.desktop]\nx = 5.0\nz = 2.0\n",
        )
        .unwrap();
        assert_eq!(config.controls.min_distance, 3.0);
        assert_eq!(config.controls.max_distance, 5.0);
        assert_eq!(config.drag.desktop.x, 5.0);
        assert_eq!(config.model.rest_scale, 0.9);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/bunview.toml"))).is_err());
    }
}
