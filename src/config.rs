//! Command line and file configuration for the `relocalize` binary.
//!
//! Every setting can come from the command line or from a TOML file given with
//! `--config`; the command line wins.
//!
//! ```toml
//! configuration_directory = "configuration_files"
//! configuration_basename = "localization.lua"
//! load_state_directory = "dataset/reference_map"
//! plot = "img/relocalization.svg"
//! degrees = true
//! ```

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::lifecycle::TrajectoryConfiguration;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("-{0} is missing.")]
    Missing(&'static str),
}

/// Restarts the current trajectory from pose estimates read on stdin, one
/// `x y heading` triple per line, anchored to the frozen trajectory 0.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// First directory in which configuration files are searched
    #[arg(long)]
    pub configuration_directory: Option<String>,

    /// Basename, i.e. not containing any directory prefix, of the configuration file
    #[arg(long)]
    pub configuration_basename: Option<String>,

    /// Directory holding trajectory_nodes.csv and submaps.csv
    #[arg(long)]
    pub load_state_directory: Option<PathBuf>,

    /// TOML file providing any of the settings above
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write an SVG of the map and the relocalized poses on exit
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Headings on stdin are in degrees instead of radians
    #[arg(long)]
    pub degrees: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub configuration_directory: Option<String>,
    pub configuration_basename: Option<String>,
    pub load_state_directory: Option<PathBuf>,
    pub plot: Option<PathBuf>,
    pub degrees: bool,
}

impl FileConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<FileConfig, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        FileConfig::from_toml(&text, path)
    }
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub trajectory: TrajectoryConfiguration,
    pub load_state_directory: PathBuf,
    pub plot: Option<PathBuf>,
    pub degrees: bool,
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

impl Settings {
    /// Merges command line over file values and checks required settings.
    pub fn resolve(args: Args, file: FileConfig) -> Result<Settings, ConfigError> {
        let configuration_basename = non_empty(
            args.configuration_basename.or(file.configuration_basename),
            "configuration_basename",
        )?;
        let configuration_directory = non_empty(
            args.configuration_directory.or(file.configuration_directory),
            "configuration_directory",
        )?;
        let load_state_directory = args
            .load_state_directory
            .or(file.load_state_directory)
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("load_state_directory"))?;

        Ok(Settings {
            trajectory: TrajectoryConfiguration {
                configuration_directory,
                configuration_basename,
            },
            load_state_directory,
            plot: args.plot.or(file.plot),
            degrees: args.degrees || file.degrees,
        })
    }

    /// Reads `--config` if given, then resolves.
    pub fn from_args(args: Args) -> Result<Settings, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Settings::resolve(args, file)
    }
}
