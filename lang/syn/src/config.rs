//! Build configuration handed to the emission pipeline.
//!
//! Values come from the environment cargo sets for the crate being compiled
//! and from its manifest:
//!
//! ```toml
//! [package.metadata.fixed-array]
//! emit-sources = true
//! output-dir = "target/fixed-array"
//! ```
//!
//! `FIXED_ARRAY_EMIT_SOURCES` and `FIXED_ARRAY_OUTPUT_DIR` override the
//! manifest.

use crate::error::ConfigError;
use crate::ir::Location;
use heck::ToSnakeCase;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const MANIFEST_DIR_ENV: &str = "CARGO_MANIFEST_DIR";
pub const CRATE_NAME_ENV: &str = "CARGO_CRATE_NAME";
pub const PACKAGE_NAME_ENV: &str = "CARGO_PKG_NAME";
pub const EMIT_SOURCES_ENV: &str = "FIXED_ARRAY_EMIT_SOURCES";
pub const OUTPUT_DIR_ENV: &str = "FIXED_ARRAY_OUTPUT_DIR";

const DEFAULT_OUTPUT_DIR: &str = "target/fixed-array";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the host crate's `Cargo.toml`.
    pub project_root: PathBuf,
    pub crate_name: String,
    /// Also write every generated unit under `output_dir`.
    pub emit_sources: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct PackageMetadata {
    #[serde(rename = "fixed-array")]
    fixed_array: Option<Settings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Settings {
    emit_sources: Option<bool>,
    output_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(project_root: impl Into<PathBuf>, crate_name: impl Into<String>) -> Self {
        let project_root = project_root.into();
        Self {
            output_dir: project_root.join(DEFAULT_OUTPUT_DIR),
            project_root,
            crate_name: crate_name.into(),
            emit_sources: false,
        }
    }

    pub fn with_emit_sources(mut self, emit_sources: bool) -> Self {
        self.emit_sources = emit_sources;
        self
    }

    /// Relative directories are taken from the project root.
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = self.project_root.join(output_dir);
        self
    }

    /// Configuration of the crate currently being compiled.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let project_root = var(MANIFEST_DIR_ENV).ok_or(ConfigError::MissingEnv(MANIFEST_DIR_ENV))?;
        let crate_name = var(CRATE_NAME_ENV)
            .or_else(|| var(PACKAGE_NAME_ENV).map(|name| name.to_snake_case()))
            .ok_or(ConfigError::MissingEnv(CRATE_NAME_ENV))?;

        let mut config = Self::load(project_root, crate_name)?;
        if let Some(value) = var(EMIT_SOURCES_ENV) {
            config.emit_sources = parse_flag(EMIT_SOURCES_ENV, &value)?;
        }
        if let Some(dir) = var(OUTPUT_DIR_ENV).filter(|dir| !dir.is_empty()) {
            config = config.with_output_dir(dir);
        }
        Ok(config)
    }

    /// Reads `[package.metadata.fixed-array]` from `<project_root>/Cargo.toml`.
    /// A missing manifest leaves the defaults.
    pub fn load(
        project_root: impl Into<PathBuf>,
        crate_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::new(project_root, crate_name);
        let path = config.project_root.join("Cargo.toml");
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(config),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let manifest = cargo_toml::Manifest::<PackageMetadata>::from_slice_with_metadata(&bytes)
            .map_err(|source| ConfigError::Manifest {
                path: path.clone(),
                source,
            })?;

        let settings = manifest
            .package
            .and_then(|package| package.metadata)
            .and_then(|metadata| metadata.fixed_array)
            .unwrap_or_default();
        if let Some(emit_sources) = settings.emit_sources {
            config.emit_sources = emit_sources;
        }
        if let Some(dir) = settings.output_dir {
            config = config.with_output_dir(dir);
        }
        tracing::debug!(manifest = %path.display(), ?config, "loaded fixed array configuration");
        Ok(config)
    }

    /// Where the unit generated for `location` is written.
    pub fn source_path(&self, location: &Location) -> PathBuf {
        self.output_dir.join(location.key())
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
