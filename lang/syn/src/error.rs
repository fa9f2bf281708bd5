use crate::cancel::Cancelled;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while rendering a resolved declaration.
///
/// Every variant but `Cancelled` is turned into a diagnostic by the emission
/// pipeline.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("`{item}` declares fields; a fixed array declaration must be field-less")]
    DeclaredFields { item: String },
    #[error("code generated for `{item}` does not parse: {source}")]
    Malformed {
        item: String,
        #[source]
        source: syn::Error,
    },
    #[error("synthesizer panicked: {0}")]
    Panicked(String),
    #[error("{0}")]
    Custom(String),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: cargo_toml::Error,
    },
    #[error("invalid value `{value}` for {name}, expected a boolean")]
    InvalidFlag { name: &'static str, value: String },
}

/// Failure of [`Pipeline::generate_source`](crate::Pipeline::generate_source).
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("source does not parse: {0}")]
    Parse(#[from] syn::Error),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}
