//! Emission pipeline: the failure boundary around synthesis.

mod publication;

pub use publication::{Diagnostic, GeneratedUnit, Publication, Severity};

use crate::cancel::{Cancellation, Cancelled};
use crate::codegen::{CodeSynthesizer, Synthesize};
use crate::config::Config;
use crate::error::SynthesisError;
use crate::ir::{FixedArrayDeclaration, Location, GENERATOR_ID};
use quote::ToTokens;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};

/// Identifier of the one diagnostic the pipeline reports.
pub const DIAGNOSTIC_ID: &str = "FA0001";

#[derive(Debug)]
pub enum Outcome {
    /// Items replacing the declaration. The same source was published.
    Generated(Vec<syn::Item>),
    /// Synthesis failed; the diagnostic was reported and nothing published.
    Failed(Diagnostic),
}

pub struct Pipeline<S = CodeSynthesizer> {
    config: Config,
    synthesizer: S,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self::with_synthesizer(config, CodeSynthesizer)
    }
}

impl<S: Synthesize> Pipeline<S> {
    pub fn with_synthesizer(config: Config, synthesizer: S) -> Self {
        Self {
            config,
            synthesizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Synthesizes one declaration and publishes the result.
    ///
    /// Errors and panics of the synthesizer become a diagnostic attached to
    /// the declaration. Only cancellation is returned as an error, either
    /// requested before synthesis or raised by the synthesizer itself.
    pub fn emit(
        &self,
        decl: &FixedArrayDeclaration<'_>,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<Outcome, Cancelled> {
        cancel.check()?;
        let location = &decl.origin.location;

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| self.synthesizer.render(decl)));
        let result = match rendered {
            Ok(Ok(tokens)) => {
                syn::parse2::<syn::File>(tokens).map_err(|source| SynthesisError::Malformed {
                    item: location.item.clone(),
                    source,
                })
            }
            Ok(Err(err)) => Err(err),
            Err(payload) if payload.is::<Cancelled>() => return Err(Cancelled),
            Err(payload) => Err(SynthesisError::Panicked(panic_message(payload.as_ref()))),
        };

        match result {
            Ok(file) => {
                let source = format!(
                    "// @generated by {GENERATOR_ID} for `{}`\n{}\n",
                    location.path(),
                    file.to_token_stream()
                );
                self.persist(location, &source);
                publication.publish(GeneratedUnit {
                    key: location.key(),
                    location: location.clone(),
                    source,
                });
                tracing::debug!(declaration = %location, "generated fixed array");
                Ok(Outcome::Generated(file.items))
            }
            Err(SynthesisError::Cancelled(cancelled)) => Err(cancelled),
            Err(err) => {
                tracing::warn!(
                    declaration = %location,
                    error = %err,
                    "fixed array synthesis failed"
                );
                let diagnostic = Diagnostic {
                    id: DIAGNOSTIC_ID,
                    severity: Severity::Error,
                    location: location.clone(),
                    message: format!("failed to generate fixed array `{}`: {err}", location.item),
                };
                publication.report(diagnostic.clone());
                Ok(Outcome::Failed(diagnostic))
            }
        }
    }

    /// Writes the source next to the build output when enabled. Failures are
    /// logged only.
    fn persist(&self, location: &Location, source: &str) {
        if !self.config.emit_sources {
            return;
        }
        let path = self.config.source_path(location);
        let written = match path.parent() {
            Some(parent) => fs::create_dir_all(parent).and_then(|()| fs::write(&path, source)),
            None => fs::write(&path, source),
        };
        match written {
            Ok(()) => tracing::debug!(path = %path.display(), "wrote generated source"),
            Err(err) => tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to write generated source"
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
