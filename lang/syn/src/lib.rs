//! Discovery, resolution and code generation behind `#[fixed_arrays]`.
//!
//! The flow for every item of an expanded module is
//! [`discover`](parser::discover) → [`resolve`](parser::resolve) →
//! [`Pipeline::emit`], which renders the [`FixedArrayDeclaration`] through a
//! [`Synthesize`] implementation and publishes the result. Each declaration is
//! independent of the others, so hosts may drive the pipeline from several
//! threads sharing one [`Publication`].

pub mod cancel;
pub mod codegen;
pub mod config;
pub mod emit;
mod error;
mod expand;
pub mod ir;
pub mod parser;

pub use cancel::{Cancellation, Cancelled};
pub use codegen::{CodeSynthesizer, Synthesize};
pub use config::Config;
pub use emit::{Diagnostic, GeneratedUnit, Outcome, Pipeline, Publication, Severity, DIAGNOSTIC_ID};
pub use error::{ConfigError, GenerateError, SynthesisError};
pub use ir::{
    Anchor, CapabilityType, ElementType, FixedArrayDeclaration, Location, Origin, Variant,
    GENERATOR_ID,
};
