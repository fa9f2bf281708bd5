//! Discovery and resolution of marker declarations.
//!
//! Discovery is pure shape matching over the struct syntax; resolution looks
//! names up in the lexical [`Scope`](scope::Scope) of the enclosing module and
//! produces the [`FixedArrayDeclaration`](crate::FixedArrayDeclaration).

pub mod discover;
pub mod resolve;
pub mod scope;
