//! Declaration model handed from the resolver to the code synthesizer.
//!
//! A [`FixedArrayDeclaration`] is built once per qualifying struct and per
//! pass, never mutated afterwards and consumed by exactly one rendering.

use proc_macro2::Span;
use std::fmt;
use std::path::{Component, PathBuf};

/// Suffix identifying units produced by this generator.
pub const GENERATOR_ID: &str = "fixed-array";

/// Thread-safe description of where a declaration lives.
///
/// Unlike spans this can cross threads, so it keys published units and
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub crate_name: String,
    pub module_path: Vec<String>,
    pub item: String,
    /// 1-based line of the declaration ident, 0 when unknown.
    pub line: usize,
    pub column: usize,
    /// Set when `module_path` does not start at the crate root.
    pub anchor: Option<Anchor>,
}

/// Source position of an expanded module whose enclosing path is unknown,
/// as under `#[fixed_arrays]`. Keeps keys of same-named modules apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor {
    /// Source file, when the compiler reports it.
    pub file: Option<PathBuf>,
    /// 1-based line of the module name, 0 when unknown.
    pub line: usize,
}

impl Anchor {
    pub fn of(span: Span) -> Self {
        Self {
            file: span.local_file(),
            line: span.start().line,
        }
    }

    /// Relative key segments: the file path without extension, then `L<line>`.
    fn segments(&self) -> Vec<String> {
        let mut segments: Vec<String> = Vec::new();
        if let Some(file) = &self.file {
            let stem = file.with_extension("");
            segments.extend(stem.components().filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            }));
        }
        if self.line != 0 {
            segments.push(format!("L{}", self.line));
        }
        segments
    }
}

impl Location {
    /// `crate::module::Item`.
    pub fn path(&self) -> String {
        let mut segments = Vec::with_capacity(self.module_path.len() + 2);
        if !self.crate_name.is_empty() {
            segments.push(self.crate_name.as_str());
        }
        segments.extend(self.module_path.iter().map(String::as_str));
        segments.push(self.item.as_str());
        segments.join("::")
    }

    /// Deterministic, relative file name of the unit generated for this location.
    pub fn key(&self) -> String {
        let anchor = self.anchor.as_ref().map(Anchor::segments).unwrap_or_default();
        let mut segments = Vec::with_capacity(anchor.len() + self.module_path.len() + 1);
        if !self.crate_name.is_empty() {
            segments.push(self.crate_name.as_str());
        }
        segments.extend(anchor.iter().map(String::as_str));
        segments.extend(self.module_path.iter().map(String::as_str));
        let file = format!("{}.{}.rs", self.item, GENERATOR_ID);
        if segments.is_empty() {
            file
        } else {
            format!("{}/{}", segments.join("/"), file)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.path())
        } else {
            write!(f, "{} ({}:{})", self.path(), self.line, self.column + 1)
        }
    }
}

/// Back-reference to the declaration a model was resolved from.
#[derive(Debug, Clone)]
pub struct Origin<'a> {
    pub item: &'a syn::ItemStruct,
    pub location: Location,
}

impl Origin<'_> {
    pub fn span(&self) -> Span {
        self.item.ident.span()
    }
}

/// Resolved element type.
#[derive(Debug, Clone)]
pub struct ElementType {
    pub ty: syn::Type,
    /// Token rendering of `ty`, for logs and diagnostics.
    pub name: String,
}

/// The confirmed capability bound.
#[derive(Debug, Clone)]
pub struct CapabilityType {
    /// The bound as written, e.g. `FixedArray<u32>`.
    pub path: syn::Path,
    /// Fully-qualified name it resolved to.
    pub qualified: String,
}

#[derive(Debug, Clone)]
pub struct FixedArrayDeclaration<'a> {
    pub origin: Origin<'a>,
    pub capacity: usize,
    pub element_type: ElementType,
    pub capability_type: CapabilityType,
    /// Indices into `origin.item.attrs` of capacity markers, stripped from the output.
    pub consumed_attrs: Vec<usize>,
}

/// The two structurally distinct shapes of generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Empty,
    Sized(usize),
}

impl FixedArrayDeclaration<'_> {
    pub fn variant(&self) -> Variant {
        match self.capacity {
            0 => Variant::Empty,
            n => Variant::Sized(n),
        }
    }
}
