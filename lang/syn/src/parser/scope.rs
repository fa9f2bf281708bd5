//! Lexical name resolution over the `use` items of a module.
//!
//! This is the semantic context available at macro expansion time: there is
//! no type checker, so names are resolved the way `use` declarations bind
//! them, with the extern prelude as fallback for multi-segment paths.

use std::collections::BTreeMap;
use syn::{Item, UseTree};

/// Crate defining the capability.
pub const CAPABILITY_CRATE: &str = "fixed_array";
/// Fully-qualified capability trait.
pub const CAPABILITY_PATH: &str = "fixed_array::FixedArray";
/// Capacity marker attribute name, usable without import.
pub const SIZE_MARKER: &str = "fixed_array_size";
/// Fully-qualified capacity marker.
pub const SIZE_MARKER_PATH: &str = "fixed_array::fixed_array_size";

const CRATE_EXPORTS: &[&str] = &[
    "Enumerator",
    "FixedArray",
    "IndexOutOfRange",
    "fixed_array_size",
    "fixed_arrays",
    "prelude",
];
const PRELUDE_EXPORTS: &[&str] = &["Enumerator", "FixedArray", "IndexOutOfRange", "fixed_arrays"];

#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Local name to the path it was imported from.
    bindings: BTreeMap<String, Vec<String>>,
    /// Prefixes of glob imports whose exports are known.
    globs: Vec<Vec<String>>,
}

impl Scope {
    /// Builds the scope of a module from its items. `parent` is the scope of
    /// the enclosing module, consulted for `super::` imports.
    pub fn from_items(items: &[Item], parent: Option<&Scope>) -> Self {
        let mut scope = Scope::default();
        for item in items {
            if let Item::Use(item_use) = item {
                scope.add_tree(&mut Vec::new(), &item_use.tree, parent);
            }
        }
        scope
    }

    /// Resolves a path (type or trait position) to its fully-qualified name.
    pub fn resolve(&self, path: &syn::Path) -> Option<String> {
        let segments = segments(path);
        if path.leading_colon.is_some() {
            return Some(canonical(segments));
        }
        self.resolve_segments(&segments).map(canonical)
    }

    /// Like [`Scope::resolve`], with the bare capacity marker name treated as
    /// an inert helper attribute when nothing shadows it.
    pub fn resolve_attribute(&self, path: &syn::Path) -> Option<String> {
        if path.leading_colon.is_none()
            && path.is_ident(SIZE_MARKER)
            && !self.bindings.contains_key(SIZE_MARKER)
        {
            return Some(SIZE_MARKER_PATH.to_string());
        }
        self.resolve(path)
    }

    fn resolve_segments(&self, segments: &[String]) -> Option<Vec<String>> {
        let (first, rest) = segments.split_first()?;
        if let Some(target) = self.bindings.get(first) {
            return Some(target.iter().chain(rest).cloned().collect());
        }
        for glob in &self.globs {
            if exports(glob).contains(&first.as_str()) {
                return Some(glob.iter().chain(segments).cloned().collect());
            }
        }
        // Extern prelude: `some_crate::Item` needs no import.
        if rest.is_empty() || matches!(first.as_str(), "self" | "super" | "crate" | "Self") {
            None
        } else {
            Some(segments.to_vec())
        }
    }

    fn add_tree(&mut self, prefix: &mut Vec<String>, tree: &UseTree, parent: Option<&Scope>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.add_tree(prefix, &path.tree, parent);
                prefix.pop();
            }
            UseTree::Name(name) => {
                if name.ident == "self" {
                    if let Some(last) = prefix.last() {
                        let local = last.clone();
                        self.bind(local, prefix.clone(), parent);
                    }
                } else {
                    let mut target = prefix.clone();
                    target.push(name.ident.to_string());
                    self.bind(name.ident.to_string(), target, parent);
                }
            }
            UseTree::Rename(rename) => {
                if rename.rename == "_" {
                    return;
                }
                let mut target = prefix.clone();
                if rename.ident != "self" {
                    target.push(rename.ident.to_string());
                }
                self.bind(rename.rename.to_string(), target, parent);
            }
            UseTree::Glob(_) => match (prefix.as_slice(), parent) {
                ([only], Some(parent)) if only == "super" => self.inherit(parent),
                _ => self.globs.push(prefix.clone()),
            },
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.add_tree(prefix, tree, parent);
                }
            }
        }
    }

    fn bind(&mut self, local: String, target: Vec<String>, parent: Option<&Scope>) {
        let inherited = match (target.split_first(), parent) {
            (Some((first, rest)), Some(parent)) if first == "super" => {
                parent.resolve_segments(rest)
            }
            _ => None,
        };
        self.bindings
            .entry(local)
            .or_insert(inherited.unwrap_or(target));
    }

    fn inherit(&mut self, parent: &Scope) {
        for (local, target) in &parent.bindings {
            self.bindings
                .entry(local.clone())
                .or_insert_with(|| target.clone());
        }
        self.globs.extend(parent.globs.iter().cloned());
    }
}

fn segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

fn exports(glob: &[String]) -> &'static [&'static str] {
    match glob {
        [krate] if krate == CAPABILITY_CRATE => CRATE_EXPORTS,
        [krate, module] if krate == CAPABILITY_CRATE && module == "prelude" => PRELUDE_EXPORTS,
        _ => &[],
    }
}

/// Maps prelude re-exports back to the crate root.
fn canonical(mut segments: Vec<String>) -> String {
    if segments.len() == 3 && segments[0] == CAPABILITY_CRATE && segments[1] == "prelude" {
        segments.remove(1);
    }
    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn scope(file: syn::File) -> Scope {
        Scope::from_items(&file.items, None)
    }

    fn resolve(scope: &Scope, path: syn::Path) -> Option<String> {
        scope.resolve(&path)
    }

    #[test]
    fn direct_and_renamed_imports() {
        let scope = scope(parse_quote! {
            use fixed_array::FixedArray;
            use fixed_array::FixedArray as Capability;
            use other::{self as alias, Thing};
        });
        assert_eq!(
            resolve(&scope, parse_quote!(FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );
        assert_eq!(
            resolve(&scope, parse_quote!(Capability)).as_deref(),
            Some(CAPABILITY_PATH)
        );
        assert_eq!(
            resolve(&scope, parse_quote!(alias::Thing)).as_deref(),
            Some("other::Thing")
        );
        assert_eq!(resolve(&scope, parse_quote!(Thing)).as_deref(), Some("other::Thing"));
    }

    #[test]
    fn crate_and_prelude_globs() {
        let krate = scope(parse_quote!(use fixed_array::*;));
        assert_eq!(
            resolve(&krate, parse_quote!(FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );

        let prelude = scope(parse_quote!(use ::fixed_array::prelude::*;));
        assert_eq!(
            resolve(&prelude, parse_quote!(FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );

        let unknown = scope(parse_quote!(use somewhere::*;));
        assert_eq!(resolve(&unknown, parse_quote!(FixedArray)), None);
    }

    #[test]
    fn prelude_path_is_canonical() {
        let scope = scope(parse_quote!(use fixed_array::prelude::FixedArray;));
        assert_eq!(
            resolve(&scope, parse_quote!(FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );
    }

    #[test]
    fn qualified_paths_use_the_extern_prelude() {
        let scope = Scope::default();
        assert_eq!(
            resolve(&scope, parse_quote!(fixed_array::FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );
        assert_eq!(
            resolve(&scope, parse_quote!(::fixed_array::FixedArray)).as_deref(),
            Some(CAPABILITY_PATH)
        );
        assert_eq!(resolve(&scope, parse_quote!(FixedArray)), None);
        assert_eq!(resolve(&scope, parse_quote!(crate::FixedArray)), None);
    }

    #[test]
    fn super_imports_consult_the_parent() {
        let parent = scope(parse_quote!(use fixed_array::FixedArray as Fa;));
        let glob: syn::File = parse_quote!(use super::*;);
        let child = Scope::from_items(&glob.items, Some(&parent));
        assert_eq!(
            resolve(&child, parse_quote!(Fa)).as_deref(),
            Some(CAPABILITY_PATH)
        );

        let named: syn::File = parse_quote!(use super::Fa as Capability;);
        let child = Scope::from_items(&named.items, Some(&parent));
        assert_eq!(
            resolve(&child, parse_quote!(Capability)).as_deref(),
            Some(CAPABILITY_PATH)
        );
    }

    #[test]
    fn size_marker_is_a_helper_unless_shadowed() {
        let plain = Scope::default();
        assert_eq!(
            plain.resolve_attribute(&parse_quote!(fixed_array_size)).as_deref(),
            Some(SIZE_MARKER_PATH)
        );
        assert_eq!(
            plain
                .resolve_attribute(&parse_quote!(fixed_array::fixed_array_size))
                .as_deref(),
            Some(SIZE_MARKER_PATH)
        );

        let shadowed = scope(parse_quote!(use other::fixed_array_size;));
        assert_eq!(
            shadowed
                .resolve_attribute(&parse_quote!(fixed_array_size))
                .as_deref(),
            Some("other::fixed_array_size")
        );
    }
}
