use crate::error::SynthesisError;
use crate::ir::FixedArrayDeclaration;
use proc_macro2::TokenStream;
use quote::quote;

mod capability;
mod common;
mod indexer;
mod iterator;
mod length;
mod storage;
mod view;

/// Renders a resolved declaration into Rust items.
///
/// Implementations must be pure: the pipeline may call `render` for
/// independent declarations from several threads.
pub trait Synthesize {
    fn render(&self, decl: &FixedArrayDeclaration<'_>) -> Result<TokenStream, SynthesisError>;
}

/// The synthesizer used by `#[fixed_arrays]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSynthesizer;

impl Synthesize for CodeSynthesizer {
    fn render(&self, decl: &FixedArrayDeclaration<'_>) -> Result<TokenStream, SynthesisError> {
        generate(decl)
    }
}

pub fn generate(decl: &FixedArrayDeclaration<'_>) -> Result<TokenStream, SynthesisError> {
    if !decl.origin.item.fields.is_empty() {
        return Err(SynthesisError::DeclaredFields {
            item: decl.origin.item.ident.to_string(),
        });
    }

    let target = common::Target::new(decl);
    let storage = storage::generate(&target);
    let length = length::generate(&target);
    let indexer = indexer::generate(&target);
    let view = view::generate(&target);
    let iterator = iterator::generate(&target);
    let capability = capability::generate(&target);

    Ok(quote! {
        #storage
        #length
        #indexer
        #view
        #iterator
        #capability
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Cancellation;
    use crate::parser::resolve::{resolve, SemanticContext};
    use crate::parser::scope::Scope;
    use syn::{parse_quote, Item, ItemStruct};

    fn render(item: &ItemStruct) -> Result<syn::File, SynthesisError> {
        let prelude: syn::File = parse_quote!(use fixed_array::FixedArray;);
        let scope = Scope::from_items(&prelude.items, None);
        let ctx = SemanticContext {
            scope: &scope,
            crate_name: "app",
            module_path: &[],
            anchor: None,
        };
        let decl = resolve(item, &ctx, &Cancellation::never())
            .unwrap()
            .expect("declaration resolves");
        let tokens = generate(&decl)?;
        Ok(syn::parse2(tokens).expect("generated code parses"))
    }

    fn structs(file: &syn::File) -> Vec<&ItemStruct> {
        file.items
            .iter()
            .filter_map(|item| match item {
                Item::Struct(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    fn trait_impls(file: &syn::File) -> Vec<String> {
        file.items
            .iter()
            .filter_map(|item| match item {
                Item::Impl(item) => item.trait_.as_ref().map(|(_, path, _)| {
                    path.segments
                        .iter()
                        .map(|s| s.ident.to_string())
                        .collect::<Vec<_>>()
                        .join("::")
                }),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sized_declaration_gets_storage_and_every_impl() {
        let item: ItemStruct = parse_quote! {
            #[derive(Clone, Copy)]
            #[fixed_array_size(4)]
            pub struct Quad where Self: FixedArray<u32>;
        };
        let file = render(&item).unwrap();

        let structs = structs(&file);
        assert_eq!(structs.len(), 2);
        let quad = structs[0];
        assert_eq!(quad.ident, "Quad");
        assert!(quad.generics.where_clause.is_none());
        assert_eq!(quad.fields.len(), 1);
        let storage = quad.fields.iter().next().unwrap();
        let expected: syn::Type = parse_quote!([u32; 4usize]);
        assert_eq!(storage.ty, expected);
        assert!(quad.attrs.iter().any(|a| a.path().is_ident("repr")));
        assert!(!quad
            .attrs
            .iter()
            .any(|a| a.path().is_ident("fixed_array_size")));
        assert_eq!(structs[1].ident, "QuadIter");

        assert_eq!(
            trait_impls(&file),
            vec![
                "core::default::Default",
                "core::ops::Index",
                "core::ops::IndexMut",
                "fixed_array::Enumerator",
                "core::iter::Iterator",
                "core::iter::ExactSizeIterator",
                "core::iter::FusedIterator",
                "FixedArray",
                "core::iter::IntoIterator",
            ]
        );
    }

    #[test]
    fn empty_declaration_has_no_storage() {
        let item: ItemStruct = parse_quote! {
            pub struct Nothing where Self: FixedArray<String>;
        };
        let file = render(&item).unwrap();
        let structs = structs(&file);
        assert!(structs[0].fields.is_empty());
        let tokens = quote!(#file).to_string();
        assert!(!tokens.contains("storage"));
        assert!(tokens.contains("out_of_range (index , 0usize)"));
    }

    #[test]
    fn user_repr_and_derived_default_are_respected() {
        let item: ItemStruct = parse_quote! {
            #[derive(Default)]
            #[repr(transparent)]
            #[fixed_array_size(1)]
            struct One where Self: FixedArray<u8>;
        };
        let file = render(&item).unwrap();
        let one = structs(&file)[0];
        let reprs: Vec<_> = one
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("repr"))
            .collect();
        assert_eq!(reprs.len(), 1);
        assert!(!trait_impls(&file).contains(&"core::default::Default".to_string()));
    }

    #[test]
    fn generic_declaration_is_anchored() {
        let item: ItemStruct = parse_quote! {
            #[fixed_array_size(2)]
            pub struct Pair<'a, T: Clone> where Self: Send + FixedArray<&'a T>, T: 'a;
        };
        let file = render(&item).unwrap();
        let structs = structs(&file);

        let pair = structs[0];
        let names: Vec<_> = pair
            .fields
            .iter()
            .map(|f| f.ident.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["storage", "__marker"]);
        let pair_where = pair.generics.where_clause.as_ref().unwrap();
        assert_eq!(quote!(#pair_where).to_string(), "where T : 'a");
        let index = file
            .items
            .iter()
            .find_map(|item| match item {
                Item::Impl(item) if item.trait_.is_some() && item.items.len() == 2 => Some(item),
                _ => None,
            })
            .unwrap();
        let index_where = quote!(#index).to_string();
        assert!(index_where.contains("Self : Send"));
        assert!(!index_where.contains("FixedArray"));

        let iter = structs[1];
        let params: Vec<_> = iter
            .generics
            .params
            .iter()
            .map(|p| quote!(#p).to_string())
            .collect();
        assert_eq!(params, vec!["'__fa", "'a", "T : Clone"]);
        let iter_where = iter.generics.where_clause.as_ref().unwrap();
        assert_eq!(iter_where.predicates.len(), 1);
    }

    #[test]
    fn fields_are_a_synthesis_failure() {
        let item: ItemStruct = parse_quote! {
            struct Quad where Self: FixedArray<u32> { extra: u8 }
        };
        assert!(matches!(
            render(&item),
            Err(SynthesisError::DeclaredFields { item }) if item == "Quad"
        ));
    }
}
