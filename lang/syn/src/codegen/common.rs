use crate::ir::{FixedArrayDeclaration, Variant};
use crate::parser::discover::is_self;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, GenericParam, Generics, Ident, Lifetime, LifetimeParam, LitInt, Token, Type,
    TypeParamBound, Visibility, WherePredicate,
};

/// Lifetime of the borrow held by generated iterators.
pub const ITER_LIFETIME: &str = "'__fa";

/// Everything the renderers need, derived once from the declaration.
pub struct Target<'d> {
    pub ident: &'d Ident,
    pub vis: &'d Visibility,
    /// User attributes minus the capacity markers.
    pub attrs: Vec<&'d Attribute>,
    pub elem: &'d Type,
    pub capability: &'d syn::Path,
    pub variant: Variant,
    pub iter_ident: Ident,
    /// Declaration generics with the capability bound removed, for impls on
    /// the declaration.
    pub generics: Generics,
    /// Same without any `Self` predicate, for the struct definitions.
    pub struct_generics: Generics,
    /// `'__fa` followed by the declaration generics, without `Self` predicates.
    pub iter_generics: Generics,
}

impl<'d> Target<'d> {
    pub fn new(decl: &'d FixedArrayDeclaration<'_>) -> Self {
        let item = decl.origin.item;
        let attrs = item
            .attrs
            .iter()
            .enumerate()
            .filter(|(index, _)| !decl.consumed_attrs.contains(index))
            .map(|(_, attr)| attr)
            .collect();
        let generics = strip_capability(&item.generics, &decl.capability_type.path);
        let struct_generics = without_self_predicates(&generics);
        let mut iter_generics = struct_generics.clone();
        iter_generics.params.insert(
            0,
            GenericParam::Lifetime(LifetimeParam::new(lifetime())),
        );

        Self {
            ident: &item.ident,
            vis: &item.vis,
            attrs,
            elem: &decl.element_type.ty,
            capability: &decl.capability_type.path,
            variant: decl.variant(),
            iter_ident: format_ident!("{}Iter", item.ident),
            generics,
            struct_generics,
            iter_generics,
        }
    }

    /// `Decl<..>` as a type.
    pub fn ty(&self) -> TokenStream {
        let ident = self.ident;
        let (_, ty_generics, _) = self.generics.split_for_impl();
        quote!(#ident #ty_generics)
    }

    /// `DeclIter<'__fa, ..>` as a type.
    pub fn iter_ty(&self) -> TokenStream {
        let ident = &self.iter_ident;
        let (_, ty_generics, _) = self.iter_generics.split_for_impl();
        quote!(#ident #ty_generics)
    }

    pub fn capacity(&self) -> usize {
        match self.variant {
            Variant::Empty => 0,
            Variant::Sized(capacity) => capacity,
        }
    }

    /// The capacity as a `usize`-suffixed literal.
    pub fn capacity_lit(&self) -> LitInt {
        usize_lit(self.capacity())
    }

    /// Iterator index once the last slot has been passed.
    pub fn sentinel_lit(&self) -> LitInt {
        usize_lit(self.capacity().saturating_add(1))
    }

    /// Type of the field anchoring declared type and lifetime parameters.
    pub fn marker_type(&self) -> Option<TokenStream> {
        let anchors: Vec<TokenStream> = self
            .generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => {
                    let ident = &param.ident;
                    Some(quote!(#ident))
                }
                GenericParam::Lifetime(param) => {
                    let lifetime = &param.lifetime;
                    Some(quote!(&#lifetime ()))
                }
                GenericParam::Const(_) => None,
            })
            .collect();
        if anchors.is_empty() {
            return None;
        }
        Some(quote!(::core::marker::PhantomData<fn() -> (#(#anchors,)*)>))
    }

    /// `__marker: PhantomData,` in struct expressions, when there is a marker field.
    pub fn marker_init(&self) -> Option<TokenStream> {
        self.marker_type()
            .map(|_| quote!(__marker: ::core::marker::PhantomData,))
    }

    pub fn derives(&self, name: &str) -> bool {
        self.attrs
            .iter()
            .filter(|attr| attr.path().is_ident("derive"))
            .any(|attr| {
                attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                    .is_ok_and(|paths| {
                        paths
                            .iter()
                            .any(|path| path.segments.last().is_some_and(|s| s.ident == name))
                    })
            })
    }

    pub fn has_repr(&self) -> bool {
        self.attrs.iter().any(|attr| attr.path().is_ident("repr"))
    }
}

pub fn lifetime() -> Lifetime {
    Lifetime::new(ITER_LIFETIME, Span::call_site())
}

fn usize_lit(value: usize) -> LitInt {
    LitInt::new(&format!("{value}usize"), Span::call_site())
}

/// Appends `predicate` to the where clause of a copy of `generics`.
pub fn with_predicate(generics: &Generics, predicate: WherePredicate) -> Generics {
    let mut generics = generics.clone();
    generics.make_where_clause().predicates.push(predicate);
    generics
}

/// Removes the first `Self: <capability>` bound, dropping the predicate if it
/// had no other bounds.
fn strip_capability(generics: &Generics, capability: &syn::Path) -> Generics {
    let mut generics = generics.clone();
    let Some(clause) = generics.where_clause.as_mut() else {
        return generics;
    };
    let mut removed = false;
    for mut predicate in std::mem::take(&mut clause.predicates) {
        if let WherePredicate::Type(bounded) = &mut predicate {
            if !removed && is_self(&bounded.bounded_ty) {
                for bound in std::mem::take(&mut bounded.bounds) {
                    let is_capability = !removed
                        && matches!(&bound, TypeParamBound::Trait(b) if b.path == *capability);
                    if is_capability {
                        removed = true;
                    } else {
                        bounded.bounds.push(bound);
                    }
                }
                if bounded.bounds.is_empty() {
                    continue;
                }
            }
        }
        clause.predicates.push(predicate);
    }
    if clause.predicates.is_empty() {
        generics.where_clause = None;
    }
    generics
}

/// A struct definition can not be bounded by its own traits without cycles,
/// and on the iterator `Self` means something else.
fn without_self_predicates(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    if let Some(clause) = generics.where_clause.as_mut() {
        clause.predicates = std::mem::take(&mut clause.predicates)
            .into_iter()
            .filter(|predicate| {
                !matches!(predicate, WherePredicate::Type(bounded) if is_self(&bounded.bounded_ty))
            })
            .collect();
        if clause.predicates.is_empty() {
            generics.where_clause = None;
        }
    }
    generics
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn tokens(generics: &Generics) -> String {
        let where_clause = &generics.where_clause;
        quote!(#generics #where_clause).to_string()
    }

    #[test]
    fn strips_only_the_capability_bound() {
        let mut generics: Generics = parse_quote!(<T>);
        generics.where_clause = Some(parse_quote!(where Self: Clone + FixedArray<T>, T: Copy));
        let capability: syn::Path = parse_quote!(FixedArray<T>);

        let stripped = strip_capability(&generics, &capability);
        assert_eq!(tokens(&stripped), "< T > where Self : Clone , T : Copy");

        let iter = without_self_predicates(&stripped);
        assert_eq!(tokens(&iter), "< T > where T : Copy");
    }

    #[test]
    fn empty_where_clause_is_removed() {
        let mut generics = Generics::default();
        generics.where_clause = Some(parse_quote!(where Self: FixedArray<u8>));
        let capability: syn::Path = parse_quote!(FixedArray<u8>);
        assert!(strip_capability(&generics, &capability)
            .where_clause
            .is_none());
    }
}
