use crate::cancel::{Cancellation, Cancelled};
use syn::{
    GenericArgument, Item, ItemStruct, PathArguments, TraitBound, Type, TypeParamBound,
    WherePredicate,
};

/// Last path segment naming the capability. Discovery compares names only,
/// the resolver confirms what they refer to.
pub const CAPABILITY_NAME: &str = "FixedArray";

/// Structural candidate test, run over every item of an expanded module.
pub fn matches(item: &Item, cancel: &Cancellation) -> Result<bool, Cancelled> {
    cancel.check()?;
    Ok(match item {
        Item::Struct(item) => is_candidate(item),
        _ => false,
    })
}

pub fn is_candidate(item: &ItemStruct) -> bool {
    self_bounds(&item.generics).any(|bound| {
        single_type_argument(bound).is_some()
            && bound
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == CAPABILITY_NAME)
    })
}

/// Trait bounds placed on `Self` in the where clause, in declaration order.
pub fn self_bounds(generics: &syn::Generics) -> impl Iterator<Item = &TraitBound> {
    generics
        .where_clause
        .iter()
        .flat_map(|clause| clause.predicates.iter())
        .filter_map(|predicate| match predicate {
            WherePredicate::Type(predicate) if is_self(&predicate.bounded_ty) => {
                Some(predicate.bounds.iter())
            }
            _ => None,
        })
        .flatten()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) => Some(bound),
            _ => None,
        })
}

/// The type argument of `Trait<T>`, when it is the only generic argument.
pub fn single_type_argument(bound: &TraitBound) -> Option<&Type> {
    let PathArguments::AngleBracketed(arguments) = &bound.path.segments.last()?.arguments else {
        return None;
    };
    if arguments.args.len() != 1 {
        return None;
    }
    match arguments.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

pub(crate) fn is_self(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("Self"),
        Type::Paren(inner) => is_self(&inner.elem),
        Type::Group(inner) => is_self(&inner.elem),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn matches_item(item: Item) -> bool {
        matches(&item, &Cancellation::never()).unwrap()
    }

    #[test]
    fn accepts_a_single_argument_capability_bound() {
        assert!(matches_item(parse_quote! {
            pub struct Quad where Self: FixedArray<u32>;
        }));
        assert!(matches_item(parse_quote! {
            struct Quad where Self: Clone + ::fixed_array::FixedArray<[u8; 2]>;
        }));
        assert!(matches_item(parse_quote! {
            struct Pair<T> where T: Copy, Self: other::FixedArray<T>;
        }));
    }

    #[test]
    fn rejects_other_shapes() {
        // no where clause
        assert!(!matches_item(parse_quote!(struct Quad;)));
        // bound on a type parameter instead of Self
        assert!(!matches_item(parse_quote! {
            struct Quad<T> where T: FixedArray<u32>;
        }));
        // wrong arity or a non-type argument
        assert!(!matches_item(parse_quote! {
            struct Quad where Self: FixedArray;
        }));
        assert!(!matches_item(parse_quote! {
            struct Quad where Self: FixedArray<u32, u64>;
        }));
        assert!(!matches_item(parse_quote! {
            struct Quad where Self: FixedArray<'static>;
        }));
        assert!(!matches_item(parse_quote! {
            struct Quad where Self: FixedVec<u32>;
        }));
        // not a struct
        assert!(!matches_item(parse_quote! {
            enum Quad where Self: FixedArray<u32> { A }
        }));
        assert!(!matches_item(parse_quote! {
            trait Quad where Self: FixedArray<u32> {}
        }));
    }

    #[test]
    fn checks_cancellation_first() {
        let cancel = Cancellation::new();
        cancel.cancel();
        let item: Item = parse_quote!(struct Quad where Self: FixedArray<u32>;);
        assert_eq!(matches(&item, &cancel), Err(Cancelled));
    }
}
