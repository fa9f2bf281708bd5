use super::common::{lifetime, Target};
use crate::ir::Variant;
use proc_macro2::TokenStream;
use quote::quote;

/// The `<Decl>Iter` cursor, its protocol impls and the `iter()` entry point.
///
/// The sized cursor borrows the array, walks `index` from 0 and caches a
/// reference to the current slot. Past the last slot the index parks at
/// `capacity + 1`. The empty cursor carries no state.
pub fn generate(target: &Target<'_>) -> TokenStream {
    let ty = target.ty();
    let vis = target.vis;
    let elem = target.elem;
    let lifetime = lifetime();
    let iter_ident = &target.iter_ident;
    let iter_ty = target.iter_ty();
    let iter_generics = &target.iter_generics;
    let iter_where = &iter_generics.where_clause;
    let (impl_generics, _, where_clause) = iter_generics.split_for_impl();
    let (decl_impl_generics, _, decl_where_clause) = target.generics.split_for_impl();
    let doc = format!("Cursor over the slots of [`{}`], in index order.", target.ident);

    let state = match target.variant {
        Variant::Empty => State {
            fields: quote! {
                base: ::core::marker::PhantomData<&#lifetime #ty>,
            },
            init: quote! {
                let _ = base;
                Self { base: ::core::marker::PhantomData }
            },
            advance: quote!(false),
            current: quote!(::core::option::Option::None),
            reset: quote!(),
            next: quote!(::core::option::Option::None),
            remaining: quote!(0usize),
        },
        Variant::Sized(_) => {
            let capacity = target.capacity_lit();
            let sentinel = target.sentinel_lit();
            State {
                fields: quote! {
                    base: &#lifetime #ty,
                    index: usize,
                    current: ::core::option::Option<&#lifetime #elem>,
                },
                init: quote! {
                    Self {
                        base,
                        index: 0usize,
                        current: ::core::option::Option::None,
                    }
                },
                advance: quote! {
                    // Copied out so the cached reference keeps the array's lifetime.
                    let base = self.base;
                    if self.index < #capacity {
                        self.current = ::core::option::Option::Some(&base.storage[self.index]);
                        self.index += 1usize;
                        true
                    } else {
                        self.index = #sentinel;
                        self.current = ::core::option::Option::None;
                        false
                    }
                },
                current: quote!(self.current),
                reset: quote! {
                    self.index = 0usize;
                    self.current = ::core::option::Option::None;
                },
                next: quote! {
                    if <Self as ::fixed_array::Enumerator<#elem>>::advance(self) {
                        self.current
                    } else {
                        ::core::option::Option::None
                    }
                },
                remaining: quote!(#capacity.saturating_sub(self.index)),
            }
        }
    };
    let State {
        fields,
        init,
        advance,
        current,
        reset,
        next,
        remaining,
    } = state;

    quote! {
        #[doc = #doc]
        #vis struct #iter_ident #iter_generics #iter_where {
            #fields
        }

        impl #impl_generics #iter_ty #where_clause {
            /// Positions a new cursor before the first slot of `base`.
            #[inline]
            pub fn new(base: &#lifetime #ty) -> Self {
                #init
            }
        }

        #[automatically_derived]
        impl #impl_generics ::fixed_array::Enumerator<#elem> for #iter_ty #where_clause {
            #[inline]
            fn advance(&mut self) -> bool {
                #advance
            }

            #[inline]
            fn current(&self) -> ::core::option::Option<&#elem> {
                #current
            }

            #[inline]
            fn reset(&mut self) {
                #reset
            }

            #[inline]
            fn dispose(&mut self) {}
        }

        #[automatically_derived]
        impl #impl_generics ::core::iter::Iterator for #iter_ty #where_clause {
            type Item = &#lifetime #elem;

            #[inline]
            fn next(&mut self) -> ::core::option::Option<&#lifetime #elem> {
                #next
            }

            #[inline]
            fn size_hint(&self) -> (usize, ::core::option::Option<usize>) {
                let remaining = #remaining;
                (remaining, ::core::option::Option::Some(remaining))
            }
        }

        #[automatically_derived]
        impl #impl_generics ::core::iter::ExactSizeIterator for #iter_ty #where_clause {}

        #[automatically_derived]
        impl #impl_generics ::core::iter::FusedIterator for #iter_ty #where_clause {}

        impl #decl_impl_generics #ty #decl_where_clause {
            /// Cursor over the slots, in index order.
            #[inline]
            pub fn iter<#lifetime>(&#lifetime self) -> #iter_ty {
                #iter_ident::new(self)
            }
        }
    }
}

struct State {
    fields: TokenStream,
    init: TokenStream,
    advance: TokenStream,
    current: TokenStream,
    reset: TokenStream,
    next: TokenStream,
    remaining: TokenStream,
}
