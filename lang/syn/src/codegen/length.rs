use super::common::{with_predicate, Target};
use crate::ir::Variant;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

/// Capacity constant, length accessors and constructors.
pub fn generate(target: &Target<'_>) -> TokenStream {
    let ty = target.ty();
    let elem = target.elem;
    let capacity = target.capacity_lit();
    let marker = target.marker_init();
    let (impl_generics, _, where_clause) = target.generics.split_for_impl();

    // Higher-ranked so that a non-`Default` element only disables `new`
    // instead of failing the declaration.
    let default_bound: syn::WherePredicate =
        parse_quote!(for<'__x> #elem: ::core::default::Default);

    let (constructors, default_generics) = match target.variant {
        Variant::Empty => {
            let constructors = quote! {
                /// Creates the array. There are no slots to initialize.
                #[inline]
                pub const fn new() -> Self {
                    Self { #marker }
                }
            };
            (constructors, target.generics.clone())
        }
        Variant::Sized(_) => {
            let constructors = quote! {
                /// Creates the array with every slot set to the element's default.
                #[inline]
                pub fn new() -> Self
                where
                    #default_bound
                {
                    Self {
                        storage: ::core::array::from_fn(|_| ::core::default::Default::default()),
                        #marker
                    }
                }

                /// Wraps existing storage.
                #[inline]
                pub const fn from_array(storage: [#elem; #capacity]) -> Self {
                    Self { storage, #marker }
                }

                /// Unwraps the storage.
                #[inline]
                pub fn into_array(self) -> [#elem; #capacity] {
                    self.storage
                }
            };
            (constructors, with_predicate(&target.generics, default_bound))
        }
    };

    let default_impl = (!target.derives("Default")).then(|| {
        let (impl_generics, _, where_clause) = default_generics.split_for_impl();
        quote! {
            #[automatically_derived]
            impl #impl_generics ::core::default::Default for #ty #where_clause {
                #[inline]
                fn default() -> Self {
                    Self::new()
                }
            }
        }
    });

    quote! {
        impl #impl_generics #ty #where_clause {
            /// Number of slots.
            pub const CAPACITY: usize = #capacity;

            /// Always [`Self::CAPACITY`].
            #[inline]
            pub const fn len(&self) -> usize {
                Self::CAPACITY
            }

            /// Whether the array has no slots at all.
            #[inline]
            pub const fn is_empty(&self) -> bool {
                Self::CAPACITY == 0usize
            }

            #constructors
        }

        #default_impl
    }
}
