use super::common::Target;
use crate::ir::Variant;
use proc_macro2::TokenStream;
use quote::quote;

/// `Index<usize>` and `IndexMut<usize>`.
///
/// Sized arrays go through the runtime's slot accessors, which check the
/// index unless it was built with `unchecked-indexing`. Empty arrays have no
/// valid index and always fail. The emitted code is free of `unsafe`.
pub fn generate(target: &Target<'_>) -> TokenStream {
    let ty = target.ty();
    let elem = target.elem;
    let (impl_generics, _, where_clause) = target.generics.split_for_impl();

    let (read, write) = match target.variant {
        Variant::Empty => (
            quote!(::fixed_array::__private::out_of_range(index, 0usize)),
            quote!(::fixed_array::__private::out_of_range(index, 0usize)),
        ),
        Variant::Sized(_) => (
            quote!(::fixed_array::__private::slot(&self.storage, index)),
            quote!(::fixed_array::__private::slot_mut(&mut self.storage, index)),
        ),
    };

    quote! {
        #[automatically_derived]
        impl #impl_generics ::core::ops::Index<usize> for #ty #where_clause {
            type Output = #elem;

            #[inline]
            #[track_caller]
            fn index(&self, index: usize) -> &#elem {
                #read
            }
        }

        #[automatically_derived]
        impl #impl_generics ::core::ops::IndexMut<usize> for #ty #where_clause {
            #[inline]
            #[track_caller]
            fn index_mut(&mut self, index: usize) -> &mut #elem {
                #write
            }
        }
    }
}
