use super::common::Target;
use crate::ir::Variant;
use proc_macro2::TokenStream;
use quote::quote;

pub fn generate(target: &Target<'_>) -> TokenStream {
    let ty = target.ty();
    let elem = target.elem;
    let (impl_generics, _, where_clause) = target.generics.split_for_impl();

    let (shared, exclusive) = match target.variant {
        Variant::Empty => (quote!(&[]), quote!(&mut [])),
        Variant::Sized(_) => (quote!(&self.storage), quote!(&mut self.storage)),
    };

    quote! {
        impl #impl_generics #ty #where_clause {
            /// All slots, in index order.
            #[inline]
            pub fn as_slice(&self) -> &[#elem] {
                #shared
            }

            /// All slots, in index order, writable.
            #[inline]
            pub fn as_mut_slice(&mut self) -> &mut [#elem] {
                #exclusive
            }
        }
    }
}
