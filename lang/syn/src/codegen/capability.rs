use super::common::{lifetime, Target};
use proc_macro2::TokenStream;
use quote::quote;

/// The capability impl and the by-reference `IntoIterator` entry point, both
/// proxying the inherent items.
pub fn generate(target: &Target<'_>) -> TokenStream {
    let ty = target.ty();
    let elem = target.elem;
    let capability = target.capability;
    let lifetime = lifetime();
    let iter_ident = &target.iter_ident;
    let iter_ty = target.iter_ty();
    let capacity = target.capacity_lit();
    let (impl_generics, _, where_clause) = target.generics.split_for_impl();
    let (iter_impl_generics, _, iter_where_clause) = target.iter_generics.split_for_impl();

    quote! {
        #[automatically_derived]
        impl #impl_generics #capability for #ty #where_clause {
            const CAPACITY: usize = #capacity;

            #[inline]
            fn as_slice(&self) -> &[#elem] {
                Self::as_slice(self)
            }

            #[inline]
            fn as_mut_slice(&mut self) -> &mut [#elem] {
                Self::as_mut_slice(self)
            }

            fn enumerator<#lifetime>(
                &#lifetime self,
            ) -> ::fixed_array::__private::Box<dyn ::fixed_array::Enumerator<#elem> + #lifetime>
            where
                #elem: #lifetime,
            {
                ::fixed_array::__private::Box::new(#iter_ident::new(self))
            }
        }

        #[automatically_derived]
        impl #iter_impl_generics ::core::iter::IntoIterator for &#lifetime #ty #iter_where_clause {
            type Item = &#lifetime #elem;
            type IntoIter = #iter_ty;

            #[inline]
            fn into_iter(self) -> #iter_ty {
                #iter_ident::new(self)
            }
        }
    }
}
