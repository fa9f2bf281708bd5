use super::common::Target;
use crate::ir::Variant;
use proc_macro2::TokenStream;
use quote::quote;

/// The declaration itself, now holding its slots.
pub fn generate(target: &Target<'_>) -> TokenStream {
    let ident = target.ident;
    let vis = target.vis;
    let attrs = &target.attrs;
    let elem = target.elem;
    let generics = &target.struct_generics;
    let where_clause = &generics.where_clause;

    // Field order is the memory layout.
    let repr = (!target.has_repr()).then(|| quote!(#[repr(C)]));
    let storage = match target.variant {
        Variant::Empty => None,
        Variant::Sized(_) => {
            let capacity = target.capacity_lit();
            Some(quote!(storage: [#elem; #capacity],))
        }
    };
    let marker = target
        .marker_type()
        .map(|marker| quote!(__marker: #marker,));

    quote! {
        #(#attrs)*
        #repr
        #vis struct #ident #generics #where_clause {
            #storage
            #marker
        }
    }
}
