extern crate proc_macro;

use fixed_array_syn::{Cancellation, Config, Pipeline, Publication};
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{parse_macro_input, spanned::Spanned, ItemMod};

/// Generates the fixed arrays declared in a module.
///
/// Every struct of the module (nested inline modules included) that bounds
/// `Self` by `fixed_array::FixedArray<T>` is replaced by a fixed-capacity
/// array of `T`. The capacity is taken from `#[fixed_array_size(N)]`.
///
/// ```ignore
/// #[fixed_arrays]
/// mod buffers {
///     use fixed_array::FixedArray;
///
///     #[fixed_array_size(16)]
///     pub struct Scratch where Self: FixedArray<u8>;
/// }
/// ```
///
/// When generation of a declaration fails the struct is left as written and
/// an `error[FA0001]` is reported at its name.
#[proc_macro_attribute]
pub fn fixed_arrays(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        let args = proc_macro2::TokenStream::from(args);
        return syn::Error::new(args.span(), "#[fixed_arrays] takes no arguments")
            .to_compile_error()
            .into();
    }
    let module = parse_macro_input!(input as ItemMod);
    if module.content.is_none() {
        return syn::Error::new(
            module.span(),
            "#[fixed_arrays] must be applied to an inline module (`mod name { .. }`)",
        )
        .to_compile_error()
        .into();
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => return syn::Error::new(module.ident.span(), err).to_compile_error().into(),
    };
    let publication = Publication::new();
    match Pipeline::new(config).expand_module(module, &publication, &Cancellation::never()) {
        Ok(module) => module.into_token_stream().into(),
        Err(cancelled) => syn::Error::new(proc_macro2::Span::call_site(), cancelled)
            .to_compile_error()
            .into(),
    }
}

/// Capacity marker, only meaningful inside a `#[fixed_arrays]` module where
/// it is consumed before expansion.
#[proc_macro_attribute]
pub fn fixed_array_size(_args: TokenStream, input: TokenStream) -> TokenStream {
    let input = proc_macro2::TokenStream::from(input);
    let error = syn::Error::new(
        input.span(),
        "#[fixed_array_size] only applies to declarations inside a #[fixed_arrays] module",
    )
    .to_compile_error();
    quote::quote!(#error #input).into()
}
