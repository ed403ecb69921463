//! Request-related macros.
//!
//! This module contains:
//! - `#[derive(Request)]` - Derive macro for implementing the `Request` trait

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, LitStr, Type, parse_macro_input};

/// Arguments collected from `#[request(..)]` attributes.
#[derive(Default)]
struct RequestArgs {
    response: Option<Type>,
    name: Option<LitStr>,
}

impl RequestArgs {
    fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut args = RequestArgs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("request")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("response") {
                    args.response = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown attribute, expected `response` or `name`"))
                }
            })?;
        }
        Ok(args)
    }
}

/// Implementation of `#[derive(Request)]`.
pub fn derive_request_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let args = RequestArgs::from_attrs(&input.attrs)?;

    let Some(response) = args.response else {
        return Err(syn::Error::new_spanned(
            ident,
            "missing response type: add `#[request(response = Type)]`",
        ));
    };

    // Every instantiation of a generic type shares one `NAME`, so the
    // identifier has to be chosen explicitly.
    let name = match args.name {
        Some(name) => name,
        None if !input.generics.params.is_empty() => {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "generic requests need an explicit identifier: add `#[request(name = \"...\")]`",
            ));
        }
        None => LitStr::new(&ident.to_string(), ident.span()),
    };

    Ok(quote! {
        impl #impl_generics ::medius::Request for #ident #ty_generics #where_clause {
            type Response = #response;
            const NAME: &'static str = #name;
        }
    })
}
