//! Handler-related macros.
//!
//! This module contains:
//! - `#[handler]` - Attribute macro declaring the request type a handler is
//!   bound to, for link-time discovery

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    FnArg, Ident, Item, ItemFn, ItemStruct, LitStr, ReturnType, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[handler]` macro.
pub(crate) struct HandlerArgs {
    /// The request type the handler is bound to.
    pub request: Option<Type>,
    /// Name recorded in the registration, defaults to the item's name.
    pub name: Option<LitStr>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut request = None;
        let mut name = None;

        // A leading type, unless the input starts with `ident =`
        if !input.is_empty() && !(input.peek(Ident) && input.peek2(Token![=])) {
            request = Some(input.parse()?);
        }

        while !input.is_empty() {
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }

            if input.is_empty() {
                break;
            }

            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    name = Some(input.parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }
        }

        Ok(HandlerArgs { request, name })
    }
}

/// Implementation of the `#[handler]` macro.
pub fn handler_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let item = parse_macro_input!(item as Item);

    let expanded = match item {
        Item::Struct(input) => handler_struct(args, input),
        Item::Fn(input) => handler_fn(args, input),
        other => Err(syn::Error::new_spanned(
            other,
            "#[handler] can only be applied to a struct or an async fn",
        )),
    };

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn handler_struct(args: HandlerArgs, input: ItemStruct) -> syn::Result<TokenStream2> {
    let Some(request) = args.request else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "missing request type: use `#[handler(RequestType)]`",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[handler] structs cannot be generic",
        ));
    }

    let registration = registration(&input.ident, &request, args.name);

    Ok(quote! {
        #input
        #registration
    })
}

fn handler_fn(args: HandlerArgs, input: ItemFn) -> syn::Result<TokenStream2> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;

    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            input.sig.fn_token,
            "Handler function must be async",
        ));
    }

    if input.sig.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "Handler function must take exactly one argument: fn(request: Request)",
        ));
    }

    let (request_pat, request_type) = match input.sig.inputs.first() {
        Some(FnArg::Typed(pat_type)) => (&pat_type.pat, &*pat_type.ty),
        _ => {
            return Err(syn::Error::new_spanned(
                &input.sig.inputs,
                "Handler function cannot take `self`",
            ));
        }
    };

    if let Some(declared) = &args.request {
        if quote!(#declared).to_string() != quote!(#request_type).to_string() {
            return Err(syn::Error::new_spanned(
                declared,
                "declared request type does not match the function argument",
            ));
        }
    }

    let ReturnType::Type(_, output) = &input.sig.output else {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "Handler function must return `Result<Response, E>`",
        ));
    };

    let registration = registration(fn_name, request_type, args.name);

    Ok(quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Auto-generated handler from `#[medius::handler]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #fn_name;

        impl ::medius::RequestHandler<#request_type> for #fn_name {
            async fn handle(
                &self,
                #request_pat: #request_type,
            ) -> ::core::result::Result<<#request_type as ::medius::Request>::Response, ::medius::BoxError> {
                let __output: #output = async move #fn_block.await;
                __output.map_err(::core::convert::Into::into)
            }
        }

        #registration
    })
}

fn registration(ident: &Ident, request: &Type, name: Option<LitStr>) -> TokenStream2 {
    let name = name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    quote! {
        ::medius::inventory::submit! {
            ::medius::discovery::HandlerRegistration::bound::<#request, #ident>(
                ::core::module_path!(),
                #name,
            )
        }
    }
}
