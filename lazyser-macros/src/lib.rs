use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemFn, LitStr, ReturnType, parse_macro_input};

/// Registers a component factory under an identifier.
///
/// The annotated function must take no arguments and return something
/// convertible into `lazyser::Component`. It is submitted to the `inventory`
/// collection gathered by `ServiceRegistryBuilder::collected`.
///
/// ```rust,ignore
/// #[lazyser::component("svc.json_encoder")]
/// fn json_encoder() -> Component {
///     Component::encoder(JsonEncoder::new())
/// }
/// ```
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    let id = parse_macro_input!(attr as LitStr);
    let input = parse_macro_input!(item as ItemFn);

    if id.value().trim().is_empty() {
        return syn::Error::new_spanned(&id, "Component identifier must not be empty")
            .to_compile_error()
            .into();
    }

    if !input.sig.inputs.is_empty() {
        return syn::Error::new_spanned(
            &input.sig.inputs,
            "Component factory must not take arguments",
        )
        .to_compile_error()
        .into();
    }

    if input.sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            &input.sig.asyncness,
            "Component factory must not be async",
        )
        .to_compile_error()
        .into();
    }

    if !input.sig.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.sig.generics,
            "Component factory must not be generic",
        )
        .to_compile_error()
        .into();
    }

    if let ReturnType::Default = input.sig.output {
        return syn::Error::new_spanned(
            &input.sig.ident,
            "Component factory must return a component",
        )
        .to_compile_error()
        .into();
    }

    let fn_name = &input.sig.ident;
    let factory_name = format_ident!("__lazyser_component_{}", fn_name);

    let expanded = quote! {
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #factory_name() -> ::lazyser::Component {
            ::core::convert::Into::into(#fn_name())
        }

        ::lazyser::inventory::submit! {
            ::lazyser::registry::ComponentRegistration::new(#id, #factory_name)
        }
    };

    TokenStream::from(expanded)
}
