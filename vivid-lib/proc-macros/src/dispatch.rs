use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemEnum};

pub fn dispatch_impl(tokens: TokenStream) -> TokenStream {
    let def = parse_macro_input!(tokens as ItemEnum);
    let enum_name = &def.ident;
    assert!(
        def.variants.len() <= u8::MAX as usize + 1,
        "Too many variants, opcodes are a single byte"
    );

    let arms: Vec<_> = def
        .variants
        .iter()
        .map(|v| {
            let syn::Fields::Unit = &v.fields else {
                panic!("This macro only supports enums with unit variants");
            };
            let var_name = &v.ident;
            let lower = var_name.to_string().to_lowercase();
            let const_name = format_ident!("{}", lower.to_uppercase());
            let exec_fn = format_ident!("exec_{}", lower);
            (
                quote! { pub const #const_name: u8 = Self::#var_name as u8; },
                quote! { Self::#var_name => crate::vm::directives::#exec_fn::<D>, },
            )
        })
        .collect();

    let (consts, handler_arms): (TokenStream2, TokenStream2) = itertools::multiunzip(arms);

    quote! {
        impl #enum_name {
            #consts

            /// returns the vm function that executes this directive
            pub fn handler<D: crate::document::Document>(self) -> crate::vm::Handler<D> {
                match self {
                    #handler_arms
                }
            }
        }
    }
    .into()
}
