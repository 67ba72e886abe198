// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Procedural macros for testchamber.
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{Error, FnArg, ItemFn, LitStr, ReturnType, parse_macro_input};

/// Defines a test chamber.
///
/// The function must take exactly one argument, the `&mut Chamber` run
/// context, and return nothing. Next to the function, a
/// `ChamberDescriptor` constant named `<FN_NAME>_CHAMBER` is generated; pass
/// it to `Session::run_descriptor` or `Session::run_all`.
///
/// # Example
///
/// ```rust,ignore
/// use testchamber::{Chamber, Session, def_chamber, test_equal};
///
/// #[def_chamber]
/// fn addition(c: &mut Chamber) {
///     test_equal!(c, 2 + 2, 4);
/// }
///
/// #[def_chamber("byte order")]
/// fn byte_order(c: &mut Chamber) {
///     test_equal!(c, u16::from_be_bytes([0x12, 0x34]), 0x1234);
/// }
///
/// let mut session = Session::new(String::new(), false);
/// assert!(session.run_all(&[ADDITION_CHAMBER, BYTE_ORDER_CHAMBER]));
/// assert!(session.get_ref().contains("TESTCHAMBER byte order:"));
/// ```
///
/// # Attributes
/// - `#[def_chamber]` - the chamber is named after the function
/// - `#[def_chamber("name")]` - the chamber is reported under `name`
#[proc_macro_attribute]
pub fn def_chamber(attr: TokenStream, item: TokenStream) -> TokenStream {
    let name = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let func = parse_macro_input!(item as ItemFn);
    match generate_chamber(name, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Emit the chamber routine and its descriptor
fn generate_chamber(name: Option<LitStr>, func: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &func.sig;
    // Chamber routines report through the recorder, never through a return value.
    if let ReturnType::Type(..) = sig.output {
        return Err(Error::new_spanned(
            &sig.output,
            "expect no return value for the chamber function",
        ));
    }
    if sig.inputs.len() != 1 {
        return Err(Error::new_spanned(
            &sig.inputs,
            "expect exactly one argument: `&mut Chamber`",
        ));
    }
    if let Some(FnArg::Receiver(recv)) = sig.inputs.first() {
        return Err(Error::new_spanned(
            recv,
            "a chamber cannot be a method",
        ));
    }
    if sig.asyncness.is_some() || !sig.generics.params.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "expect a plain, non-generic function for a chamber",
        ));
    }

    let fn_name = &sig.ident;
    let vis = &func.vis;
    let name = name.unwrap_or_else(|| LitStr::new(&fn_name.to_string(), fn_name.span()));
    let descriptor_name = format_ident!("{}_CHAMBER", fn_name.to_string().to_uppercase());

    Ok(quote! {
        #func

        #[allow(dead_code)]
        #vis const #descriptor_name: ::testchamber::ChamberDescriptor =
            ::testchamber::ChamberDescriptor::new(#name, #fn_name);
    })
}
