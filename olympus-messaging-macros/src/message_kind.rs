use crate::utils::{apply_derives, has_serde_flag};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, Item, LitStr, MetaNameValue, Result, Token, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[message_kind] 宏实现
/// - 仅支持具名字段结构体（允许空字段 `struct X {}`）
/// - 合并默认派生，追加 `#[serde(deny_unknown_fields)]`
/// - 生成 `::olympus_messaging::message::MessageKind` 实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as KindAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let st = match &mut input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[message_kind] can only be used on structs")
                .to_compile_error()
                .into();
        }
    };

    if !matches!(st.fields, syn::Fields::Named(_)) {
        return syn::Error::new(
            st.span(),
            "#[message_kind] supports only named-field structs, e.g., struct X { field: T }",
        )
        .to_compile_error()
        .into();
    }

    let Some(message_type) = cfg.message_type else {
        return syn::Error::new(
            st.ident.span(),
            "missing message type; use #[message_kind(message_type = \"...\")]",
        )
        .to_compile_error()
        .into();
    };

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut st.attrs, required);

    if !has_serde_flag(&st.attrs, "deny_unknown_fields") {
        st.attrs.push(syn::parse_quote!(#[serde(deny_unknown_fields)]));
    }

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let serialize_body: Option<proc_macro2::TokenStream> = cfg.serialize_body.then(|| {
        quote! {
            fn serialize_body(&self) -> ::olympus_messaging::error::MessageResult<::olympus_messaging::message::Body> {
                ::olympus_messaging::message::serialize_body(self)
            }
        }
    });

    let out = quote! {
        #st

        impl #impl_generics ::olympus_messaging::message::MessageKind for #ident #ty_generics #where_clause {
            const MESSAGE_TYPE: &'static str = #message_type;

            #serialize_body
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct KindAttrConfig {
    message_type: Option<LitStr>,
    serialize_body: bool,
}

impl Parse for KindAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut message_type: Option<LitStr> = None;
        let mut serialize_body: Option<bool> = None;

        // 简写：#[message_kind("type.string", ...)]
        if input.peek(LitStr) {
            message_type = Some(input.parse()?);
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        let pairs: Punctuated<MetaNameValue, Token![,]> =
            Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;

        for kv in pairs {
            let Some(key) = kv.path.get_ident() else {
                return Err(syn::Error::new(kv.path.span(), "invalid attribute key"));
            };
            match key.to_string().as_str() {
                "message_type" => {
                    if message_type.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'message_type' in attribute",
                        ));
                    }
                    match kv.value {
                        Expr::Lit(syn::ExprLit {
                            lit: syn::Lit::Str(lit),
                            ..
                        }) => message_type = Some(lit),
                        other => {
                            return Err(syn::Error::new(
                                other.span(),
                                "expected string literal for 'message_type'",
                            ));
                        }
                    }
                }
                "serialize_body" => {
                    if serialize_body.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'serialize_body' in attribute",
                        ));
                    }
                    match kv.value {
                        Expr::Lit(syn::ExprLit {
                            lit: syn::Lit::Bool(lit),
                            ..
                        }) => serialize_body = Some(lit.value),
                        other => {
                            return Err(syn::Error::new(
                                other.span(),
                                "expected bool literal for 'serialize_body'",
                            ));
                        }
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key; expected 'message_type' | 'serialize_body'",
                    ));
                }
            }
        }

        Ok(Self {
            message_type,
            serialize_body: serialize_body.unwrap_or(true),
        })
    }
}
