//! `#[derive(Choice)]` implementation.
//!
//! Generates a `dwmma_core::ChoiceValue` impl for a unit-only enum. Variant
//! order is the choice order the host sees, so reordering variants changes
//! the meaning of saved sessions.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

struct Variant {
    ident: syn::Ident,
    label: String,
    is_default: bool,
}

pub fn derive_choice_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let data_enum = match &input.data {
        Data::Enum(e) => e,
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Choice)] only supports enums",
            ))
        }
    };

    let mut variants = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(Choice)] only supports unit variants",
            ));
        }
        let label = label_attribute(&variant.attrs)?.unwrap_or_else(|| variant.ident.to_string());
        variants.push(Variant {
            ident: variant.ident.clone(),
            label,
            is_default: variant.attrs.iter().any(|a| a.path().is_ident("default")),
        });
    }

    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(Choice)] requires at least one variant",
        ));
    }

    let mut defaults = variants.iter().enumerate().filter(|(_, v)| v.is_default);
    let default_index = defaults.next().map_or(0, |(i, _)| i);
    if defaults.next().is_some() {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(Choice)] allows at most one #[default] variant",
        ));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let count = variants.len();
    let labels: Vec<&str> = variants.iter().map(|v| v.label.as_str()).collect();
    let default_ident = &variants[default_index].ident;

    let from_index_arms = variants.iter().enumerate().map(|(i, v)| {
        let ident = &v.ident;
        quote! { #i => ::core::option::Option::Some(#name::#ident), }
    });
    let to_index_arms = variants.iter().enumerate().map(|(i, v)| {
        let ident = &v.ident;
        quote! { #name::#ident => #i, }
    });
    let label_arms = variants.iter().enumerate().map(|(i, v)| {
        let label = &v.label;
        quote! { #i => #label, }
    });

    Ok(quote! {
        impl #impl_generics ::dwmma_core::ChoiceValue for #name #ty_generics #where_clause {
            const COUNT: usize = #count;
            const DEFAULT_INDEX: usize = #default_index;

            fn from_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#from_index_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn to_index(self) -> usize {
                match self {
                    #(#to_index_arms)*
                }
            }

            fn default_value() -> Self {
                #name::#default_ident
            }

            fn name(index: usize) -> &'static str {
                match index {
                    #(#label_arms)*
                    _ => "",
                }
            }

            fn names() -> &'static [&'static str] {
                &[#(#labels),*]
            }
        }
    })
}

/// Reads `#[name = "..."]`.
fn label_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("name")) {
        let meta = attr.meta.require_name_value()?;
        return match &meta.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Ok(Some(s.value())),
            other => Err(syn::Error::new_spanned(
                other,
                "expected string literal for #[name = \"...\"]",
            )),
        };
    }
    Ok(None)
}
