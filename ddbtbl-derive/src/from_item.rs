//! FromItem derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::field_configs;

pub fn derive_from_item_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let configs = field_configs(&input)?;

    let field_extractions: Vec<TokenStream> = configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let attr_name = &config.attr_name;
            let ty = &config.ty;

            if config.skip {
                quote! {
                    #field_ident: <#ty as std::default::Default>::default()
                }
            } else {
                quote! {
                    #field_ident: ddbtbl::ItemExt::get_as::<#ty>(item, #attr_name)?
                }
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics ddbtbl::FromItem for #name #ty_generics #where_clause {
            fn from_item(item: &ddbtbl::Item) -> ddbtbl::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }
        }
    };

    Ok(expanded)
}
