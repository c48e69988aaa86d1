//! ToItem derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::field_configs;

pub fn derive_to_item_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let configs = field_configs(&input)?;

    // Null values are omitted from the item
    let inserts: Vec<TokenStream> = configs
        .iter()
        .filter(|c| !c.skip)
        .map(|config| {
            let field_ident = &config.ident;
            let attr_name = &config.attr_name;
            quote! {
                let value = ddbtbl::ToValue::to_value(&self.#field_ident);
                if !value.is_null() {
                    item.insert(#attr_name.to_string(), value);
                }
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics ddbtbl::ToItem for #name #ty_generics #where_clause {
            fn to_item(&self) -> ddbtbl::Item {
                let mut item = ddbtbl::Item::new();
                #(#inserts)*
                item
            }
        }
    };

    Ok(expanded)
}
