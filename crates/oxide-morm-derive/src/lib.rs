//! Derive macro registering structs as records.
//!
//! This crate provides the `#[derive(Record)]` macro, which describes a
//! struct to the `oxide-morm` compiler once per type.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

const ATTRIBUTE: &str = "morm";

/// Derives `Record` and `FieldType` for a struct with named fields.
///
/// # Attributes
///
/// - `#[morm(table = "people")]` - Overrides the default table name
///   (lower-cased struct name plus `s`)
///
/// # Field Attributes
///
/// - `#[morm("id integer PRIMARY KEY AUTOINCREMENT")]` - Explicit column
///   name followed by its SQL type clause
/// - `#[morm(":ignore")]` - Leaves the field out of every statement. The
///   field type does not need to implement `FieldType`
/// - `#[morm(":flatten")]` - Folds a nested record's columns into this
///   table instead of giving it its own table
///
/// Every other field type must implement `FieldType`. Deriving `Record`
/// also implements `FieldType`, so records nest.
#[proc_macro_derive(Record, attributes(morm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_record_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record derive only supports structs",
            ));
        }
    };

    let table_call = match parse_table_name(&input.attrs)? {
        Some(table) => quote! { .table(#table) },
        None => quote! {},
    };

    let mut registrations = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let name = ident.to_string();
        let ty = &field.ty;
        let annotation = parse_annotation(&field.attrs)?;
        let text = annotation.as_ref().map(LitStr::value).unwrap_or_default();

        if text.trim() == ":ignore" {
            registrations.push(quote! {
                .field(#name, ::oxide_morm_core::FieldKind::Opaque, #text)
            });
            values.push(quote! { ::oxide_morm_core::Value::Null });
        } else {
            registrations.push(quote! {
                .field(
                    #name,
                    <#ty as ::oxide_morm_core::FieldType>::kind(),
                    #text,
                )
            });
            values.push(quote! {
                ::oxide_morm_core::FieldType::to_value(&self.#ident)
            });
        }
    }

    let expanded = quote! {
        impl ::oxide_morm_core::Record for #struct_name {
            fn record_type() -> ::oxide_morm_core::Result<&'static ::oxide_morm_core::RecordType> {
                static RECORD_TYPE: ::std::sync::OnceLock<
                    ::oxide_morm_core::Result<::oxide_morm_core::RecordType>,
                > = ::std::sync::OnceLock::new();
                RECORD_TYPE
                    .get_or_init(|| {
                        ::oxide_morm_core::RecordType::builder(#type_name)
                            #table_call
                            #(#registrations)*
                            .build()
                    })
                    .as_ref()
                    .map_err(::std::clone::Clone::clone)
            }

            fn values(&self) -> ::std::vec::Vec<::oxide_morm_core::Value> {
                ::std::vec![#(#values),*]
            }
        }

        impl ::oxide_morm_core::FieldType for #struct_name {
            fn kind() -> ::oxide_morm_core::FieldKind {
                ::oxide_morm_core::FieldKind::Record(
                    <Self as ::oxide_morm_core::Record>::record_type,
                )
            }

            fn to_value(&self) -> ::oxide_morm_core::Value {
                ::oxide_morm_core::Value::Record(::oxide_morm_core::Record::values(self))
            }
        }
    };

    Ok(expanded)
}

fn parse_table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut table = None;
    for attr in attrs {
        if attr.path().is_ident(ATTRIBUTE) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().trim().is_empty() {
                        return Err(meta.error("table name cannot be empty"));
                    }
                    table = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported morm attribute, expected `table = \"...\"`"))
                }
            })?;
        }
    }
    Ok(table)
}

fn parse_annotation(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut annotation: Option<LitStr> = None;
    for attr in attrs {
        if !attr.path().is_ident(ATTRIBUTE) {
            continue;
        }
        if annotation.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a field takes at most one morm annotation",
            ));
        }
        let lit: LitStr = attr.parse_args()?;
        let text = lit.value();
        let text = text.trim();
        if text.starts_with(':') && text != ":ignore" && text != ":flatten" {
            return Err(syn::Error::new_spanned(
                &lit,
                format!("unknown directive `{text}`, expected `:ignore` or `:flatten`"),
            ));
        }
        annotation = Some(lit);
    }
    Ok(annotation)
}
