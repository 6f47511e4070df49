//! `#[derive(Table)]` for studydeck row structs.
//!
//! The derive reads the row struct (the full set of columns returned when a
//! record is read) and generates the insert and update shapes next to it,
//! together with the static column and relationship metadata exposed through
//! `studydeck::Relation` and `studydeck::Table`.
extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, Path, PathArguments, Type,
    Visibility, parse_macro_input,
};

#[proc_macro_derive(Table, attributes(table, column))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct TableAttrs {
    name: String,
    schema: Path,
}

struct Reference {
    table: String,
    column: String,
    foreign_key: Option<String>,
    one_to_one: bool,
}

struct Column<'a> {
    ident: &'a Ident,
    vis: &'a Visibility,
    ty: &'a Type,
    name: String,
    sql_type: &'static str,
    kind: Ident,
    nullable: bool,
    has_default: bool,
    primary_key: bool,
    reference: Option<Reference>,
}

impl Column<'_> {
    /// Required on insert: no default and not nullable.
    fn insert_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

fn table_attrs(input: &DeriveInput) -> syn::Result<TableAttrs> {
    let mut name = input.ident.to_string().to_lowercase(); // default table name
    let mut schema: Path = syn::parse_quote!(::studydeck::Public);

    for attr in &input.attrs {
        if !attr.path().is_ident("table") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else if meta.path.is_ident("schema") {
                schema = meta.value()?.parse::<LitStr>()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported table attribute"))
            }
        })?;
    }

    Ok(TableAttrs { name, schema })
}

/// Returns `T` when `ty` is `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(tp) = ty else { return None };
    if tp.qself.is_some() {
        return None;
    }
    let segment = tp.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Maps a Rust field type onto its Postgres type and `ColumnKind` variant.
fn primitive(ty: &Type) -> syn::Result<(&'static str, &'static str)> {
    let unsupported = || syn::Error::new(ty.span(), "unsupported column type");
    let Type::Path(tp) = ty else {
        return Err(unsupported());
    };
    let segment = tp.path.segments.last().ok_or_else(unsupported)?;
    let mapped = match segment.ident.to_string().as_str() {
        "String" => ("text", "String"),
        "i16" => ("smallint", "Number"),
        "i32" => ("integer", "Number"),
        "i64" => ("bigint", "Number"),
        "f32" => ("real", "Number"),
        "f64" => ("double precision", "Number"),
        "bool" => ("boolean", "Boolean"),
        "Json" | "Value" => ("jsonb", "Json"),
        _ => return Err(unsupported()),
    };
    Ok(mapped)
}

fn column(field: &syn::Field) -> syn::Result<Column<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "table columns must be named"))?;

    let (nullable, inner) = match option_inner(&field.ty) {
        Some(inner) => (true, inner),
        None => (false, &field.ty),
    };
    let (sql_type, kind) = primitive(inner)?;

    let mut has_default = false;
    let mut primary_key = false;
    let mut references: Option<LitStr> = None;
    let mut foreign_key: Option<String> = None;
    let mut one_to_one = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                has_default = true;
            } else if meta.path.is_ident("primary_key") {
                primary_key = true;
            } else if meta.path.is_ident("references") {
                references = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("foreign_key") {
                foreign_key = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("one_to_one") {
                one_to_one = true;
            } else {
                return Err(meta.error("unsupported column attribute"));
            }
            Ok(())
        })?;
    }

    let reference = match references {
        Some(lit) => {
            let target = lit.value();
            let (table, column) = target
                .split_once('.')
                .filter(|(t, c)| !t.is_empty() && !c.is_empty())
                .ok_or_else(|| {
                    syn::Error::new(lit.span(), "expected `references = \"table.column\"`")
                })?;
            Some(Reference {
                table: table.to_string(),
                column: column.to_string(),
                foreign_key,
                one_to_one,
            })
        }
        None if foreign_key.is_some() || one_to_one => {
            return Err(syn::Error::new(
                ident.span(),
                "`foreign_key` and `one_to_one` require `references`",
            ));
        }
        None => None,
    };

    Ok(Column {
        ident,
        vis: &field.vis,
        ty: &field.ty,
        name: ident.unraw().to_string(),
        sql_type,
        kind: format_ident!("{}", kind),
        nullable,
        has_default,
        primary_key,
        reference,
    })
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "tables cannot be generic",
        ));
    }
    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "`Table` requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "`Table` can only be derived for structs",
            ));
        }
    };

    let attrs = table_attrs(input)?;
    let columns = fields.iter().map(column).collect::<syn::Result<Vec<_>>>()?;

    let row = &input.ident;
    let vis = &input.vis;
    let insert = format_ident!("{}Insert", row);
    let update = format_ident!("{}Update", row);
    let table_name = &attrs.name;
    let schema = &attrs.schema;
    let insert_doc = format!("Insert shape of the `{table_name}` table.");
    let update_doc = format!("Update shape of the `{table_name}` table.");

    let insert_fields = columns.iter().map(|c| {
        let (ident, vis, ty) = (c.ident, c.vis, c.ty);
        if c.nullable {
            quote! {
                #[serde(default, skip_serializing_if = "Option::is_none", with = "::studydeck::nullable")]
                #vis #ident: ::core::option::Option<#ty>
            }
        } else if c.has_default {
            quote! {
                #[serde(default, skip_serializing_if = "Option::is_none")]
                #vis #ident: ::core::option::Option<#ty>
            }
        } else {
            quote! { #vis #ident: #ty }
        }
    });

    let update_fields = columns.iter().map(|c| {
        let (ident, vis, ty) = (c.ident, c.vis, c.ty);
        if c.nullable {
            quote! {
                #[serde(default, skip_serializing_if = "Option::is_none", with = "::studydeck::nullable")]
                #vis #ident: ::core::option::Option<#ty>
            }
        } else {
            quote! {
                #[serde(default, skip_serializing_if = "Option::is_none")]
                #vis #ident: ::core::option::Option<#ty>
            }
        }
    });

    let insert_from = columns.iter().map(|c| {
        let ident = c.ident;
        if c.insert_required() {
            quote! { #ident: row.#ident }
        } else {
            quote! { #ident: ::core::option::Option::Some(row.#ident) }
        }
    });
    let update_from = columns.iter().map(|c| {
        let ident = c.ident;
        quote! { #ident: ::core::option::Option::Some(row.#ident) }
    });
    let idents = columns.iter().map(|c| c.ident);

    let column_schemas = columns.iter().map(|c| {
        let (name, sql_type, kind) = (&c.name, c.sql_type, &c.kind);
        let (nullable, has_default, primary_key) = (c.nullable, c.has_default, c.primary_key);
        quote! {
            ::studydeck::ColumnSchema {
                name: #name,
                sql_type: #sql_type,
                kind: ::studydeck::ColumnKind::#kind,
                nullable: #nullable,
                has_default: #has_default,
                primary_key: #primary_key,
            }
        }
    });

    let relationships = columns.iter().filter_map(|c| {
        let r = c.reference.as_ref()?;
        let column = &c.name;
        let foreign_key = r
            .foreign_key
            .clone()
            .unwrap_or_else(|| format!("{table_name}_{column}_fkey"));
        let (table, referenced, one_to_one) = (&r.table, &r.column, r.one_to_one);
        Some(quote! {
            ::studydeck::Relationship {
                foreign_key_name: #foreign_key,
                columns: &[#column],
                is_one_to_one: #one_to_one,
                referenced_relation: #table,
                referenced_columns: &[#referenced],
            }
        })
    });

    let serde_derives = quote! {
        ::studydeck::__private::serde::Serialize,
        ::studydeck::__private::serde::Deserialize
    };

    Ok(quote! {
        #[doc = #insert_doc]
        #[derive(::core::fmt::Debug, ::core::clone::Clone, ::core::cmp::PartialEq, #serde_derives)]
        #[serde(crate = "::studydeck::__private::serde")]
        #vis struct #insert {
            #(#insert_fields,)*
        }

        #[doc = #update_doc]
        #[derive(::core::fmt::Debug, ::core::clone::Clone, ::core::default::Default, ::core::cmp::PartialEq, #serde_derives)]
        #[serde(crate = "::studydeck::__private::serde")]
        #vis struct #update {
            #(#update_fields,)*
        }

        impl #update {
            /// True when no column would be touched.
            pub fn is_empty(&self) -> bool {
                true #(&& self.#idents.is_none())*
            }
        }

        impl ::core::convert::From<#row> for #insert {
            fn from(row: #row) -> Self {
                Self { #(#insert_from,)* }
            }
        }

        impl ::core::convert::From<#row> for #update {
            fn from(row: #row) -> Self {
                Self { #(#update_from,)* }
            }
        }

        impl ::studydeck::Relation for #row {
            type Schema = #schema;
            type Row = Self;
            const NAME: &'static str = #table_name;

            fn relation_schema() -> &'static ::studydeck::TableSchema {
                static SCHEMA: ::studydeck::TableSchema = ::studydeck::TableSchema {
                    name: #table_name,
                    schema: <#schema as ::studydeck::Schema>::NAME,
                    columns: &[#(#column_schemas),*],
                    relationships: &[#(#relationships),*],
                };
                &SCHEMA
            }
        }

        impl ::studydeck::Table for #row {
            type Insert = #insert;
            type Update = #update;
        }
    })
}
