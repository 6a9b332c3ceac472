mod decode_column;
mod decode_table;
mod decode_type;

use crate::{
    decode_column::{ColumnMetadata, decode_column},
    decode_table::decode_table,
};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, parse_macro_input};

/// Maps a struct with named fields onto a same-named table.
///
/// The whole descriptor is encoded at compile time. Supported attributes:
/// `#[skiff(table = "...")]` on the struct, `#[skiff(name = "...")]`,
/// `#[skiff(primary_key)]`, `#[skiff(skip = "create, update")]` and
/// `#[skiff(ignore)]` on fields.
#[proc_macro_derive(Entity, attributes(skiff))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let Fields::Named(..) = item.fields else {
        panic!("Entity can only be derived for a struct with named fields");
    };
    let table = decode_table(&item);
    let columns: Vec<ColumnMetadata> = item.fields.iter().map(decode_column).collect();
    if columns
        .iter()
        .filter(|c| !c.ignore && c.primary_key)
        .count()
        > 1
    {
        panic!("Type `{}` declares more than one primary key column", name);
    }
    let defs = columns.iter().filter(|c| !c.ignore).map(|c| {
        let column_name = &c.name;
        let value = &c.value;
        let nullable = c.nullable;
        let primary_key = c.primary_key;
        let skip = c.skip.iter().map(|op| quote!(.with(::skiff::Operation::#op)));
        quote! {
            ::skiff::ColumnDef {
                name: #column_name,
                table: #table,
                value: #value,
                nullable: #nullable,
                primary_key: #primary_key,
                skip: ::skiff::OperationSet::empty()#(#skip)*,
            }
        }
    });
    let count = columns.iter().filter(|c| !c.ignore).count();
    let field_inits = columns.iter().map(|c| {
        let ident = &c.ident;
        let skipped_on_retrieve = c.skip.iter().any(|op| op == "Retrieve");
        if c.ignore || skipped_on_retrieve {
            return quote!(#ident: ::std::default::Default::default());
        }
        let column_name = &c.name;
        quote! {
            #ident: match row.get_column(#column_name) {
                ::std::option::Option::Some(value) => ::skiff::Context::with_context(
                    ::skiff::FromValue::from_value(value.clone()),
                    || ::std::format!(
                        "Failed to decode column `{}` of table `{}`",
                        #column_name,
                        #table,
                    ),
                )?,
                ::std::option::Option::None => {
                    return ::std::result::Result::Err(::skiff::Error::msg(::std::format!(
                        "Column `{}` is missing from the result row of table `{}`",
                        #column_name,
                        #table,
                    )));
                }
            }
        }
    });
    let pairs = columns.iter().filter(|c| !c.ignore).map(|c| {
        let ident = &c.ident;
        let column_name = &c.name;
        quote!((#column_name, self.#ident.clone().into()))
    });
    quote! {
        impl ::skiff::Entity for #name {
            fn table_name() -> &'static str {
                #table
            }

            fn columns() -> &'static [::skiff::ColumnDef] {
                static COLUMNS: [::skiff::ColumnDef; #count] = [#(#defs),*];
                &COLUMNS
            }

            fn from_row(row: &::skiff::RowLabeled) -> ::skiff::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#field_inits),*
                })
            }

            fn row(&self) -> ::std::vec::Vec<(&'static str, ::skiff::Value)> {
                ::std::vec![#(#pairs),*]
            }
        }
    }
    .into()
}
