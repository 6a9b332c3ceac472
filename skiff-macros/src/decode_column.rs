use crate::decode_type::{TypeDecoded, decode_type};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Field, Ident, LitStr, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    /// Empty `Value` variant expression for the field type.
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    /// Operation identifiers the column is skipped for (`Create`, ...).
    pub(crate) skip: Vec<Ident>,
    /// Not mapped at all, filled with `Default::default()` on decode.
    pub(crate) ignore: bool,
}

pub(crate) fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        name,
        value: TokenStream::new(),
        nullable: false,
        primary_key: false,
        skip: Vec::new(),
        ignore: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("skiff") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `skiff`, use it like: `#[skiff(attribute = value, ...)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `name`, use it like: `#[skiff(name = \"MyColumn\")]`");
                    };
                    metadata.name = v.value();
                } else if arg.path.is_ident("primary_key") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `primary_key`, use it like: `#[skiff(primary_key)]`");
                    };
                    metadata.primary_key = true;
                } else if arg.path.is_ident("skip") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `skip`, use it like: `#[skiff(skip = \"create, update\")]`");
                    };
                    metadata.skip = v
                        .value()
                        .split(',')
                        .map(|op| match op.trim() {
                            "create" => Ident::new("Create", v.span()),
                            "retrieve" => Ident::new("Retrieve", v.span()),
                            "update" => Ident::new("Update", v.span()),
                            "delete" => Ident::new("Delete", v.span()),
                            other => panic!(
                                "Unknown operation `{}` in `skip`, expected create, retrieve, update or delete",
                                other
                            ),
                        })
                        .collect();
                } else if arg.path.is_ident("ignore") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `ignore`, use it like: `#[skiff(ignore)]`");
                    };
                    metadata.ignore = true;
                } else {
                    panic!(
                        "Unknown attribute `{}` inside skiff macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    if !metadata.ignore {
        let TypeDecoded { value, nullable } = decode_type(&field.ty);
        metadata.value = value;
        metadata.nullable = nullable || metadata.nullable;
        if metadata.primary_key {
            metadata.nullable = false;
        }
    }
    metadata
}
