use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

/// Empty `Value` variant matching a field type, plus whether the type is
/// nullable (wrapped in `Option`).
pub(crate) struct TypeDecoded {
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
}

fn matches_path(path: &Path, expected: &[&str]) -> bool {
    let segments = path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>();
    segments.len() <= expected.len()
        && segments
            .iter()
            .rev()
            .zip(expected.iter().rev())
            .all(|(a, b)| a == b)
}

fn generic_argument(path: &Path) -> &Type {
    let PathArguments::AngleBracketed(bracketed) = &path
        .segments
        .last()
        .expect("Path must be non empty")
        .arguments
    else {
        panic!("`{}` must have a generic argument", path.to_token_stream());
    };
    let Some(GenericArgument::Type(ty)) = bracketed.args.first() else {
        panic!("`{}` must have a generic argument", path.to_token_stream());
    };
    ty
}

pub(crate) fn decode_type(ty: &Type) -> TypeDecoded {
    let Type::Path(TypePath { path, .. }) = ty else {
        panic!(
            "Type `{}` cannot be mapped to a column",
            ty.to_token_stream()
        );
    };
    if let Some(ident) = path.get_ident() {
        let value = if ident == "bool" {
            quote!(::skiff::Value::Boolean(::std::option::Option::None))
        } else if ident == "i8" {
            quote!(::skiff::Value::Int8(::std::option::Option::None))
        } else if ident == "i16" {
            quote!(::skiff::Value::Int16(::std::option::Option::None))
        } else if ident == "i32" {
            quote!(::skiff::Value::Int32(::std::option::Option::None))
        } else if ident == "i64" {
            quote!(::skiff::Value::Int64(::std::option::Option::None))
        } else if ident == "u8" {
            quote!(::skiff::Value::UInt8(::std::option::Option::None))
        } else if ident == "u16" {
            quote!(::skiff::Value::UInt16(::std::option::Option::None))
        } else if ident == "u32" {
            quote!(::skiff::Value::UInt32(::std::option::Option::None))
        } else if ident == "u64" {
            quote!(::skiff::Value::UInt64(::std::option::Option::None))
        } else if ident == "f32" {
            quote!(::skiff::Value::Float32(::std::option::Option::None))
        } else if ident == "f64" {
            quote!(::skiff::Value::Float64(::std::option::Option::None))
        } else if ident == "String" {
            quote!(::skiff::Value::Varchar(::std::option::Option::None))
        } else {
            panic!("Type `{}` cannot be mapped to a column", ident);
        };
        return TypeDecoded {
            value,
            nullable: false,
        };
    }
    if matches_path(path, &["std", "string", "String"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Varchar(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["rust_decimal", "Decimal"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Decimal(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["time", "Date"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Date(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["time", "Time"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Time(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["time", "PrimitiveDateTime"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Timestamp(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["uuid", "Uuid"]) {
        return TypeDecoded {
            value: quote!(::skiff::Value::Uuid(::std::option::Option::None)),
            nullable: false,
        };
    }
    if matches_path(path, &["std", "vec", "Vec"]) {
        let inner = generic_argument(path);
        if let Type::Path(TypePath { path, .. }) = inner
            && path.is_ident("u8")
        {
            return TypeDecoded {
                value: quote!(::skiff::Value::Blob(::std::option::Option::None)),
                nullable: false,
            };
        }
        panic!("Only `Vec<u8>` can be mapped to a column");
    }
    if matches_path(path, &["std", "option", "Option"]) {
        let inner = decode_type(generic_argument(path));
        return TypeDecoded {
            value: inner.value,
            nullable: true,
        };
    }
    if matches_path(path, &["std", "boxed", "Box"]) {
        return decode_type(generic_argument(path));
    }
    panic!(
        "Type `{}` cannot be mapped to a column",
        path.to_token_stream()
    );
}
