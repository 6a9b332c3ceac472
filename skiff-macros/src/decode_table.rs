use syn::{ItemStruct, LitStr, parse::ParseBuffer};

/// Table name from `#[skiff(table = "...")]`, defaulting to the type name
/// verbatim.
pub(crate) fn decode_table(item: &ItemStruct) -> String {
    let mut name = item.ident.to_string();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("skiff") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `skiff`, use it like: `#[skiff(table = \"MyTable\")]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `table`, use it like: `#[skiff(table = \"MyTable\")]`"
                        );
                    };
                    name = v.value();
                } else {
                    panic!(
                        "Unknown attribute `{}` inside skiff macro",
                        arg.path.get_ident().map(ToString::to_string).unwrap_or_default()
                    );
                }
                Ok(())
            });
        }
    }
    name
}
