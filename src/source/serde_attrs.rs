//! Attribute inspection for struct definitions: `#[derive(...)]` lists and the serde
//! attributes that change a field's wire name.

use log::debug;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, ItemStruct, LitStr, Token};

/// Whether `attrs` contain a `#[derive(...)]` naming `trait_name` (by its last segment)
pub(super) fn derives(attrs: &[Attribute], trait_name: &str) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .any(|path| {
            path.segments
                .last()
                .is_some_and(|segment| segment.ident == trait_name)
        })
}

/// Serde attributes relevant to deserialized field names
#[derive(Debug, Default, PartialEq, Eq)]
struct SerdeAttrs {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
}

/// Names a struct's fields are deserialized from, in declaration order.
///
/// Honors `rename`, container-level `rename_all`, and drops `skip`/`skip_deserializing`
/// fields. Tuple and unit structs have no named fields.
pub(super) fn struct_field_names(item: &ItemStruct) -> Vec<String> {
    let Fields::Named(named) = &item.fields else {
        return Vec::new();
    };

    let container = serde_attrs(&item.attrs);

    named
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let attrs = serde_attrs(&field.attrs);
            if attrs.skip {
                return None;
            }

            let name = match (attrs.rename, &container.rename_all) {
                (Some(rename), _) => rename,
                (None, Some(rule)) => apply_rename_rule(&ident.unraw().to_string(), rule),
                (None, None) => ident.unraw().to_string(),
            };
            Some(name)
        })
        .collect()
}

fn serde_attrs(attrs: &[Attribute]) -> SerdeAttrs {
    let mut parsed = SerdeAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(value) = directional_value(&meta)? {
                    parsed.rename = Some(value);
                }
            } else if meta.path.is_ident("rename_all") {
                if let Some(value) = directional_value(&meta)? {
                    parsed.rename_all = Some(value);
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                parsed.skip = true;
            } else {
                skip_value(&meta)?;
            }
            Ok(())
        });

        if let Err(e) = result {
            debug!("Ignoring unparsable serde attribute: {}", e);
        }
    }

    parsed
}

/// Reads `key = "value"` or the `deserialize` half of `key(serialize = "..", deserialize = "..")`
fn directional_value(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let value: LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }

    let mut found = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("deserialize") {
            let value: LitStr = inner.value()?.parse()?;
            found = Some(value.value());
        } else {
            skip_value(&inner)?;
        }
        Ok(())
    })?;
    Ok(found)
}

/// Consumes the value of a meta item we don't care about
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_value(&inner))?;
    }
    Ok(())
}

/// Applies a serde `rename_all` rule to a snake_case field name
fn apply_rename_rule(field: &str, rule: &str) -> String {
    let words: Vec<&str> = field.split('_').filter(|w| !w.is_empty()).collect();
    let capitalized = || -> Vec<String> { words.iter().map(|w| crate::naming::ucfirst(w)).collect() };

    match rule {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" => field.to_uppercase(),
        "PascalCase" => capitalized().concat(),
        "camelCase" => match words.split_first() {
            Some((first, rest)) => {
                let tail: String = rest.iter().map(|w| crate::naming::ucfirst(w)).collect();
                format!("{}{}", first, tail)
            }
            None => field.to_string(),
        },
        "snake_case" => field.to_string(),
        "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "kebab-case" => words.join("-"),
        "SCREAMING-KEBAB-CASE" => words.join("-").to_uppercase(),
        other => {
            debug!("Unknown rename_all rule '{}', keeping field names", other);
            field.to_string()
        }
    }
}
