use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, LitStr, Token};

/// Per-field options parsed from `#[record(...)]`.
#[derive(Default)]
struct FieldOpts {
    id: bool,
    created_at: bool,
    search: bool,
    filter: Option<String>,
    unique: bool,
    sortable: bool,
}

struct RecordField {
    ident: Ident,
    /// Rust field name.
    name: String,
    /// Serialized field name. Search, filter, sort and unique keys use it.
    key: String,
    opts: FieldOpts,
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (resource, default_sort) = extract_struct_opts(input)?;
    let rename_all = serde_rename_all(input);
    let fields = extract_fields(input, rename_all.as_deref())?;

    let id_field = fields
        .iter()
        .find(|f| f.opts.id)
        .or_else(|| fields.iter().find(|f| f.name == "id"))
        .map(|f| f.ident.clone())
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Record derive: no field marked with #[record(id)] and no field named `id`",
            )
        })?;

    let created_field = fields
        .iter()
        .find(|f| f.opts.created_at)
        .or_else(|| fields.iter().find(|f| f.name == "created_at"));

    let created_at_body = match created_field {
        Some(f) => {
            let ident = &f.ident;
            quote! { ::lfpm::record::IntoTimestamp::timestamp(&self.#ident) }
        }
        None => quote! { ::core::option::Option::None },
    };

    let search: Vec<&RecordField> = fields.iter().filter(|f| f.opts.search).collect();
    let search_keys: Vec<&str> = search.iter().map(|f| f.key.as_str()).collect();
    let search_pushes = search.iter().map(|f| {
        let ident = &f.ident;
        quote! {
            if let ::core::option::Option::Some(text) = ::lfpm::FieldValue::text(&self.#ident) {
                values.push(text);
            }
        }
    });

    let filters: Vec<(&RecordField, &str)> = fields
        .iter()
        .filter_map(|f| f.opts.filter.as_deref().map(|key| (f, key)))
        .collect();
    let filter_keys: Vec<&str> = filters.iter().map(|(_, key)| *key).collect();
    let filter_arms = filters.iter().map(|(f, key)| {
        let ident = &f.ident;
        quote! { #key => ::lfpm::FieldValue::text(&self.#ident), }
    });

    let unique_pushes = fields.iter().filter(|f| f.opts.unique).map(|f| {
        let ident = &f.ident;
        let key = &f.key;
        quote! {
            if let ::core::option::Option::Some(text) = ::lfpm::FieldValue::text(&self.#ident) {
                values.push((#key, text));
            }
        }
    });

    // Every searchable, filterable or explicitly sortable field can be sorted on,
    // plus whatever the struct names as its default order.
    let mut sort_fields: Vec<(&Ident, &str)> = Vec::new();
    for f in &fields {
        let is_default = default_sort.as_deref() == Some(f.key.as_str());
        let sortable = f.opts.search
            || f.opts.filter.is_some()
            || f.opts.sortable
            || f.opts.created_at
            || is_default;
        if sortable && !sort_fields.iter().any(|(_, k)| *k == f.key) {
            sort_fields.push((&f.ident, f.key.as_str()));
        }
        if let Some(filter_key) = f.opts.filter.as_deref() {
            if filter_key != f.key && !sort_fields.iter().any(|(_, k)| *k == filter_key) {
                sort_fields.push((&f.ident, filter_key));
            }
        }
    }
    let sort_arms = sort_fields.iter().map(|(ident, key)| {
        quote! { #key => ::lfpm::FieldValue::sort_key(&self.#ident), }
    });

    let default_sort_body = match &default_sort {
        Some(key) => {
            if !fields.iter().any(|f| &f.key == key) {
                return Err(syn::Error::new_spanned(
                    name,
                    format!("Record derive: default sort field `{key}` does not exist"),
                ));
            }
            quote! { ::lfpm::SortOrder::ascending(#key) }
        }
        None => quote! { ::lfpm::SortOrder::Newest },
    };

    Ok(quote! {
        impl ::lfpm::HasId for #name {
            fn id(&self) -> &str {
                &self.#id_field
            }

            fn set_id(&mut self, id: ::std::string::String) {
                self.#id_field = id;
            }
        }

        impl ::lfpm::HasCreatedAt for #name {
            fn created_at(&self) -> ::core::option::Option<::lfpm::Timestamp> {
                #created_at_body
            }
        }

        impl ::lfpm::Filterable for #name {
            const SEARCH_FIELDS: &'static [&'static str] = &[#(#search_keys),*];
            const FILTER_KEYS: &'static [&'static str] = &[#(#filter_keys),*];

            fn search_values(&self) -> ::std::vec::Vec<::std::borrow::Cow<'_, str>> {
                let mut values = ::std::vec::Vec::new();
                #(#search_pushes)*
                values
            }

            fn filter_value(&self, key: &str) -> ::core::option::Option<::std::borrow::Cow<'_, str>> {
                match key {
                    #(#filter_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn sort_key(&self, key: &str) -> ::core::option::Option<::lfpm::SortKey> {
                match key {
                    #(#sort_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn default_sort() -> ::lfpm::SortOrder {
                #default_sort_body
            }
        }

        impl ::lfpm::Record for #name {
            const RESOURCE: &'static str = #resource;

            fn unique_values(&self) -> ::std::vec::Vec<(&'static str, ::std::borrow::Cow<'_, str>)> {
                let mut values = ::std::vec::Vec::new();
                #(#unique_pushes)*
                values
            }
        }
    })
}

fn extract_struct_opts(input: &DeriveInput) -> syn::Result<(String, Option<String>)> {
    let mut resource = None;
    let mut sort = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("resource") {
                let value: LitStr = meta.value()?.parse()?;
                resource = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("sort") {
                let value: LitStr = meta.value()?.parse()?;
                sort = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported record option, expected `resource` or `sort`"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let resource = resource.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));
    Ok((resource, sort))
}

fn extract_fields(input: &DeriveInput, rename_all: Option<&str>) -> syn::Result<Vec<RecordField>> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record derive only supports structs",
        ));
    };
    let Fields::Named(named) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record derive requires named fields",
        ));
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = ident.to_string().trim_start_matches("r#").to_string();
        let key = serde_rename(&field.attrs)
            .unwrap_or_else(|| rename_all.map_or_else(|| name.clone(), |rule| apply_rename_rule(rule, &name)));

        let mut opts = FieldOpts::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    opts.id = true;
                } else if meta.path.is_ident("created_at") {
                    opts.created_at = true;
                } else if meta.path.is_ident("search") {
                    opts.search = true;
                } else if meta.path.is_ident("unique") {
                    opts.unique = true;
                } else if meta.path.is_ident("sortable") {
                    opts.sortable = true;
                } else if meta.path.is_ident("filter") {
                    let filter_key = if meta.input.peek(syn::Token![=]) {
                        let value: LitStr = meta.value()?.parse()?;
                        value.value()
                    } else {
                        key.clone()
                    };
                    opts.filter = Some(filter_key);
                } else {
                    return Err(meta.error("unsupported record field option"));
                }
                Ok(())
            })?;
        }

        fields.push(RecordField { ident, name, key, opts });
    }

    Ok(fields)
}

/// `#[serde(rename_all = "...")]` on the struct, if any.
fn serde_rename_all(input: &DeriveInput) -> Option<String> {
    serde_string_option(&input.attrs, "rename_all")
}

/// `#[serde(rename = "...")]` on a field, if any.
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    serde_string_option(attrs, "rename")
}

// Serde attributes belong to serde; anything not understood here is skipped.
fn serde_string_option(attrs: &[Attribute], option: &str) -> Option<String> {
    let mut found = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.input.peek(Token![=]) {
                let value: Expr = meta.value()?.parse()?;
                if meta.path.is_ident(option) {
                    if let Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) = value {
                        found = Some(lit.value());
                    }
                }
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
    }
    found
}

/// Serde's `rename_all` rules, applied to a snake_case field name.
fn apply_rename_rule(rule: &str, field: &str) -> String {
    let words = field.split('_').filter(|w| !w.is_empty());
    let capitalize = |w: &str| {
        let mut chars = w.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        }
    };
    match rule {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" => field.to_uppercase(),
        "PascalCase" => words.map(capitalize).collect(),
        "camelCase" => words
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_string() } else { capitalize(w) })
            .collect(),
        "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_uppercase(),
        _ => field.to_string(),
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules_follow_serde() {
        assert_eq!(apply_rename_rule("camelCase", "first_name"), "firstName");
        assert_eq!(apply_rename_rule("PascalCase", "first_name"), "FirstName");
        assert_eq!(apply_rename_rule("kebab-case", "first_name"), "first-name");
        assert_eq!(apply_rename_rule("SCREAMING_SNAKE_CASE", "id"), "ID");
        assert_eq!(apply_rename_rule("snake_case", "first_name"), "first_name");
    }

    #[test]
    fn field_keys_use_serde_names() {
        let input: DeriveInput = syn::parse_quote! {
            #[serde(rename_all = "camelCase", deny_unknown_fields)]
            struct Row {
                #[serde(default, deserialize_with = "crate::id::deserialize")]
                id: String,
                #[record(search)]
                first_name: String,
                #[serde(rename = "mail")]
                #[record(unique)]
                email_address: String,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                created_at: Option<u64>,
            }
        };
        let rename_all = serde_rename_all(&input);
        let fields = extract_fields(&input, rename_all.as_deref()).unwrap();
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "firstName", "mail", "createdAt"]);
        assert_eq!(fields[3].name, "created_at");
    }
}
