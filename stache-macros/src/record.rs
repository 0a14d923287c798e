use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident, LitStr, Token, parse_macro_input};

pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Record only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let (methods, ref_methods) = match parse_struct_attrs(&input.attrs) {
        Ok(m) => m,
        Err(e) => return e.to_compile_error().into(),
    };

    let mut field_arms = Vec::new();
    for f in fields {
        let field_name = f.ident.as_ref().expect("named field");
        let (key, ignore) = match parse_field_attrs(f) {
            Ok(attrs) => attrs,
            Err(e) => return e.to_compile_error().into(),
        };
        if ignore {
            continue;
        }
        let key_lit = LitStr::new(&key, Span::call_site());
        field_arms.push(quote! {
            #key_lit => ::std::option::Option::Some(::stache::ToValue::to_value(&self.#field_name)),
        });
    }

    let method_arms = methods.iter().map(|(key, method)| {
        let key_lit = LitStr::new(key, Span::call_site());
        quote! {
            #key_lit => ::std::option::Option::Some(::stache::ToValue::to_value(&self.#method())),
        }
    });
    let ref_method_arms = ref_methods.iter().map(|(key, method)| {
        let key_lit = LitStr::new(key, Span::call_site());
        quote! {
            #key_lit => ::std::option::Option::Some(::stache::ToValue::to_value(&self.#method())),
        }
    });

    TokenStream::from(quote! {
        impl #impl_generics ::stache::Record for #name #ty_generics #where_clause {
            fn field(&self, key: &str) -> ::std::option::Option<::stache::Value> {
                match key {
                    #(#field_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn method(&self, key: &str) -> ::std::option::Option<::stache::Value> {
                match key {
                    #(#method_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn ref_method(&self, key: &str) -> ::std::option::Option<::stache::Value> {
                match key {
                    #(#ref_method_arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::stache::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> ::stache::Value {
                ::stache::Value::record(::std::clone::Clone::clone(self))
            }
        }
    })
}

type MethodList = Vec<(String, Ident)>;

/// `#[record(methods(AddOne = add_one, len), ref_methods(AddOneStar = add_one_star))]`
///
/// A bare identifier exposes the method under its own name.
fn parse_struct_attrs(attrs: &[syn::Attribute]) -> syn::Result<(MethodList, MethodList)> {
    let mut methods = Vec::new();
    let mut ref_methods = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let target = if meta.path.is_ident("methods") {
                &mut methods
            } else if meta.path.is_ident("ref_methods") {
                &mut ref_methods
            } else {
                return Err(meta.error("expected `methods(...)` or `ref_methods(...)`"));
            };

            meta.parse_nested_meta(|inner| {
                let key = inner
                    .path
                    .get_ident()
                    .cloned()
                    .ok_or_else(|| inner.error("expected a method name"))?;
                let method = if inner.input.peek(Token![=]) {
                    inner.value()?.parse::<Ident>()?
                } else {
                    key.clone()
                };
                target.push((key.unraw().to_string(), method));
                Ok(())
            })
        })?;
    }
    Ok((methods, ref_methods))
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<(String, bool)> {
    let mut name = field
        .ident
        .as_ref()
        .map(|i| i.unraw().to_string())
        .unwrap_or_default();
    let mut ignore = false;

    for attr in &field.attrs {
        if attr.path().is_ident("record") {
            if let Ok(s) = attr.parse_args::<LitStr>() {
                name = s.value();
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    ignore = true;
                } else if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    name = s.value();
                } else {
                    return Err(meta.error("expected `ignore` or `rename = \"...\"`"));
                }
                Ok(())
            })?;
        }
    }
    Ok((name, ignore))
}
