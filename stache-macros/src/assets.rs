use glob::glob;
use proc_macro::TokenStream;
use quote::quote;
use std::env;
use std::path::PathBuf;
use syn::{LitStr, parse_macro_input};

pub fn partial_assets_impl(input: TokenStream) -> TokenStream {
    // 1) Parse the input string literal (glob pattern).
    let pattern = parse_macro_input!(input as LitStr);
    let pattern_str = pattern.value();

    // 2) Relative patterns are resolved against the crate root.
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => {
            return syn::Error::new(pattern.span(), "CARGO_MANIFEST_DIR is not set")
                .to_compile_error()
                .into();
        }
    };
    let full_pattern = PathBuf::from(manifest_dir).join(&pattern_str);
    let full_pattern_str = full_pattern.to_string_lossy();

    // 3) Find matching files.
    let mut files: Vec<PathBuf> = match glob(&full_pattern_str) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            return syn::Error::new(pattern.span(), format!("Invalid glob pattern: {}", e))
                .to_compile_error()
                .into();
        }
    };
    files.sort();

    // 4) Generate `(stem, include_str!(path))` pairs so the contents are embedded at compile time.
    let mut assets = Vec::with_capacity(files.len());
    for path in &files {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let path_str = path.to_string_lossy().into_owned();
        assets.push(quote! {
            (#stem, include_str!(#path_str))
        });
    }

    TokenStream::from(quote! {
        {
            let assets: ::std::vec::Vec<(&'static str, &'static str)> = ::std::vec![
                #(#assets),*
            ];
            assets
        }
    })
}
