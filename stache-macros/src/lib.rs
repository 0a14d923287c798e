mod assets;
mod record;

use proc_macro::TokenStream;

/// Implements `stache::Record` and `stache::ToValue` for a struct with named fields.
///
/// ```ignore
/// #[derive(Clone, Record)]
/// #[record(methods(AddOne = add_one), ref_methods(AddOneStar = add_one_star))]
/// struct User {
///     #[record("Name")]
///     name: String,
///     #[record(rename = "Id")]
///     id: i64,
///     #[record(ignore)]
///     password: String,
/// }
/// ```
///
/// The struct must be `Clone + Send + Sync + 'static`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}

/// Embeds partial template files at compile time.
///
/// Expands to a `Vec<(&'static str, &'static str)>` of `(file stem, contents)`
/// for every file matching the glob pattern, relative to the crate root.
/// Feed it to `MemoryLoader::from_assets`.
#[proc_macro]
pub fn partial_assets(input: TokenStream) -> TokenStream {
    assets::partial_assets_impl(input)
}
