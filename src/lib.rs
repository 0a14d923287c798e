//! A logic-less text templating engine.
//!
//! Templates mix literal text with tags:
//!
//! ```text
//! {{name}}                 - variable substitution
//! {{#items}}...{{/items}}  - section: conditional and/or repeated body
//! {{^items}}...{{/items}}  - inverted section: body when the value is falsy
//! {{! comment }}           - ignored
//! {{> header}}             - partial, loaded by name
//! {{=<% %>=}}              - switch delimiters for the rest of the template
//! ```
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut data = HashMap::new();
//! data.insert("name", "world");
//! assert_eq!(stache::render("hello {{name}}", &data).unwrap(), "hello world");
//! ```

pub mod error;
pub mod loader;
pub mod options;
pub mod tpl;
pub mod value;

pub use error::TemplateError;
pub use loader::{FileLoader, MemoryLoader, NullLoader, PartialLoader};
pub use options::RenderOptions;
pub use tpl::{
    Delimiters, Node, Template, render, render_file, render_file_with_options, render_with_loader,
};
pub use value::{Callable, Record, ToValue, Value, to_value};

pub use stache_macros::{Record, partial_assets};

pub type Result<T> = std::result::Result<T, TemplateError>;
