pub mod ast;
mod engine;
mod parser;
mod render;
mod render_context;
mod scanner;

pub use ast::Node;
pub use engine::{Template, render, render_file, render_file_with_options, render_with_loader};
pub use scanner::Delimiters;
