use std::fs;
use std::path::Path;

use log::debug;

use crate::Result;
use crate::error::TemplateError;
use crate::loader::{FileLoader, NullLoader, PartialLoader};
use crate::options::RenderOptions;
use crate::tpl::ast::Node;
use crate::tpl::parser::parse_template;
use crate::tpl::render::Renderer;
use crate::tpl::render_context::Context;
use crate::value::ToValue;

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses template text. Syntax errors are reported here, before any rendering.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            nodes: parse_template(source)?,
        })
    }

    /// Reads and parses a template file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading template {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| TemplateError::TemplateLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&source)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Renders without partial support; a partial tag fails the render.
    pub fn render<T: ToValue + ?Sized>(&self, data: &T) -> Result<String> {
        self.render_with_options(data, &NullLoader, &RenderOptions::default())
    }

    /// Renders, fetching partial bodies from `loader`.
    pub fn render_with_loader<T, L>(&self, data: &T, loader: &L) -> Result<String>
    where
        T: ToValue + ?Sized,
        L: PartialLoader,
    {
        self.render_with_options(data, loader, &RenderOptions::default())
    }

    /// Renders the template against `data`.
    ///
    /// The output is all-or-nothing: on error no partial text is returned.
    /// Missing data never fails a render; it renders as empty text and counts
    /// as falsy in sections.
    pub fn render_with_options<T, L>(
        &self,
        data: &T,
        loader: &L,
        options: &RenderOptions,
    ) -> Result<String>
    where
        T: ToValue + ?Sized,
        L: PartialLoader,
    {
        let mut ctx = Context::new(data.to_value());
        let mut out = String::new();
        Renderer::new(loader, options).render(&self.nodes, &mut ctx, &mut out)?;
        Ok(out)
    }
}

/// Parses and renders `template` against `data`. Partial tags are errors.
pub fn render<T: ToValue + ?Sized>(template: &str, data: &T) -> Result<String> {
    Template::parse(template)?.render(data)
}

/// Parses and renders `template`, resolving partial tags through `loader`.
pub fn render_with_loader<T, L>(template: &str, data: &T, loader: &L) -> Result<String>
where
    T: ToValue + ?Sized,
    L: PartialLoader,
{
    Template::parse(template)?.render_with_loader(data, loader)
}

/// Renders a template file; partials are read from the file's directory as
/// `<name>.mustache`.
pub fn render_file<T: ToValue + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<String> {
    render_file_with_options(path, data, &RenderOptions::default())
}

pub fn render_file_with_options<T: ToValue + ?Sized>(
    path: impl AsRef<Path>,
    data: &T,
    options: &RenderOptions,
) -> Result<String> {
    let path = path.as_ref();
    let template = Template::from_file(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let loader = FileLoader::new(dir).with_extension(options.partial_extension.clone());
    template.render_with_options(data, &loader, options)
}
