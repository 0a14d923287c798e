use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

use log::{debug, trace};

use crate::Result;
use crate::error::TemplateError;
use crate::loader::PartialLoader;
use crate::options::RenderOptions;
use crate::tpl::ast::Node;
use crate::tpl::parser::parse_template;
use crate::tpl::render_context::Context;

/// State for one render call: where partials come from, the partials parsed
/// so far, and how deep partial inclusion currently is.
pub(crate) struct Renderer<'a> {
    loader: &'a dyn PartialLoader,
    options: &'a RenderOptions,
    partials: HashMap<String, Rc<Vec<Node>>>,
    depth: usize,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(loader: &'a dyn PartialLoader, options: &'a RenderOptions) -> Self {
        Self {
            loader,
            options,
            partials: HashMap::new(),
            depth: 0,
        }
    }

    pub(crate) fn render(
        &mut self,
        nodes: &[Node],
        ctx: &mut Context,
        out: &mut String,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Comment => {}
                Node::Variable(name) => {
                    if let Some(v) = ctx.lookup(name) {
                        // Writing into a String cannot fail.
                        let _ = write!(out, "{}", v);
                    }
                }
                Node::Partial(name) => self.render_partial(name, ctx, out)?,
                Node::Section {
                    name,
                    inverted,
                    children,
                } => {
                    let value = ctx.lookup(name).filter(|v| v.is_truthy());

                    if *inverted {
                        if value.is_none() {
                            self.render(children, ctx, out)?;
                        }
                        continue;
                    }

                    let Some(value) = value else {
                        continue;
                    };

                    if let Some(items) = value.pointee().as_list_like() {
                        trace!("section {:?}: {} iterations", name, items.len());
                        for item in items {
                            ctx.push(item.clone());
                            let result = self.render(children, ctx, out);
                            ctx.pop();
                            result?;
                        }
                    } else {
                        ctx.push(value);
                        let result = self.render(children, ctx, out);
                        ctx.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render_partial(&mut self, name: &str, ctx: &mut Context, out: &mut String) -> Result<()> {
        if self.depth >= self.options.max_partial_depth {
            return Err(TemplateError::PartialDepthExceeded {
                name: name.to_string(),
            });
        }

        let nodes = self.partial(name)?;
        self.depth += 1;
        let result = self.render(&nodes, ctx, out);
        self.depth -= 1;
        result
    }

    /// Loads and parses a partial once per render call.
    fn partial(&mut self, name: &str) -> Result<Rc<Vec<Node>>> {
        if let Some(nodes) = self.partials.get(name) {
            return Ok(nodes.clone());
        }

        let body = self
            .loader
            .load(name)
            .map_err(|e| TemplateError::PartialLoadError {
                name: name.to_string(),
                reason: format!("{:#}", e),
            })?;
        debug!("loaded partial {:?} ({} bytes)", name, body.len());

        // Partials always start with the default delimiters.
        let nodes = Rc::new(parse_template(&body)?);
        self.partials.insert(name.to_string(), nodes.clone());
        Ok(nodes)
    }
}
