use crate::Result;
use crate::error::TemplateError;
use crate::tpl::ast::Node;
use crate::tpl::scanner::{self, Delimiters, Segment};

/// A classified tag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag<'a> {
    Comment,
    Open { name: &'a str, inverted: bool },
    Close(&'a str),
    Partial(&'a str),
    SetDelimiters(Delimiters),
    Variable(&'a str),
}

impl<'a> Tag<'a> {
    /// Classifies a tag by its leading sigil.
    fn classify(payload: &'a str, raw: &str) -> Result<Self> {
        let p = payload.trim();
        let empty = || TemplateError::EmptyTag {
            tag: raw.to_string(),
        };

        let Some(sigil) = p.chars().next() else {
            return Err(empty());
        };

        if sigil == '=' && p.len() > 1 && p.ends_with('=') {
            return parse_delimiters(p, raw).map(Tag::SetDelimiters);
        }
        if sigil == '!' {
            return Ok(Tag::Comment);
        }

        let ident = |s: &'a str| {
            let s = s.trim();
            if s.is_empty() { Err(empty()) } else { Ok(s) }
        };
        let rest = &p[sigil.len_utf8()..];

        match sigil {
            '#' => Ok(Tag::Open {
                name: ident(rest)?,
                inverted: false,
            }),
            '^' => Ok(Tag::Open {
                name: ident(rest)?,
                inverted: true,
            }),
            '/' => Ok(Tag::Close(ident(rest)?)),
            '>' => Ok(Tag::Partial(ident(rest)?)),
            _ => Ok(Tag::Variable(p)),
        }
    }
}

/// `=<% %>=`: the interior must split on whitespace into exactly two strings.
fn parse_delimiters(p: &str, raw: &str) -> Result<Delimiters> {
    let invalid = || TemplateError::InvalidDelimiters {
        tag: raw.to_string(),
    };
    let interior = &p[1..p.len() - 1];

    let mut parts = interior.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(open), Some(close), None) => Ok(Delimiters::new(open, close)),
        _ => Err(invalid()),
    }
}

/// An open section waiting for its close tag.
struct SectionFrame {
    name: String,
    inverted: bool,
}

/// Builds the node tree from the flat segment stream.
///
/// Sections are matched with an explicit stack: an open tag pushes a frame
/// plus a fresh child list, a close tag pops both and attaches the children to
/// a `Section` node in the parent list.
struct Parser<'a> {
    /// The unscanned remainder of the template.
    rest: &'a str,
    /// Delimiters in effect for the next scan.
    delims: Delimiters,
    /// The first element is always the root-level nodes.
    nodes_stack: Vec<Vec<Node>>,
    tag_stack: Vec<SectionFrame>,
}

impl<'a> Parser<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            rest: template,
            delims: Delimiters::default(),
            nodes_stack: vec![Vec::new()],
            tag_stack: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Node>> {
        while let Some((segment, rest)) = scanner::scan(self.rest, &self.delims)? {
            self.rest = rest;
            match segment {
                Segment::Text(text) => self.append_text(text),
                Segment::Tag { payload, raw } => self.handle_tag(payload, raw)?,
            }
        }

        if let Some(frame) = self.tag_stack.pop() {
            return Err(TemplateError::UnclosedSection { name: frame.name });
        }

        Ok(self.nodes_stack.pop().unwrap_or_default())
    }

    fn handle_tag(&mut self, payload: &str, raw: &str) -> Result<()> {
        match Tag::classify(payload, raw)? {
            Tag::Comment => self.append_node(Node::Comment),
            Tag::Variable(name) => self.append_node(Node::Variable(name.to_string())),
            Tag::Partial(name) => self.append_node(Node::Partial(name.to_string())),
            Tag::SetDelimiters(delims) => self.delims = delims,
            Tag::Open { name, inverted } => {
                self.nodes_stack.push(Vec::new());
                self.tag_stack.push(SectionFrame {
                    name: name.to_string(),
                    inverted,
                });
                self.skip_line_break();
            }
            Tag::Close(name) => {
                let Some(frame) = self.tag_stack.pop() else {
                    return Err(TemplateError::UnopenedSection {
                        name: name.to_string(),
                    });
                };
                if frame.name != name {
                    return Err(TemplateError::MismatchedSectionTag {
                        expected: frame.name,
                        found: name.to_string(),
                    });
                }
                let children = self.nodes_stack.pop().unwrap_or_default();
                self.append_node(Node::Section {
                    name: frame.name,
                    inverted: frame.inverted,
                    children,
                });
                self.skip_line_break();
            }
        }
        Ok(())
    }

    /// Drops one line break directly following a section tag.
    fn skip_line_break(&mut self) {
        let rest = self.rest;
        self.rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    /// Append a node to the current active scope.
    fn append_node(&mut self, node: Node) {
        if let Some(nodes) = self.nodes_stack.last_mut() {
            nodes.push(node);
        }
    }

    /// Append text, merging with the previous text node when possible.
    fn append_text(&mut self, text: &str) {
        if let Some(nodes) = self.nodes_stack.last_mut() {
            if let Some(Node::Text(last_text)) = nodes.last_mut() {
                last_text.push_str(text);
            } else {
                nodes.push(Node::Text(text.to_string()));
            }
        }
    }
}

/// Parses template text into its node tree.
pub fn parse_template(template: &str) -> Result<Vec<Node>> {
    Parser::new(template).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn var(s: &str) -> Node {
        Node::Variable(s.to_string())
    }

    #[test]
    fn test_parse_simple_text() {
        assert_eq!(parse_template("hello world").unwrap(), vec![text("hello world")]);
        assert!(parse_template("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_var() {
        let nodes = parse_template("hello {{ name }}!").unwrap();
        assert_eq!(nodes, vec![text("hello "), var("name"), text("!")]);
    }

    #[test]
    fn test_parse_sigils() {
        let nodes = parse_template("{{! note }}{{> footer }}{{^none}}x{{/none}}").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Comment,
                Node::Partial("footer".to_string()),
                Node::Section {
                    name: "none".to_string(),
                    inverted: true,
                    children: vec![text("x")],
                },
            ]
        );
    }

    #[test]
    fn test_parse_nested() {
        let nodes = parse_template("{{#a}}1{{#b}}{{c}}{{/b}}2{{/a}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Section {
                name: "a".to_string(),
                inverted: false,
                children: vec![
                    text("1"),
                    Node::Section {
                        name: "b".to_string(),
                        inverted: false,
                        children: vec![var("c")],
                    },
                    text("2"),
                ],
            }]
        );
    }

    #[test]
    fn test_delimiter_change_applies_inside_sections() {
        let nodes = parse_template("{{#a}}{{=<% %>=}}<%b%>{{c}}<%/a%>").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Section {
                name: "a".to_string(),
                inverted: false,
                children: vec![var("b"), text("{{c}}")],
            }]
        );
    }

    #[test]
    fn test_delimiter_round_trip() {
        let nodes = parse_template("{{ a }}{{= <% %> =}}<%b %><%= {{ }}=%>{{c}}").unwrap();
        assert_eq!(nodes, vec![var("a"), var("b"), var("c")]);
    }

    #[test]
    fn test_empty_tags() {
        for tpl in ["{{}}", "{{ }}", "{{#a}}{{}}{{/a}}", "{{#}}", "{{/ }}", "{{>}}"] {
            match parse_template(tpl) {
                Err(TemplateError::EmptyTag { .. }) => {}
                other => panic!("{:?}: expected EmptyTag, got {:?}", tpl, other),
            }
        }
    }

    #[test]
    fn test_section_errors() {
        assert_eq!(
            parse_template("{{#a}}x{{/b}}"),
            Err(TemplateError::MismatchedSectionTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            })
        );
        assert_eq!(
            parse_template("{{#a}}{{#b}}{{/b}}"),
            Err(TemplateError::UnclosedSection {
                name: "a".to_string()
            })
        );
        assert_eq!(
            parse_template("x{{/a}}"),
            Err(TemplateError::UnopenedSection {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_line_break_after_section_tags_is_dropped() {
        let nodes = parse_template("{{#a}}\n{{b}}\n{{/a}}\nend").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Section {
                    name: "a".to_string(),
                    inverted: false,
                    children: vec![var("b"), text("\n")],
                },
                text("end"),
            ]
        );

        let nodes = parse_template("{{^a}}\r\n\r\nx{{/a}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Section {
                name: "a".to_string(),
                inverted: true,
                children: vec![text("\r\nx")],
            }]
        );

        // Only section tags swallow the break.
        let nodes = parse_template("{{b}}\n{{! c }}\n").unwrap();
        assert_eq!(nodes, vec![var("b"), text("\n"), Node::Comment, text("\n")]);
    }

    #[test]
    fn test_equals_without_closing_equals_is_a_variable() {
        assert_eq!(
            parse_template("a{{=foo}}b").unwrap(),
            vec![text("a"), var("=foo"), text("b")]
        );
        assert_eq!(parse_template("{{= <% %> }}").unwrap(), vec![var("= <% %>")]);
        assert_eq!(parse_template("{{=}}").unwrap(), vec![var("=")]);
    }

    #[test]
    fn test_invalid_delimiters() {
        for tpl in ["{{==}}", "{{=<%=}}", "{{=<% %> x=}}"] {
            match parse_template(tpl) {
                Err(TemplateError::InvalidDelimiters { tag }) => assert_eq!(tag, tpl),
                other => panic!("{:?}: expected InvalidDelimiters, got {:?}", tpl, other),
            }
        }
    }
}
