/// A parsed template element.
///
/// A whole template is a `Vec<Node>`; sections own their children, so the
/// tree has no back-references.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Variable(String),
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
    Comment,
    Partial(String),
}
