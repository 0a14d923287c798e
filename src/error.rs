use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unmatched open tag: {tag:?}")]
    UnmatchedOpenTag { tag: String },
    #[error("empty tag: {tag:?}")]
    EmptyTag { tag: String },
    #[error("mismatched section tag: expected {{{{/{expected}}}}}, found {{{{/{found}}}}}")]
    MismatchedSectionTag { expected: String, found: String },
    #[error("unclosed section: {name}")]
    UnclosedSection { name: String },
    #[error("unopened section: close tag {name} has no matching open tag")]
    UnopenedSection { name: String },
    #[error("invalid delimiters: {tag:?}")]
    InvalidDelimiters { tag: String },
    #[error("partial load error: {name}: {reason}")]
    PartialLoadError { name: String, reason: String },
    #[error("partial depth exceeded while rendering {name}")]
    PartialDepthExceeded { name: String },
    #[error("template load error: {path}: {reason}")]
    TemplateLoadError { path: String, reason: String },
    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl TemplateError {
    /// The tag text or identifier the error is about, if any.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            TemplateError::UnmatchedOpenTag { tag }
            | TemplateError::EmptyTag { tag }
            | TemplateError::InvalidDelimiters { tag } => Some(tag),
            TemplateError::MismatchedSectionTag { found, .. } => Some(found),
            TemplateError::UnclosedSection { name }
            | TemplateError::UnopenedSection { name }
            | TemplateError::PartialLoadError { name, .. }
            | TemplateError::PartialDepthExceeded { name } => Some(name),
            TemplateError::TemplateLoadError { path, .. } => Some(path),
            TemplateError::SerializationError(_) => None,
        }
    }
}

impl serde::ser::Error for TemplateError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TemplateError::SerializationError(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_kind_and_fragment() {
        let err = TemplateError::EmptyTag {
            tag: "{{}}".to_string(),
        };
        assert!(err.to_string().contains("empty tag"));
        assert_eq!(err.fragment(), Some("{{}}"));

        let err = TemplateError::MismatchedSectionTag {
            expected: "a".to_string(),
            found: "b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "mismatched section tag: expected {{/a}}, found {{/b}}"
        );
    }
}
