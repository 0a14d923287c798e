use crate::Result;
use crate::error::TemplateError;

/// The open/close strings that mark a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Literal text up to the next open delimiter.
    Text(&'a str),
    /// A tag: `payload` is the text between the delimiters, `raw` the whole tag.
    Tag { payload: &'a str, raw: &'a str },
}

/// Scans one segment off the front of `input`.
///
/// Returns the segment and the unscanned remainder, or `None` once the input
/// is exhausted. Scanning is a pure function of its arguments: a caller that
/// sees a delimiter change simply passes the new pair on the next call.
pub(crate) fn scan<'a>(
    input: &'a str,
    delims: &Delimiters,
) -> Result<Option<(Segment<'a>, &'a str)>> {
    if input.is_empty() {
        return Ok(None);
    }

    match input.find(delims.open.as_str()) {
        Some(0) => {
            let after_open = &input[delims.open.len()..];
            let Some(close_at) = after_open.find(delims.close.as_str()) else {
                return Err(TemplateError::UnmatchedOpenTag {
                    tag: first_line(input).to_string(),
                });
            };
            let payload = &after_open[..close_at];
            let end = delims.open.len() + close_at + delims.close.len();
            Ok(Some((
                Segment::Tag {
                    payload,
                    raw: &input[..end],
                },
                &input[end..],
            )))
        }
        Some(i) => Ok(Some((Segment::Text(&input[..i]), &input[i..]))),
        None => Ok(Some((Segment::Text(input), ""))),
    }
}

fn first_line(s: &str) -> &str {
    s.split_once('\n').map(|(line, _)| line).unwrap_or(s)
}
