//! Prompt templates with typed inputs.
//!
//! A template is parsed once into literal and placeholder segments. The
//! placeholders must match the field names declared by its input type,
//! so rendering can never be missing a parameter.

use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Named string values that fill a template's placeholders.
///
/// Usually derived with `#[derive(PromptInputs)]`.
pub trait PromptInputs {
    /// Placeholder names, in field declaration order.
    const NAMES: &'static [&'static str];

    /// The value for a placeholder, or `None` if the name is not declared.
    fn value(&self, name: &str) -> Option<&str>;
}

/// Errors raised while building a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Placeholder '{{{name}}}' is not one of the declared inputs {declared:?}")]
    UnknownPlaceholder {
        name: String,
        declared: &'static [&'static str],
    },

    #[error("Declared input '{name}' never appears in the template")]
    UnusedInput { name: &'static str },

    #[error("Unclosed placeholder starting at byte {offset}")]
    Unclosed { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A prompt template bound to its input type `I`.
pub struct PromptTemplate<I> {
    source: String,
    segments: Vec<Segment>,
    _inputs: PhantomData<fn(&I)>,
}

impl<I: PromptInputs> PromptTemplate<I> {
    /// Parse a template and check it against the declared inputs of `I`.
    ///
    /// `{name}` is a placeholder; `{{` and `}}` produce literal braces.
    pub fn new(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse_segments(&source)?;

        for segment in &segments {
            if let Segment::Placeholder(name) = segment {
                if !I::NAMES.contains(&name.as_str()) {
                    return Err(TemplateError::UnknownPlaceholder {
                        name: name.clone(),
                        declared: I::NAMES,
                    });
                }
            }
        }

        for &declared in I::NAMES {
            let used = segments
                .iter()
                .any(|s| matches!(s, Segment::Placeholder(name) if name == declared));
            if !used {
                return Err(TemplateError::UnusedInput { name: declared });
            }
        }

        Ok(Self {
            source,
            segments,
            _inputs: PhantomData,
        })
    }

    /// Substitute every placeholder with the matching input value.
    pub fn render(&self, inputs: &I) -> String {
        let mut output = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = inputs.value(name) {
                        output.push_str(value);
                    }
                }
            }
        }
        output
    }

    /// The input names this template requires.
    pub fn required_names(&self) -> &'static [&'static str] {
        I::NAMES
    }
}

impl<I> PromptTemplate<I> {
    /// Placeholder names in order of appearance (repeats included).
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl<I> Clone for PromptTemplate<I> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            segments: self.segments.clone(),
            _inputs: PhantomData,
        }
    }
}

impl<I> fmt::Debug for PromptTemplate<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("source", &self.source)
            .finish()
    }
}

fn parse_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    buffer.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    name.push(next);
                }
                if !closed {
                    return Err(TemplateError::Unclosed { offset });
                }

                if !buffer.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut buffer)));
                }
                segments.push(Segment::Placeholder(name.trim().to_string()));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                buffer.push('}');
            }
            _ => buffer.push(ch),
        }
    }

    if !buffer.is_empty() {
        segments.push(Segment::Literal(buffer));
    }

    Ok(segments)
}
