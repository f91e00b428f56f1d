//! Positional template engine.
//!
//! # Syntax
//!
//! - `{}` - Substitutes the next positional value
//! - `{N}` - Substitutes the value at index `N` (may repeat or reorder)
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! A template uses either automatic (`{}`) or manual (`{N}`) numbering, never
//! both. Named fields are rejected: this engine only does positional
//! substitution.
//!
//! A parameter list must supply exactly as many values as the template
//! requires. Extra values are an error just like missing ones, so a typo in
//! the configuration never silently produces a different command.

use std::fmt;

/// Error type for template parsing and rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` was found without a matching `}`.
    UnmatchedOpenBrace {
        /// The position of the unmatched `{`.
        position: usize,
    },
    /// A lone `}` that is not part of a `}}` escape.
    UnmatchedCloseBrace { position: usize },
    /// Braces contain something other than nothing or an index.
    InvalidPlaceholder {
        /// The text between the braces.
        field: String,
        position: usize,
    },
    /// `{}` and `{N}` used in the same template.
    MixedNumbering { position: usize },
    /// The parameter group does not fit the template.
    ParameterCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnmatchedOpenBrace { position } => {
                write!(f, "unmatched '{{' at position {} in template", position)
            }
            TemplateError::UnmatchedCloseBrace { position } => {
                write!(
                    f,
                    "single '}}' at position {} in template (use '}}}}' for a literal brace)",
                    position
                )
            }
            TemplateError::InvalidPlaceholder { field, position } => {
                write!(
                    f,
                    "invalid placeholder '{{{}}}' at position {} in template; only '{{}}' and '{{N}}' are supported",
                    field, position
                )
            }
            TemplateError::MixedNumbering { position } => {
                write!(
                    f,
                    "cannot mix automatic '{{}}' and manual '{{N}}' placeholders (position {})",
                    position
                )
            }
            TemplateError::ParameterCountMismatch { expected, actual } => {
                write!(
                    f,
                    "template expects {} parameter(s) but group has {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Resolved slot index; automatic placeholders are numbered at parse time.
    Slot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Automatic,
    Manual,
}

/// A parsed positional template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    required: usize,
}

impl Template {
    /// Parse a template string.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let template = Template::parse("oc scale dc {} --replicas={}")?;
    /// assert_eq!(template.required_parameters(), 2);
    /// ```
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut numbering: Option<Numbering> = None;
        let mut next_auto = 0usize;
        let mut required = 0usize;
        let mut chars = template.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '{' => {
                    if let Some((_, '{')) = chars.peek() {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => field.push(c),
                            None => return Err(TemplateError::UnmatchedOpenBrace { position: pos }),
                        }
                    }

                    let (kind, index) = if field.is_empty() {
                        let index = next_auto;
                        next_auto += 1;
                        (Numbering::Automatic, index)
                    } else if field.chars().all(|c| c.is_ascii_digit()) {
                        let index = field.parse::<usize>().map_err(|_| {
                            TemplateError::InvalidPlaceholder {
                                field: field.clone(),
                                position: pos,
                            }
                        })?;
                        (Numbering::Manual, index)
                    } else {
                        return Err(TemplateError::InvalidPlaceholder {
                            field,
                            position: pos,
                        });
                    };

                    match numbering {
                        Some(existing) if existing != kind => {
                            return Err(TemplateError::MixedNumbering { position: pos });
                        }
                        _ => numbering = Some(kind),
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(index));
                    required = required.max(index.saturating_add(1));
                }
                '}' => {
                    if let Some((_, '}')) = chars.peek() {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(TemplateError::UnmatchedCloseBrace { position: pos });
                    }
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments, required })
    }

    /// Number of positional values a parameter group must supply.
    pub fn required_parameters(&self) -> usize {
        self.required
    }

    /// Substitute `parameters` into the template.
    pub fn render<S: AsRef<str>>(&self, parameters: &[S]) -> Result<String, TemplateError> {
        if parameters.len() != self.required {
            return Err(TemplateError::ParameterCountMismatch {
                expected: self.required,
                actual: parameters.len(),
            });
        }

        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Slot(index) => result.push_str(parameters[*index].as_ref()),
            }
        }

        Ok(result)
    }
}
