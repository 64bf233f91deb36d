//! Strict placeholder substitution for command templates.
//!
//! A template is an ordered list of lines. Each line may contain named
//! placeholders that are filled from a closed set of parameters when the
//! template is rendered.
//!
//! # Placeholder Grammar
//!
//! - `{name}` - replaced by the parameter `name` (`[A-Za-z0-9_]+`)
//! - `{{` - a literal `{`
//! - `}}` - a literal `}`
//!
//! A placeholder without a supplied parameter is an error; the literal
//! placeholder text is never emitted. Substituted values are not scanned
//! again, so values may safely contain braces.
//!
//! # Example
//!
//! ```
//! use oxflow_lib::template::{Params, render_line};
//!
//! let params = Params::new().with("build_name", "top");
//! let line = render_line("example", "yosys -l {build_name}.rpt", &params).unwrap();
//! assert_eq!(line, "yosys -l top.rpt");
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

/// A segment of a parsed template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A named placeholder
  Placeholder(String),
}

/// Errors that can occur while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("template '{template}': no value supplied for placeholder '{{{name}}}'")]
  Missing { template: String, name: String },

  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unmatched '}}' at position {0}")]
  UnmatchedBrace(usize),

  #[error("malformed placeholder: '{0}'")]
  Malformed(String),
}

/// An immutable, ordered list of template lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
  /// Name used in error messages.
  pub name: &'static str,

  /// Lines in output order.
  pub lines: &'static [&'static str],
}

impl Template {
  /// Create a template from static lines.
  pub const fn new(name: &'static str, lines: &'static [&'static str]) -> Self {
    Self { name, lines }
  }

  /// Render every line with `params`.
  pub fn render(&self, params: &Params) -> Result<Vec<String>, TemplateError> {
    self.render_with_suffix("", params)
  }

  /// Render every line after appending `suffix` to it.
  ///
  /// The suffix takes part in substitution, so it may itself contain
  /// placeholders (the build script appends `{fail_stmt}` this way).
  pub fn render_with_suffix(&self, suffix: &str, params: &Params) -> Result<Vec<String>, TemplateError> {
    self
      .lines
      .iter()
      .map(|line| render_line(self.name, &format!("{line}{suffix}"), params))
      .collect()
  }

  /// Names of every placeholder used by this template, in first-use order.
  pub fn placeholders(&self) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for line in self.lines {
      for segment in parse(line)? {
        if let Segment::Placeholder(name) = segment {
          if !names.contains(&name) {
            names.push(name);
          }
        }
      }
    }
    Ok(names)
  }
}

/// Named parameter values for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
  values: BTreeMap<String, String>,
}

impl Params {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add or replace a parameter.
  pub fn with(mut self, name: &str, value: impl ToString) -> Self {
    self.values.insert(name.to_string(), value.to_string());
    self
  }

  /// Look up a parameter value.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }
}

/// Parse a template line into segments.
///
/// # Errors
///
/// Returns an error on an unclosed `{`, a stray `}`, or an invalid name.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    match ch {
      '{' => {
        if let Some((_, '{')) = chars.peek() {
          chars.next();
          literal.push('{');
          continue;
        }

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let mut name = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == '}' {
            found_close = true;
            break;
          }
          name.push(c);
        }

        if !found_close {
          return Err(TemplateError::Unclosed(pos));
        }
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
          return Err(TemplateError::Malformed(name));
        }
        segments.push(Segment::Placeholder(name));
      }
      '}' => match chars.peek() {
        Some((_, '}')) => {
          chars.next();
          literal.push('}');
        }
        _ => return Err(TemplateError::UnmatchedBrace(pos)),
      },
      _ => literal.push(ch),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse and substitute a single line.
pub fn render_line(template: &str, line: &str, params: &Params) -> Result<String, TemplateError> {
  let segments = parse(line)?;
  substitute_segments(template, &segments, params)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(template: &str, segments: &[Segment], params: &Params) -> Result<String, TemplateError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(name) => {
        let value = params.get(name).ok_or_else(|| TemplateError::Missing {
          template: template.to_string(),
          name: name.clone(),
        })?;
        result.push_str(value);
      }
    }
  }

  Ok(result)
}
