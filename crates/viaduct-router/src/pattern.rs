//! Route template compilation.
//!
//! A template is a `/`-delimited path where `{name}` marks a required
//! dynamic segment and `{name}?` marks the whole segment, separator
//! included, as optional. Each placeholder matches its registered constraint,
//! or [`DEFAULT_CONSTRAINT`] when none is registered. A template ending in
//! `/` matches both the with- and without-trailing-slash form of the path;
//! any other template never matches a trailing slash.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Default placeholder constraint: anything up to the next `/`.
pub const DEFAULT_CONSTRAINT: &str = "[^/]+";

/// A literal or dynamic run of text inside one path segment.
#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Param(String),
}

/// One parsed segment of a route template.
#[derive(Debug, Clone)]
enum Segment {
    /// A required segment: literal text and/or inline placeholders.
    Fixed(Vec<Piece>),
    /// An optional segment holding exactly one placeholder. The separator
    /// and the capture are present or absent together.
    Optional(String),
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    segments: Vec<Segment>,
    regex: Regex,
    params: Vec<String>,
    trailing_slash: bool,
}

impl PathPattern {
    /// Compiles a route template against a placeholder constraint map.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for templates that do not
    /// start with `/`, contain empty segments or malformed placeholders,
    /// repeat a placeholder name, or carry a constraint fragment that is
    /// not a valid regex.
    pub fn compile(pattern: &str, constraints: &HashMap<String, String>) -> Result<Self> {
        let (segments, trailing_slash) = parse(pattern)?;
        let params = collect_params(pattern, &segments)?;

        let mut re = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Fixed(pieces) => {
                    re.push('/');
                    for piece in pieces {
                        match piece {
                            Piece::Text(text) => re.push_str(&regex::escape(text)),
                            Piece::Param(name) => push_capture(&mut re, name, constraints),
                        }
                    }
                }
                Segment::Optional(name) => {
                    re.push_str("(?:/");
                    push_capture(&mut re, name, constraints);
                    re.push_str(")?");
                }
            }
        }
        if segments.is_empty() {
            re.push('/');
        }
        if trailing_slash {
            re.push_str("/?");
        }
        re.push('$');

        let regex = Regex::new(&re)
            .map_err(|e| RouterError::InvalidPattern(format!("{pattern}: {e}")))?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            params,
            trailing_slash,
        })
    }

    /// Returns `true` if the path matches this template.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches a path and extracts its parameters, in placeholder order.
    ///
    /// Absent optional placeholders produce no entry.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut params = PathParams::new();
        for name in &self.params {
            if let Some(value) = caps.name(name) {
                params.insert(name.clone(), value.as_str());
            }
        }
        Some(params)
    }

    /// Returns the original template string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the placeholder names, in template order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns `true` if the template ends in `/`.
    pub const fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Builds a path from parameter values.
    ///
    /// Optional segments whose parameter is absent are omitted; the
    /// trailing slash is restored when the template declares one.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MissingParameter`] when a required
    /// placeholder has no value.
    pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Fixed(pieces) => {
                    path.push('/');
                    for piece in pieces {
                        match piece {
                            Piece::Text(text) => path.push_str(text),
                            Piece::Param(name) => {
                                let value = params.get(name).ok_or_else(|| {
                                    RouterError::MissingParameter(name.clone())
                                })?;
                                path.push_str(value);
                            }
                        }
                    }
                }
                Segment::Optional(name) => {
                    if let Some(value) = params.get(name) {
                        path.push('/');
                        path.push_str(value);
                    }
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        if self.trailing_slash && !path.ends_with('/') {
            path.push('/');
        }
        Ok(path)
    }
}

fn push_capture(re: &mut String, name: &str, constraints: &HashMap<String, String>) {
    let constraint = constraints
        .get(name)
        .map_or(DEFAULT_CONSTRAINT, String::as_str);
    re.push_str("(?P<");
    re.push_str(name);
    re.push('>');
    re.push_str(constraint);
    re.push(')');
}

fn parse(pattern: &str) -> Result<(Vec<Segment>, bool)> {
    if !pattern.starts_with('/') {
        return Err(RouterError::InvalidPattern(format!(
            "{pattern}: must start with `/`"
        )));
    }

    let trailing_slash = pattern.len() > 1 && pattern.ends_with('/');
    let body = &pattern[1..];
    let body = if trailing_slash {
        &body[..body.len() - 1]
    } else {
        body
    };

    let mut segments = Vec::new();
    if body.is_empty() {
        if trailing_slash {
            // `//` and friends.
            return Err(RouterError::InvalidPattern(format!(
                "{pattern}: empty segment"
            )));
        }
        return Ok((segments, trailing_slash));
    }

    for raw in body.split('/') {
        if raw.is_empty() {
            return Err(RouterError::InvalidPattern(format!(
                "{pattern}: empty segment"
            )));
        }
        segments.push(parse_segment(pattern, raw)?);
    }

    Ok((segments, trailing_slash))
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment> {
    // `{name}?` owning the whole segment makes that segment optional.
    if let Some(inner) = raw.strip_suffix("}?").and_then(|s| s.strip_prefix('{')) {
        check_name(pattern, inner)?;
        return Ok(Segment::Optional(inner.to_string()));
    }

    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => name.push(c),
                    None => {
                        return Err(RouterError::InvalidPattern(format!(
                            "{pattern}: unclosed placeholder"
                        )))
                    }
                }
            }
            check_name(pattern, &name)?;
            if chars.peek() == Some(&'?') {
                return Err(RouterError::InvalidPattern(format!(
                    "{pattern}: optional placeholder `{{{name}}}?` must span a whole segment"
                )));
            }
            if !text.is_empty() {
                pieces.push(Piece::Text(std::mem::take(&mut text)));
            }
            pieces.push(Piece::Param(name));
        } else {
            text.push(c);
        }
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(text));
    }

    Ok(Segment::Fixed(pieces))
}

fn check_name(pattern: &str, name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RouterError::InvalidPattern(format!(
            "{pattern}: bad placeholder name `{name}`"
        )));
    }
    Ok(())
}

fn collect_params(pattern: &str, segments: &[Segment]) -> Result<Vec<String>> {
    let mut params = Vec::new();
    let mut seen = HashSet::new();
    for segment in segments {
        let names: Vec<&String> = match segment {
            Segment::Fixed(pieces) => pieces
                .iter()
                .filter_map(|p| match p {
                    Piece::Param(name) => Some(name),
                    Piece::Text(_) => None,
                })
                .collect(),
            Segment::Optional(name) => vec![name],
        };
        for name in names {
            if !seen.insert(name.clone()) {
                return Err(RouterError::InvalidPattern(format!(
                    "{pattern}: duplicate placeholder `{name}`"
                )));
            }
            params.push(name.clone());
        }
    }
    Ok(params)
}
