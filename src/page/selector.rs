//! Selector - The CSS selector subset understood by `MemoryPage`
//!
//! Supported: `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr="v"]`,
//! `[attr^="v"]`, compounds of those (`section[id]`, `a.nav-link`) and
//! comma-separated lists. Combinators are not supported.

use crate::error::{PageError, Result};

/// Anything a selector can be matched against.
pub trait SelectorTarget {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || PageError::InvalidSelector(source.to_string());

        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() || part.contains(char::is_whitespace) {
                return Err(invalid());
            }
            alternatives.push(parse_compound(part).ok_or_else(invalid)?);
        }

        Ok(Self { alternatives })
    }

    /// True if any alternative matches.
    pub fn matches(&self, target: &impl SelectorTarget) -> bool {
        self.alternatives.iter().any(|c| compound_matches(c, target))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Split a leading identifier off `s`.
fn take_ident(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn unquote(value: &str) -> &str {
    let v = value.trim();
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    v
}

fn parse_attr(inner: &str) -> Option<AttrMatch> {
    let (name, rest) = take_ident(inner.trim());
    if name.is_empty() {
        return None;
    }
    let rest = rest.trim();
    let op = if rest.is_empty() {
        AttrOp::Exists
    } else if let Some(value) = rest.strip_prefix("^=") {
        AttrOp::Prefix(unquote(value).to_string())
    } else if let Some(value) = rest.strip_prefix('=') {
        AttrOp::Equals(unquote(value).to_string())
    } else {
        return None;
    };
    Some(AttrMatch {
        name: name.to_string(),
        op,
    })
}

fn parse_compound(part: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(r) = rest.strip_prefix('*') {
        rest = r;
    } else {
        let (tag, r) = take_ident(rest);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = r;
    }

    while let Some(c) = rest.chars().next() {
        match c {
            '.' | '#' => {
                let (ident, r) = take_ident(&rest[1..]);
                if ident.is_empty() {
                    return None;
                }
                if c == '.' {
                    compound.classes.push(ident.to_string());
                } else {
                    compound.id = Some(ident.to_string());
                }
                rest = r;
            }
            '[' => {
                let close = rest.find(']')?;
                compound.attrs.push(parse_attr(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn compound_matches(compound: &Compound, target: &impl SelectorTarget) -> bool {
    if let Some(tag) = &compound.tag {
        if !target.tag().eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if target.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| target.has_class(c)) {
        return false;
    }
    compound.attrs.iter().all(|m| match (&m.op, target.attr(&m.name)) {
        (_, None) => false,
        (AttrOp::Exists, Some(_)) => true,
        (AttrOp::Equals(v), Some(actual)) => actual == v,
        (AttrOp::Prefix(v), Some(actual)) => actual.starts_with(v.as_str()),
    })
}

// =============================================================================
// Tests
// =============================================================================
