//! Template rendering - named placeholder substitution
//!
//! Templates use `{name}` placeholders. Every occurrence of a known
//! placeholder is replaced; placeholders without a supplied value stay
//! verbatim, so a missing variable is visible in the delivered text
//! instead of silently vanishing. Rendering is pure.

use std::collections::{BTreeSet, HashMap};

/// Variable name -> substitution value
pub type TemplateVars = HashMap<String, String>;

/// Render a template against the supplied variables
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        match parse_placeholder(tail) {
            Some(name) => {
                let consumed = name.len() + 2;
                if let Some(value) = vars.get(name) {
                    out.push_str(value);
                } else {
                    // Unknown variable: keep the placeholder visible
                    out.push_str(&tail[..consumed]);
                }
                rest = &tail[consumed..];
            }
            None => {
                // Not a placeholder (unclosed or invalid name)
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collect the distinct placeholder names a template refers to
pub fn placeholders(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let tail = &rest[open..];
        match parse_placeholder(tail) {
            Some(name) => {
                let consumed = name.len() + 2;
                names.insert(name.to_string());
                rest = &tail[consumed..];
            }
            None => rest = &tail[1..],
        }
    }
    names
}

/// Parse a `{name}` placeholder at the start of `s`, returning the name
///
/// Names are non-empty runs of alphanumerics and underscores.
fn parse_placeholder(s: &str) -> Option<&str> {
    debug_assert!(s.starts_with('{'));
    let close = s.find('}')?;
    let name = &s[1..close];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(name)
}
