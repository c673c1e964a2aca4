use super::parser::SkipReason;
use super::tokenizer::strip_enclosing_parens;
use std::borrow::Cow;

/// One `field:"value"` clause pulled out of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term<'a> {
    pub field: &'a str,
    /// Unquoted and unescaped
    pub value: Cow<'a, str>,
    pub negated: bool,
}

/// Parse a single token into a term.
///
/// Strips a leading `NOT ` (any case), one enclosing pair of parentheses and
/// the quotes around the value, undoing backslash escapes inside them.
/// Tokens without a `field:` prefix, or whose value is blank once unquoted,
/// are rejected with the reason.
pub fn parse_term(token: &str) -> Result<Term<'_>, SkipReason> {
    let mut rest = token.trim();
    let mut negated = false;

    if let Some(stripped) = strip_not(rest) {
        negated = true;
        rest = stripped;
    }

    if let Some(inner) = strip_enclosing_parens(rest) {
        rest = inner.trim();
    }

    let (field, value) = rest.split_once(':').ok_or(SkipReason::MalformedToken)?;
    let field = field.trim();
    if field.is_empty() {
        return Err(SkipReason::MalformedToken);
    }

    let value = unquote(value.trim());
    if value.trim().is_empty() {
        return Err(SkipReason::EmptyValue);
    }

    Ok(Term {
        field,
        value,
        negated,
    })
}

/// Text after a leading case-insensitive `NOT `
pub fn strip_not(s: &str) -> Option<&str> {
    let prefix = s.get(..4)?;
    if prefix.eq_ignore_ascii_case("NOT ") {
        Some(s[4..].trim_start())
    } else {
        None
    }
}

fn unquote(s: &str) -> Cow<'_, str> {
    match s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) if inner.contains('\\') => Cow::Owned(unescape(inner)),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(s),
    }
}

/// `\x` becomes `x`; a trailing lone backslash is kept
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}
