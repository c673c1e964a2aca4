use crate::filter::Operator;

const AND_SPLIT: &[u8] = b" AND ";
const OR_SPLIT: &[u8] = b" OR ";

/// A top-level clause and the operator that preceded it in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// `AND` for the first token
    pub operator: Operator,
}

/// Result of a tokenizer pass, including the state the scan ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan<'a> {
    pub tokens: Vec<Token<'a>>,
    /// Parenthesis depth left open at end of input
    pub depth: usize,
    /// A quote was left open at end of input
    pub in_quotes: bool,
}

impl Scan<'_> {
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.in_quotes
    }
}

/// Split a decoded expression into top-level tokens
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    scan(input).tokens
}

/// Single left-to-right pass over `input`.
///
/// ` AND ` and ` OR ` split tokens only outside quotes at parenthesis depth
/// zero. Inside quotes a backslash escapes the next byte. Unbalanced input
/// never fails: whatever was accumulated when the input runs out becomes the
/// last token, and the open depth/quote state is reported on the returned
/// [`Scan`].
pub fn scan(input: &str) -> Scan<'_> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    let mut pending = Operator::And;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];

        if escaped {
            escaped = false;
            i += 1;
            continue;
        }

        match byte {
            b'\\' if in_quotes => escaped = true,
            b'"' => in_quotes = !in_quotes,
            b'(' if !in_quotes => depth += 1,
            // Stray closers clamp at zero so later splits still work
            b')' if !in_quotes => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && !in_quotes => {
                if let Some((operator, len)) = split_point(&bytes[i..]) {
                    push_token(&mut tokens, &input[start..i], pending);
                    pending = operator;
                    i += len;
                    start = i;
                    continue;
                }
            }
            _ => {}
        }

        i += 1;
    }

    push_token(&mut tokens, &input[start..], pending);

    Scan {
        tokens,
        depth,
        in_quotes,
    }
}

fn split_point(rest: &[u8]) -> Option<(Operator, usize)> {
    if rest.starts_with(AND_SPLIT) {
        Some((Operator::And, AND_SPLIT.len()))
    } else if rest.starts_with(OR_SPLIT) {
        Some((Operator::Or, OR_SPLIT.len()))
    } else {
        None
    }
}

fn push_token<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str, operator: Operator) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(Token { text, operator });
    }
}

/// Inner text of `s` if it is wrapped in one matching pair of parentheses.
///
/// `(a) AND (b)` starts and ends with parentheses but is not wrapped: the
/// first `(` closes before the end.
pub fn strip_enclosing_parens(s: &str) -> Option<&str> {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'(' || bytes[bytes.len() - 1] != b')' {
        return None;
    }

    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_quotes => escaped = true,
            b'"' => in_quotes = !in_quotes,
            b'(' if !in_quotes => depth += 1,
            b')' if !in_quotes => {
                depth -= 1;
                if depth == 0 {
                    return (i == bytes.len() - 1).then(|| &s[1..i]);
                }
            }
            _ => {}
        }
    }

    None
}
