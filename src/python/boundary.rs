//! Scope-boundary resolution
//!
//! Given the index of a block-opening keyword, [`scope_end`] finds the index
//! just past the construct's body. This is the piece that has to hold up
//! under ambiguous input: multi-line bracketed headers, backslash
//! continuation, lambda colons that must not be mistaken for the block
//! colon, and blank or comment-only lines that must not close a block.
//!
//! Resolution never fails hard. Unbalanced brackets force an early closure;
//! the only unresolvable shape is a header whose line ends before any colon,
//! reported as `None` so the caller can decline the match.

use crate::token::model::{Token, TokenKind};

/// The closing counterpart of an opening bracket token name.
fn closing_bracket(name: &str) -> Option<&'static str> {
    match name {
        "(" => Some(")"),
        "[" => Some("]"),
        "{" => Some("}"),
        _ => None,
    }
}

fn is_closing_bracket(name: &str) -> bool {
    matches!(name, ")" | "]" | "}")
}

/// Find the index just past the bracket opened at `open`, tracking nesting
/// over `()[]{}`. A closer that does not match the innermost opener forces
/// an early closure at that point instead of failing; end of input closes
/// everything.
pub fn find_bracket_end(tokens: &[Token], open: usize) -> usize {
    let Some(close) = closing_bracket(&tokens[open].name) else {
        return open + 1;
    };
    let mut stack = vec![close];
    let mut j = open + 1;
    while j < tokens.len() {
        let name = tokens[j].name.as_str();
        if let Some(close) = closing_bracket(name) {
            stack.push(close);
        } else if is_closing_bracket(name) {
            if stack.last() != Some(&name) {
                // mismatched closer: close early rather than fail
                return j + 1;
            }
            stack.pop();
            if stack.is_empty() {
                return j + 1;
            }
        }
        j += 1;
    }
    tokens.len()
}

/// If the physical line starting at `start` holds no executable content
/// (whitespace, indentation, comments and string literals only), return the
/// index just past its terminating line break.
pub fn empty_line_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut j = start;
    while j < tokens.len() {
        match tokens[j].kind {
            TokenKind::LineBreak => return Some(j + 1),
            TokenKind::Whitespace
            | TokenKind::Indent
            | TokenKind::Comment
            | TokenKind::Constant => j += 1,
            _ => return None,
        }
    }
    Some(tokens.len())
}

/// Whether the tokens strictly between `a` and `b` are all whitespace-like;
/// a non-trivial gap after the header colon means the body is inline.
fn gap_is_trivial(tokens: &[Token], a: usize, b: usize) -> bool {
    tokens[a + 1..b].iter().all(|t| {
        matches!(
            t.kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Indent
        )
    })
}

/// Resolve the boundary of the block construct whose keyword sits at `open`.
///
/// Returns the exclusive end of the construct's body, or `None` when the
/// header line ends before any block colon (the caller declines the match
/// and the keyword stays a plain token).
pub fn scope_end(tokens: &[Token], open: usize) -> Option<usize> {
    let n = tokens.len();
    let mut j = open + 1;
    let mut colon_at: Option<usize> = None;
    let mut lambda_balance = 0usize;
    let mut inline = false;

    // Phase 1: header scan up to the line break that closes the header.
    while j < n {
        let token = &tokens[j];
        let name = token.name.as_str();
        if closing_bracket(name).is_some() {
            j = find_bracket_end(tokens, j);
            continue;
        }
        if name == "\\" {
            // escaped continuation: skip the backslash and the break
            j += 2;
            continue;
        }
        if token.kind == TokenKind::LineBreak {
            let colon = colon_at?;
            if !gap_is_trivial(tokens, colon, j) {
                inline = true;
            }
            j += 1;
            break;
        }
        if name == "lambda" {
            lambda_balance += 1;
        } else if name == ":" {
            if lambda_balance == 0 {
                colon_at = Some(j);
            } else {
                lambda_balance -= 1;
            }
        }
        j += 1;
    }

    if inline {
        return Some(j);
    }

    // Phase 2: walk the indented body line by line. Blank and comment/string
    // only lines are skipped without affecting the indentation comparison.
    let mut indent_base: Option<usize> = None;
    while j < n {
        if let Some(next) = empty_line_end(tokens, j) {
            j = next;
            continue;
        }
        let token = &tokens[j];
        match (indent_base, token.indent_width()) {
            (None, Some(width)) => {
                indent_base = Some(width);
                j += 1;
            }
            (Some(base), Some(width)) if width < base => return Some(j - 1),
            (_, None) => return Some(j - 1),
            _ => {}
        }
        // consume the rest of the line under the same bracket/backslash rules
        while j < n {
            let token = &tokens[j];
            if closing_bracket(&token.name).is_some() {
                j = find_bracket_end(tokens, j);
            } else if token.name == "\\" {
                j += 2;
            } else if token.kind == TokenKind::LineBreak {
                j += 1;
                break;
            } else {
                j += 1;
            }
        }
    }
    Some(n)
}
