//! Python decoration handlers
//!
//! One handler per block-opening keyword plus the import forms and the
//! decorator marker. Block handlers resolve their boundary through
//! [`crate::python::boundary::scope_end`], recursively decorate the body
//! range into children, parse header metadata, absorb any preceding
//! decorator markers from the parent scope, and append a single composite
//! token. A handler whose boundary cannot be resolved declines the match and
//! the keyword stays a plain leaf token; under-recognition is the only
//! observable degradation.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::python::boundary::{find_bracket_end, scope_end};
use crate::token::decorate::{
    decorate_range, run_decorate, DecorateHandler, DecorateMap, DecorateState, Scope,
};
use crate::token::model::{
    BlockPayload, ClassPayload, FunctionPayload, ImportPayload, MarkerPayload, Payload,
    SourceLang, Token, TokenKind,
};

/// Language version recorded on recognized composites.
const PYTHON_VERSION: u16 = 3;

/// Decorate a typed token stream into a nested tree.
///
/// Block constructs are replaced by single composite tokens owning their
/// children; everything else passes through unchanged. Never fails.
pub fn decorate(tokens: &[Token]) -> Vec<Token> {
    run_decorate(tokens, &DECORATE_MAP)
}

/// Root dispatch table over Python's block keywords; built once, immutable
/// afterwards.
pub static DECORATE_MAP: Lazy<DecorateMap> = Lazy::new(|| {
    let mut map: DecorateMap = HashMap::new();
    map.insert("from", vec![decorate_from as DecorateHandler]);
    map.insert("import", vec![decorate_import as DecorateHandler]);
    map.insert("@", vec![decorate_marker as DecorateHandler]);
    map.insert("class", vec![decorate_class as DecorateHandler]);
    map.insert("def", vec![decorate_def as DecorateHandler]);
    map.insert("if", vec![decorate_if as DecorateHandler]);
    map.insert("elif", vec![decorate_elif as DecorateHandler]);
    map.insert("else", vec![decorate_else as DecorateHandler]);
    map.insert("while", vec![decorate_while as DecorateHandler]);
    map.insert("for", vec![decorate_for as DecorateHandler]);
    map.insert("with", vec![decorate_with as DecorateHandler]);
    map
});

/// Detach decorator markers trailing in the parent scope and return them in
/// source order.
///
/// Scans backward over trailing whitespace, comments and line breaks,
/// stopping at the first non-trivial, non-marker token. The scanned suffix
/// is rebuilt without the markers rather than deleted in place.
pub fn absorb_markers(scope: &mut Scope) -> Vec<Token> {
    let mut suffix_start = 0;
    let mut count = 0;
    for idx in (0..scope.tokens.len()).rev() {
        match scope.tokens[idx].kind {
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::LineBreak => {}
            TokenKind::Marker => count += 1,
            _ => {
                suffix_start = idx + 1;
                break;
            }
        }
    }
    if count == 0 {
        return Vec::new();
    }
    let suffix = scope.tokens.split_off(suffix_start);
    let mut markers = Vec::with_capacity(count);
    for token in suffix {
        if token.kind == TokenKind::Marker {
            markers.push(token);
        } else {
            scope.tokens.push(token);
        }
    }
    markers
}

/// Parse a class header from the body's leading tokens: the construct name,
/// then comma-separated parent groups between `(` and `)`.
fn parse_class_header(children: &[Token]) -> (Option<String>, Vec<Vec<Token>>) {
    let mut name = None;
    let mut parents: Vec<Vec<Token>> = Vec::new();
    // 0 = before name, 1 = after name, 2 = inside the parent parens
    let mut stage = 0;
    for token in children {
        if token.is_trivial() || token.name == "\\" {
            continue;
        }
        match stage {
            0 => {
                name = Some(token.name.clone());
                stage = 1;
            }
            1 if token.name == ":" => break,
            1 if token.name == "(" => stage = 2,
            2 if token.name == ")" => break,
            2 if token.name == "," => parents.push(Vec::new()),
            2 => {
                if let Some(group) = parents.last_mut() {
                    group.push(token.clone());
                } else {
                    parents.push(vec![token.clone()]);
                }
            }
            _ => {}
        }
    }
    while parents.last().is_some_and(Vec::is_empty) {
        parents.pop();
    }
    (name, parents)
}

/// The construct name is the first non-trivial token of the body.
fn parse_function_name(children: &[Token]) -> Option<String> {
    children
        .iter()
        .find(|t| !t.is_trivial() && t.name != "\\")
        .map(|t| t.name.clone())
}

fn decorate_class(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    let tokens = state.tokens;
    let open = state.i;
    let Some(end) = scope_end(tokens, open) else {
        return false;
    };
    let body = decorate_range(state, open + 1, end);
    let (name, parents) = parse_class_header(&body.tokens);
    let decorators = absorb_markers(scope);
    let at = &tokens[open];
    scope.tokens.push(
        Token::new("class", TokenKind::Class, at.line, at.column)
            .with_lang(SourceLang::Python, PYTHON_VERSION)
            .with_payload(Payload::Class(ClassPayload {
                name,
                parents,
                decorators,
                children: body.tokens,
            })),
    );
    state.i = end;
    true
}

fn decorate_def(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    let tokens = state.tokens;
    let open = state.i;
    let Some(end) = scope_end(tokens, open) else {
        return false;
    };
    let body = decorate_range(state, open + 1, end);
    let name = parse_function_name(&body.tokens);
    let decorators = absorb_markers(scope);
    let at = &tokens[open];
    scope.tokens.push(
        Token::new("def", TokenKind::Function, at.line, at.column)
            .with_lang(SourceLang::Python, PYTHON_VERSION)
            .with_payload(Payload::Function(FunctionPayload {
                name,
                decorators,
                children: body.tokens,
            })),
    );
    state.i = end;
    true
}

/// Shared body of the plain block handlers (`if`, `elif`, `else`, `while`,
/// `for`, `with`): no header metadata, no decorator absorption.
fn simple_block(state: &mut DecorateState<'_>, scope: &mut Scope, keyword: &'static str) -> bool {
    let tokens = state.tokens;
    let open = state.i;
    let Some(end) = scope_end(tokens, open) else {
        return false;
    };
    let body = decorate_range(state, open + 1, end);
    let at = &tokens[open];
    scope.tokens.push(
        Token::new(keyword, TokenKind::Block, at.line, at.column)
            .with_lang(SourceLang::Python, PYTHON_VERSION)
            .with_payload(Payload::Block(BlockPayload {
                children: body.tokens,
            })),
    );
    state.i = end;
    true
}

fn decorate_if(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "if")
}
fn decorate_elif(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "elif")
}
fn decorate_else(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "else")
}
fn decorate_while(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "while")
}
fn decorate_for(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "for")
}
fn decorate_with(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    simple_block(state, scope, "with")
}

/// Collect the imported symbols starting at `first`, up to an un-bracketed,
/// un-continued line break. Parenthesized lists may span multiple lines;
/// commas separate symbols and are not collected themselves. Returns the
/// symbols and the index just past the construct.
fn collect_import_symbols(tokens: &[Token], first: usize) -> (Vec<Token>, usize) {
    let mut symbols = Vec::new();
    let mut bracket = 0u32;
    let mut continuation = false;
    let mut j = first;
    while j < tokens.len() {
        let token = &tokens[j];
        if token.kind == TokenKind::LineBreak {
            if bracket == 0 && !continuation {
                return (symbols, j + 1);
            }
            continuation = false;
            j += 1;
            continue;
        }
        match token.name.as_str() {
            "(" => bracket += 1,
            ")" => bracket = bracket.saturating_sub(1),
            "\\" => continuation = true,
            "," => {}
            _ => {
                if !token.is_trivial() {
                    symbols.push(token.clone());
                }
            }
        }
        j += 1;
    }
    (symbols, tokens.len())
}

fn push_import(
    scope: &mut Scope,
    line: usize,
    column: usize,
    path: Vec<Token>,
    symbols: Vec<Token>,
) {
    scope.tokens.push(
        Token::new("import", TokenKind::Block, line, column)
            .with_lang(SourceLang::Python, PYTHON_VERSION)
            .with_payload(Payload::Import(ImportPayload { path, symbols })),
    );
}

/// `from <dotted path> import <symbols>`: the path runs up to the `import`
/// keyword, then symbol collection takes over.
fn decorate_from(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    let tokens = state.tokens;
    let at = &tokens[state.i];
    let (line, column) = (at.line, at.column);
    let mut path = Vec::new();
    let mut j = state.i + 1;
    let mut found_import = false;
    while j < tokens.len() {
        let token = &tokens[j];
        if token.name == "import" {
            found_import = true;
            j += 1;
            break;
        }
        if token.kind == TokenKind::LineBreak {
            break;
        }
        if !token.is_trivial() {
            path.push(token.clone());
        }
        j += 1;
    }
    let (symbols, end) = if found_import {
        collect_import_symbols(tokens, j + 1)
    } else {
        // degenerate `from` line with no import keyword: consume the line
        (Vec::new(), (j + 1).min(tokens.len()))
    };
    push_import(scope, line, column, path, symbols);
    state.i = end;
    true
}

fn decorate_import(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    let tokens = state.tokens;
    let at = &tokens[state.i];
    let (line, column) = (at.line, at.column);
    let (symbols, end) = collect_import_symbols(tokens, state.i + 1);
    push_import(scope, line, column, Vec::new(), symbols);
    state.i = end;
    true
}

/// `@` marker: capture the dotted annotation path; when a `(` follows,
/// capture the bracket-delimited argument tokens verbatim.
fn decorate_marker(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
    let tokens = state.tokens;
    let at = &tokens[state.i];
    let (line, column) = (at.line, at.column);
    let mut path = Vec::new();
    let mut args = None;
    let mut j = state.i + 1;
    while j < tokens.len() {
        let token = &tokens[j];
        if token.name == "(" {
            let end = find_bracket_end(tokens, j);
            let inner_end = end.saturating_sub(1).max(j + 1);
            args = Some(tokens[j + 1..inner_end].to_vec());
            j = end;
            break;
        }
        if token.kind == TokenKind::LineBreak {
            break;
        }
        if !token.is_trivial() {
            path.push(token.clone());
        }
        j += 1;
    }
    scope.tokens.push(
        Token::new("@", TokenKind::Marker, line, column)
            .with_lang(SourceLang::Python, PYTHON_VERSION)
            .with_payload(Payload::Marker(MarkerPayload { path, args })),
    );
    state.i = j;
    true
}
