//! Decoration engine
//!
//! Folds a flat typed token stream into a nested tree. The core operation is
//! [`decorate_range`]: open a fresh [`Scope`], dispatch on each token's
//! literal text against the handler table, and let matching handlers consume
//! a computed sub-range, recursively decorating it into children and
//! appending one composite token to the current scope. Tokens nothing
//! matches are appended unchanged by the default handler.
//!
//! A scope is owned exclusively by the decoration call that creates it and
//! is flattened into the parent's composite payload when that call returns;
//! the stack of active scopes is the call stack itself.

use std::collections::HashMap;

use super::model::Token;

/// A handler inspects the token at the cursor and either consumes a range
/// (returning `true`) or declines the match (returning `false`, cursor
/// untouched).
pub type DecorateHandler = fn(&mut DecorateState<'_>, &mut Scope) -> bool;

/// Dispatch table from a token's literal text to its ordered handler list.
pub type DecorateMap = HashMap<&'static str, Vec<DecorateHandler>>;

/// The token list under construction for one nested construct.
#[derive(Debug, Default)]
pub struct Scope {
    pub tokens: Vec<Token>,
}

impl Scope {
    pub fn new() -> Self {
        Scope { tokens: Vec::new() }
    }
}

/// Cursor state for one decoration run; the token slice and handler table
/// are shared so block handlers can recurse through [`decorate_range`].
pub struct DecorateState<'a> {
    pub tokens: &'a [Token],
    pub i: usize,
    pub map: &'a DecorateMap,
}

/// Decorate the half-open range `[start, end)` into a fresh scope.
///
/// Handlers must advance the cursor on a match; the default handler advances
/// by one, so the loop terminates after at most `end - start` dispatches.
pub fn decorate_range(state: &mut DecorateState<'_>, start: usize, end: usize) -> Scope {
    let tokens = state.tokens;
    let map = state.map;
    let mut scope = Scope::new();
    state.i = start;
    while state.i < tokens.len() && state.i < end {
        let key = tokens[state.i].name.as_str();
        let mut matched = false;
        if let Some(handlers) = map.get(key) {
            for handler in handlers {
                if handler(state, &mut scope) {
                    matched = true;
                    break;
                }
            }
        }
        if !matched {
            decorate_default(state, &mut scope);
        }
    }
    scope
}

/// Default handler: append the token unchanged and advance by one.
pub fn decorate_default(state: &mut DecorateState<'_>, scope: &mut Scope) {
    scope.tokens.push(state.tokens[state.i].clone());
    state.i += 1;
}

/// Decorate a whole token stream and return the flattened root scope.
pub fn run_decorate(tokens: &[Token], map: &DecorateMap) -> Vec<Token> {
    let mut state = DecorateState { tokens, i: 0, map };
    let end = tokens.len();
    decorate_range(&mut state, 0, end).tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::model::TokenKind;

    fn symbol(name: &str) -> Token {
        Token::new(name, TokenKind::Symbol, 0, 0)
    }

    #[test]
    fn test_default_passthrough() {
        let tokens = vec![symbol("a"), symbol("b"), symbol("c")];
        let map = DecorateMap::new();
        let out = run_decorate(&tokens, &map);
        assert_eq!(out, tokens);
    }

    #[test]
    fn test_declining_handler_falls_through_to_default() {
        fn decline(_state: &mut DecorateState<'_>, _scope: &mut Scope) -> bool {
            false
        }
        let tokens = vec![symbol("x"), symbol("y")];
        let mut map = DecorateMap::new();
        map.insert("x", vec![decline as DecorateHandler]);
        let out = run_decorate(&tokens, &map);
        assert_eq!(out, tokens);
    }

    #[test]
    fn test_handler_consumes_sub_range() {
        // a toy handler folding everything after the keyword into one token
        fn fold(state: &mut DecorateState<'_>, scope: &mut Scope) -> bool {
            let end = state.tokens.len();
            let body = decorate_range(state, state.i + 1, end);
            let mut name = String::from("fold");
            for token in &body.tokens {
                name.push(':');
                name.push_str(&token.name);
            }
            scope.tokens.push(Token::new(name, TokenKind::Block, 0, 0));
            state.i = end;
            true
        }
        let tokens = vec![symbol("a"), symbol("fold"), symbol("b"), symbol("c")];
        let mut map = DecorateMap::new();
        map.insert("fold", vec![fold as DecorateHandler]);
        let out = run_decorate(&tokens, &map);
        let names: Vec<_> = out.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "fold:b:c"]);
    }
}
