//! Treeviz formatter for decorated token trees
//!
//! One line per node, structure encoded with box-drawing connectors, so a
//! whole module can be scanned quickly:
//!
//! ```text
//! ├─ block:import 0:0 [os.path] {join, split}
//! └─ class:Config 2:0
//!    ├─ function:__init__ 3:4 @cached
//!    └─ function:load 6:4
//! ```
//!
//! Trivial leaves (whitespace, indentation, line breaks) are elided; the
//! formatter is for inspection, not round-tripping.

use crate::token::model::{Payload, Token, TokenKind};

const MAX_LABEL: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn joined_names(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_trivial())
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join("")
}

/// Human-readable label for one node.
fn label(token: &Token) -> String {
    let head = match &token.payload {
        Some(Payload::Class(p)) => {
            format!("class:{}", p.name.as_deref().unwrap_or("?"))
        }
        Some(Payload::Function(p)) => {
            format!("function:{}", p.name.as_deref().unwrap_or("?"))
        }
        Some(Payload::Import(p)) => {
            let path = joined_names(&p.path);
            let symbols = p
                .symbols
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if path.is_empty() {
                format!("block:import {{{}}}", symbols)
            } else {
                format!("block:import [{}] {{{}}}", path, symbols)
            }
        }
        Some(Payload::Marker(p)) => format!("marker:@{}", joined_names(&p.path)),
        Some(Payload::Block(_)) => format!("block:{}", token.name),
        _ => format!("{}:{}", token.kind, truncate(&token.name, MAX_LABEL)),
    };
    let decorators: &[Token] = match &token.payload {
        Some(Payload::Class(p)) => &p.decorators,
        Some(Payload::Function(p)) => &p.decorators,
        _ => &[],
    };
    let mut line = format!("{} {}:{}", head, token.line, token.column);
    for marker in decorators {
        if let Some(Payload::Marker(p)) = &marker.payload {
            line.push_str(" @");
            line.push_str(&joined_names(&p.path));
        }
    }
    line
}

/// Render a decorated token tree into the treeviz text format.
pub fn to_treeviz_str(tokens: &[Token]) -> String {
    let mut result = String::new();
    let visible: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivial()).collect();
    let total = visible.len();
    for (i, token) in visible.into_iter().enumerate() {
        append_node(&mut result, token, "", i + 1 == total);
    }
    result
}

fn append_node(result: &mut String, token: &Token, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    result.push_str(&format!("{}{} {}\n", prefix, connector, label(token)));

    if let Some(children) = token.children() {
        let visible: Vec<&Token> = children.iter().filter(|t| !t.is_trivial()).collect();
        let total = visible.len();
        let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        for (i, child) in visible.into_iter().enumerate() {
            append_node(result, child, &child_prefix, i + 1 == total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::{decorate, extract};

    fn render(text: &str) -> String {
        to_treeviz_str(&decorate(&extract(text)))
    }

    #[test]
    fn test_nested_structure_is_indented() {
        let viz = render("class A:\n    def f(self):\n        pass\n");
        assert!(viz.contains("class:A 0:0"));
        assert!(viz.contains("function:f"));
        let class_line = viz.lines().next().unwrap();
        assert!(class_line.starts_with("└─"));
        let fn_line = viz.lines().find(|l| l.contains("function:f")).unwrap();
        assert!(fn_line.starts_with("   "));
    }

    #[test]
    fn test_import_label_shows_path_and_symbols() {
        let viz = render("from os.path import join, split\n");
        assert!(viz.contains("block:import [os.path] {join, split}"));
    }

    #[test]
    fn test_decorators_appear_on_their_construct() {
        let viz = render("@cached\ndef f():\n    pass\n");
        assert!(viz.contains("function:f"));
        assert!(viz.contains("@cached"));
    }

    #[test]
    fn test_trivial_leaves_elided() {
        let viz = render("x = 1\n");
        assert!(!viz.contains("linebreak"));
        assert!(!viz.contains("whitespace"));
    }
}
