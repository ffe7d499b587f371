//! Token data model
//!
//! A [`Token`] is a name (the literal source text it covers), a [`TokenKind`]
//! tag, a 0-based source position, an optional language tag and an optional
//! structured payload. Leaf tokens reconstruct the source exactly:
//! concatenating every leaf name in stream order reproduces the input.
//!
//! Composite tokens (Class/Function/Block kinds) own their children through
//! the [`Payload`] union; the tree is singly owned, parents hold children by
//! value and there are no back-references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification tag for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Generic symbol: identifiers, operators, punctuation
    Symbol,
    /// Module-level symbol (reserved)
    Module,
    /// A `class` composite
    Class,
    /// A `def` composite
    Function,
    /// Variable symbol (reserved)
    Variable,
    /// String literal
    Constant,
    /// Line comment, `#` through end of line
    Comment,
    /// Unclassified (reserved)
    Unknown,
    /// Mid-line whitespace, one raw unit per token
    Whitespace,
    /// Explicit line break
    LineBreak,
    /// Leading indentation run carrying a width payload
    Indent,
    /// Generic block composite: conditionals, loops, imports
    Block,
    /// Reserved keyword (reserved)
    Keyword,
    /// Decorator marker (`@`-annotation)
    Marker,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Symbol => "symbol",
            TokenKind::Module => "module",
            TokenKind::Class => "class",
            TokenKind::Function => "function",
            TokenKind::Variable => "variable",
            TokenKind::Constant => "constant",
            TokenKind::Comment => "comment",
            TokenKind::Unknown => "unknown",
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineBreak => "linebreak",
            TokenKind::Indent => "indent",
            TokenKind::Block => "block",
            TokenKind::Keyword => "keyword",
            TokenKind::Marker => "marker",
        };
        write!(f, "{}", name)
    }
}

/// Source language a composite token was recognized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLang {
    Python,
}

/// Language tag attached to recognized constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangTag {
    pub lang: SourceLang,
    pub version: u16,
}

/// Header metadata and children of a `class` composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPayload {
    /// Construct name, first non-trivial token of the header
    pub name: Option<String>,
    /// Comma-separated parent-class token groups from the header parens
    pub parents: Vec<Vec<Token>>,
    /// Absorbed decorator markers, in source order
    pub decorators: Vec<Token>,
    pub children: Vec<Token>,
}

/// Header metadata and children of a `def` composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionPayload {
    pub name: Option<String>,
    pub decorators: Vec<Token>,
    pub children: Vec<Token>,
}

/// Children of a plain block composite (`if`, `elif`, `else`, `while`,
/// `for`, `with`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub children: Vec<Token>,
}

/// Path and symbol lists of an `import`/`from` composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPayload {
    /// Dotted module path tokens (empty for the plain `import` form)
    pub path: Vec<Token>,
    /// Imported symbol tokens, commas excluded
    pub symbols: Vec<Token>,
}

/// Annotation path and verbatim arguments of a decorator marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPayload {
    pub path: Vec<Token>,
    /// Argument tokens between the marker's parens, unparsed
    pub args: Option<Vec<Token>>,
}

/// Structured payload of a token; a closed union over everything the
/// pipeline attaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Indent width: space = 1, tab = 8
    Width(usize),
    Class(ClassPayload),
    Function(FunctionPayload),
    Block(BlockPayload),
    Import(ImportPayload),
    Marker(MarkerPayload),
}

/// One typed lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lang: Option<LangTag>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payload: Option<Payload>,
}

impl Token {
    pub fn new(name: impl Into<String>, kind: TokenKind, line: usize, column: usize) -> Self {
        Token {
            name: name.into(),
            kind,
            line,
            column,
            lang: None,
            payload: None,
        }
    }

    pub fn with_lang(mut self, lang: SourceLang, version: u16) -> Self {
        self.lang = Some(LangTag { lang, version });
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whitespace, comments, indentation and line breaks carry no structure.
    pub fn is_trivial(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Indent | TokenKind::LineBreak
        )
    }

    /// The computed width of an Indent token, the sole quantity used to
    /// compare nesting depth.
    pub fn indent_width(&self) -> Option<usize> {
        match (&self.kind, &self.payload) {
            (TokenKind::Indent, Some(Payload::Width(width))) => Some(*width),
            _ => None,
        }
    }

    /// Child tokens of a composite, if this token carries any.
    pub fn children(&self) -> Option<&[Token]> {
        match &self.payload {
            Some(Payload::Class(p)) => Some(&p.children),
            Some(Payload::Function(p)) => Some(&p.children),
            Some(Payload::Block(p)) => Some(&p.children),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},#{}-#{})", self.name, self.kind, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_kinds() {
        assert!(Token::new(" ", TokenKind::Whitespace, 0, 0).is_trivial());
        assert!(Token::new("\n", TokenKind::LineBreak, 0, 0).is_trivial());
        assert!(Token::new("# c", TokenKind::Comment, 0, 0).is_trivial());
        assert!(Token::new("    ", TokenKind::Indent, 0, 0).is_trivial());
        assert!(!Token::new("x", TokenKind::Symbol, 0, 0).is_trivial());
    }

    #[test]
    fn test_indent_width_requires_indent_kind() {
        let indent = Token::new("\t", TokenKind::Indent, 0, 0).with_payload(Payload::Width(8));
        assert_eq!(indent.indent_width(), Some(8));

        let symbol = Token::new("x", TokenKind::Symbol, 0, 0).with_payload(Payload::Width(8));
        assert_eq!(symbol.indent_width(), None);

        let bare = Token::new(" ", TokenKind::Indent, 0, 0);
        assert_eq!(bare.indent_width(), None);
    }

    #[test]
    fn test_children_accessor() {
        let child = Token::new("x", TokenKind::Symbol, 1, 4);
        let block = Token::new("if", TokenKind::Block, 0, 0).with_payload(Payload::Block(
            BlockPayload {
                children: vec![child.clone()],
            },
        ));
        assert_eq!(block.children(), Some(&[child][..]));
        assert_eq!(Token::new("x", TokenKind::Symbol, 0, 0).children(), None);
    }

    #[test]
    fn test_token_serialization_skips_empty_fields() {
        let token = Token::new("x", TokenKind::Symbol, 0, 0);
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("lang"));
        assert!(!json.contains("payload"));
    }
}
