//! File processing API
//!
//! Small extensible surface for turning a source file into one of the
//! supported output renderings, keyed by a `<stage>-<format>` string
//! (`tokens-simple`, `tokens-json`, `tree-json`, `tree-treeviz`). The CLI
//! binary is a thin wrapper around [`process_file`].

use std::fmt;
use std::fs;
use std::path::Path;

use crate::formats::to_treeviz_str;
use crate::python::{decorate, extract};
use crate::token::model::{Token, TokenKind};

/// What to extract from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Flat extraction output
    Tokens,
    /// Decorated token tree
    Tree,
}

/// How to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Treeviz,
}

/// A complete processing specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like `tokens-simple` or `tree-treeviz`.
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage_str, format_str_rest)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };

        let stage = match stage_str {
            "tokens" => ProcessingStage::Tokens,
            "tree" => ProcessingStage::Tree,
            _ => return Err(ProcessingError::InvalidStage(stage_str.to_string())),
        };

        let format = match format_str_rest {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "treeviz" => OutputFormat::Treeviz,
            _ => return Err(ProcessingError::InvalidFormatType(format_str_rest.to_string())),
        };

        match (stage, format) {
            (ProcessingStage::Tokens, OutputFormat::Treeviz) => Err(
                ProcessingError::InvalidFormatType(
                    "treeviz only works with the tree stage".to_string(),
                ),
            ),
            (ProcessingStage::Tree, OutputFormat::Simple) => Err(
                ProcessingError::InvalidFormatType(
                    "simple only works with the tokens stage".to_string(),
                ),
            ),
            _ => Ok(ProcessingSpec { stage, format }),
        }
    }

    /// All valid `<stage>-<format>` strings.
    pub fn available_formats() -> Vec<&'static str> {
        vec!["tokens-simple", "tokens-json", "tree-json", "tree-treeviz"]
    }
}

/// Errors that can occur during file processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    InvalidFormat(String),
    InvalidStage(String),
    InvalidFormatType(String),
    IoError(String),
}

impl std::error::Error for ProcessingError {}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::InvalidFormat(format) => write!(f, "Invalid format: {}", format),
            ProcessingError::InvalidStage(stage) => write!(f, "Invalid stage: {}", stage),
            ProcessingError::InvalidFormatType(format_type) => {
                write!(f, "Invalid format type: {}", format_type)
            }
            ProcessingError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

/// Process a source file according to the given specification.
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    let content = fs::read_to_string(file_path.as_ref())
        .map_err(|e| ProcessingError::IoError(e.to_string()))?;
    process_source(&content, spec)
}

/// Process source text according to the given specification.
pub fn process_source(source: &str, spec: &ProcessingSpec) -> Result<String, ProcessingError> {
    let tokens = extract(source);
    match spec.stage {
        ProcessingStage::Tokens => format_tokens(&tokens, spec.format),
        ProcessingStage::Tree => {
            let tree = decorate(&tokens);
            match spec.format {
                OutputFormat::Treeviz => Ok(to_treeviz_str(&tree)),
                _ => serde_json::to_string_pretty(&tree)
                    .map_err(|e| ProcessingError::IoError(e.to_string())),
            }
        }
    }
}

fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for token in tokens {
                result.push_str(&format!("<{}:{}>", token.kind, escape(&token.name)));
                if matches!(token.kind, TokenKind::LineBreak) {
                    result.push('\n');
                }
            }
            Ok(result)
        }
        _ => serde_json::to_string_pretty(tokens)
            .map_err(|e| ProcessingError::IoError(e.to_string())),
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\n', "\\n").replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_parsing() {
        let spec = ProcessingSpec::from_string("tokens-simple").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Tokens);
        assert_eq!(spec.format, OutputFormat::Simple);

        let spec = ProcessingSpec::from_string("tree-treeviz").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Tree);
        assert_eq!(spec.format, OutputFormat::Treeviz);

        assert!(ProcessingSpec::from_string("invalid").is_err());
        assert!(ProcessingSpec::from_string("tokens-treeviz").is_err());
        assert!(ProcessingSpec::from_string("tree-simple").is_err());
        assert!(ProcessingSpec::from_string("ast-json").is_err());
    }

    #[test]
    fn test_simple_token_formatting() {
        let spec = ProcessingSpec::from_string("tokens-simple").unwrap();
        let out = process_source("x = 1\n", &spec).unwrap();
        assert_eq!(
            out,
            "<symbol:x><whitespace: ><symbol:=><whitespace: ><symbol:1><linebreak:\\n>\n"
        );
    }

    #[test]
    fn test_json_tree_contains_composites() {
        let spec = ProcessingSpec::from_string("tree-json").unwrap();
        let out = process_source("def f():\n    pass\n", &spec).unwrap();
        assert!(out.contains("\"Function\""));
        assert!(out.contains("\"pass\""));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let spec = ProcessingSpec::from_string("tokens-json").unwrap();
        let err = process_file("/definitely/not/here.py", &spec).unwrap_err();
        assert!(matches!(err, ProcessingError::IoError(_)));
    }
}
