//! Bottom-level scanner
//!
//! Splits text into raw lexical units: word runs, single punctuation
//! characters and single whitespace characters. The scanner is a plain logos
//! lexer with no state; all interesting classification happens in the
//! extraction stage on top of these units.

use logos::Logos;

/// Raw unit classes produced by the scanner.
///
/// The classes partition the input: every character lands in exactly one of
/// them, so the concatenation of all unit slices reproduces the text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawUnit {
    #[token("\n")]
    Newline,

    // Non-newline whitespace, one character per unit
    #[regex(r"[ \t\r\x0b\x0c]")]
    Space,

    // ASCII punctuation, one character per unit
    #[regex(r"[!-/:-@\[-`{-~]")]
    Punct,

    // Everything else accumulates into word runs
    #[regex(r"[^!-/:-@\[-`{-~ \t\r\n\x0b\x0c]+")]
    Word,
}

/// Scan text into raw unit slices.
pub fn scan_units(text: &str) -> Vec<&str> {
    let mut lexer = RawUnit::lexer(text);
    let mut units = Vec::new();
    while let Some(result) = lexer.next() {
        if result.is_ok() {
            units.push(lexer.slice());
        }
    }
    units
}

/// Whether a unit (or an already-merged token name) is word content rather
/// than a punctuation or whitespace unit.
pub fn is_word(unit: &str) -> bool {
    let mut chars = unit.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if chars.next().is_some() {
        // multi-character runs are always word content
        return true;
    }
    !first.is_ascii_punctuation() && !first.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_punctuation_split() {
        let units = scan_units("hello world!");
        assert_eq!(units, vec!["hello", " ", "world", "!"]);
    }

    #[test]
    fn test_underscore_splits_identifiers() {
        let units = scan_units("my_var_2");
        assert_eq!(units, vec!["my", "_", "var", "_", "2"]);
    }

    #[test]
    fn test_whitespace_one_unit_per_char() {
        let units = scan_units("a\t\t b");
        assert_eq!(units, vec!["a", "\t", "\t", " ", "b"]);
    }

    #[test]
    fn test_newline_is_its_own_unit() {
        let units = scan_units("a\n\nb");
        assert_eq!(units, vec!["a", "\n", "\n", "b"]);
    }

    #[test]
    fn test_units_reproduce_input() {
        let text = "def f(x):\n\treturn x + 1  # done\n";
        assert_eq!(scan_units(text).concat(), text);
    }

    #[test]
    fn test_non_ascii_words() {
        let units = scan_units("naïve café");
        assert_eq!(units, vec!["naïve", " ", "café"]);
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("hello"));
        assert!(is_word("my_var"));
        assert!(is_word("__init"));
        assert!(is_word("2"));
        assert!(!is_word("_"));
        assert!(!is_word("("));
        assert!(!is_word(" "));
        assert!(!is_word("\n"));
        assert!(!is_word(""));
    }
}
