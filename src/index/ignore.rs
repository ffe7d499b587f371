//! Gitignore-style exclusion rules
//!
//! Compiles ignore patterns into `regex` predicates: `*` matches within one
//! path segment, `?` one character, `**` any number of segments, a trailing
//! `/` restricts the rule to directories, and a leading `!` negates. As in
//! gitignore, the last matching rule wins.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// One compiled rule.
#[derive(Debug)]
struct IgnorePattern {
    regex: Regex,
    negated: bool,
    dir_only: bool,
}

/// An ordered set of compiled ignore rules.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    /// Parse rules from ignore-file content. Blank lines and `#` comments
    /// are skipped; rules that fail to compile are logged and dropped.
    pub fn parse(content: &str) -> Self {
        let mut patterns = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (line, negated) = match line.strip_prefix('!') {
                Some(rest) => (rest, true),
                None => (line, false),
            };
            let (line, dir_only) = match line.strip_suffix('/') {
                Some(rest) => (rest, true),
                None => (line, false),
            };
            match Regex::new(&pattern_to_regex(line)) {
                Ok(regex) => patterns.push(IgnorePattern {
                    regex,
                    negated,
                    dir_only,
                }),
                Err(err) => log::warn!("dropping unparseable ignore pattern {:?}: {}", line, err),
            }
        }
        IgnoreSet { patterns }
    }

    /// Load rules from an ignore file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a (slash-separated, root-relative) path is ignored.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let mut matched = false;
        for pattern in &self.patterns {
            if pattern.dir_only && !is_dir {
                continue;
            }
            if pattern.regex.is_match(path) {
                matched = !pattern.negated;
            }
        }
        matched
    }
}

/// Translate one gitignore pattern into an anchored regex.
fn pattern_to_regex(pattern: &str) -> String {
    // escape regex metacharacters, keeping the glob ones for translation
    let mut escaped = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '.' | '+' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    // placeholders keep the ** forms safe from the single-star rewrite
    let translated = escaped
        .replace("**/", "\u{1}")
        .replace("/**", "\u{2}")
        .replace("**", "\u{3}")
        .replace('*', "[^/]*")
        .replace('?', "[^/]")
        .replace('\u{1}', "(?:.*/)?")
        .replace('\u{2}', "(?:/.*)?")
        .replace('\u{3}', ".*");
    let anchored = match translated.strip_prefix('/') {
        // a leading slash anchors to the root
        Some(rest) => format!("^{}", rest),
        // otherwise the pattern matches at any depth
        None => format!("(?:^|/){}", translated),
    };
    // a match also covers everything beneath the matched entry
    format!("{}(?:/.*)?$", anchored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignored(rules: &str, path: &str) -> bool {
        IgnoreSet::parse(rules).is_ignored(path, false)
    }

    #[test]
    fn test_extension_pattern_matches_at_any_depth() {
        assert!(ignored("*.py", "test.py"));
        assert!(ignored("*.py", "src/main.py"));
        assert!(ignored("*.py", "deep/path/file.py"));
        assert!(!ignored("*.py", "test.pyc"));
        assert!(!ignored("*.py", "python"));
    }

    #[test]
    fn test_double_star_spans_directories() {
        assert!(ignored("src/**/way", "src/way"));
        assert!(ignored("src/**/way", "src/a/way"));
        assert!(ignored("src/**/way", "src/a/b/way"));
        assert!(!ignored("src/**/way", "src/away"));
        assert!(!ignored("src/**/way", "way"));
    }

    #[test]
    fn test_directory_only_pattern() {
        let set = IgnoreSet::parse("build/");
        assert!(set.is_ignored("build", true));
        assert!(!set.is_ignored("build", false));
        assert!(!set.is_ignored("builds", true));
    }

    #[test]
    fn test_leading_slash_anchors_to_root() {
        assert!(ignored("/tmp", "tmp"));
        assert!(ignored("/tmp", "tmp/file"));
        assert!(!ignored("/tmp", "src/tmp"));
        assert!(!ignored("/tmp", "a/tmp"));
    }

    #[test]
    fn test_single_star_stays_within_segment() {
        assert!(ignored("doc/*.txt", "doc/readme.txt"));
        assert!(!ignored("doc/*.txt", "doc/sub/readme.txt"));
        assert!(!ignored("doc/*.txt", "readme.txt"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        assert!(ignored("a?c", "abc"));
        assert!(ignored("a?c", "a1c"));
        assert!(ignored("a?c", "dir/abc"));
        assert!(!ignored("a?c", "ac"));
        assert!(!ignored("a?c", "abbc"));
    }

    #[test]
    fn test_negation_unignores_last_match_wins() {
        let set = IgnoreSet::parse("*.log\n!important.log");
        assert!(set.is_ignored("app.log", false));
        assert!(!set.is_ignored("important.log", false));
    }

    #[test]
    fn test_match_covers_directory_contents() {
        assert!(ignored("build", "build/output/main.o"));
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let set = IgnoreSet::parse("# a comment\n\n*.tmp\n");
        assert!(set.is_ignored("x.tmp", false));
        assert!(!set.is_ignored("# a comment", false));
    }

    #[test]
    fn test_character_class_preserved() {
        assert!(ignored("test[0-9].txt", "test3.txt"));
        assert!(!ignored("test[0-9].txt", "testx.txt"));
    }
}
