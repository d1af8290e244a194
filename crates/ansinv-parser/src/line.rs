//! Line cleaning: trimming, `"'…'"` literals and comment stripping.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// Matches "'...'" with non-empty content
static LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""'(.+?)'""#).unwrap());

/// A source line with literals unwrapped and any comment removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanLine {
    pub text: String,
    /// True when a comment marker was found, even if nothing remains.
    pub was_comment: bool,
    /// Byte ranges of `text` that came from `"'…'"` literals.
    pub literals: Vec<Range<usize>>,
}

impl CleanLine {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whitespace-separated tokens. Whitespace inside a literal does not split.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::new();
        let mut start = None;

        for (i, ch) in self.text.char_indices() {
            let in_literal = self.literals.iter().any(|span| span.contains(&i));
            if ch.is_whitespace() && !in_literal {
                if let Some(s) = start.take() {
                    tokens.push(&self.text[s..i]);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }

        if let Some(s) = start {
            tokens.push(&self.text[s..]);
        }
        tokens
    }
}

/// Clean one raw line.
///
/// Comment markers (`#`, `;`) are only recognised after the last literal, so
/// `pass="'a#b'"` keeps its value. A line that starts with a marker is always
/// a comment.
pub fn clean_line(line: &str) -> CleanLine {
    let trimmed = line.trim();

    if trimmed.starts_with(['#', ';']) {
        return CleanLine {
            text: String::new(),
            was_comment: true,
            literals: Vec::new(),
        };
    }

    let mut text = String::with_capacity(trimmed.len());
    let mut literals = Vec::new();
    let mut last = 0;

    for caps in LITERAL_REGEX.captures_iter(trimmed) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        text.push_str(&trimmed[last..whole.start()]);
        let start = text.len();
        text.push_str(inner.as_str());
        literals.push(start..text.len());
        last = whole.end();
    }
    text.push_str(&trimmed[last..]);

    let comment_from = literals.last().map_or(0, |span: &Range<usize>| span.end);
    let comment_start = text[comment_from..]
        .find(['#', ';'])
        .map(|offset| comment_from + offset);

    if let Some(pos) = comment_start {
        text.truncate(pos);
        let end = text.trim_end().len();
        text.truncate(end);
        for span in &mut literals {
            span.end = span.end.min(end);
        }
        literals.retain(|span| !span.is_empty());
    }

    CleanLine {
        text,
        was_comment: comment_start.is_some(),
        literals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_trimmed() {
        let line = clean_line("   host1 ansible_port=22  ");
        assert_eq!(line.text, "host1 ansible_port=22");
        assert!(!line.was_comment);
        assert!(line.literals.is_empty());
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let line = clean_line("host2 ansible_port=222 # defined inline");
        assert_eq!(line.text, "host2 ansible_port=222");
        assert!(line.was_comment);

        let line = clean_line("http_port=8080 ; semicolon comment");
        assert_eq!(line.text, "http_port=8080");
        assert!(line.was_comment);
    }

    #[test]
    fn test_comment_only_line() {
        let line = clean_line("      # inventory hostnames are unique");
        assert!(line.is_empty());
        assert!(line.was_comment);
    }

    #[test]
    fn test_blank_line_is_not_comment() {
        let line = clean_line("   \t ");
        assert!(line.is_empty());
        assert!(!line.was_comment);
    }

    #[test]
    fn test_literal_hides_comment_markers() {
        let line = clean_line(r#"tomcat3 mysecret="'03#pa33w0rd'" # proper quoting"#);
        assert_eq!(line.text, "tomcat3 mysecret=03#pa33w0rd");
        assert!(line.was_comment);
        assert_eq!(&line.text[line.literals[0].clone()], "03#pa33w0rd");
    }

    #[test]
    fn test_literal_without_comment() {
        let line = clean_line(r#"db pass="'a;b'""#);
        assert_eq!(line.text, "db pass=a;b");
        assert!(!line.was_comment);
    }

    #[test]
    fn test_tokens_keep_literal_spaces() {
        let line = clean_line(r#"web1 motd="'hello there world'" port=80"#);
        assert_eq!(line.tokens(), vec!["web1", "motd=hello there world", "port=80"]);
    }

    #[test]
    fn test_tokens_collapse_whitespace() {
        let line = clean_line("a   b\tc");
        assert_eq!(line.tokens(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multiple_literals() {
        let line = clean_line(r#"h a="'x y'" b="'#z'""#);
        assert_eq!(line.text, "h a=x y b=#z");
        assert_eq!(line.literals.len(), 2);
        assert!(!line.was_comment);
        assert_eq!(line.tokens(), vec!["h", "a=x y", "b=#z"]);
    }
}
