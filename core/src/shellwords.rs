//! Shell-style word splitting.
//!
//! Splits a tag argument string the way a POSIX shell splits words:
//! ASCII whitespace separates, quotes group, backslash escapes and a
//! backslash-newline pair is dropped. One deviation:
//! an unquoted `\:` is left intact so the classifier can tell escaped
//! colons from separators.

use crate::error::TokenizeError;

const BACKSLASH: char = '\\';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';
const COLON: char = ':';
const NEWLINE: char = '\n';

/// Characters a backslash escapes inside double quotes.
const DQ_ESCAPABLE: [char; 5] = ['"', '\\', '$', '`', '\n'];

/// Splits `input` into words.
///
/// # Errors
///
/// Returns [`TokenizeError::UnmatchedQuote`] when a quote is left open.
///
/// # Examples
///
/// ```
/// use tag_args_core::shellwords::split;
///
/// let words = split(r#"img.png alt:"a cat" 'class:big round'"#).unwrap();
/// assert_eq!(words, vec!["img.png", "alt:a cat", "class:big round"]);
///
/// let words = split(r"value key:a\:b").unwrap();
/// assert_eq!(words, vec!["value", r"key:a\:b"]);
/// ```
pub fn split(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // Tracks whether a word is open even if empty (e.g. `""`).
    let mut in_word = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_ascii_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            SINGLE_QUOTE => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some(SINGLE_QUOTE) => break,
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnmatchedQuote(input.to_string())),
                    }
                }
            }
            DOUBLE_QUOTE => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some(DOUBLE_QUOTE) => break,
                        Some(BACKSLASH) => match chars.peek() {
                            Some(&next) if DQ_ESCAPABLE.contains(&next) => {
                                chars.next();
                                current.push(next);
                            }
                            _ => current.push(BACKSLASH),
                        },
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnmatchedQuote(input.to_string())),
                    }
                }
            }
            BACKSLASH => match chars.next() {
                // Line continuation.
                Some(NEWLINE) => {}
                Some(COLON) => {
                    in_word = true;
                    current.push(BACKSLASH);
                    current.push(COLON);
                }
                Some(next) => {
                    in_word = true;
                    current.push(next);
                }
                None => {
                    in_word = true;
                    current.push(BACKSLASH);
                }
            },
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_split() {
        assert_eq!(split("a b  c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split("  a\tb\n").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split("").unwrap().is_empty());
        assert!(split("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quotes_group_whitespace() {
        assert_eq!(
            split(r#"a "b c" 'd e'"#).unwrap(),
            vec!["a", "b c", "d e"]
        );
    }

    #[test]
    fn test_adjacent_pieces_concatenate() {
        assert_eq!(
            split(r#"alt:"I have spaces""#).unwrap(),
            vec!["alt:I have spaces"]
        );
        assert_eq!(split(r#"a'b'"c""#).unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_word() {
        assert_eq!(split(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(split(r"'a\ b'").unwrap(), vec![r"a\ b"]);
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(split(r#""a\"b""#).unwrap(), vec![r#"a"b"#]);
        assert_eq!(split(r#""a\\b""#).unwrap(), vec![r"a\b"]);
        assert_eq!(split(r#""a\nb""#).unwrap(), vec![r"a\nb"]);
        assert_eq!(split(r#""I can escape \: here""#).unwrap(), vec![r"I can escape \: here"]);
    }

    #[test]
    fn test_unquoted_backslash() {
        assert_eq!(split(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(split(r"k:v\:w").unwrap(), vec![r"k:v\:w"]);
        assert_eq!(split(r"trailing\").unwrap(), vec![r"trailing\"]);
    }

    #[test]
    fn test_only_ascii_whitespace_separates() {
        assert_eq!(split("a\u{a0}b c").unwrap(), vec!["a\u{a0}b", "c"]);
        assert_eq!(split("a\u{2003}b").unwrap(), vec!["a\u{2003}b"]);
    }

    #[test]
    fn test_backslash_newline_continues_word() {
        assert_eq!(split("ab\\\ncd e").unwrap(), vec!["abcd", "e"]);
        assert_eq!(split("a \\\n b").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_unmatched_quote() {
        assert!(matches!(
            split(r#"a "b c"#),
            Err(TokenizeError::UnmatchedQuote(_))
        ));
        assert!(matches!(split("a 'b"), Err(TokenizeError::UnmatchedQuote(_))));
    }
}
