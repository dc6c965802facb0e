//  SCANNER.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 09:31:06
//  Last edited:
//    21 Aug 2025, 10:58:44
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the scanner for Karst source files, which turns raw
//!   source text into a list of tokens.
//

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use lazy_static::lazy_static;

use crate::ast::spec::{TextPos, TextRange};
use crate::errors::DslError;
use super::tokens::{Token, TokenKind};


/***** CONSTANTS *****/
lazy_static! {
    /// Maps the raw text of a keyword to its token.
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("extern", TokenKind::Extern),
        ("public", TokenKind::Public),
        ("proc", TokenKind::Proc),
        ("struct", TokenKind::Struct),
        ("var", TokenKind::Var),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("return", TokenKind::Return),
    ]);
}





/***** HELPERS *****/
/// Tracks our position in the source text while consuming characters.
struct Cursor<'s> {
    /// The remaining characters.
    chars : Peekable<Chars<'s>>,
    /// The position of the next character to consume.
    pos   : TextPos,
}
impl<'s> Cursor<'s> {
    /// Constructor for the Cursor that starts at the top of the given source.
    #[inline]
    fn new(source: &'s str) -> Self {
        Self {
            chars : source.chars().peekable(),
            pos   : TextPos::new0(0usize, 0usize),
        }
    }

    /// Peeks the next character without consuming it.
    #[inline]
    fn peek(&mut self) -> Option<char> { self.chars.peek().copied() }

    /// Consumes the next character, updating the tracked position.
    fn next(&mut self) -> Option<char> {
        let c: char = self.chars.next()?;
        if c == '\n' {
            self.pos = TextPos::new0(self.pos.line + 1, 0usize);
        } else {
            self.pos = TextPos::new0(self.pos.line, self.pos.col + 1);
        }
        Some(c)
    }
}





/***** LIBRARY *****/
/// Scans the given source text into a list of tokens.
///
/// # Arguments
/// - `source`: The source text to scan.
///
/// # Returns
/// A vector of the scanned tokens, in source order.
///
/// # Errors
/// This function errors if the source text contained characters that are not part of the Karst
/// language, an unterminated or illegally-escaped string literal, or an overflowing natural.
pub fn scan(source: &str) -> Result<Vec<Token>, DslError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut cursor: Cursor = Cursor::new(source);
    while let Some(c) = cursor.peek() {
        // Skip whitespace
        if c.is_whitespace() {
            cursor.next();
            continue;
        }

        let start: TextPos = cursor.pos;

        // Comments run until the end of the line
        if c == '/' {
            cursor.next();
            if cursor.peek() == Some('/') {
                while let Some(c) = cursor.peek() {
                    if c == '\n' { break; }
                    cursor.next();
                }
                continue;
            }
            return Err(DslError::UnexpectedChar{ c: '/', range: TextRange::new(start, start) });
        }

        // Identifiers & keywords
        if c.is_ascii_alphabetic() || c == '_' {
            let mut name: String = String::new();
            let mut end: TextPos = start;
            while let Some(c) = cursor.peek() {
                if !c.is_ascii_alphanumeric() && c != '_' { break; }
                end = cursor.pos;
                name.push(c);
                cursor.next();
            }
            let range: TextRange = TextRange::new(start, end);
            let kind: TokenKind = match KEYWORDS.get(name.as_str()) {
                Some(kind) => kind.clone(),
                None => TokenKind::Identifier(name),
            };
            tokens.push(Token{ kind, range });
            continue;
        }

        // Natural literals
        if c.is_ascii_digit() {
            let mut raw: String = String::new();
            let mut end: TextPos = start;
            while let Some(c) = cursor.peek() {
                if !c.is_ascii_digit() { break; }
                end = cursor.pos;
                raw.push(c);
                cursor.next();
            }
            let range: TextRange = TextRange::new(start, end);
            let value: u64 = match raw.parse::<u64>() {
                Ok(value) => value,
                Err(_) => return Err(DslError::NaturalOverflow{ raw, range }),
            };
            tokens.push(Token{ kind: TokenKind::Natural(value), range });
            continue;
        }

        // String literals
        if c == '"' {
            cursor.next();
            let mut value: String = String::new();
            loop {
                let pos: TextPos = cursor.pos;
                match cursor.next() {
                    Some('"') => break,
                    Some('\n') | None => return Err(DslError::UnterminatedString{ range: TextRange::new(start, pos) }),
                    Some('\\') => {
                        let esc_pos: TextPos = cursor.pos;
                        match cursor.next() {
                            Some('\\') => value.push('\\'),
                            Some('"') => value.push('"'),
                            Some('t') => value.push('\t'),
                            Some('r') => value.push('\r'),
                            Some('n') => value.push('\n'),
                            Some(c) => return Err(DslError::IllegalEscape{ c, range: TextRange::new(pos, esc_pos) }),
                            None => return Err(DslError::UnterminatedString{ range: TextRange::new(start, pos) }),
                        }
                    },
                    Some(c) => value.push(c),
                }
            }
            // The cursor now sits one past the closing quote
            let end: TextPos = TextPos::new0(cursor.pos.line, cursor.pos.col.saturating_sub(1));
            tokens.push(Token{ kind: TokenKind::String(value), range: TextRange::new(start, end) });
            continue;
        }

        // Punctuation
        let kind: TokenKind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            '<' => TokenKind::LessThan,
            '=' => TokenKind::Equals,
            c => return Err(DslError::UnexpectedChar{ c, range: TextRange::new(start, start) }),
        };
        cursor.next();
        tokens.push(Token{ kind, range: TextRange::new(start, start) });
    }
    Ok(tokens)
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_keywords_and_identifiers() {
        let tokens: Vec<Token> = scan("proc main procure").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Proc);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("main".into()));
        assert_eq!(tokens[2].kind, TokenKind::Identifier("procure".into()));
    }

    #[test]
    fn test_scan_positions() {
        let tokens: Vec<Token> = scan("proc\n  main").unwrap();
        assert_eq!(tokens[0].range, TextRange::new((0usize, 0usize), (0usize, 3usize)));
        assert_eq!(tokens[1].range, TextRange::new((1usize, 2usize), (1usize, 5usize)));
    }

    #[test]
    fn test_scan_string_escapes() {
        let tokens: Vec<Token> = scan(r#""a\\b\"c\td\re\nf""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String("a\\b\"c\td\re\nf".into()));
    }

    #[test]
    fn test_scan_illegal_escape() {
        assert!(matches!(scan(r#""\q""#), Err(DslError::IllegalEscape{ c: 'q', .. })));
    }

    #[test]
    fn test_scan_unterminated_string() {
        assert!(matches!(scan("\"oops\nmore"), Err(DslError::UnterminatedString{ .. })));
        assert!(matches!(scan("\"oops"), Err(DslError::UnterminatedString{ .. })));
    }

    #[test]
    fn test_scan_comments() {
        let tokens: Vec<Token> = scan("proc // a comment\nmain").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("main".into()));
    }

    #[test]
    fn test_scan_natural_overflow() {
        assert_eq!(scan("18446744073709551615").unwrap()[0].kind, TokenKind::Natural(u64::MAX));
        assert!(matches!(scan("18446744073709551616"), Err(DslError::NaturalOverflow{ .. })));
    }

    #[test]
    fn test_scan_unexpected_char() {
        assert!(matches!(scan("proc #"), Err(DslError::UnexpectedChar{ c: '#', .. })));
    }
}
