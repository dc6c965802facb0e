//  TOKENS.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 09:12:40
//  Last edited:
//    21 Aug 2025, 10:53:27
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the tokens produced by the Karst scanner.
//

use std::fmt::{Display, Formatter, Result as FResult};

use crate::ast::spec::TextRange;


/***** LIBRARY *****/
/// A Token is a single lexeme in a Karst source file.
#[derive(Clone, Debug)]
pub struct Token {
    /// What kind of token this is.
    pub kind  : TokenKind,
    /// The range in the source text for this token.
    pub range : TextRange,
}

/// Defines the TokenKind, which implements the specifics for each of the various tokens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenKind {
    // Values
    /// An identifier, i.e., a name.
    Identifier(String),
    /// A natural number literal.
    Natural(u64),
    /// A string literal, escapes already resolved.
    String(String),

    // Keywords
    /// The `extern` keyword.
    Extern,
    /// The `public` keyword.
    Public,
    /// The `proc` keyword.
    Proc,
    /// The `struct` keyword.
    Struct,
    /// The `var` keyword.
    Var,
    /// The `if` keyword.
    If,
    /// The `else` keyword.
    Else,
    /// The `return` keyword.
    Return,

    // Punctuation
    /// The `(` token.
    LeftParen,
    /// The `)` token.
    RightParen,
    /// The `{` token.
    LeftBrace,
    /// The `}` token.
    RightBrace,
    /// The `,` token.
    Comma,
    /// The `;` token.
    Semicolon,
    /// The `.` token.
    Dot,
    /// The `*` token.
    Star,
    /// The `<` token.
    LessThan,
    /// The `=` token.
    Equals,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use TokenKind::*;
        match self {
            Identifier(name) => write!(f, "identifier `{name}`"),
            Natural(value) => write!(f, "natural `{value}`"),
            String(_) => write!(f, "string literal"),

            Extern => write!(f, "`extern`"),
            Public => write!(f, "`public`"),
            Proc => write!(f, "`proc`"),
            Struct => write!(f, "`struct`"),
            Var => write!(f, "`var`"),
            If => write!(f, "`if`"),
            Else => write!(f, "`else`"),
            Return => write!(f, "`return`"),

            LeftParen => write!(f, "`(`"),
            RightParen => write!(f, "`)`"),
            LeftBrace => write!(f, "`{{`"),
            RightBrace => write!(f, "`}}`"),
            Comma => write!(f, "`,`"),
            Semicolon => write!(f, "`;`"),
            Dot => write!(f, "`.`"),
            Star => write!(f, "`*`"),
            LessThan => write!(f, "`<`"),
            Equals => write!(f, "`=`"),
        }
    }
}
