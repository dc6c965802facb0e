//  PARSER.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 13:24:10
//  Last edited:
//    21 Aug 2025, 11:31:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the recursive-descent parser for Karst source files,
//!   which turns a list of tokens into a list of toplevel declarations.
//

use crate::ast::auxillary::{Binding, Formula, Identifier, Mention};
use crate::ast::declarations::{Declaration, DeclarationKind};
use crate::ast::expressions::{Expression, ExpressionKind};
use crate::ast::spec::{Node, TextRange};
use crate::ast::statements::{Statement, StatementKind};
use crate::errors::DslError;
use crate::scanner::tokens::{Token, TokenKind};


/***** HELPERS *****/
/// Wraps the token list in a cursor with some convenience accessors.
struct Tokens {
    /// The tokens to parse.
    tokens : Vec<Token>,
    /// The index of the next token to consume.
    pos    : usize,
}
impl Tokens {
    /// Peeks the kind of the next token without consuming it.
    #[inline]
    fn peek(&self) -> Option<&TokenKind> { self.tokens.get(self.pos).map(|t| &t.kind) }

    /// Consumes and returns the next token.
    ///
    /// # Errors
    /// This function errors if there are no tokens left.
    fn next(&mut self, expected: &'static str) -> Result<Token, DslError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            },
            None => Err(DslError::UnexpectedEof{ expected }),
        }
    }

    /// Consumes the next token, asserting it is of the given kind.
    ///
    /// # Errors
    /// This function errors if there are no tokens left, or if the next token is something else.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, DslError> {
        let token: Token = self.next(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(DslError::UnexpectedToken{ got: token.kind.to_string(), expected, range: token.range })
        }
    }

    /// Consumes the next token, asserting it is an identifier, and returns it as such.
    ///
    /// # Errors
    /// This function errors if there are no tokens left, or if the next token is something else.
    fn expect_identifier(&mut self, expected: &'static str) -> Result<Identifier, DslError> {
        let token: Token = self.next(expected)?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(Identifier{ name, range: token.range }),
            kind => Err(DslError::UnexpectedToken{ got: kind.to_string(), expected, range: token.range }),
        }
    }

    /// Consumes the next token if it is of the given kind.
    fn eat(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.peek() == Some(kind) {
            let token: Token = self.tokens[self.pos].clone();
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }
}





/***** PARSE FUNCTIONS *****/
/// Parses a toplevel declaration.
fn parse_declaration(tokens: &mut Tokens) -> Result<Declaration, DslError> {
    // Parse the optional `extern`-part and `public`-marker
    let mut start: Option<TextRange> = None;
    let mut external: Option<String> = None;
    if let Some(token) = tokens.eat(&TokenKind::Extern) {
        start = Some(token.range);
        let linkage: Token = tokens.next("a linkage name string after `extern`")?;
        match linkage.kind {
            TokenKind::String(name) => external = Some(name),
            kind => return Err(DslError::UnexpectedToken{ got: kind.to_string(), expected: "a linkage name string after `extern`", range: linkage.range }),
        }
    }
    let public: bool = match tokens.eat(&TokenKind::Public) {
        Some(token) => {
            if start.is_none() { start = Some(token.range); }
            true
        },
        None => false,
    };

    // Then it's either a procedure or a struct
    let token: Token = tokens.next("`proc` or `struct`")?;
    let start: TextRange = start.unwrap_or(token.range);
    match token.kind {
        TokenKind::Proc => {
            let name: Identifier = tokens.expect_identifier("a procedure name")?;

            // Parameters
            tokens.expect(TokenKind::LeftParen, "`(` after the procedure name")?;
            let mut params: Vec<Binding> = Vec::new();
            if tokens.peek() != Some(&TokenKind::RightParen) {
                loop {
                    params.push(parse_binding(tokens)?);
                    if tokens.eat(&TokenKind::Comma).is_none() { break; }
                }
            }
            tokens.expect(TokenKind::RightParen, "`)` after the parameter list")?;

            // Optional return type
            let ret: Option<Formula> = match tokens.peek() {
                Some(TokenKind::Star) | Some(TokenKind::Identifier(_)) => Some(parse_formula(tokens)?),
                _ => None,
            };

            // Either a body or a `;`
            if let Some(semi) = tokens.eat(&TokenKind::Semicolon) {
                let range: TextRange = start.until(semi.range);
                match external {
                    Some(external) => Ok(Declaration{ public, name, kind: DeclarationKind::ExternalProcedure{ params, ret, external }, range }),
                    None => Err(DslError::ProcedureWithoutBody{ range }),
                }
            } else {
                let body: Statement = parse_block(tokens)?;
                let range: TextRange = start.until(body.range);
                if external.is_some() {
                    return Err(DslError::ExternProcedureWithBody{ range });
                }
                Ok(Declaration{ public, name, kind: DeclarationKind::Procedure{ params, ret, body }, range })
            }
        },

        TokenKind::Struct => {
            if external.is_some() {
                return Err(DslError::UnexpectedToken{ got: token.kind.to_string(), expected: "`proc` after an extern linkage name", range: token.range });
            }
            let name: Identifier = tokens.expect_identifier("a struct name")?;

            // Either a member list or a `;`
            let mut members: Vec<Binding> = Vec::new();
            let end: TextRange = if let Some(semi) = tokens.eat(&TokenKind::Semicolon) {
                semi.range
            } else {
                tokens.expect(TokenKind::LeftBrace, "`{` or `;` after the struct name")?;
                if tokens.peek() != Some(&TokenKind::RightBrace) {
                    loop {
                        members.push(parse_binding(tokens)?);
                        if tokens.eat(&TokenKind::Comma).is_none() { break; }
                    }
                }
                tokens.expect(TokenKind::RightBrace, "`}` after the member list")?.range
            };
            Ok(Declaration{ public, name, kind: DeclarationKind::Struct{ members }, range: start.until(end) })
        },

        kind => Err(DslError::UnexpectedToken{ got: kind.to_string(), expected: "`proc` or `struct`", range: token.range }),
    }
}

/// Parses a binding, i.e., a name followed by a type formula.
fn parse_binding(tokens: &mut Tokens) -> Result<Binding, DslError> {
    let name: Identifier = tokens.expect_identifier("a binding name")?;
    let formula: Formula = parse_formula(tokens)?;
    let range: TextRange = name.range.until(formula.range().unwrap_or(name.range));
    Ok(Binding{ name, formula, range })
}

/// Parses a type formula.
fn parse_formula(tokens: &mut Tokens) -> Result<Formula, DslError> {
    if let Some(star) = tokens.eat(&TokenKind::Star) {
        let pointee: Formula = parse_formula(tokens)?;
        let range: TextRange = star.range.until(pointee.range().unwrap_or(star.range));
        Ok(Formula::Pointer{ pointee: Box::new(pointee), range })
    } else {
        Ok(Formula::Base(parse_mention(tokens)?))
    }
}

/// Parses a mention, i.e., a dotted list of identifiers.
fn parse_mention(tokens: &mut Tokens) -> Result<Mention, DslError> {
    let first: Identifier = tokens.expect_identifier("a name")?;
    let mut range: TextRange = first.range;
    let mut segments: Vec<Identifier> = vec![first];
    while tokens.eat(&TokenKind::Dot).is_some() {
        let next: Identifier = tokens.expect_identifier("a name after `.`")?;
        range = range.until(next.range);
        segments.push(next);
    }
    Ok(Mention{ segments, range })
}

/// Parses a block statement (`{` already unconsumed).
fn parse_block(tokens: &mut Tokens) -> Result<Statement, DslError> {
    let open: Token = tokens.expect(TokenKind::LeftBrace, "`{`")?;
    let mut stmts: Vec<Statement> = Vec::new();
    while tokens.peek() != Some(&TokenKind::RightBrace) {
        if tokens.peek().is_none() {
            return Err(DslError::UnexpectedEof{ expected: "`}` to close the block" });
        }
        stmts.push(parse_statement(tokens)?);
    }
    let close: Token = tokens.expect(TokenKind::RightBrace, "`}`")?;
    Ok(Statement{ kind: StatementKind::Block(stmts), range: open.range.until(close.range) })
}

/// Parses any statement.
fn parse_statement(tokens: &mut Tokens) -> Result<Statement, DslError> {
    match tokens.peek() {
        Some(TokenKind::LeftBrace) => parse_block(tokens),

        Some(TokenKind::If) => {
            let start: Token = tokens.next("`if`")?;
            let cond: Expression = parse_expression(tokens)?;
            let true_branch: Statement = parse_block(tokens)?;
            let mut range: TextRange = start.range.until(true_branch.range);

            // The else-branch is either a block or another if
            let false_branch: Option<Box<Statement>> = if tokens.eat(&TokenKind::Else).is_some() {
                let branch: Statement = if tokens.peek() == Some(&TokenKind::If) { parse_statement(tokens)? } else { parse_block(tokens)? };
                range = range.until(branch.range);
                Some(Box::new(branch))
            } else {
                None
            };
            Ok(Statement{ kind: StatementKind::If{ cond, true_branch: Box::new(true_branch), false_branch }, range })
        },

        Some(TokenKind::Var) => {
            let start: Token = tokens.next("`var`")?;
            let name: Identifier = tokens.expect_identifier("a variable name")?;
            let annotation: Option<Formula> = match tokens.peek() {
                Some(TokenKind::Star) | Some(TokenKind::Identifier(_)) => Some(parse_formula(tokens)?),
                _ => None,
            };
            tokens.expect(TokenKind::Equals, "`=` in the variable definition")?;
            let value: Expression = parse_expression(tokens)?;
            let end: Token = tokens.expect(TokenKind::Semicolon, "`;` after the variable definition")?;
            Ok(Statement{ kind: StatementKind::Var{ name, annotation, value }, range: start.range.until(end.range) })
        },

        Some(TokenKind::Return) => {
            let start: Token = tokens.next("`return`")?;
            let value: Option<Expression> = if tokens.peek() != Some(&TokenKind::Semicolon) { Some(parse_expression(tokens)?) } else { None };
            let end: Token = tokens.expect(TokenKind::Semicolon, "`;` after the return-statement")?;
            Ok(Statement{ kind: StatementKind::Return(value), range: start.range.until(end.range) })
        },

        Some(_) => {
            let value: Expression = parse_expression(tokens)?;
            let start: TextRange = value.range;
            let end: Token = tokens.expect(TokenKind::Semicolon, "`;` after the expression-statement")?;
            Ok(Statement{ kind: StatementKind::Discard(value), range: start.until(end.range) })
        },

        None => Err(DslError::UnexpectedEof{ expected: "a statement" }),
    }
}

/// Parses any expression.
fn parse_expression(tokens: &mut Tokens) -> Result<Expression, DslError> {
    let mut expr: Expression = parse_atom(tokens)?;
    while tokens.eat(&TokenKind::LessThan).is_some() {
        let right: Expression = parse_atom(tokens)?;
        let range: TextRange = expr.range.until(right.range);
        expr = Expression{ kind: ExpressionKind::LessThan{ left: Box::new(expr), right: Box::new(right) }, range };
    }
    Ok(expr)
}

/// Parses an atomic expression, i.e., a literal, an access or an invocation.
fn parse_atom(tokens: &mut Tokens) -> Result<Expression, DslError> {
    match tokens.peek() {
        Some(TokenKind::Natural(_)) | Some(TokenKind::String(_)) => {
            let token: Token = tokens.next("an expression")?;
            match token.kind {
                TokenKind::Natural(value) => Ok(Expression{ kind: ExpressionKind::Natural(value), range: token.range }),
                TokenKind::String(value) => Ok(Expression{ kind: ExpressionKind::String(value), range: token.range }),
                _ => unreachable!(),
            }
        },

        Some(TokenKind::Identifier(_)) => {
            let mention: Mention = parse_mention(tokens)?;

            // A parenthesis makes it an invocation
            if tokens.eat(&TokenKind::LeftParen).is_some() {
                let mut args: Vec<Expression> = Vec::new();
                if tokens.peek() != Some(&TokenKind::RightParen) {
                    loop {
                        args.push(parse_expression(tokens)?);
                        if tokens.eat(&TokenKind::Comma).is_none() { break; }
                    }
                }
                let close: Token = tokens.expect(TokenKind::RightParen, "`)` after the argument list")?;
                let range: TextRange = mention.range.until(close.range);
                Ok(Expression{ kind: ExpressionKind::Invocation{ callee: mention, args }, range })
            } else {
                let range: TextRange = mention.range;
                Ok(Expression{ kind: ExpressionKind::Access(mention), range })
            }
        },

        Some(_) => {
            let token: Token = tokens.next("an expression")?;
            Err(DslError::UnexpectedToken{ got: token.kind.to_string(), expected: "an expression", range: token.range })
        },
        None => Err(DslError::UnexpectedEof{ expected: "an expression" }),
    }
}





/***** LIBRARY *****/
/// Parses the given tokens into a list of toplevel declarations.
///
/// # Arguments
/// - `tokens`: The tokens to parse, as produced by [`scan()`](crate::scanner::scan()).
///
/// # Returns
/// The toplevel declarations in the source file, in source order.
///
/// # Errors
/// This function errors if the tokens do not describe a legal Karst source file.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Declaration>, DslError> {
    let mut tokens: Tokens = Tokens{ tokens, pos: 0 };
    let mut decls: Vec<Declaration> = Vec::new();
    while tokens.peek().is_some() {
        decls.push(parse_declaration(&mut tokens)?);
    }
    Ok(decls)
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use crate::scanner::scan;
    use super::*;

    fn parse_str(source: &str) -> Result<Vec<Declaration>, DslError> { parse(scan(source).unwrap()) }

    #[test]
    fn test_parse_procedure() {
        let decls: Vec<Declaration> = parse_str("public proc main() { print(\"hi\"); }").unwrap();
        assert_eq!(decls.len(), 1);
        assert!(decls[0].public);
        assert_eq!(decls[0].name.name, "main");
        match &decls[0].kind {
            DeclarationKind::Procedure{ params, ret, .. } => {
                assert!(params.is_empty());
                assert!(ret.is_none());
            },
            kind => panic!("expected a procedure, got {kind:?}"),
        }
    }

    #[test]
    fn test_parse_extern_procedure() {
        let decls: Vec<Declaration> = parse_str("extern \"putchar\" proc put(c karst.Integer32) karst.Integer32;").unwrap();
        match &decls[0].kind {
            DeclarationKind::ExternalProcedure{ params, ret, external } => {
                assert_eq!(params.len(), 1);
                assert!(ret.is_some());
                assert_eq!(external, "putchar");
            },
            kind => panic!("expected an external procedure, got {kind:?}"),
        }
    }

    #[test]
    fn test_parse_struct_with_pointer_member() {
        let decls: Vec<Declaration> = parse_str("struct Node { next *Node }").unwrap();
        match &decls[0].kind {
            DeclarationKind::Struct{ members } => {
                assert_eq!(members.len(), 1);
                assert!(matches!(members[0].formula, Formula::Pointer{ .. }));
            },
            kind => panic!("expected a struct, got {kind:?}"),
        }
    }

    #[test]
    fn test_parse_statements() {
        let decls: Vec<Declaration> = parse_str(
            "proc count() { var i karst.Natural32 = 0; if i < 10 { return; } else { tick(i); } }",
        ).unwrap();
        let body: &Statement = match &decls[0].kind {
            DeclarationKind::Procedure{ body, .. } => body,
            kind => panic!("expected a procedure, got {kind:?}"),
        };
        match &body.kind {
            StatementKind::Block(stmts) => {
                assert_eq!(stmts.len(), 2);
                assert!(matches!(stmts[0].kind, StatementKind::Var{ .. }));
                assert!(matches!(stmts[1].kind, StatementKind::If{ false_branch: Some(_), .. }));
            },
            kind => panic!("expected a block, got {kind:?}"),
        }
    }

    #[test]
    fn test_parse_procedure_without_body() {
        assert!(matches!(parse_str("proc nope();"), Err(DslError::ProcedureWithoutBody{ .. })));
    }

    #[test]
    fn test_parse_extern_with_body() {
        assert!(matches!(parse_str("extern \"no\" proc nope() {}"), Err(DslError::ExternProcedureWithBody{ .. })));
    }

    #[test]
    fn test_parse_ranges() {
        let decls: Vec<Declaration> = parse_str("proc main() {}").unwrap();
        assert_eq!(decls[0].range(), Some(crate::ast::TextRange::new((0usize, 0usize), (0usize, 13usize))));
    }
}
