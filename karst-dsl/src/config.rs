//  CONFIG.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 08:44:31
//  Last edited:
//    21 Aug 2025, 11:38:46
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the parser for module configuration files
//!   (`module.karst`), which declare the packages of a module and
//!   whether they compile to executables or libraries.
//

use crate::ast::auxillary::Mention;
use crate::ast::spec::TextRange;
use crate::errors::DslError;
use crate::scanner::tokens::{Token, TokenKind};
use crate::scanner::scan;


/***** LIBRARY *****/
/// What a declared package compiles to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TargetKind {
    /// The package compiles to an executable and must provide an entrypoint.
    Executable,
    /// The package compiles to a library and must not provide an entrypoint.
    Library,
}

/// A single package declaration in a module configuration file.
#[derive(Clone, Debug)]
pub struct PackageDecl {
    /// Whether the package is an executable or a library.
    pub kind  : TargetKind,
    /// The fully qualified name of the package. The first segment names the module.
    pub name  : Mention,
    /// The range in the configuration text for this declaration.
    pub range : TextRange,
}

/// The parsed contents of a `module.karst` file.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// The declared packages, in file order.
    pub declarations : Vec<PackageDecl>,
}

/// Parses the given module configuration text.
///
/// # Arguments
/// - `source`: The raw text of a `module.karst` file.
///
/// # Returns
/// The parsed Configuration.
///
/// # Errors
/// This function errors if the text fails to scan, names an unknown target kind or is otherwise
/// not of the shape `( "executable" | "library" ) name ";"` repeated.
pub fn parse_config(source: &str) -> Result<Configuration, DslError> {
    let tokens: Vec<Token> = scan(source)?;
    let mut tokens = tokens.into_iter().peekable();

    let mut declarations: Vec<PackageDecl> = Vec::new();
    while let Some(token) = tokens.next() {
        // The target kind is scanned as a plain identifier
        let kind: TargetKind = match &token.kind {
            TokenKind::Identifier(name) if name == "executable" => TargetKind::Executable,
            TokenKind::Identifier(name) if name == "library" => TargetKind::Library,
            TokenKind::Identifier(name) => return Err(DslError::UnknownTargetKind{ name: name.clone(), range: token.range }),
            kind => return Err(DslError::UnexpectedToken{ got: kind.to_string(), expected: "`executable` or `library`", range: token.range }),
        };

        // Then the dotted package name
        let mut segments: Vec<crate::ast::Identifier> = Vec::new();
        let mut name_range: Option<TextRange> = None;
        loop {
            match tokens.next() {
                Some(Token{ kind: TokenKind::Identifier(name), range }) => {
                    name_range = Some(match name_range {
                        Some(prev) => prev.until(range),
                        None => range,
                    });
                    segments.push(crate::ast::Identifier{ name, range });
                },
                Some(Token{ kind, range }) => return Err(DslError::UnexpectedToken{ got: kind.to_string(), expected: "a package name", range }),
                None => return Err(DslError::UnexpectedEof{ expected: "a package name" }),
            }
            match tokens.next() {
                Some(Token{ kind: TokenKind::Dot, .. }) => continue,
                Some(Token{ kind: TokenKind::Semicolon, range }) => {
                    let name_range: TextRange = name_range.unwrap_or(range);
                    declarations.push(PackageDecl{
                        kind,
                        name  : Mention{ segments, range: name_range },
                        range : token.range.until(range),
                    });
                    break;
                },
                Some(Token{ kind, range }) => return Err(DslError::UnexpectedToken{ got: kind.to_string(), expected: "`.` or `;`", range }),
                None => return Err(DslError::UnexpectedEof{ expected: "`;` after the package name" }),
            }
        }
    }
    Ok(Configuration{ declarations })
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Configuration = parse_config("executable hello.cli;\nlibrary hello.core;\n").unwrap();
        assert_eq!(config.declarations.len(), 2);
        assert_eq!(config.declarations[0].kind, TargetKind::Executable);
        assert_eq!(config.declarations[0].name.to_string(), "hello.cli");
        assert_eq!(config.declarations[1].kind, TargetKind::Library);
        assert_eq!(config.declarations[1].name.to_string(), "hello.core");
    }

    #[test]
    fn test_parse_config_single_segment() {
        let config: Configuration = parse_config("executable hello;").unwrap();
        assert_eq!(config.declarations[0].name.segments.len(), 1);
    }

    #[test]
    fn test_parse_config_unknown_kind() {
        assert!(matches!(parse_config("binary hello;"), Err(DslError::UnknownTargetKind{ .. })));
    }

    #[test]
    fn test_parse_config_missing_semicolon() {
        assert!(matches!(parse_config("executable hello"), Err(DslError::UnexpectedEof{ .. })));
    }

    #[test]
    fn test_parse_config_empty() {
        assert!(parse_config("// nothing yet\n").unwrap().declarations.is_empty());
    }
}
