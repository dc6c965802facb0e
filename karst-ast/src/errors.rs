//  ERRORS.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 13:55:03
//  Last edited:
//    21 Aug 2025, 13:21:48
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `karst-ast` crate.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::path::PathBuf;

use karst_dsl::ast::spec::TextRange;
use thiserror::Error;

use crate::cache::Cycle;
use crate::name::Name;
use crate::semantic::Type;


/***** AUXILLARY *****/
/// Points at a place in a source file, for diagnostics.
#[derive(Clone, Debug)]
pub struct Subject {
    /// The file the subject lives in.
    pub file  : PathBuf,
    /// The range within that file.
    pub range : TextRange,
}
impl Subject {
    /// Constructor for a Subject.
    #[inline]
    pub fn new(file: impl Into<PathBuf>, range: TextRange) -> Self {
        Self {
            file  : file.into(),
            range,
        }
    }
}
impl Display for Subject {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{}:{}:{}", self.file.display(), self.range.start.line1(), self.range.start.col1())
    }
}





/***** LIBRARY *****/
/// Defines the errors of the resolution chain. All are fatal to the compilation run.
#[derive(Debug, Error)]
pub enum AstError {
    /// A module, signature or symbol depended on itself.
    #[error("Cyclic dependency on '{key}'")]
    CyclicDependency { key: String },

    /// Two declarations in the same package share a name.
    #[error("Redeclaration of '{name}' at {second} (first declared at {first})")]
    Redeclaration { name: String, first: Subject, second: Subject },

    /// A package was declared more than once in a module configuration.
    #[error("Package '{name}' is declared more than once in the module configuration")]
    PackageRedeclaration { name: Name },

    /// An executable package lacks a correctly shaped `main`.
    #[error("Executable package '{package}' must declare a procedure 'main' without parameters or return type")]
    InvalidEntrypoint { package: Name },

    /// A library package declares a `main` procedure.
    #[error("Library package '{package}' must not declare a procedure 'main'")]
    SpuriousEntrypoint { package: Name },

    /// A module by this name was not found under any search base.
    #[error("Unknown module '{name}'")]
    UnknownModule { name: String },

    /// The main module tried to take the reserved builtin module name.
    #[error("Module name '{name}' is reserved for the builtin module")]
    ReservedModule { name: String },

    /// A referenced package does not exist in its module.
    #[error("{subject}: Unknown package '{name}'")]
    UnknownPackage { name: Name, subject: Subject },

    /// A referenced name does not resolve in its target package.
    #[error("{subject}: Unknown symbol '{name}'")]
    UnknownSymbol { name: Name, subject: Subject },

    /// A cross-package reference targets a private symbol.
    #[error("{subject}: Symbol '{name}' is not public")]
    PrivateSymbol { name: Name, subject: Subject },

    /// A cross-package reference targets a package kind that is not importable from there.
    #[error("{subject}: Package '{name}' is not importable from here")]
    InaccessiblePackage { name: Name, subject: Subject },

    /// A name that should be a type resolves to something else.
    #[error("{subject}: '{name}' is not a type")]
    NotAType { name: Name, subject: Subject },

    /// A name that should be callable resolves to something else.
    #[error("{subject}: '{name}' is not a procedure")]
    NotAProcedure { name: Name, subject: Subject },

    /// An expression has a different type than its context requires.
    #[error("{subject}: Expected a value of type '{expected}', got '{found}'")]
    TypeMismatch { expected: Type, found: Type, subject: Subject },

    /// An invocation passes the wrong number of arguments.
    #[error("{subject}: Procedure '{name}' takes {expected} argument(s), got {found}")]
    ArgumentCount { name: Name, expected: usize, found: usize, subject: Subject },

    /// A value-returning procedure has a path that falls off the end of its body.
    #[error("Procedure '{name}' does not return a value on every path")]
    MissingReturn { name: Name },

    /// Two parameters of one procedure share a name.
    #[error("{subject}: Parameter '{name}' is declared more than once")]
    ParameterRedeclaration { name: String, subject: Subject },

    /// Two members of one struct share a name.
    #[error("{subject}: Member '{name}' is declared more than once")]
    MemberRedeclaration { name: String, subject: Subject },

    /// A comparison operand is not of an arithmetic type.
    #[error("{subject}: Comparison operands must be of an arithmetic type, got '{found}'")]
    NotArithmetic { found: Type, subject: Subject },

    /// A global symbol was accessed in a value position.
    #[error("{subject}: Symbol '{name}' cannot be used as a value")]
    NotAValue { name: Name, subject: Subject },

    /// A variable was given the noreturn type.
    #[error("{subject}: Variable '{name}' cannot be of the noreturn type")]
    NoreturnVariable { name: String, subject: Subject },

    /// An if-condition is not a boolean.
    #[error("{subject}: Condition must be a '{}', got '{found}'", Type::Named(crate::semantic::Primitive::Boolean.name()))]
    ConditionType { found: Type, subject: Subject },

    /// A module configuration file failed to parse.
    #[error("Failed to parse module configuration {}: {err}", path.display())]
    Config { path: PathBuf, err: karst_dsl::Error },

    /// A source file failed to parse.
    #[error("Failed to parse {}: {err}", path.display())]
    Parse { path: PathBuf, err: karst_dsl::Error },

    /// Reading a module directory or source file failed.
    #[error("Failed to read {}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

impl<K: Display> From<Cycle<K>> for AstError {
    #[inline]
    fn from(value: Cycle<K>) -> Self { Self::CyclicDependency{ key: value.key.to_string() } }
}
