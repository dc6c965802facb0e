//  ERRORS.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 10:31:42
//  Last edited:
//    21 Aug 2025, 16:10:05
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `karst-gen` crate.
//

use std::path::PathBuf;

use karst_ast::name::Name;
use thiserror::Error;


/***** LIBRARY *****/
/// Defines the errors of the code-generation backend. All are fatal to the compilation run.
#[derive(Debug, Error)]
pub enum GenError {
    /// Code generation reached a type that only exists at compile time.
    #[error("Cannot generate code for compile-time type '{ty}'")]
    UnrepresentableType { ty: String },

    /// Code generation reached a constant that only exists at compile time.
    #[error("Cannot generate code for compile-time constant '{value}'")]
    UnrepresentableConstant { value: u64 },

    /// A symbol referenced from generated code does not exist in the target.
    #[error("Generated code references unknown symbol '{name}'")]
    MissingSymbol { name: Name },

    /// Writing a generated unit failed.
    #[error("Failed to write {}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}
