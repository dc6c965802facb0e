//  LIB.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 13:55:40
//  Last edited:
//    21 Aug 2025, 11:42:09
//  Auto updated?
//    Yes
//
//  Description:
//!   The `karst-dsl` crate provides the front end for the Karst
//!   language: a scanner, a parser for source files, a parser for
//!   module configuration files and pretty diagnostics rendering.
//

// Declare modules
pub mod ast;
pub mod config;
pub mod errors;
pub mod parser;
pub mod scanner;

// Define some useful abstraction over a DslError
pub use errors::{DslError as Error, PrettyError};

use log::debug;

use ast::declarations::Declaration;


/***** LIBRARY *****/
/// Toplevel parse function that takes a Karst source file to its list of toplevel declarations.
///
/// # Arguments
/// - `source`: The raw source text to parse.
///
/// # Returns
/// The toplevel declarations in the source file, in source order.
///
/// # Errors
/// This function errors if the source text does not describe a legal Karst source file.
pub fn parse_source(source: &str) -> Result<Vec<Declaration>, Error> {
    debug!("Parsing source text of {} bytes", source.len());
    parser::parse(scanner::scan(source)?)
}
