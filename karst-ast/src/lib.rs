//  LIB.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 10:02:31
//  Last edited:
//    21 Aug 2025, 15:48:20
//  Auto updated?
//    Yes
//
//  Description:
//!   The `karst-ast` crate provides the semantic core of the Karst
//!   compiler: fully qualified names, the associative containers, the
//!   acyclic memoizing cache and the module/package/symbol resolution
//!   chain that turns a directory of sources into a typed [`Target`].
//

// Declare modules
pub mod cache;
pub mod checker;
pub mod collections;
pub mod errors;
pub mod name;
pub mod semantic;

// Define some useful abstraction over an AstError
pub use errors::AstError as Error;

use std::path::PathBuf;

use semantic::Target;


/***** LIBRARY *****/
/// Toplevel check function that resolves the module in the given directory into a [`Target`].
///
/// # Arguments
/// - `directory`: The directory of the main module.
/// - `bases`: The bases under which any other mentioned module is searched.
///
/// # Returns
/// The fully resolved [`Target`], with the main module and everything it depends on.
///
/// # Errors
/// This function errors on the first fatal diagnostic anywhere in the dependency closure of the
/// main module.
#[inline]
pub fn check(directory: impl Into<PathBuf>, bases: Vec<PathBuf>) -> Result<Target, Error> {
    checker::Checker::check(directory, bases)
}
