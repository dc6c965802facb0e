//  LIB.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 10:40:02
//  Last edited:
//    21 Aug 2025, 16:31:47
//  Auto updated?
//    Yes
//
//  Description:
//!   The `karst-gen` crate implements the C backend of the Karst
//!   compiler: it turns a resolved [`Target`](karst_ast::semantic::Target)
//!   into one C translation unit per executable package.
//

// Declare modules
pub mod builder;
pub mod errors;

// Define some useful abstraction over a GenError
pub use builder::Builder;
pub use errors::GenError as Error;

use std::path::Path;

use karst_ast::semantic::Target;


/***** LIBRARY *****/
/// Toplevel generate function that writes one C unit per executable package of the main module.
///
/// # Arguments
/// - `target`: The resolved [`Target`] to generate code for.
/// - `dist`: The directory to write the units to. Created if it does not exist.
///
/// # Errors
/// This function errors if any unit reaches a compile-time-only type or constant, or if writing a
/// unit fails.
#[inline]
pub fn generate(target: &Target, dist: impl AsRef<Path>) -> Result<(), Error> { Builder::generate(target, dist) }
