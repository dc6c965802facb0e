//  MOD.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 13:20:55
//  Last edited:
//    21 Aug 2025, 11:10:36
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the parser for Karst source files.
//

// Declare submodules
pub mod parser;

// Pull the relevant things into this module's namespace
pub use parser::parse;
