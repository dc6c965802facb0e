//  MOD.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 09:10:21
//  Last edited:
//    21 Aug 2025, 10:55:17
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the scanner for Karst source files.
//

// Declare submodules
pub mod scanner;
pub mod tokens;

// Pull the relevant things into this module's namespace
pub use scanner::scan;
pub use tokens::{Token, TokenKind};
