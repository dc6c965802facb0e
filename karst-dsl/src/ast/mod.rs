//  MOD.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 14:01:17
//  Last edited:
//    21 Aug 2025, 10:51:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the AST for parsed Karst source files.
//

// Declare submodules
pub mod auxillary;
pub mod declarations;
pub mod expressions;
pub mod spec;
pub mod statements;

// Pull the most common things into this module's namespace
pub use auxillary::{Binding, Formula, Identifier, Mention};
pub use declarations::{Declaration, DeclarationKind};
pub use expressions::{Expression, ExpressionKind};
pub use spec::{Node, TextPos, TextRange};
pub use statements::{Statement, StatementKind};
