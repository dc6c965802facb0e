//  EXPRESSIONS.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 15:04:44
//  Last edited:
//    21 Aug 2025, 10:50:31
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the expressions in the Karst AST.
//

use super::auxillary::Mention;
use super::spec::{Node, TextRange};


/***** LIBRARY *****/
/// An Expression is a computation producing a value.
#[derive(Clone, Debug)]
pub struct Expression {
    /// Any specific implementations of an expression.
    pub kind  : ExpressionKind,
    /// The range in the source text for this expression.
    pub range : TextRange,
}
impl Node for Expression {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}

/// Defines the ExpressionKind, which implements the specifics for each of the various expressions.
#[derive(Clone, Debug)]
pub enum ExpressionKind {
    /// A less-than comparison between two expressions.
    LessThan {
        /// The lefthand-side operand.
        left  : Box<Expression>,
        /// The righthand-side operand.
        right : Box<Expression>,
    },

    /// An invocation of a procedure.
    Invocation {
        /// The mention of the invoked procedure.
        callee : Mention,
        /// The arguments to pass.
        args   : Vec<Expression>,
    },

    /// An access of a named value (a local variable, or a mention of a global).
    Access(Mention),

    /// A natural number literal.
    Natural(u64),

    /// A string literal, with escapes already resolved.
    String(String),
}
