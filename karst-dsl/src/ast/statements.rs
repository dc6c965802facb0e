//  STATEMENTS.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 14:51:26
//  Last edited:
//    21 Aug 2025, 10:50:04
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the statements in the Karst AST.
//

use super::auxillary::{Formula, Identifier};
use super::expressions::Expression;
use super::spec::{Node, TextRange};


/***** LIBRARY *****/
/// A Statement is the smallest, still-valid snippet of a procedure body.
#[derive(Clone, Debug)]
pub struct Statement {
    /// Any specific implementations of a statement.
    pub kind  : StatementKind,
    /// The range in the source text for this statement.
    pub range : TextRange,
}
impl Node for Statement {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}

/// Defines the StatementKind, which implements the specifics for each of the various statements.
#[derive(Clone, Debug)]
pub enum StatementKind {
    /// A block of statements, which scopes the variables declared within.
    Block(Vec<Statement>),

    /// An if-statement, with an optional else-branch.
    If {
        /// The condition to branch on.
        cond         : Expression,
        /// The statement to execute if the condition holds.
        true_branch  : Box<Statement>,
        /// The statement to execute if the condition does not hold, if any.
        false_branch : Option<Box<Statement>>,
    },

    /// A definition of a local variable.
    Var {
        /// The name of the variable.
        name       : Identifier,
        /// The type of the variable, if written down.
        annotation : Option<Formula>,
        /// The value to initialize the variable with.
        value      : Expression,
    },

    /// A return-statement, escaping from the parent procedure.
    Return(Option<Expression>),

    /// An expression of which the value is discarded.
    Discard(Expression),
}
