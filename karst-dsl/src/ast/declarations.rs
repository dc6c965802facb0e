//  DECLARATIONS.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 14:39:08
//  Last edited:
//    21 Aug 2025, 10:49:31
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the toplevel declarations in the Karst AST.
//

use super::auxillary::{Binding, Formula, Identifier};
use super::spec::{Node, TextRange};
use super::statements::Statement;


/***** LIBRARY *****/
/// A Declaration is a single named, toplevel construct in a source file.
#[derive(Clone, Debug)]
pub struct Declaration {
    /// Whether this declaration was marked `public`.
    pub public : bool,
    /// The name under which the declaration is known in its package.
    pub name   : Identifier,
    /// Any specific implementations of a declaration.
    pub kind   : DeclarationKind,
    /// The range in the source text for this declaration.
    pub range  : TextRange,
}
impl Node for Declaration {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}

/// Defines the DeclarationKind, which implements the specifics for each of the various declarations.
#[derive(Clone, Debug)]
pub enum DeclarationKind {
    /// A procedure with a body, defined in this package.
    Procedure {
        /// The list of parameters of this procedure.
        params : Vec<Binding>,
        /// The return type of this procedure, if written down. Absence means the unit type.
        ret    : Option<Formula>,
        /// The body of this procedure.
        body   : Statement,
    },

    /// A procedure that links against an externally defined routine.
    ExternalProcedure {
        /// The list of parameters of this procedure.
        params   : Vec<Binding>,
        /// The return type of this procedure, if written down. Absence means the unit type.
        ret      : Option<Formula>,
        /// The linkage name of the external routine.
        external : String,
    },

    /// A struct type. Members are carried in the tree but currently emitted opaque by the backend.
    Struct {
        /// The members of this struct.
        members : Vec<Binding>,
    },
}
