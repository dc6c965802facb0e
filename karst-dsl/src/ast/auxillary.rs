//  AUXILLARY.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 14:21:33
//  Last edited:
//    21 Aug 2025, 10:47:50
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines smaller AST nodes that are shared between the larger ones,
//!   such as identifiers, mentions and type formulas.
//

use std::fmt::{Display, Formatter, Result as FResult};

use super::spec::{Node, TextRange};


/***** LIBRARY *****/
/// Defines a single identifier as it occurred in the source text.
#[derive(Clone, Debug)]
pub struct Identifier {
    /// The name of the identifier.
    pub name  : String,
    /// The range in the source text for this identifier.
    pub range : TextRange,
}
impl Node for Identifier {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}

impl Display for Identifier {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{}", self.name) }
}



/// Defines a Mention, which is a (possibly dotted) reference to a global symbol.
///
/// A mention with a single segment refers to a declaration in the current package; a mention with
/// more segments is fully qualified, i.e., its first segment names a module.
#[derive(Clone, Debug)]
pub struct Mention {
    /// The segments of the mention, in order. Never empty.
    pub segments : Vec<Identifier>,
    /// The range in the source text for the whole mention.
    pub range    : TextRange,
}
impl Node for Mention {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}

impl Display for Mention {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 { write!(f, ".")?; }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}



/// Defines a type formula, i.e., the syntax of a type as written down.
#[derive(Clone, Debug)]
pub enum Formula {
    /// A pointer to some other type.
    Pointer {
        /// The type pointed to.
        pointee : Box<Formula>,
        /// The range in the source text for this formula.
        range   : TextRange,
    },
    /// A plain reference to a declared type.
    Base(Mention),
}
impl Node for Formula {
    #[inline]
    fn range(&self) -> Option<TextRange> {
        match self {
            Self::Pointer { range, .. } => Some(*range),
            Self::Base(mention) => mention.range(),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Pointer { pointee, .. } => write!(f, "*{pointee}"),
            Self::Base(mention) => write!(f, "{mention}"),
        }
    }
}



/// Defines a Binding, which pairs a name with a type formula.
///
/// Used for both procedure parameters and struct members.
#[derive(Clone, Debug)]
pub struct Binding {
    /// The name of the bound value.
    pub name    : Identifier,
    /// The type of the bound value.
    pub formula : Formula,
    /// The range in the source text for this binding.
    pub range   : TextRange,
}
impl Node for Binding {
    #[inline]
    fn range(&self) -> Option<TextRange> { Some(self.range) }
}
