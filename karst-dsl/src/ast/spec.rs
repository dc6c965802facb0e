//  SPEC.rs
//    by Lut99
//
//  Created:
//    03 Mar 2025, 14:02:51
//  Last edited:
//    21 Aug 2025, 10:46:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines non-AST things for the AST, such as debug structures
//!   (TextPos, TextRange) and the general Node abstraction.
//

use std::fmt::{Debug, Display, Formatter, Result as FResult};

use num_traits::AsPrimitive;


/***** LIBRARY *****/
/// Defines a TextPos, which is a singular position within the source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextPos {
    /// The line number of this position (i.e., the Y-coordinate). Stored as a zero-indexed number.
    pub line : usize,
    /// The column number of this position (i.e., the X-coordinate). Stored as a zero-indexed number.
    pub col  : usize,
}

impl TextPos {
    /// Constructor for the TextPos that takes a zero-indexed position.
    ///
    /// # Arguments
    /// - `line`: The line number for this position (zero-indexed).
    /// - `col`: The column number for this position (zero-indexed).
    ///
    /// # Returns
    /// A new TextPos instance that points to the given position.
    #[inline]
    pub fn new0(line: impl AsPrimitive<usize>, col: impl AsPrimitive<usize>) -> Self {
        Self {
            line : line.as_(),
            col  : col.as_(),
        }
    }

    /// Constructor for the TextPos that takes a one-indexed position.
    ///
    /// # Arguments
    /// - `line`: The line number for this position (one-indexed).
    /// - `col`: The column number for this position (one-indexed).
    ///
    /// # Returns
    /// A new TextPos instance that points to the given position.
    #[inline]
    pub fn new1(line: impl AsPrimitive<usize>, col: impl AsPrimitive<usize>) -> Self {
        Self {
            line : line.as_() - 1,
            col  : col.as_() - 1,
        }
    }

    /// Returns the internal line as a zero-indexed value.
    ///
    /// Note that this is equivalent to directly reading the internal `line`-field.
    #[inline]
    pub const fn line0(&self) -> usize { self.line }
    /// Returns the internal column as a zero-indexed value.
    ///
    /// Note that this is equivalent to directly reading the internal `col`-field.
    #[inline]
    pub const fn col0(&self) -> usize { self.col }

    /// Returns the internal line as a one-indexed value.
    #[inline]
    pub const fn line1(&self) -> usize { self.line + 1 }
    /// Returns the internal column as a one-indexed value.
    #[inline]
    pub const fn col1(&self) -> usize { self.col + 1 }
}

impl Display for TextPos {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl AsRef<TextPos> for TextPos {
    #[inline]
    fn as_ref(&self) -> &Self { self }
}
impl From<&TextPos> for TextPos {
    #[inline]
    fn from(value: &TextPos) -> Self { *value }
}

impl<T: AsPrimitive<usize>, U: AsPrimitive<usize>> From<(T, U)> for TextPos {
    #[inline]
    fn from(value: (T, U)) -> Self { Self::new0(value.0, value.1) }
}



/// Defines TextRange, which is a continious range within the source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextRange {
    /// The start of the range, inclusive.
    pub start : TextPos,
    /// The end of the range, inclusive.
    pub end   : TextPos,
}

impl TextRange {
    /// Constructor for the TextRange.
    ///
    /// # Arguments
    /// - `start`: The start of the range, inclusive.
    /// - `end`: The end of the range, inclusive.
    ///
    /// # Returns
    /// A new TextRange that represents the range between the given positions.
    #[inline]
    pub fn new(start: impl Into<TextPos>, end: impl Into<TextPos>) -> Self {
        Self {
            start : start.into(),
            end   : end.into(),
        }
    }

    /// Returns the TextRange that covers both this range and the given one.
    ///
    /// # Arguments
    /// - `other`: The TextRange to merge with this one.
    ///
    /// # Returns
    /// A new TextRange spanning from the earliest start to the latest end.
    #[inline]
    pub fn until(&self, other: impl Into<TextRange>) -> Self {
        Self {
            start : self.start,
            end   : other.into().end,
        }
    }
}

impl Display for TextRange {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl AsRef<TextRange> for TextRange {
    #[inline]
    fn as_ref(&self) -> &Self { self }
}
impl From<&TextRange> for TextRange {
    #[inline]
    fn from(value: &TextRange) -> Self { *value }
}



/// Provides a generilization of AST nodes that allows it to get some common properties.
pub trait Node: Clone + Debug {
    /// Returns the internal TextRange of the node if it had any.
    fn range(&self) -> Option<TextRange>;
}
